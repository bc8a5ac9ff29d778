use super::category::{classify, PRODUCTS_PLACEHOLDER};

/// Prompt used when the shopper has not picked anything.
pub const EMPTY_ROOM_PROMPT: &str = "A photorealistic, modern, stylish virtual room with natural lighting, high detail, and inviting atmosphere";

/// Scene used when no category keyword matches.
pub const GENERIC_SCENE: &str = "A photorealistic, modern virtual room, featuring {products}. The setting is visually appealing, with natural lighting, high detail, and an inviting atmosphere. All products are attractively arranged to showcase their best features.";

/// Build the image prompt for a product selection.
///
/// Products keep their original casing in the prompt; case only matters
/// for category matching.
pub fn build_prompt<S: AsRef<str>>(products: &[S]) -> String {
    if products.is_empty() {
        return EMPTY_ROOM_PROMPT.to_string();
    }

    let phrase = join_products(products);
    match classify(products) {
        Some(category) => category.rule().render(&phrase),
        None => GENERIC_SCENE.replace(PRODUCTS_PLACEHOLDER, &phrase),
    }
}

/// `a`, `a and b`, `a, b, and c`.
pub fn join_products<S: AsRef<str>>(products: &[S]) -> String {
    match products {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|p| p.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::category::Category;

    #[test]
    fn empty_selection_uses_empty_room_prompt() {
        assert_eq!(build_prompt::<String>(&[]), EMPTY_ROOM_PROMPT);
        assert_eq!(build_prompt::<&str>(&[]), build_prompt::<&str>(&[]));
    }

    #[test]
    fn single_apparel_product() {
        assert_eq!(
            build_prompt(&["sunglasses"]),
            "A photorealistic, modern dressing room with a stylish mannequin wearing sunglasses"
        );
    }

    #[test]
    fn apparel_wins_over_electronics() {
        assert_eq!(
            build_prompt(&["sunglasses", "laptop"]),
            Category::Apparel.rule().render("sunglasses and laptop")
        );
    }

    #[test]
    fn three_products_use_oxford_comma() {
        assert_eq!(
            build_prompt(&["guitar", "novel", "shovel"]),
            "A photorealistic, modern reading nook or library with guitar, novel, and shovel"
        );
        assert_eq!(
            join_products(&["a", "b", "c", "d"]),
            "a, b, c, and d"
        );
    }

    #[test]
    fn unmatched_products_use_generic_scene() {
        let prompt = build_prompt(&["Quartz Crystal", "Incense"]);
        assert_eq!(
            prompt,
            "A photorealistic, modern virtual room, featuring Quartz Crystal and Incense. \
             The setting is visually appealing, with natural lighting, high detail, and an \
             inviting atmosphere. All products are attractively arranged to showcase their \
             best features."
        );
    }

    #[test]
    fn original_casing_is_kept() {
        let prompt = build_prompt(&["Gaming LAPTOP"]);
        assert_eq!(
            prompt,
            "A photorealistic, modern living room with Gaming LAPTOP displayed attractively"
        );
    }

    #[test]
    fn duplicates_are_rendered_as_given() {
        assert_eq!(join_products(&["mug", "mug"]), "mug and mug");
    }

    #[test]
    fn join_handles_short_lists() {
        assert_eq!(join_products::<&str>(&[]), "");
        assert_eq!(join_products(&["lamp"]), "lamp");
    }
}
