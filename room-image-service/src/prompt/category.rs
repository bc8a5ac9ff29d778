//! Product category classification.
//!
//! [`CATEGORY_TABLE`] is scanned in declaration order and the first rule with
//! a keyword hit wins, so the order of the table is the tie-break between
//! categories. Keywords match as substrings ("handbags" hits "bag").

use std::fmt;

/// Placeholder substituted with the rendered product phrase in a scene.
pub const PRODUCTS_PLACEHOLDER: &str = "{products}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Apparel,
    Beauty,
    Electronics,
    HomeKitchen,
    Grocery,
    Health,
    Toys,
    Sports,
    Automotive,
    Books,
    Office,
    Pet,
    Baby,
    Garden,
    Musical,
    Luggage,
    Arts,
    Collectibles,
}

impl Category {
    pub fn tag(self) -> &'static str {
        match self {
            Category::Apparel => "apparel",
            Category::Beauty => "beauty",
            Category::Electronics => "electronics",
            Category::HomeKitchen => "home_kitchen",
            Category::Grocery => "grocery",
            Category::Health => "health",
            Category::Toys => "toys",
            Category::Sports => "sports",
            Category::Automotive => "automotive",
            Category::Books => "books",
            Category::Office => "office",
            Category::Pet => "pet",
            Category::Baby => "baby",
            Category::Garden => "garden",
            Category::Musical => "musical",
            Category::Luggage => "luggage",
            Category::Arts => "arts",
            Category::Collectibles => "collectibles",
        }
    }

    pub fn rule(self) -> &'static CategoryRule {
        // Table rows are declared in variant order.
        &CATEGORY_TABLE[self as usize]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One row of the classification table.
#[derive(Debug)]
pub struct CategoryRule {
    pub category: Category,
    /// Lower-case substrings that select this category.
    pub keywords: &'static [&'static str],
    /// Scene description containing [`PRODUCTS_PLACEHOLDER`] once.
    pub scene: &'static str,
}

impl CategoryRule {
    fn matches(&self, lowered_products: &[String]) -> bool {
        lowered_products
            .iter()
            .any(|product| self.keywords.iter().any(|kw| product.contains(kw)))
    }

    pub fn render(&self, product_phrase: &str) -> String {
        self.scene.replace(PRODUCTS_PLACEHOLDER, product_phrase)
    }
}

pub static CATEGORY_TABLE: [CategoryRule; 18] = [
    CategoryRule {
        category: Category::Apparel,
        keywords: &[
            "shirt", "dress", "jacket", "shoes", "sneakers", "t-shirt", "jeans", "skirt", "suit",
            "blazer", "coat", "scarf", "hat", "sunglasses", "watch", "bag", "handbag", "backpack",
            "wallet", "gloves", "belt", "tie", "socks", "boots",
        ],
        scene: "A photorealistic, modern dressing room with a stylish mannequin wearing {products}",
    },
    CategoryRule {
        category: Category::Beauty,
        keywords: &[
            "lipstick", "makeup", "foundation", "blush", "mascara", "eyeliner", "perfume",
            "nail polish", "skincare", "hair care", "fragrance", "cosmetic",
        ],
        scene: "A photorealistic, modern vanity table with {products} arranged beautifully",
    },
    CategoryRule {
        category: Category::Electronics,
        keywords: &[
            "laptop", "tv", "television", "smartphone", "tablet", "speaker", "headphones",
            "camera", "monitor", "mouse", "keyboard", "printer", "charger", "earbuds", "console",
        ],
        scene: "A photorealistic, modern living room with {products} displayed attractively",
    },
    CategoryRule {
        category: Category::HomeKitchen,
        keywords: &[
            "sofa", "couch", "table", "chair", "bed", "desk", "bookshelf", "cabinet", "dresser",
            "lamp", "rug", "bedding", "pillow", "blanket", "cookware", "utensil", "mug", "plate",
            "bowl", "pan", "pot", "appliance",
        ],
        scene: "A photorealistic, modern home or kitchen featuring {products}",
    },
    CategoryRule {
        category: Category::Grocery,
        keywords: &[
            "snack", "beverage", "coffee", "tea", "cereal", "chocolate", "candy", "juice", "soda",
            "biscuit", "cracker", "spice", "sauce",
        ],
        scene: "A photorealistic, modern kitchen or dining table with {products} arranged invitingly",
    },
    CategoryRule {
        category: Category::Health,
        keywords: &[
            "vitamin", "supplement", "medicine", "bandage", "sanitizer", "mask", "thermometer",
            "first aid", "personal care",
        ],
        scene: "A photorealistic, modern bathroom or health station with {products}",
    },
    CategoryRule {
        category: Category::Toys,
        keywords: &[
            "toy", "action figure", "board game", "doll", "puzzle", "lego", "game", "plush",
            "stuffed animal",
        ],
        scene: "A photorealistic, modern playroom with {products} scattered playfully",
    },
    CategoryRule {
        category: Category::Sports,
        keywords: &[
            "bicycle", "tent", "grill", "barbecue", "garden", "patio", "umbrella", "ball", "bat",
            "racket", "glove", "helmet", "skateboard", "yoga mat", "dumbbell",
        ],
        scene: "A photorealistic, modern sports area or outdoor scene with {products}",
    },
    CategoryRule {
        category: Category::Automotive,
        keywords: &[
            "car", "tire", "engine", "seat cover", "steering wheel", "wiper", "battery", "tool",
        ],
        scene: "A photorealistic, modern garage or car interior with {products}",
    },
    CategoryRule {
        category: Category::Books,
        keywords: &["book", "novel", "magazine", "comic", "manual", "guide", "textbook"],
        scene: "A photorealistic, modern reading nook or library with {products}",
    },
    CategoryRule {
        category: Category::Office,
        keywords: &[
            "pen", "notebook", "paper", "stapler", "folder", "envelope", "printer",
            "desk organizer", "office chair",
        ],
        scene: "A photorealistic, modern office or study with {products} neatly arranged",
    },
    CategoryRule {
        category: Category::Pet,
        keywords: &[
            "dog", "cat", "fish", "bird", "pet food", "leash", "collar", "aquarium", "cage",
            "litter",
        ],
        scene: "A photorealistic, modern home with {products} for pets",
    },
    CategoryRule {
        category: Category::Baby,
        keywords: &[
            "stroller", "car seat", "crib", "bottle", "diaper", "pacifier", "baby monitor",
            "high chair",
        ],
        scene: "A photorealistic, modern nursery with {products}",
    },
    CategoryRule {
        category: Category::Garden,
        keywords: &[
            "plant", "flower", "shovel", "hose", "fertilizer", "pot", "planter", "lawn mower",
            "sprinkler",
        ],
        scene: "A photorealistic, modern garden or patio with {products}",
    },
    CategoryRule {
        category: Category::Musical,
        keywords: &[
            "guitar", "keyboard", "piano", "drum", "violin", "flute", "microphone", "amplifier",
            "music stand",
        ],
        scene: "A photorealistic, modern music room with {products}",
    },
    CategoryRule {
        category: Category::Luggage,
        keywords: &[
            "suitcase", "backpack", "duffel", "travel bag", "carry-on", "luggage", "trolley",
        ],
        scene: "A photorealistic, modern travel scene with {products}",
    },
    CategoryRule {
        category: Category::Arts,
        keywords: &[
            "paint", "brush", "canvas", "easel", "marker", "crayon", "scissors", "glue", "craft",
            "sewing", "yarn", "needle",
        ],
        scene: "A photorealistic, modern art studio with {products}",
    },
    CategoryRule {
        category: Category::Collectibles,
        keywords: &["coin", "stamp", "artwork", "poster", "autograph", "memorabilia"],
        scene: "A photorealistic, modern display case with {products}",
    },
];

/// First category in table order with a keyword inside any product.
/// Matching is case-insensitive; an empty selection matches nothing.
pub fn classify<S: AsRef<str>>(products: &[S]) -> Option<Category> {
    let lowered: Vec<String> = products
        .iter()
        .map(|p| p.as_ref().to_lowercase())
        .collect();

    CATEGORY_TABLE
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.category)
}
