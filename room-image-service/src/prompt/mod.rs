//! Prompt construction: category classification and scene rendering.

pub mod builder;
pub mod category;

pub use builder::{build_prompt, join_products, EMPTY_ROOM_PROMPT, GENERIC_SCENE};
pub use category::{classify, Category, CategoryRule, CATEGORY_TABLE};
