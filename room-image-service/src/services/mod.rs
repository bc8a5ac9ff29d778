pub mod providers;

pub use providers::{GeneratedImage, ImageProvider, ImageRequest, ProviderError};
