pub mod health;
pub mod room_image;

pub use health::health_check;
pub use room_image::{generate_virtual_room_image, ProductSelection, RoomImageResponse};
