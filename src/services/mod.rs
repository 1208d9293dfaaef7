pub mod clothing;
pub mod images;
pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod response_parser;
pub mod saved_outfits;
pub mod tagging;
pub mod wardrobe;

pub use images::ImageStorage;
pub use providers::{GeminiClient, GenerativeModel};
