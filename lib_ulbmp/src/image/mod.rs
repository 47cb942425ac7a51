pub mod decoder;
pub mod encoder;
pub mod format;

pub use decoder::{decode, load};
pub use encoder::{encode, save};
