pub mod bitpack;
pub mod delta;
pub mod palette;
pub mod rle;

pub use bitpack::BitPackError;
pub use delta::{DeltaBlock, DeltaError};
pub use palette::{Palette, PaletteError};
pub use rle::RleDecompressionError;
