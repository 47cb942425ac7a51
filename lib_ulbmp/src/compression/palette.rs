use std::collections::HashMap;

use thiserror::Error;

use crate::image::format::{Depth, Image};
use crate::pixel::Pixel;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    #[error("Palette of {colors} colors does not fit depth {depth} (maximum {max})")]
    TooLarge { colors: usize, depth: u8, max: usize },
    #[error("Invalid palette index: {index} exceeds palette size of {size}")]
    InvalidIndex { index: usize, size: usize },
    #[error("Pixel {0:?} is not part of the palette")]
    UnknownPixel(Pixel),
}

/// Distinct colors of an image, indexed by order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<Pixel>,
    lookup: HashMap<Pixel, usize>,
}

impl Palette {
    /// Collects the distinct pixels of `image` in row-major order of first appearance.
    pub fn from_image(image: &Image) -> Self {
        let mut palette = Palette::default();

        for &pixel in image.pixels() {
            if !palette.lookup.contains_key(&pixel) {
                palette.lookup.insert(pixel, palette.colors.len());
                palette.colors.push(pixel);
            }
        }

        palette
    }

    /// Builds the palette of `image` and checks it is addressable at `depth`.
    ///
    /// # Errors
    /// - Returns `PaletteError::TooLarge` if the image has more than `2^depth` distinct colors
    pub fn for_depth(image: &Image, depth: Depth) -> Result<Self, PaletteError> {
        let palette = Self::from_image(image);
        palette.check_depth(depth)?;
        Ok(palette)
    }

    pub fn check_depth(&self, depth: Depth) -> Result<(), PaletteError> {
        match depth.max_colors() {
            Some(max) if self.colors.len() > max => Err(PaletteError::TooLarge {
                colors: self.colors.len(),
                depth: depth.bits(),
                max,
            }),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn colors(&self) -> &[Pixel] {
        &self.colors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn index_of(&self, pixel: &Pixel) -> Option<usize> {
        self.lookup.get(pixel).copied()
    }

    /// Maps every pixel to its one-byte palette index.
    pub fn indices(&self, pixels: &[Pixel]) -> Result<Vec<u8>, PaletteError> {
        pixels
            .iter()
            .map(|pixel| {
                let index = self
                    .index_of(pixel)
                    .ok_or(PaletteError::UnknownPixel(*pixel))?;
                u8::try_from(index).map_err(|_| PaletteError::TooLarge {
                    colors: self.colors.len(),
                    depth: 8,
                    max: 256,
                })
            })
            .collect()
    }
}

/// Expands palette indices back into pixels.
///
/// # Errors
/// - Returns `PaletteError::InvalidIndex` if any index exceeds the palette size
pub fn expand(palette: &[Pixel], indices: &[u8]) -> Result<Vec<Pixel>, PaletteError> {
    indices
        .iter()
        .map(|&index| {
            palette
                .get(index as usize)
                .copied()
                .ok_or(PaletteError::InvalidIndex {
                    index: index as usize,
                    size: palette.len(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(pixels: Vec<Pixel>) -> Image {
        Image::new(pixels.len() as u16, 1, pixels).unwrap()
    }

    #[test]
    fn test_palette_rrgb() {
        let red = Pixel::new(255, 0, 0);
        let green = Pixel::new(0, 255, 0);
        let blue = Pixel::new(0, 0, 255);
        let palette = Palette::from_image(&image(vec![red, red, green, blue]));

        assert_eq!(palette.colors(), &[red, green, blue]);
        assert_eq!(
            palette.indices(&[red, red, green, blue]).unwrap(),
            vec![0, 0, 1, 2]
        );
    }

    #[test]
    fn test_palette_exact_fit() {
        let pixels = (0..4).map(|i| Pixel::new(i, 0, 0)).collect();
        assert!(Palette::for_depth(&image(pixels), Depth::Two).is_ok());
    }

    #[test]
    fn test_palette_too_large() {
        let pixels = (0..5).map(|i| Pixel::new(i, 0, 0)).collect();
        assert!(matches!(
            Palette::for_depth(&image(pixels), Depth::Two),
            Err(PaletteError::TooLarge {
                colors: 5,
                depth: 2,
                max: 4
            })
        ));
    }

    #[test]
    fn test_palette_depth_24_is_unbounded() {
        let mut pixels = (0..=255).map(|i| Pixel::new(i, i, 0)).collect::<Vec<_>>();
        pixels.push(Pixel::new(0, 0, 1));
        assert!(Palette::for_depth(&image(pixels), Depth::TwentyFour).is_ok());
    }

    #[test]
    fn test_palette_empty_input() {
        let palette = Palette::from_image(&Image::new(0, 0, vec![]).unwrap());
        assert!(palette.is_empty());
        assert!(palette.indices(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_palette_invalid_index() {
        let result = expand(&[Pixel::new(255, 0, 0)], &[0, 1]);
        assert!(matches!(
            result,
            Err(PaletteError::InvalidIndex { index: 1, size: 1 })
        ));
    }

    #[test]
    fn test_palette_expand() {
        let palette = [Pixel::new(1, 1, 1), Pixel::new(2, 2, 2)];
        assert_eq!(
            expand(&palette, &[1, 0, 1]).unwrap(),
            vec![palette[1], palette[0], palette[1]]
        );
    }
}
