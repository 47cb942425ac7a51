use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{BASE_HEADER_SIZE, MAGIC, PALETTE_HEADER_SIZE};
use crate::pixel::Pixel;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image of {width}x{height} needs {expected} pixels, got {actual}")]
    PixelCountMismatch {
        width: u16,
        height: u16,
        expected: usize,
        actual: usize,
    },
    #[error("Position ({x}, {y}) is outside of the {width}x{height} image")]
    IndexOutOfBounds {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },
}

/// A `width` x `height` grid of pixels stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u16,
    height: u16,
    pixels: Vec<Pixel>,
}

impl Image {
    pub fn new(width: u16, height: u16, pixels: Vec<Pixel>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ImageError::PixelCountMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates an image where every pixel is `pixel`.
    pub fn filled(width: u16, height: u16, pixel: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn get(&self, x: u16, y: u16) -> Result<Pixel, ImageError> {
        let index = self.index(x, y)?;
        Ok(self.pixels[index])
    }

    pub fn set(&mut self, x: u16, y: u16, pixel: Pixel) -> Result<(), ImageError> {
        let index = self.index(x, y)?;
        self.pixels[index] = pixel;
        Ok(())
    }

    /// Distinct pixels of the image, in no particular order.
    ///
    /// Use [`crate::compression::palette::Palette`] when a stable index assignment is needed.
    pub fn unique_pixels(&self) -> HashSet<Pixel> {
        self.pixels.iter().copied().collect()
    }

    fn index(&self, x: u16, y: u16) -> Result<usize, ImageError> {
        if x >= self.width || y >= self.height {
            return Err(ImageError::IndexOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(x as usize + y as usize * self.width as usize)
    }
}

/// Bits per pixel of a version 3 image. `TwentyFour` stores raw channels without a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Depth {
    One,
    Two,
    Four,
    Eight,
    TwentyFour,
}

impl Depth {
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            Depth::One => 1,
            Depth::Two => 2,
            Depth::Four => 4,
            Depth::Eight => 8,
            Depth::TwentyFour => 24,
        }
    }

    /// Largest palette addressable at this depth, `None` when no palette is used.
    pub fn max_colors(self) -> Option<usize> {
        match self {
            Depth::TwentyFour => None,
            depth => Some(1 << depth.bits()),
        }
    }

    /// Whether several indices share one byte.
    #[inline]
    pub fn is_packed(self) -> bool {
        matches!(self, Depth::One | Depth::Two | Depth::Four)
    }

    #[inline]
    pub fn supports_run_length(self) -> bool {
        matches!(self, Depth::Eight | Depth::TwentyFour)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported depth {0}, expected one of 1, 2, 4, 8 or 24")]
pub struct InvalidDepth(pub u8);

impl TryFrom<u8> for Depth {
    type Error = InvalidDepth;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(Depth::One),
            2 => Ok(Depth::Two),
            4 => Ok(Depth::Four),
            8 => Ok(Depth::Eight),
            24 => Ok(Depth::TwentyFour),
            other => Err(InvalidDepth(other)),
        }
    }
}

impl From<Depth> for u8 {
    fn from(depth: Depth) -> Self {
        depth.bits()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaletteOptions {
    pub depth: Depth,
    pub run_length: bool,
}

impl PaletteOptions {
    pub fn new(depth: Depth, run_length: bool) -> Self {
        Self { depth, run_length }
    }

    /// The run-length flag as written to the header: only depths 8 and 24 honor it.
    #[inline]
    pub fn effective_run_length(&self) -> bool {
        self.run_length && self.depth.supports_run_length()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Unsupported ULBMP version {0}")]
    UnsupportedVersion(u8),
    #[error("Version 3 requires a depth and a run-length flag")]
    MissingPaletteOptions,
}

/// One of the four pixel-stream encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// Raw RGB triples.
    V1,
    /// (count, R, G, B) run-length records.
    V2,
    /// Palette indices, bit-packed or run-length encoded depending on the options.
    V3(PaletteOptions),
    /// Blocks encoding each pixel relative to the previous one.
    V4,
}

impl Version {
    /// Builds a version from its number and the options only version 3 takes.
    pub fn from_parts(number: u8, options: Option<PaletteOptions>) -> Result<Self, VersionError> {
        match number {
            1 => Ok(Version::V1),
            2 => Ok(Version::V2),
            3 => options
                .map(Version::V3)
                .ok_or(VersionError::MissingPaletteOptions),
            4 => Ok(Version::V4),
            other => Err(VersionError::UnsupportedVersion(other)),
        }
    }

    #[inline]
    pub fn number(&self) -> u8 {
        match self {
            Version::V1 => 1,
            Version::V2 => 2,
            Version::V3(_) => 3,
            Version::V4 => 4,
        }
    }
}

/// Everything stored in front of the pixel stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: Version,
    pub width: u16,
    pub height: u16,
    /// Inline palette, only present for version 3 below depth 24.
    pub palette: Vec<Pixel>,
}

impl Header {
    pub const MAGIC_SIZE: usize = MAGIC.len();
    pub const VERSION_SIZE: usize = std::mem::size_of::<u8>();
    pub const LENGTH_SIZE: usize = std::mem::size_of::<u16>();
    pub const WIDTH_HEIGHT_SIZE: usize = std::mem::size_of::<u16>();
    pub const PALETTE_ENTRY_SIZE: usize = 3;

    /// Value of the header-length field: the byte count before the pixel stream.
    pub fn size(&self) -> usize {
        match self.version {
            Version::V3(_) => PALETTE_HEADER_SIZE + self.palette.len() * Self::PALETTE_ENTRY_SIZE,
            _ => BASE_HEADER_SIZE,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size());

        bytes.extend_from_slice(&MAGIC);
        bytes.push(self.version.number());
        bytes.extend_from_slice(&(self.size() as u16).to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());

        if let Version::V3(options) = self.version {
            bytes.push(options.depth.bits());
            bytes.push(options.effective_run_length() as u8);
            for pixel in &self.palette {
                bytes.extend_from_slice(&pixel.rgb());
            }
        }

        bytes
    }
}
