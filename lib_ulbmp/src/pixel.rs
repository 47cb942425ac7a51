use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PixelError {
    #[error("{channel} channel intensity {value} is outside [0, 255]")]
    ChannelOutOfRange { channel: Channel, value: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Red => f.write_str("red"),
            Channel::Green => f.write_str("green"),
            Channel::Blue => f.write_str("blue"),
        }
    }
}

/// An RGB color with one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel {
    r: u8,
    g: u8,
    b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a pixel from signed intensities, rejecting any channel outside [0, 255].
    pub fn try_new(r: i32, g: i32, b: i32) -> Result<Self, PixelError> {
        Ok(Self {
            r: channel(Channel::Red, r)?,
            g: channel(Channel::Green, g)?,
            b: channel(Channel::Blue, b)?,
        })
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.r
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.g
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.b
    }

    #[inline]
    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Signed per-channel difference `other - self`.
    #[inline]
    pub fn delta(&self, other: &Pixel) -> (i32, i32, i32) {
        (
            other.r as i32 - self.r as i32,
            other.g as i32 - self.g as i32,
            other.b as i32 - self.b as i32,
        )
    }

    /// Applies a signed per-channel offset, failing if the result leaves the byte range.
    pub fn offset(&self, dr: i32, dg: i32, db: i32) -> Result<Pixel, PixelError> {
        Pixel::try_new(
            self.r as i32 + dr,
            self.g as i32 + dg,
            self.b as i32 + db,
        )
    }
}

fn channel(channel: Channel, value: i32) -> Result<u8, PixelError> {
    u8::try_from(value).map_err(|_| PixelError::ChannelOutOfRange { channel, value })
}

impl From<[u8; 3]> for Pixel {
    fn from(rgb: [u8; 3]) -> Self {
        Pixel::new(rgb[0], rgb[1], rgb[2])
    }
}
