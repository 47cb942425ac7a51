use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::{debug, error, info, warn};
use thiserror::Error;

use super::format::{Header, Image, PaletteOptions, Version};
use crate::compression::bitpack::{self, BitPackError};
use crate::compression::delta::delta_compression;
use crate::compression::palette::{Palette, PaletteError};
use crate::compression::rle::rle_compression;
use crate::pixel::Pixel;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Palette encoding failed")]
    Palette(#[from] PaletteError),
    #[error("Failed to pack palette indices")]
    BitPack(#[from] BitPackError),
    #[error("Failed to write image file")]
    Io(#[from] std::io::Error),
}

/// Encodes an image as a complete ULBMP file.
///
/// # Parameters
/// - `image`: The image to encode.
/// - `version`: The ULBMP version, with depth and run-length options for version 3.
///
/// # Returns
/// The header followed by the pixel stream. Run-length is dropped for version 3
/// below depth 8, and the header records that.
///
/// # Errors
/// - Returns `EncodingError::Palette` if the image has more colors than the depth allows
/// - Returns `EncodingError::BitPack` if an index cannot be packed at the depth
pub fn encode(image: &Image, version: Version) -> Result<Vec<u8>, EncodingError> {
    info!(
        "Starting encoding of {}x{} image as version {}",
        image.width(),
        image.height(),
        version.number()
    );

    // Step 1: Compress the pixels, collecting the palette for version 3
    let (palette, stream) = match version {
        Version::V1 => (Vec::new(), encode_raw(image.pixels())),
        Version::V2 => (Vec::new(), encode_run_length(image.pixels())),
        Version::V3(options) => encode_palette(image, options)?,
        Version::V4 => (Vec::new(), delta_compression(image.pixels())),
    };

    // Step 2: Write the header, then the stream
    let header = Header {
        version,
        width: image.width(),
        height: image.height(),
        palette,
    };
    let mut encoded = header.to_bytes();
    debug!(
        "Header written: {} bytes, palette of {} colors",
        encoded.len(),
        header.palette.len()
    );

    encoded.extend_from_slice(&stream);
    debug!("Pixel stream written: {} bytes", stream.len());

    info!("Encoding completed: {} bytes", encoded.len());
    Ok(encoded)
}

/// Encodes `image` and writes it to `path`.
pub fn save<P: AsRef<Path>>(image: &Image, path: P, version: Version) -> Result<(), EncodingError> {
    let encoded = encode(image, version)?;

    let mut file = File::create(path.as_ref()).map_err(|e| {
        error!("Failed to create {}: {}", path.as_ref().display(), e);
        e
    })?;
    file.write_all(&encoded)?;

    debug!("Saved {} bytes to {}", encoded.len(), path.as_ref().display());
    Ok(())
}

fn encode_raw(pixels: &[Pixel]) -> Vec<u8> {
    pixels.iter().flat_map(Pixel::rgb).collect()
}

fn encode_run_length(pixels: &[Pixel]) -> Vec<u8> {
    rle_compression(pixels.iter().copied(), |out, pixel| {
        out.extend_from_slice(&pixel.rgb())
    })
}

/// Version 3 stream, returned with the palette to store in the header.
fn encode_palette(
    image: &Image,
    options: PaletteOptions,
) -> Result<(Vec<Pixel>, Vec<u8>), EncodingError> {
    let depth = options.depth;
    let run_length = options.effective_run_length();

    if options.run_length && !run_length {
        warn!(
            "Run-length encoding is not defined at depth {}, writing packed indices instead",
            depth.bits()
        );
    }

    if depth.max_colors().is_none() {
        let stream = if run_length {
            encode_run_length(image.pixels())
        } else {
            encode_raw(image.pixels())
        };
        return Ok((Vec::new(), stream));
    }

    let palette = Palette::for_depth(image, depth).map_err(|e| {
        error!("{}", e);
        e
    })?;
    debug!("Palette built with {} colors", palette.len());

    let indices = palette.indices(image.pixels())?;
    let stream = if depth.is_packed() {
        bitpack::pack(&indices, depth.bits())?
    } else if run_length {
        rle_compression(indices, |out, index| out.push(index))
    } else {
        indices
    };

    Ok((palette.colors().to_vec(), stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BASE_HEADER_SIZE;
    use crate::image::format::Depth;

    fn stream(encoded: &[u8]) -> &[u8] {
        let header_len = u16::from_le_bytes([encoded[6], encoded[7]]) as usize;
        &encoded[header_len..]
    }

    #[test]
    fn test_encode_v1_raw_triples() {
        let image = Image::new(2, 1, vec![Pixel::new(1, 2, 3), Pixel::new(4, 5, 6)]).unwrap();
        let encoded = encode(&image, Version::V1).unwrap();
        assert_eq!(&encoded[..6], b"ULBMP\x01");
        assert_eq!(stream(&encoded), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_encode_v2_two_equal_pixels() {
        let image = Image::filled(2, 1, Pixel::new(10, 10, 10));
        let encoded = encode(&image, Version::V2).unwrap();
        assert_eq!(encoded.len(), BASE_HEADER_SIZE + 4);
        assert_eq!(stream(&encoded), &[0x02, 0x0A, 0x0A, 0x0A]);
    }

    #[test]
    fn test_encode_v2_run_overflow() {
        let pixel = Pixel::new(7, 8, 9);
        let image = Image::filled(256, 1, pixel);
        let encoded = encode(&image, Version::V2).unwrap();
        assert_eq!(stream(&encoded), &[255, 7, 8, 9, 1, 7, 8, 9]);
    }

    #[test]
    fn test_encode_v3_depth_8_header_length() {
        let pixels = (0..5).map(|i| Pixel::new(i, i, i)).collect();
        let image = Image::new(5, 1, pixels).unwrap();
        let encoded = encode(
            &image,
            Version::V3(PaletteOptions::new(Depth::Eight, false)),
        )
        .unwrap();
        assert_eq!(u16::from_le_bytes([encoded[6], encoded[7]]), 14 + 3 * 5);
        assert_eq!(stream(&encoded), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_encode_v3_depth_8_rle() {
        let a = Pixel::new(1, 1, 1);
        let b = Pixel::new(2, 2, 2);
        let image = Image::new(4, 1, vec![a, a, a, b]).unwrap();
        let encoded = encode(&image, Version::V3(PaletteOptions::new(Depth::Eight, true))).unwrap();
        assert_eq!(encoded[13], 1);
        assert_eq!(stream(&encoded), &[3, 0, 1, 1]);
    }

    #[test]
    fn test_encode_v3_packed_ignores_rle() {
        let a = Pixel::new(1, 1, 1);
        let b = Pixel::new(2, 2, 2);
        let image = Image::new(3, 1, vec![a, b, b]).unwrap();
        let encoded = encode(&image, Version::V3(PaletteOptions::new(Depth::One, true))).unwrap();
        assert_eq!(encoded[12], 1);
        assert_eq!(encoded[13], 0);
        assert_eq!(stream(&encoded), &[0b0110_0000]);
    }

    #[test]
    fn test_encode_v3_depth_24_has_no_palette() {
        let image = Image::filled(3, 1, Pixel::new(5, 5, 5));
        let encoded = encode(
            &image,
            Version::V3(PaletteOptions::new(Depth::TwentyFour, true)),
        )
        .unwrap();
        assert_eq!(u16::from_le_bytes([encoded[6], encoded[7]]), 14);
        assert_eq!(stream(&encoded), &[3, 5, 5, 5]);
    }

    #[test]
    fn test_encode_v3_palette_too_large() {
        let pixels = (0..3).map(|i| Pixel::new(i, 0, 0)).collect();
        let image = Image::new(3, 1, pixels).unwrap();
        let result = encode(&image, Version::V3(PaletteOptions::new(Depth::One, false)));
        assert!(matches!(
            result,
            Err(EncodingError::Palette(PaletteError::TooLarge { colors: 3, .. }))
        ));
    }

    #[test]
    fn test_encode_v4_new_pixel() {
        let image = Image::filled(1, 1, Pixel::new(200, 0, 0));
        let encoded = encode(&image, Version::V4).unwrap();
        assert_eq!(stream(&encoded), &[0xFF, 200, 0, 0]);
    }

    #[test]
    fn test_encode_v4_intermediate_from_black() {
        let image = Image::filled(1, 1, Pixel::new(5, 6, 7));
        let encoded = encode(&image, Version::V4).unwrap();
        assert_eq!(stream(&encoded), &[0x66, 0x79]);
    }

    #[test]
    fn test_encode_empty_image() {
        let image = Image::new(0, 0, vec![]).unwrap();
        for version in [Version::V1, Version::V2, Version::V4] {
            let encoded = encode(&image, version).unwrap();
            assert_eq!(encoded.len(), BASE_HEADER_SIZE);
        }
    }
}
