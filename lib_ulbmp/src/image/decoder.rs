use std::fs;
use std::path::Path;

use log::{debug, error, info};
use thiserror::Error;

use super::format::{Depth, Header, Image, ImageError, InvalidDepth, PaletteOptions, Version};
use crate::compression::bitpack::{self, BitPackError};
use crate::compression::delta::{delta_decompression, DeltaError};
use crate::compression::palette::{self, PaletteError};
use crate::compression::rle::{rle_decompression, RleDecompressionError};
use crate::constants::{BASE_HEADER_SIZE, MAGIC, PALETTE_HEADER_SIZE};
use crate::pixel::Pixel;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid format or header")]
    InvalidHeader,
    #[error("Unsupported ULBMP version {0}")]
    UnsupportedVersion(u8),
    #[error("Failed to parse image dimensions")]
    DimensionParsingFailed,
    #[error("Invalid depth")]
    InvalidDepth(#[from] InvalidDepth),
    #[error("Header length {declared} does not fit the expected {actual} bytes")]
    InvalidHeaderLength { declared: usize, actual: usize },
    #[error("Pixel stream of {length} bytes is not a whole number of {record}-byte records")]
    TruncatedStream { record: usize, length: usize },

    #[error("Run-length decoding failed")]
    RunLength(#[from] RleDecompressionError),
    #[error("Palette decoding failed")]
    Palette(#[from] PaletteError),
    #[error("Bit unpacking failed")]
    BitPack(#[from] BitPackError),
    #[error("Delta decoding failed")]
    Delta(#[from] DeltaError),
    #[error("Decoded pixels do not form the declared image")]
    Image(#[from] ImageError),
    #[error("Failed to read image file")]
    Io(#[from] std::io::Error),
}

/// Parses the header, returning it with the offset of the pixel stream.
pub fn decode_header(encoded: &[u8]) -> Result<(Header, usize), DecodeError> {
    let prefix_size = Header::MAGIC_SIZE + Header::VERSION_SIZE;

    // The expected prefix is derived from the version byte itself.
    let version = match encoded.get(Header::MAGIC_SIZE) {
        Some(&version) if encoded[..Header::MAGIC_SIZE] == MAGIC => version,
        _ => {
            error!("Invalid format or missing magic number in header");
            return Err(DecodeError::InvalidHeader);
        }
    };
    debug!("Magic number validated, version {}", version);

    let fields = encoded
        .get(prefix_size..BASE_HEADER_SIZE)
        .ok_or_else(|| {
            error!("Header too short to hold the image dimensions");
            DecodeError::DimensionParsingFailed
        })?;
    let (length, dimensions) = fields.split_at(Header::LENGTH_SIZE);
    let (width, height) = dimensions.split_at(Header::WIDTH_HEIGHT_SIZE);
    let header_len = u16::from_le_bytes([length[0], length[1]]) as usize;
    let width = u16::from_le_bytes([width[0], width[1]]);
    let height = u16::from_le_bytes([height[0], height[1]]);
    debug!(
        "Header length {}, image dimensions width={} height={}",
        header_len, width, height
    );

    let (version, palette, stream_start) = match version {
        1 | 2 | 4 => {
            if header_len != BASE_HEADER_SIZE {
                error!(
                    "Header length {} differs from the fixed {} bytes of version {}",
                    header_len, BASE_HEADER_SIZE, version
                );
                return Err(DecodeError::InvalidHeaderLength {
                    declared: header_len,
                    actual: BASE_HEADER_SIZE,
                });
            }

            let version = match version {
                1 => Version::V1,
                2 => Version::V2,
                _ => Version::V4,
            };
            (version, Vec::new(), BASE_HEADER_SIZE)
        }
        3 => {
            if header_len < PALETTE_HEADER_SIZE || header_len > encoded.len() {
                error!("Header length {} is out of bounds", header_len);
                return Err(DecodeError::InvalidHeaderLength {
                    declared: header_len,
                    actual: encoded.len(),
                });
            }

            let depth = Depth::try_from(encoded[BASE_HEADER_SIZE])?;
            let run_length = encoded[BASE_HEADER_SIZE + 1] == 1;
            let palette = read_palette(&encoded[PALETTE_HEADER_SIZE..header_len])?;
            debug!(
                "Depth {}, run-length {}, palette of {} colors",
                depth.bits(),
                run_length,
                palette.len()
            );

            (
                Version::V3(PaletteOptions::new(depth, run_length)),
                palette,
                header_len,
            )
        }
        other => {
            error!("Unsupported version {}", other);
            return Err(DecodeError::UnsupportedVersion(other));
        }
    };

    Ok((
        Header {
            version,
            width,
            height,
            palette,
        },
        stream_start,
    ))
}

/// Decodes a complete ULBMP file held in memory.
///
/// # Parameters
/// - `encoded`: The whole file, header followed by the pixel stream.
///
/// # Returns
/// The decoded `Image`, with exactly `width * height` pixels in row-major order.
///
/// # Errors
/// - Returns `DecodeError::InvalidHeader` if the magic number is missing
/// - Returns `DecodeError::UnsupportedVersion` for version bytes other than 1 to 4
/// - Returns `DecodeError::InvalidHeaderLength` if the header-length field is inconsistent
/// - Returns a stream error (`TruncatedStream`, `RunLength`, `BitPack`, `Delta`,
///   `Palette`) if the pixel stream is malformed
/// - Returns `DecodeError::Image` if the stream decodes to the wrong number of pixels
pub fn decode(encoded: &[u8]) -> Result<Image, DecodeError> {
    info!("Starting decoding of {} bytes", encoded.len());

    // Step 1: Parse the header
    let (header, stream_start) = decode_header(encoded)?;
    let stream = &encoded[stream_start..];
    let expected = header.width as usize * header.height as usize;
    debug!("Pixel stream length: {}", stream.len());

    // Step 2: Decode the pixel stream
    let pixels = match header.version {
        Version::V1 => decode_raw(stream)?,
        Version::V2 => decode_run_length(stream)?,
        Version::V3(options) => decode_palette(stream, options, &header.palette, expected)?,
        Version::V4 => delta_decompression(stream)?,
    };

    // Step 3: Check the pixel count against the dimensions
    let image = Image::new(header.width, header.height, pixels).map_err(|e| {
        error!("{}", e);
        e
    })?;
    info!("Decoding completed successfully");

    Ok(image)
}

/// Reads and decodes the ULBMP file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Image, DecodeError> {
    let encoded = fs::read(path.as_ref())?;
    debug!("Read {} bytes from {}", encoded.len(), path.as_ref().display());

    decode(&encoded)
}

fn read_palette(bytes: &[u8]) -> Result<Vec<Pixel>, DecodeError> {
    decode_raw(bytes)
}

fn decode_raw(stream: &[u8]) -> Result<Vec<Pixel>, DecodeError> {
    if stream.len() % 3 != 0 {
        error!("Raw stream of {} bytes ends inside a pixel", stream.len());
        return Err(DecodeError::TruncatedStream {
            record: 3,
            length: stream.len(),
        });
    }

    Ok(stream
        .chunks_exact(3)
        .map(|rgb| Pixel::new(rgb[0], rgb[1], rgb[2]))
        .collect())
}

fn decode_run_length(stream: &[u8]) -> Result<Vec<Pixel>, DecodeError> {
    Ok(rle_decompression(stream, 3, |rgb| {
        Pixel::new(rgb[0], rgb[1], rgb[2])
    })?)
}

fn decode_palette(
    stream: &[u8],
    options: PaletteOptions,
    palette: &[Pixel],
    expected: usize,
) -> Result<Vec<Pixel>, DecodeError> {
    let depth = options.depth;

    if depth.max_colors().is_none() {
        return if options.run_length {
            decode_run_length(stream)
        } else {
            decode_raw(stream)
        };
    }

    // Packed depths ignore the run-length flag.
    let indices = if depth.is_packed() {
        bitpack::unpack(stream, depth.bits(), expected)?
    } else if options.run_length {
        rle_decompression(stream, 1, |index| index[0])?
    } else {
        stream.to_vec()
    };

    Ok(palette::expand(palette, &indices)?)
}
