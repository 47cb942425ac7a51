use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitPackError {
    #[error("Unsupported packing depth {0}, expected 1, 2 or 4")]
    UnsupportedDepth(u8),
    #[error("Index {index} does not fit in {depth} bits")]
    IndexTooWide { index: u8, depth: u8 },
    #[error("Packed data holds {actual} bytes, {expected} are needed")]
    InsufficientData { expected: usize, actual: usize },
    #[error("Packed data holds {actual} bytes, only {expected} are used")]
    TrailingData { expected: usize, actual: usize },
}

fn indices_per_byte(depth: u8) -> Result<usize, BitPackError> {
    match depth {
        1 | 2 | 4 => Ok(8 / depth as usize),
        other => Err(BitPackError::UnsupportedDepth(other)),
    }
}

/// Number of bytes needed to pack `count` indices of `depth` bits.
pub fn packed_len(count: usize, depth: u8) -> Result<usize, BitPackError> {
    Ok(count.div_ceil(indices_per_byte(depth)?))
}

/// Packs `depth`-bit palette indices into bytes.
///
/// # Parameters
/// - `indices`: Palette indices in pixel order.
/// - `depth`: Bits per index, one of 1, 2 or 4.
///
/// # Returns
/// The packed bytes, first index in the most significant bits. A trailing
/// partial byte is zero-padded in its low bits.
///
/// # Errors
/// - Returns `BitPackError::UnsupportedDepth` for any other depth
/// - Returns `BitPackError::IndexTooWide` if an index needs more than `depth` bits
pub fn pack(indices: &[u8], depth: u8) -> Result<Vec<u8>, BitPackError> {
    let per_byte = indices_per_byte(depth)?;
    let limit = 1u16 << depth;

    if let Some(&index) = indices.iter().find(|&&index| index as u16 >= limit) {
        return Err(BitPackError::IndexTooWide { index, depth });
    }

    Ok(indices
        .chunks(per_byte)
        .map(|group| {
            group.iter().enumerate().fold(0u8, |byte, (j, &index)| {
                byte | index << (depth as usize * (per_byte - 1 - j))
            })
        })
        .collect())
}

/// Unpacks `depth`-bit palette indices written by [`pack`].
///
/// # Parameters
/// - `bytes`: The packed stream.
/// - `depth`: Bits per index, one of 1, 2 or 4.
/// - `count`: Number of indices to read.
///
/// # Returns
/// Exactly `count` indices. Bits past the last index are padding and ignored.
///
/// # Errors
/// - Returns `BitPackError::UnsupportedDepth` for any other depth
/// - Returns `BitPackError::InsufficientData` if `bytes` is too short for `count` indices
/// - Returns `BitPackError::TrailingData` if `bytes` continues past the last padded byte
pub fn unpack(bytes: &[u8], depth: u8, count: usize) -> Result<Vec<u8>, BitPackError> {
    let per_byte = indices_per_byte(depth)?;
    let expected = count.div_ceil(per_byte);
    if bytes.len() < expected {
        return Err(BitPackError::InsufficientData {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(BitPackError::TrailingData {
            expected,
            actual: bytes.len(),
        });
    }

    let mask = ((1u16 << depth) - 1) as u8;

    Ok(bytes
        .iter()
        .flat_map(|&byte| {
            (0..per_byte).map(move |j| (byte >> (depth as usize * (per_byte - 1 - j))) & mask)
        })
        .take(count)
        .collect())
}
