use std::ops::RangeInclusive;

use thiserror::Error;

use crate::constants::{
    BIG_DIFF_B, BIG_DIFF_G, BIG_DIFF_R, BIG_PRIMARY_BIAS, BIG_SECONDARY_BIAS, INTERMEDIATE_DIFF,
    INTERMEDIATE_G_BIAS, INTERMEDIATE_RB_BIAS, MASK_2BIT, MASK_4BIT, MASK_6BIT, MASK_TAG_2BIT,
    MASK_TAG_4BIT, NEW_PIXEL, SMALL_BIAS, SMALL_DIFF,
};
use crate::pixel::{Pixel, PixelError};

const SMALL_RANGE: RangeInclusive<i32> = -2..=1;
const INTERMEDIATE_G_RANGE: RangeInclusive<i32> = -32..=31;
const INTERMEDIATE_RB_RANGE: RangeInclusive<i32> = -8..=7;
const BIG_PRIMARY_RANGE: RangeInclusive<i32> = -128..=127;
const BIG_SECONDARY_RANGE: RangeInclusive<i32> = -32..=31;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeltaError {
    #[error("Unknown block tag {tag:#010b} at offset {offset}")]
    InvalidTag { tag: u8, offset: usize },
    #[error("Block at offset {offset} needs {needed} bytes, only {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("Block decodes to an invalid pixel")]
    Pixel(#[from] PixelError),
}

/// One version 4 block, holding unbiased deltas relative to the previous pixel.
///
/// Secondary deltas of the big blocks are relative to the primary channel's delta,
/// those of the intermediate block to the green delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaBlock {
    Small { dr: i32, dg: i32, db: i32 },
    Intermediate { dg: i32, dr_dg: i32, db_dg: i32 },
    BigR { dr: i32, dg_dr: i32, db_dr: i32 },
    BigG { dg: i32, dr_dg: i32, db_dg: i32 },
    BigB { db: i32, dr_db: i32, dg_db: i32 },
    New(Pixel),
}

impl DeltaBlock {
    /// Picks the first block shape, cheapest first, able to encode `previous -> current`.
    pub fn classify(previous: &Pixel, current: &Pixel) -> Self {
        let (dr, dg, db) = previous.delta(current);

        if SMALL_RANGE.contains(&dr) && SMALL_RANGE.contains(&dg) && SMALL_RANGE.contains(&db) {
            DeltaBlock::Small { dr, dg, db }
        } else if INTERMEDIATE_G_RANGE.contains(&dg)
            && INTERMEDIATE_RB_RANGE.contains(&(dr - dg))
            && INTERMEDIATE_RB_RANGE.contains(&(db - dg))
        {
            DeltaBlock::Intermediate {
                dg,
                dr_dg: dr - dg,
                db_dg: db - dg,
            }
        } else if fits_big(dr, dg, db) {
            DeltaBlock::BigR {
                dr,
                dg_dr: dg - dr,
                db_dr: db - dr,
            }
        } else if fits_big(dg, dr, db) {
            DeltaBlock::BigG {
                dg,
                dr_dg: dr - dg,
                db_dg: db - dg,
            }
        } else if fits_big(db, dr, dg) {
            DeltaBlock::BigB {
                db,
                dr_db: dr - db,
                dg_db: dg - db,
            }
        } else {
            DeltaBlock::New(*current)
        }
    }

    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            DeltaBlock::Small { .. } => 1,
            DeltaBlock::Intermediate { .. } => 2,
            DeltaBlock::BigR { .. } | DeltaBlock::BigG { .. } | DeltaBlock::BigB { .. } => 3,
            DeltaBlock::New(_) => 4,
        }
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        match *self {
            DeltaBlock::Small { dr, dg, db } => out.push(
                SMALL_DIFF
                    | ((dr + SMALL_BIAS) as u8) << 4
                    | ((dg + SMALL_BIAS) as u8) << 2
                    | (db + SMALL_BIAS) as u8,
            ),
            DeltaBlock::Intermediate { dg, dr_dg, db_dg } => out.extend_from_slice(&[
                INTERMEDIATE_DIFF | (dg + INTERMEDIATE_G_BIAS) as u8,
                ((dr_dg + INTERMEDIATE_RB_BIAS) as u8) << 4 | (db_dg + INTERMEDIATE_RB_BIAS) as u8,
            ]),
            DeltaBlock::BigR { dr, dg_dr, db_dr } => write_big(out, BIG_DIFF_R, dr, dg_dr, db_dr),
            DeltaBlock::BigG { dg, dr_dg, db_dg } => write_big(out, BIG_DIFF_G, dg, dr_dg, db_dg),
            DeltaBlock::BigB { db, dr_db, dg_db } => write_big(out, BIG_DIFF_B, db, dr_db, dg_db),
            DeltaBlock::New(pixel) => {
                out.push(NEW_PIXEL);
                out.extend_from_slice(&pixel.rgb());
            }
        }
    }

    /// Reads the block starting at `data[offset]`, dispatching on its leading bits.
    pub fn read(data: &[u8], offset: usize) -> Result<Self, DeltaError> {
        let bytes = &data[offset.min(data.len())..];
        let tag = *bytes.first().ok_or(DeltaError::Truncated {
            offset,
            needed: 1,
            available: 0,
        })?;

        let needed = match tag {
            NEW_PIXEL => 4,
            _ if tag & MASK_TAG_2BIT == SMALL_DIFF => 1,
            _ if tag & MASK_TAG_2BIT == INTERMEDIATE_DIFF => 2,
            _ if matches!(tag & MASK_TAG_4BIT, BIG_DIFF_R | BIG_DIFF_G | BIG_DIFF_B) => 3,
            _ => return Err(DeltaError::InvalidTag { tag, offset }),
        };
        if bytes.len() < needed {
            return Err(DeltaError::Truncated {
                offset,
                needed,
                available: bytes.len(),
            });
        }

        let block = match needed {
            4 => DeltaBlock::New(Pixel::new(bytes[1], bytes[2], bytes[3])),
            1 => DeltaBlock::Small {
                dr: ((tag >> 4) & MASK_2BIT) as i32 - SMALL_BIAS,
                dg: ((tag >> 2) & MASK_2BIT) as i32 - SMALL_BIAS,
                db: (tag & MASK_2BIT) as i32 - SMALL_BIAS,
            },
            2 => DeltaBlock::Intermediate {
                dg: (tag & MASK_6BIT) as i32 - INTERMEDIATE_G_BIAS,
                dr_dg: (bytes[1] >> 4) as i32 - INTERMEDIATE_RB_BIAS,
                db_dg: (bytes[1] & MASK_4BIT) as i32 - INTERMEDIATE_RB_BIAS,
            },
            _ => {
                let (primary, first, second) = read_big(bytes[0], bytes[1], bytes[2]);
                match tag & MASK_TAG_4BIT {
                    BIG_DIFF_R => DeltaBlock::BigR {
                        dr: primary,
                        dg_dr: first,
                        db_dr: second,
                    },
                    BIG_DIFF_G => DeltaBlock::BigG {
                        dg: primary,
                        dr_dg: first,
                        db_dg: second,
                    },
                    _ => DeltaBlock::BigB {
                        db: primary,
                        dr_db: first,
                        dg_db: second,
                    },
                }
            }
        };

        Ok(block)
    }

    /// Reconstructs the pixel this block describes after `previous`.
    pub fn apply(&self, previous: &Pixel) -> Result<Pixel, PixelError> {
        match *self {
            DeltaBlock::Small { dr, dg, db } => previous.offset(dr, dg, db),
            DeltaBlock::Intermediate { dg, dr_dg, db_dg } | DeltaBlock::BigG { dg, dr_dg, db_dg } => {
                previous.offset(dr_dg + dg, dg, db_dg + dg)
            }
            DeltaBlock::BigR { dr, dg_dr, db_dr } => previous.offset(dr, dg_dr + dr, db_dr + dr),
            DeltaBlock::BigB { db, dr_db, dg_db } => previous.offset(dr_db + db, dg_db + db, db),
            DeltaBlock::New(pixel) => Ok(pixel),
        }
    }
}

#[inline]
fn fits_big(primary: i32, first: i32, second: i32) -> bool {
    BIG_PRIMARY_RANGE.contains(&primary)
        && BIG_SECONDARY_RANGE.contains(&(first - primary))
        && BIG_SECONDARY_RANGE.contains(&(second - primary))
}

fn write_big(out: &mut Vec<u8>, tag: u8, primary: i32, first: i32, second: i32) {
    let primary = (primary + BIG_PRIMARY_BIAS) as u8;
    let first = (first + BIG_SECONDARY_BIAS) as u8;
    let second = (second + BIG_SECONDARY_BIAS) as u8;

    out.extend_from_slice(&[
        tag | primary >> 4,
        (primary & MASK_4BIT) << 4 | first >> 2,
        (first & MASK_2BIT) << 6 | second,
    ]);
}

fn read_big(byte0: u8, byte1: u8, byte2: u8) -> (i32, i32, i32) {
    let primary = (byte0 & MASK_4BIT) << 4 | byte1 >> 4;
    let first = (byte1 & MASK_4BIT) << 2 | byte2 >> 6;
    let second = byte2 & MASK_6BIT;

    (
        primary as i32 - BIG_PRIMARY_BIAS,
        first as i32 - BIG_SECONDARY_BIAS,
        second as i32 - BIG_SECONDARY_BIAS,
    )
}

/// Encodes pixels as delta blocks, starting from a black previous pixel.
pub fn delta_compression(pixels: &[Pixel]) -> Vec<u8> {
    let (encoded, _) = pixels.iter().fold(
        (Vec::with_capacity(pixels.len() * 2), Pixel::BLACK),
        |(mut encoded, previous), pixel| {
            DeltaBlock::classify(&previous, pixel).write(&mut encoded);
            (encoded, *pixel)
        },
    );

    encoded
}

/// Decodes a stream of delta blocks, each pixel becoming the previous one of the next block.
pub fn delta_decompression(data: &[u8]) -> Result<Vec<Pixel>, DeltaError> {
    let mut decoded = Vec::with_capacity(data.len());
    let mut previous = Pixel::BLACK;
    let mut offset = 0;

    while offset < data.len() {
        let block = DeltaBlock::read(data, offset)?;
        previous = block.apply(&previous)?;
        decoded.push(previous);
        offset += block.encoded_len();
    }

    Ok(decoded)
}
