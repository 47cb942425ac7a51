pub const MAGIC: [u8; 5] = *b"ULBMP";

/// Magic, version, header length, width and height.
pub const BASE_HEADER_SIZE: usize = 12;
/// Base header plus the depth and run-length bytes of version 3.
pub const PALETTE_HEADER_SIZE: usize = 14;

pub const MAX_RUN: u8 = 255;

// Version 4 block tags.
pub(crate) const SMALL_DIFF: u8 = 0b0000_0000;
pub(crate) const INTERMEDIATE_DIFF: u8 = 0b0100_0000;
pub(crate) const BIG_DIFF_R: u8 = 0b1000_0000;
pub(crate) const BIG_DIFF_G: u8 = 0b1001_0000;
pub(crate) const BIG_DIFF_B: u8 = 0b1010_0000;
pub(crate) const NEW_PIXEL: u8 = 0b1111_1111;

pub(crate) const MASK_2BIT: u8 = 0b0000_0011;
pub(crate) const MASK_4BIT: u8 = 0b0000_1111;
pub(crate) const MASK_6BIT: u8 = 0b0011_1111;
pub(crate) const MASK_TAG_2BIT: u8 = 0b1100_0000;
pub(crate) const MASK_TAG_4BIT: u8 = 0b1111_0000;

pub(crate) const SMALL_BIAS: i32 = 2;
pub(crate) const INTERMEDIATE_G_BIAS: i32 = 32;
pub(crate) const INTERMEDIATE_RB_BIAS: i32 = 8;
pub(crate) const BIG_PRIMARY_BIAS: i32 = 128;
pub(crate) const BIG_SECONDARY_BIAS: i32 = 32;
