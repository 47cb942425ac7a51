mod common;

use common::{checkers, gradient, smooth};
use lib_ulbmp::compression::bitpack::{pack, unpack};
use lib_ulbmp::compression::delta::{delta_compression, delta_decompression, DeltaBlock};
use lib_ulbmp::compression::palette::{expand, Palette};
use lib_ulbmp::compression::rle::runs;
use lib_ulbmp::{Depth, Pixel};

#[test]
fn test_palette_indices_expand_back() {
    let image = checkers();
    let palette = Palette::for_depth(&image, Depth::One).unwrap();
    let indices = palette.indices(image.pixels()).unwrap();

    assert_eq!(palette.len(), 2);
    assert_eq!(expand(palette.colors(), &indices).unwrap(), image.pixels());
}

#[test]
fn test_palette_first_appearance_order() {
    let image = gradient();
    let palette = Palette::from_image(&image);
    assert_eq!(palette.colors(), image.pixels());
}

#[test]
fn test_packed_palette_indices() {
    let image = checkers();
    let palette = Palette::from_image(&image);
    let indices = palette.indices(image.pixels()).unwrap();

    let packed = pack(&indices, 1).unwrap();
    assert_eq!(packed.len(), 8);
    assert_eq!(packed[0], 0b0101_0101);
    assert_eq!(unpack(&packed, 1, indices.len()).unwrap(), indices);
}

#[test]
fn test_runs_over_checkers_rows() {
    // Colors only repeat across the seven row boundaries.
    let runs = runs(checkers().pixels().iter().copied());
    assert_eq!(runs.len(), 64 - 7);
    assert_eq!(runs.iter().filter(|&&(count, _)| count == 2).count(), 7);
}

#[test]
fn test_delta_identical_pixels_are_small() {
    for pixel in gradient().pixels() {
        assert_eq!(
            DeltaBlock::classify(pixel, pixel),
            DeltaBlock::Small {
                dr: 0,
                dg: 0,
                db: 0
            }
        );
    }
}

#[test]
fn test_delta_gradient_uses_small_blocks() {
    let image = gradient();
    let encoded = delta_compression(image.pixels());

    // First pixel is black, every following step is +1 on all channels.
    assert_eq!(encoded.len(), image.pixel_count());
    assert_eq!(delta_decompression(&encoded).unwrap(), image.pixels());
}

#[test]
fn test_delta_smooth_round_trip() {
    let image = smooth(64, 12);
    let encoded = delta_compression(image.pixels());
    assert!(encoded.len() < image.pixel_count() * 4);
    assert_eq!(delta_decompression(&encoded).unwrap(), image.pixels());
}

#[test]
fn test_delta_big_r_over_intermediate() {
    let block = DeltaBlock::classify(&Pixel::new(0, 0, 0), &Pixel::new(10, 0, 0));
    assert!(matches!(block, DeltaBlock::BigR { dr: 10, .. }));
    assert_eq!(block.encoded_len(), 3);
}
