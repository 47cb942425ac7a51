#![allow(dead_code)]

use lib_ulbmp::{Image, Pixel};

/// 16x16 gray ramp, one distinct color per pixel.
pub fn gradient() -> Image {
    let pixels = (0..=255u8).map(|i| Pixel::new(i, i, i)).collect();
    Image::new(16, 16, pixels).unwrap()
}

/// 8x8 two-color checkerboard.
pub fn checkers() -> Image {
    let black = Pixel::new(0, 0, 0);
    let white = Pixel::new(255, 255, 255);
    let pixels = (0..64)
        .map(|i| if (i % 8 + i / 8) % 2 == 0 { black } else { white })
        .collect();
    Image::new(8, 8, pixels).unwrap()
}

/// 5x3 image with exactly `colors` distinct colors, cycled in row-major order.
pub fn with_colors(colors: usize) -> Image {
    let palette: Vec<Pixel> = (0..colors)
        .map(|i| Pixel::new((i * 37 % 256) as u8, (i / 7) as u8, (i % 7) as u8 * 30))
        .collect();
    let count = 15.max(colors);
    let pixels = (0..count).map(|i| palette[i % colors]).collect();
    Image::new(count as u16, 1, pixels).unwrap()
}

/// Deterministic pseudo-random noise, mostly forcing new-pixel blocks.
pub fn noise(width: u16, height: u16) -> Image {
    let mut state = 0x2545_f491_u32;
    let pixels = (0..width as usize * height as usize)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            Pixel::new(r, g, b)
        })
        .collect();
    Image::new(width, height, pixels).unwrap()
}

/// Smooth horizontal color ramp exercising every delta block shape.
pub fn smooth(width: u16, height: u16) -> Image {
    let pixels = (0..height as usize)
        .flat_map(|y| {
            (0..width as usize).map(move |x| {
                Pixel::new(
                    (x * 3 % 256) as u8,
                    (y * 5 % 256) as u8,
                    ((x * y) % 256) as u8,
                )
            })
        })
        .collect();
    Image::new(width, height, pixels).unwrap()
}
