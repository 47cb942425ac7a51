use std::path::Path;

use image::RgbImage;
use lib_ulbmp::{Image, Pixel, Version};
use log::{debug, info};

use crate::CompareError;

pub const EXTENSION: &str = "ulbmp";

pub fn is_ulbmp(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(EXTENSION))
}

/// Reads a ULBMP file, or any format the `image` crate understands.
pub fn read_any(path: &Path) -> Result<Image, CompareError> {
    if is_ulbmp(path) {
        return Ok(lib_ulbmp::load(path)?);
    }

    let rgb = image::open(path)?.to_rgb8();
    debug!("Opened {} as {}x{} RGB", path.display(), rgb.width(), rgb.height());
    from_rgb(&rgb)
}

/// Writes `image` as ULBMP with `version`, or in the format implied by the extension.
pub fn write_any(image: &Image, path: &Path, version: Version) -> Result<(), CompareError> {
    if is_ulbmp(path) {
        lib_ulbmp::save(image, path, version)?;
    } else {
        to_rgb(image)?.save(path)?;
    }

    info!("Wrote {}", path.display());
    Ok(())
}

pub fn from_rgb(rgb: &RgbImage) -> Result<Image, CompareError> {
    let (width, height) = rgb.dimensions();
    let too_large = || CompareError::TooLarge { width, height };
    let width = u16::try_from(width).map_err(|_| too_large())?;
    let height = u16::try_from(height).map_err(|_| too_large())?;

    let pixels = rgb.pixels().map(|pixel| Pixel::from(pixel.0)).collect();
    Ok(Image::new(width, height, pixels)?)
}

pub fn to_rgb(image: &Image) -> Result<RgbImage, CompareError> {
    let raw = image.pixels().iter().flat_map(Pixel::rgb).collect();
    RgbImage::from_raw(image.width() as u32, image.height() as u32, raw).ok_or(
        CompareError::TooLarge {
            width: image.width() as u32,
            height: image.height() as u32,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_round_trip() {
        let image = Image::new(
            2,
            1,
            vec![Pixel::new(1, 2, 3), Pixel::new(250, 251, 252)],
        )
        .unwrap();
        let rgb = to_rgb(&image).unwrap();
        assert_eq!(rgb.get_pixel(1, 0).0, [250, 251, 252]);
        assert_eq!(from_rgb(&rgb).unwrap(), image);
    }

    #[test]
    fn test_from_rgb_too_wide() {
        let rgb = RgbImage::new(70_000, 1);
        assert!(matches!(
            from_rgb(&rgb),
            Err(CompareError::TooLarge { width: 70_000, .. })
        ));
    }

    #[test]
    fn test_is_ulbmp() {
        assert!(is_ulbmp(Path::new("a/b.ULBMP")));
        assert!(!is_ulbmp(Path::new("a/b.png")));
    }
}
