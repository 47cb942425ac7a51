pub mod compression;
pub mod constants;
pub mod image;
pub mod pixel;

use log::*;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub use crate::image::decoder::DecodeError;
pub use crate::image::encoder::EncodingError;
pub use crate::image::format::{
    Depth, Header, Image, ImageError, InvalidDepth, PaletteOptions, Version, VersionError,
};
pub use crate::image::{decode, encode, load, save};
pub use crate::pixel::{Pixel, PixelError};

/// Configures `env_logger` for this library's log target.
///
/// # Parameters
/// - `level`: Most verbose level recorded for `lib_ulbmp` modules.
/// - `log_file`: File receiving the records instead of stderr.
///
/// Other crates stay silent unless enabled through `RUST_LOG`, which is applied
/// on top of `level`.
///
/// # Errors
/// - Returns the `io::Error` if `log_file` cannot be created
/// - Returns `io::ErrorKind::Other` if a logger is already installed
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = logger_builder(level);

    if let Some(path) = log_file {
        let target = Box::new(File::create(path)?);
        builder.target(env_logger::Target::Pipe(target));
    }

    builder
        .parse_default_env()
        .try_init()
        .map_err(io::Error::other)
}

fn logger_builder(level: LevelFilter) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    builder
        .filter(Some(module_path!()), level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        });

    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(target: &str, level: Level) -> Metadata<'_> {
        Metadata::builder().target(target).level(level).build()
    }

    #[test]
    fn test_logger_filters_library_target() {
        let logger = logger_builder(LevelFilter::Debug).build();
        assert!(logger.enabled(&metadata("lib_ulbmp::image::decoder", Level::Debug)));
        assert!(!logger.enabled(&metadata("lib_ulbmp::image::decoder", Level::Trace)));
        assert!(!logger.enabled(&metadata("image::codecs::png", Level::Error)));
    }
}
