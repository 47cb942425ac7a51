mod args;
mod convert;
mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use lib_ulbmp::{
    DecodeError, Depth, EncodingError, ImageError, InvalidDepth, PaletteOptions, Version,
    VersionError,
};
use log::{error, info};
use thiserror::Error;

use args::{Args, Command};
use report::{EncodeTiming, LoadTiming, Report, SizeRatio};

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Failed to decode ULBMP image: {0}")]
    Decode(#[from] DecodeError),
    #[error("Failed to encode ULBMP image: {0}")]
    Encode(#[from] EncodingError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("Image file error: {0}")]
    Codec(#[from] image::ImageError),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error(transparent)]
    Depth(#[from] InvalidDepth),
    #[error("Image of {width}x{height} exceeds the 65535x65535 ULBMP limit")]
    TooLarge { width: u32, height: u32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Versions timed by `time-encode`, in the order they are reported.
fn encode_variants(skip_v3: bool) -> Vec<(&'static str, Version)> {
    let mut variants = vec![("1", Version::V1), ("2", Version::V2), ("4", Version::V4)];
    if !skip_v3 {
        variants.push((
            "3rle",
            Version::V3(PaletteOptions::new(Depth::Eight, true)),
        ));
        variants.push((
            "3norle",
            Version::V3(PaletteOptions::new(Depth::Eight, false)),
        ));
    }
    variants
}

fn time_load(paths: &[PathBuf]) -> Result<Report, CompareError> {
    let timings = paths
        .iter()
        .map(|path| -> Result<LoadTiming, CompareError> {
            let start = Instant::now();
            lib_ulbmp::load(path)?;
            Ok(LoadTiming {
                path: path.clone(),
                millis: report::millis(start.elapsed()),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Report::Load { timings })
}

fn time_encode(path: &Path, skip_v3: bool, out_dir: &Path) -> Result<Report, CompareError> {
    let image = lib_ulbmp::load(path)?;
    let mut timings = Vec::new();

    for (label, version) in encode_variants(skip_v3) {
        let target = out_dir.join(format!("{}.{}", label, convert::EXTENSION));

        let start = Instant::now();
        let saved = lib_ulbmp::save(&image, &target, version);
        let elapsed = start.elapsed();

        // Remove the scratch file even when saving failed halfway.
        let size = fs::metadata(&target).map(|meta| meta.len()).unwrap_or(0);
        if target.exists() {
            fs::remove_file(&target)?;
        }
        saved?;

        info!("Encoded {} as {} in {:?}", path.display(), label, elapsed);
        timings.push(EncodeTiming {
            label,
            version,
            seconds: elapsed.as_secs_f64(),
            size,
        });
    }

    Ok(Report::Encode {
        source: path.to_path_buf(),
        timings,
    })
}

fn compression_ratio(baseline: &Path, paths: &[PathBuf]) -> Result<Report, CompareError> {
    let size = fs::metadata(baseline)?.len();
    let entries = paths
        .iter()
        .map(|path| -> Result<SizeRatio, CompareError> {
            let path_size = fs::metadata(path)?.len();
            Ok(SizeRatio {
                path: path.clone(),
                size: path_size,
                ratio: report::ratio(size, path_size),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Report::Ratio {
        baseline: baseline.to_path_buf(),
        size,
        entries,
    })
}

fn run(args: Args) -> Result<(), CompareError> {
    let report = match args.command {
        Command::TimeLoad { paths } => time_load(&paths)?,
        Command::TimeEncode {
            path,
            skip_v3,
            out_dir,
        } => time_encode(&path, skip_v3, &out_dir)?,
        Command::Ratio { baseline, paths } => compression_ratio(&baseline, &paths)?,
        Command::Convert {
            input,
            output,
            encoding,
        } => {
            let version = encoding.to_version()?;
            let image = convert::read_any(&input)?;
            convert::write_any(&image, &output, version)?;
            let size = fs::metadata(&output)?.len();
            Report::Convert {
                input,
                output,
                size,
            }
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = lib_ulbmp::init_logging(args.log_level(), args.log_file.as_deref()) {
        eprintln!("Failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
