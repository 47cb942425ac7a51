//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lib_ulbmp::{Depth, PaletteOptions, Version};
use log::LevelFilter;

use crate::CompareError;

#[derive(Debug, Parser)]
#[command(name = "ulbmp-compare", version, about = "Time, compare and convert ULBMP images")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Time how long each file takes to load
    TimeLoad {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Time encoding one image with every version
    TimeEncode {
        path: PathBuf,
        /// Skip the two depth 8 version 3 encodings
        #[arg(long)]
        skip_v3: bool,
        /// Where the scratch files are written
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Compare file sizes against a baseline
    Ratio {
        baseline: PathBuf,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Convert between ULBMP and ordinary image files
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        encoding: EncodingArgs,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct EncodingArgs {
    /// ULBMP version to write (1-4)
    #[arg(long, default_value_t = 1)]
    pub version: u8,
    /// Bits per pixel for version 3 (1, 2, 4, 8 or 24)
    #[arg(long)]
    pub depth: Option<u8>,
    /// Run-length encode version 3 streams (depth 8 and 24 only)
    #[arg(long)]
    pub rle: bool,
}

impl EncodingArgs {
    pub fn to_version(&self) -> Result<Version, CompareError> {
        let options = self
            .depth
            .map(Depth::try_from)
            .transpose()?
            .map(|depth| PaletteOptions::new(depth, self.rle));

        Ok(Version::from_parts(self.version, options)?)
    }
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoding(version: u8, depth: Option<u8>, rle: bool) -> EncodingArgs {
        EncodingArgs {
            version,
            depth,
            rle,
        }
    }

    #[test]
    fn test_version_from_args() {
        assert_eq!(encoding(2, None, false).to_version().unwrap(), Version::V2);
        assert_eq!(
            encoding(3, Some(8), true).to_version().unwrap(),
            Version::V3(PaletteOptions::new(Depth::Eight, true))
        );
    }

    #[test]
    fn test_version_3_needs_depth() {
        assert!(matches!(
            encoding(3, None, false).to_version(),
            Err(CompareError::Version(_))
        ));
        assert!(matches!(
            encoding(3, Some(5), false).to_version(),
            Err(CompareError::Depth(_))
        ));
    }

    #[test]
    fn test_parse_convert() {
        let args = Args::parse_from([
            "ulbmp-compare",
            "convert",
            "in.png",
            "out.ulbmp",
            "--version",
            "3",
            "--depth",
            "4",
        ]);
        match args.command {
            Command::Convert { encoding, .. } => assert_eq!(
                encoding.to_version().unwrap(),
                Version::V3(PaletteOptions::new(Depth::Four, false))
            ),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
