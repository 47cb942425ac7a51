use std::path::PathBuf;
use std::time::Duration;

use lib_ulbmp::Version;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoadTiming {
    pub path: PathBuf,
    pub millis: f64,
}

#[derive(Debug, Serialize)]
pub struct EncodeTiming {
    pub label: &'static str,
    pub version: Version,
    pub seconds: f64,
    pub size: u64,
}

#[derive(Debug, Serialize)]
pub struct SizeRatio {
    pub path: PathBuf,
    pub size: u64,
    /// Baseline size over this size, in percent.
    pub ratio: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Load { timings: Vec<LoadTiming> },
    Encode { source: PathBuf, timings: Vec<EncodeTiming> },
    Ratio { baseline: PathBuf, size: u64, entries: Vec<SizeRatio> },
    Convert { input: PathBuf, output: PathBuf, size: u64 },
}

impl Report {
    pub fn print(&self) {
        match self {
            Report::Load { timings } => {
                for timing in timings {
                    println!("{} >> {} ms", timing.path.display(), timing.millis);
                }
            }
            Report::Encode { source, timings } => {
                println!("{}", source.display());
                for timing in timings {
                    println!("{} >> {} s", timing.label, timing.seconds);
                }
            }
            Report::Ratio {
                baseline,
                size,
                entries,
            } => {
                println!("base size ({}) >> {}\n", baseline.display(), size);
                for entry in entries {
                    println!(
                        "{} : size >> {} | ratio >> {}",
                        entry.path.display(),
                        entry.size,
                        entry.ratio
                    );
                }
            }
            Report::Convert {
                input,
                output,
                size,
            } => {
                println!("{} -> {} ({} bytes)", input.display(), output.display(), size);
            }
        }
    }
}

pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

pub fn ratio(baseline: u64, size: u64) -> f64 {
    if size == 0 {
        0.0
    } else {
        baseline as f64 / size as f64 * 100.0
    }
}
