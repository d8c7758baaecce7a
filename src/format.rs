
use std::io::{self, Write};
use std::str::FromStr;

use serde::Serialize;

use crate::decode::VideoMetadata;
use crate::detector::{DetectionResult, SceneInfo};
use crate::error::{Error, Result};

/// Cut-list serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `{scenes: [...], metadata: {...}}`, pretty-printed.
    Json,
    /// `frame,timestamp,timecode` rows.
    Csv,
    /// Aegisub keyframe list: header plus one frame number per line.
    Aegisub,
    /// One `HH:MM:SS.mmm` timecode per line.
    Timecode,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(val: &str) -> Result<Self> {
        Ok(match val {
            "json" => Self::Json,
            "csv" => Self::Csv,
            "aegisub" => Self::Aegisub,
            "timecode" => Self::Timecode,
            _ => {
                return Err(Error::UnsupportedInput(format!(
                    "format must be 'json', 'csv', 'aegisub', or 'timecode', got '{val}'"
                )));
            }
        })
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    scenes: &'a [SceneInfo],
    metadata: &'a VideoMetadata,
}

/// Writes the cut list of `result` to `writer` in the requested format.
pub fn write_scenes<W: Write>(
    result: &DetectionResult,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(
                &mut *writer,
                &JsonReport {
                    scenes: &result.scenes,
                    metadata: &result.metadata,
                },
            )
            .map_err(io::Error::from)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            writeln!(writer, "frame,timestamp,timecode")?;
            for scene in &result.scenes {
                writeln!(
                    writer,
                    "{},{:.3},{}",
                    scene.frame_number, scene.timestamp, scene.timecode
                )?;
            }
        }
        OutputFormat::Aegisub => {
            writeln!(writer, "# keyframe format v1")?;
            writeln!(writer, "fps {}", result.metadata.fps)?;
            for scene in &result.scenes {
                writeln!(writer, "{}", scene.frame_number)?;
            }
        }
        OutputFormat::Timecode => {
            for scene in &result.scenes {
                writeln!(writer, "{}", scene.timecode)?;
            }
        }
    }
    Ok(())
}
