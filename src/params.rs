
use std::num::NonZeroU64;
use std::str::FromStr;

use crate::error::Error;

/// Verdict threshold pair applied by the frame-level cut decision.
///
/// `intra_thresh` weighs the intra-block evidence; `intra_thresh2` is the
/// density floor that evidence has to clear. See
/// [`Sensitivity::thresholds`] for the built-in pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub intra_thresh: u32,
    pub intra_thresh2: u32,
}

/// How eagerly the detector declares a scene change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitivity {
    Low,
    Medium,
    High,
    /// Directly supplied threshold pair, bypassing the presets.
    Custom(Thresholds),
}

impl Sensitivity {
    #[must_use]
    pub fn thresholds(self) -> Thresholds {
        match self {
            Self::Low => Thresholds {
                intra_thresh: 3000,
                intra_thresh2: 150,
            },
            Self::Medium => Thresholds {
                intra_thresh: 2000,
                intra_thresh2: 90,
            },
            Self::High => Thresholds {
                intra_thresh: 1000,
                intra_thresh2: 50,
            },
            Self::Custom(thresholds) => thresholds,
        }
    }
}

impl FromStr for Sensitivity {
    type Err = Error;

    fn from_str(val: &str) -> Result<Self, Error> {
        Ok(match val {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => {
                return Err(Error::UnsupportedInput(format!(
                    "sensitivity must be 'low', 'medium', or 'high', got '{val}'"
                )));
            }
        })
    }
}

/// Motion search window preset, resolved to an fcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchRange {
    /// Pick an fcode from the frame area.
    Auto,
    Small,
    Medium,
    Large,
}

impl SearchRange {
    /// Resolves the preset to an fcode for a `width`x`height` video.
    ///
    /// The window radius derived from the fcode is `16 << (fcode - 1)`
    /// pixels, so `auto` scales the search effort with the resolution.
    #[must_use]
    pub fn fcode(self, width: usize, height: usize) -> u8 {
        match self {
            Self::Small => 2,
            Self::Medium => 4,
            Self::Large => 6,
            Self::Auto => {
                let area = width * height;
                if area <= 720 * 480 {
                    3
                } else if area <= 1920 * 1080 {
                    4
                } else {
                    5
                }
            }
        }
    }
}

impl FromStr for SearchRange {
    type Err = Error;

    fn from_str(val: &str) -> Result<Self, Error> {
        Ok(match val {
            "auto" => Self::Auto,
            "small" => Self::Small,
            "medium" => Self::Medium,
            "large" => Self::Large,
            _ => {
                return Err(Error::UnsupportedInput(format!(
                    "search range must be 'auto', 'small', 'medium', or 'large', got '{val}'"
                )));
            }
        })
    }
}

/// Search window radius in whole pixels for a given fcode.
#[must_use]
pub fn search_limit(fcode: u8) -> usize {
    debug_assert!((2..=6).contains(&fcode));
    16 << (fcode - 1)
}

/// Options accepted by [`crate::detect`] and [`crate::detect_scene_changes`].
#[derive(Debug, Clone, Copy)]
pub struct DetectionOptions {
    pub sensitivity: Sensitivity,
    pub search_range: SearchRange,
    /// When set, drops any detected cut closer than this many frames to the
    /// previously kept cut. The raw verdict stream is left untouched when
    /// `None`.
    pub temporal_smoothing: Option<NonZeroU64>,
    /// Return the cuts collected so far if the decoder fails mid-stream
    /// instead of failing the whole call.
    pub keep_partial: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::Medium,
            search_range: SearchRange::Auto,
            temporal_smoothing: None,
            keep_partial: false,
        }
    }
}
