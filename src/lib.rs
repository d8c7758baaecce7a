//! Scene-change detection for video files.
//!
//! A batch, single-video analyzer: one input path in, one ordered list of
//! scene cuts out. Consecutive grayscale frames are compared with a
//! block-based motion-estimation pipeline over pre-allocated padded
//! planes; a per-frame verdict over the intra-block statistics decides
//! where the scene boundaries are.
//!
//! The short route is [`detect`]; [`detect_scene_changes`] runs the same
//! pipeline over any [`decode::Decoder`] with progress and per-scene
//! callbacks.

// Performance
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::inline_always)]
#![warn(clippy::large_types_passed_by_value)]
#![deny(clippy::linkedlist)]
// Can result in worse code generation: https://github.com/rust-lang/rust-clippy/issues/14944
#![allow(clippy::manual_div_ceil)]
#![warn(clippy::naive_bytecount)]
#![warn(clippy::needless_collect)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::stable_sort_primitive)]
#![warn(clippy::trivially_copy_pass_by_ref)]
// Readability/Code Intention
#![warn(clippy::checked_conversions)]
#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::enum_glob_use)]
#![warn(clippy::equatable_if_let)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::manual_assert)]
#![warn(clippy::manual_let_else)]
#![warn(clippy::manual_string_new)]
#![warn(clippy::map_unwrap_or)]
#![warn(clippy::match_bool)]
#![warn(clippy::mod_module_files)]
#![warn(clippy::needless_continue)]
#![warn(clippy::option_if_let_else)]
#![warn(clippy::range_minus_one)]
#![warn(clippy::range_plus_one)]
#![warn(clippy::redundant_test_prefix)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::tests_outside_test_module)]
// Correctness/Safety
#![deny(clippy::cfg_not_test)]
#![warn(clippy::dbg_macro)]
#![deny(clippy::debug_assert_with_mut_call)]
#![warn(clippy::infinite_loop)]
#![warn(clippy::large_stack_arrays)]
#![warn(clippy::mem_forget)]
#![warn(clippy::mixed_read_write_in_expression)]
#![warn(clippy::suspicious_operation_groupings)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::unwrap_used)]
// Annoyances
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]
#![allow(unsafe_op_in_unsafe_fn)]

pub mod decode;
pub mod error;
pub mod format;
pub mod params;

mod detector;

#[cfg(feature = "bench")]
pub mod luma;
#[cfg(feature = "bench")]
pub mod mv;
#[cfg(feature = "bench")]
pub mod plane;
#[cfg(feature = "bench")]
pub mod plane_of_blocks;
#[cfg(feature = "bench")]
pub mod sad;
#[cfg(feature = "bench")]
pub mod util;

#[cfg(not(feature = "bench"))]
mod luma;
#[cfg(not(feature = "bench"))]
mod mv;
#[cfg(not(feature = "bench"))]
mod plane;
#[cfg(not(feature = "bench"))]
mod plane_of_blocks;
#[cfg(not(feature = "bench"))]
mod sad;
#[cfg(not(feature = "bench"))]
mod util;

pub use detector::{
    DetectionResult, Progress, SceneDetector, SceneInfo, detect, detect_scene_changes,
};
pub use error::{Error, Result};
pub use params::{DetectionOptions, SearchRange, Sensitivity, Thresholds};
