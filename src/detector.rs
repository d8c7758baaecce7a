
use std::mem;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use crate::decode::{Decoder, RawFrame, VideoMetadata, Y4mDecoder};
use crate::error::{Error, Result};
use crate::params::{DetectionOptions, SearchRange, Thresholds};
use crate::plane::{MBParam, PaddedPlane};
use crate::plane_of_blocks::{FrameStats, PlaneOfBlocks};
use crate::util::format_timecode;

/// One detected scene boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneInfo {
    pub frame_number: u64,
    /// Presentation time of the frame in seconds.
    pub timestamp: f64,
    /// `timestamp` formatted as `HH:MM:SS.mmm`.
    pub timecode: String,
}

impl SceneInfo {
    fn new(frame_number: u64, timestamp: f64) -> Self {
        Self {
            frame_number,
            timestamp,
            timecode: format_timecode(timestamp),
        }
    }
}

/// Snapshot handed to the `on_progress` callback after each frame.
///
/// Rate limiting is the callback's concern; the driver reports every frame.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub current_frame: u64,
    pub total_frames: Option<u64>,
    pub percent: Option<f64>,
    pub eta_seconds: Option<f64>,
}

/// Everything produced by one detection run.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Detected cuts in strictly increasing frame order. The first entry is
    /// always frame 0.
    pub scenes: Vec<SceneInfo>,
    pub metadata: VideoMetadata,
    /// Exact number of frames processed.
    pub total_frames: u64,
}

/// Buffers sized for one resolution. Replaced wholesale when the stream
/// resolution changes.
struct DetectorState {
    param: MBParam,
    prev: PaddedPlane,
    cur: PaddedPlane,
    prev_valid: bool,
    pob: PlaneOfBlocks,
}

impl DetectorState {
    fn new(param: MBParam, fcode: u8) -> Self {
        Self {
            param,
            prev: PaddedPlane::new(param),
            cur: PaddedPlane::new(param),
            prev_valid: false,
            pob: PlaneOfBlocks::new(param, fcode),
        }
    }
}

/// Sequential scene-change detector.
///
/// Feed decoded frames in order with [`Self::process_frame`]; the cut list
/// grows as verdicts land. The two padded planes are allocated when the
/// first frame arrives and swapped, not copied, between frames.
pub struct SceneDetector {
    thresholds: Thresholds,
    search_range: SearchRange,
    state: Option<DetectorState>,
    /// Frames since the last emitted cut; the multiplicative cooldown in
    /// the verdict. Reset to 1 on every cut and at startup.
    intra_count: u64,
    frames_processed: u64,
    scenes: Vec<SceneInfo>,
}

impl SceneDetector {
    #[must_use]
    pub fn new(options: &DetectionOptions) -> Self {
        Self {
            thresholds: options.sensitivity.thresholds(),
            search_range: options.search_range,
            state: None,
            intra_count: 1,
            frames_processed: 0,
            // frame 0 is a cut by convention; no verdict ever runs for it
            scenes: vec![SceneInfo::new(0, 0.0)],
        }
    }

    /// Cuts decided so far, in frame order.
    #[must_use]
    pub fn scenes(&self) -> &[SceneInfo] {
        &self.scenes
    }

    #[must_use]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn into_scenes(self) -> Vec<SceneInfo> {
        self.scenes
    }

    /// Analyzes the next decoded frame and returns the cut emitted for it,
    /// if any.
    ///
    /// A mid-stream resolution change is not an error: the padded buffers
    /// are reallocated and detection re-bootstraps, which makes the first
    /// frame at the new resolution a cut.
    pub fn process_frame(&mut self, frame: &RawFrame<'_>) -> Result<Option<SceneInfo>> {
        let param = MBParam::new(frame.width, frame.height)?;
        if frame.data.len() < frame.width * frame.height {
            return Err(Error::InvalidFrame(format!(
                "luma plane of frame {} holds {} bytes, expected at least {}",
                frame.frame_number,
                frame.data.len(),
                frame.width * frame.height
            )));
        }

        let resolution_changed = self
            .state
            .as_ref()
            .is_some_and(|state| state.param != param);
        if resolution_changed {
            log::warn!(
                "resolution changed to {}x{} at frame {}; restarting detection state",
                frame.width,
                frame.height,
                frame.frame_number
            );
        }
        if self.state.is_none() || resolution_changed {
            let fcode = self.search_range.fcode(frame.width, frame.height);
            log::debug!(
                "allocating {}x{} macroblock grid, fcode {fcode}",
                param.mb_width,
                param.mb_height
            );
            self.state = Some(DetectorState::new(param, fcode));
        }
        let Some(state) = self.state.as_mut() else {
            unreachable!("state was just allocated")
        };

        state.cur.fill_plane(frame.data);
        state.cur.pad();

        let emitted = if state.prev_valid {
            let stats = state.pob.analyse(&state.prev, &state.cur);
            if is_scene_change(&stats, state.param.mb_count(), self.thresholds, self.intra_count) {
                let info = SceneInfo::new(frame.frame_number, frame.pts);
                self.scenes.push(info.clone());
                self.intra_count = 1;
                Some(info)
            } else {
                self.intra_count += 1;
                None
            }
        } else if self.frames_processed == 0 {
            // the very first frame: its cut is already seeded as {0, 0}
            Some(self.scenes[0].clone())
        } else {
            // re-bootstrap after a resolution change
            let info = SceneInfo::new(frame.frame_number, frame.pts);
            self.scenes.push(info.clone());
            self.intra_count = 1;
            Some(info)
        };

        mem::swap(&mut state.prev, &mut state.cur);
        state.prev_valid = true;
        self.frames_processed += 1;

        Ok(emitted)
    }
}

/// The two-threshold frame verdict.
///
/// A frame starts a new scene when the intra-block evidence, scaled by the
/// cooldown, clears the density floor, and at least two frames have passed
/// since the previous cut.
fn is_scene_change(
    stats: &FrameStats,
    mb_count: usize,
    thresholds: Thresholds,
    intra_count: u64,
) -> bool {
    let evidence =
        stats.intra_blocks as u64 * u64::from(thresholds.intra_thresh) * intra_count;
    let floor = mb_count as u64 * u64::from(thresholds.intra_thresh2);
    intra_count >= 2 && evidence > floor
}

/// Drops any cut closer than `min_gap` frames to the previously kept cut.
/// The frame-0 cut is always kept.
fn apply_temporal_smoothing(scenes: &mut Vec<SceneInfo>, min_gap: u64) {
    let mut last_kept: Option<u64> = None;
    scenes.retain(|scene| match last_kept {
        Some(prev) if scene.frame_number - prev < min_gap => false,
        _ => {
            last_kept = Some(scene.frame_number);
            true
        }
    });
}

/// Runs the detector over every frame a decoder yields.
///
/// `on_scene` fires synchronously at the moment each cut is decided, before
/// the driver advances to the next frame. `on_progress` fires once per
/// frame; rate limiting is the caller's concern.
pub fn detect_scene_changes<D: Decoder>(
    decoder: &mut D,
    options: &DetectionOptions,
    mut on_progress: Option<&mut dyn FnMut(&Progress)>,
    mut on_scene: Option<&mut dyn FnMut(&SceneInfo)>,
) -> Result<DetectionResult> {
    let mut metadata = decoder.metadata();
    let mut detector = SceneDetector::new(options);
    let start = Instant::now();

    loop {
        match decoder.next_frame() {
            Ok(Some(frame)) => {
                let emitted = detector.process_frame(&frame)?;
                if let (Some(scene), Some(callback)) = (emitted.as_ref(), on_scene.as_mut()) {
                    callback(scene);
                }
                if let Some(callback) = on_progress.as_mut() {
                    callback(&progress_snapshot(
                        detector.frames_processed,
                        metadata.total_frames,
                        start,
                    ));
                }
            }
            Ok(None) => break,
            Err(err) => {
                if options.keep_partial {
                    log::warn!(
                        "decoder failed after {} frames: {err}; keeping partial results",
                        detector.frames_processed
                    );
                    break;
                }
                return Err(err);
            }
        }
    }

    let total_frames = detector.frames_processed();
    let mut scenes = detector.into_scenes();
    if let Some(min_gap) = options.temporal_smoothing {
        apply_temporal_smoothing(&mut scenes, min_gap.get());
    }

    metadata.total_frames = Some(total_frames);
    if metadata.fps > 0.0 {
        metadata.duration = Some(total_frames as f64 / metadata.fps);
    }

    Ok(DetectionResult {
        scenes,
        metadata,
        total_frames,
    })
}

fn progress_snapshot(current_frame: u64, total_frames: Option<u64>, start: Instant) -> Progress {
    let total = total_frames.filter(|total| *total > 0);
    let percent = total.map(|total| 100.0 * current_frame as f64 / total as f64);
    let eta_seconds = total.map(|total| {
        let elapsed = start.elapsed().as_secs_f64();
        let remaining = total.saturating_sub(current_frame);
        elapsed / current_frame.max(1) as f64 * remaining as f64
    });
    Progress {
        current_frame,
        total_frames: total,
        percent,
        eta_seconds,
    }
}

/// Detects scene changes in a y4m video file.
pub fn detect<P: AsRef<Path>>(path: P, options: &DetectionOptions) -> Result<DetectionResult> {
    let mut decoder = Y4mDecoder::open(path.as_ref())?;
    detect_scene_changes(&mut decoder, options, None, None)
}
