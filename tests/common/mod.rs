#![allow(dead_code, reason = "not every test binary uses every helper")]
#![allow(clippy::unwrap_used, reason = "allow in test files")]

use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;

use scenecut::decode::{Decoder, RawFrame, VideoMetadata};
use scenecut::error::{Error, Result};

/// One frame of a synthetic clip. Shared buffers keep large clips cheap.
pub type ClipFrame = (Rc<Vec<u8>>, usize, usize);

/// In-memory decoder feeding hand-built frame sequences to the driver.
pub struct ClipDecoder {
    frames: Vec<ClipFrame>,
    fps: f64,
    index: usize,
    fail_after: Option<usize>,
}

impl ClipDecoder {
    pub fn new(frames: Vec<ClipFrame>, fps: f64) -> Self {
        Self {
            frames,
            fps,
            index: 0,
            fail_after: None,
        }
    }

    /// Simulates a mid-stream decoder failure after `frames` frames.
    pub fn failing_after(mut self, frames: usize) -> Self {
        self.fail_after = Some(frames);
        self
    }
}

impl Decoder for ClipDecoder {
    fn metadata(&self) -> VideoMetadata {
        let (width, height) = self
            .frames
            .first()
            .map_or((0, 0), |(_, width, height)| (*width, *height));
        VideoMetadata {
            width,
            height,
            fps: self.fps,
            total_frames: Some(self.frames.len() as u64),
            duration: Some(self.frames.len() as f64 / self.fps),
        }
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame<'_>>> {
        if self.fail_after.is_some_and(|limit| self.index >= limit) {
            return Err(Error::Decoder("simulated mid-stream failure".to_owned()));
        }
        let Some((data, width, height)) = self.frames.get(self.index) else {
            return Ok(None);
        };
        let frame_number = self.index as u64;
        self.index += 1;
        Ok(Some(RawFrame {
            data: data.as_slice(),
            width: *width,
            height: *height,
            pts: frame_number as f64 / self.fps,
            frame_number,
        }))
    }
}

pub fn solid(width: usize, height: usize, value: u8) -> ClipFrame {
    (Rc::new(vec![value; width * height]), width, height)
}

pub fn noise(width: usize, height: usize, seed: u64) -> ClipFrame {
    let mut rng = Xoshiro128StarStar::seed_from_u64(seed);
    let data = (0..width * height).map(|_| rng.random()).collect();
    (Rc::new(data), width, height)
}

/// A quantized two-axis gradient shifted right by `shift` pixels, with the
/// left edge clamped. The SAD surface it produces is monotone, so motion
/// search always compensates the pan exactly.
pub fn panned_gradient(width: usize, height: usize, shift: usize) -> ClipFrame {
    let data = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| (x.saturating_sub(shift) / 4 + y / 8) as u8)
        })
        .collect();
    (Rc::new(data), width, height)
}

pub fn cut_frames(result: &scenecut::DetectionResult) -> Vec<u64> {
    result.scenes.iter().map(|scene| scene.frame_number).collect()
}
