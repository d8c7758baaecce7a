#[cfg(test)]
mod tests;

use std::num::NonZeroUsize;

use smallvec::SmallVec;

use crate::luma::{luma_sum_8x8, variance_16x16};
use crate::mv::{MotionVector, mv_bits};
use crate::params::search_limit;
use crate::plane::{EDGE, MB_SIZE, MBParam, PaddedPlane};
use crate::sad::{sad_8x8, sad_16x16};

/// Vector cost factor applied to the signalling bits of a candidate.
const LAMBDA: u32 = 2;
/// Margin an inter prediction may exceed the spatial residual by before the
/// block counts as intra.
const INTRA_BIAS: u32 = 0;

/// Per-macroblock analysis record. Recomputed from scratch every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Macroblock {
    #[allow(dead_code)]
    pub mv: MotionVector,
    /// Motion-compensated SAD at the best vector, without the bit penalty.
    pub sad: u32,
    pub variance: u32,
    pub is_intra: bool,
}

/// Whole-frame accumulation of the classifier outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub intra_blocks: usize,
    pub sum_sad_inter: u64,
    pub sum_variance: u64,
}

/// The macroblock grid of one frame pair.
///
/// Owns the transient macroblock array, which is allocated once and
/// rewritten in place every frame.
#[derive(Debug, Clone)]
pub struct PlaneOfBlocks {
    param: MBParam,
    search_limit: usize,
    blocks: Vec<Macroblock>,
}

impl PlaneOfBlocks {
    #[must_use]
    pub fn new(param: MBParam, fcode: u8) -> Self {
        Self {
            param,
            search_limit: search_limit(fcode),
            blocks: vec![Macroblock::default(); param.mb_count()],
        }
    }

    /// Runs motion search and intra/inter classification over every
    /// macroblock of `cur` against `prev`, in raster order.
    pub fn analyse(&mut self, prev: &PaddedPlane, cur: &PaddedPlane) -> FrameStats {
        debug_assert_eq!(prev.param(), &self.param);
        debug_assert_eq!(cur.param(), &self.param);

        let mut stats = FrameStats::default();
        for my in 0..self.param.mb_height.get() {
            for mx in 0..self.param.mb_width.get() {
                let mb = self.classify(prev.data(), cur.data(), mx, my);
                self.blocks[my * self.param.mb_width.get() + mx] = mb;

                stats.intra_blocks += usize::from(mb.is_intra);
                stats.sum_sad_inter += u64::from(mb.sad);
                stats.sum_variance += u64::from(mb.variance);
            }
        }
        stats
    }

    /// Macroblock records of the most recent [`Self::analyse`] pass.
    #[allow(dead_code)]
    #[must_use]
    pub fn blocks(&self) -> &[Macroblock] {
        &self.blocks
    }

    fn classify(&self, prev: &[u8], cur: &[u8], mx: usize, my: usize) -> Macroblock {
        let pitch = self.param.pitch();
        let offset = self.param.block_offset(mx, my);
        let block = &cur[offset..];

        let mv = self.search_mv(prev, cur, mx, my);
        let variance = variance_16x16(block, pitch);
        let sad_intra = spatial_deviation(block, pitch);

        Macroblock {
            mv,
            sad: mv.sad,
            variance,
            is_intra: mv.sad > sad_intra + INTRA_BIAS,
        }
    }

    /// Small-diamond integer search for the vector minimising
    /// `SAD + lambda * bits`, seeded at the origin.
    ///
    /// The step starts at half the window radius and halves whenever no
    /// diamond point improves the cost, down to single-pixel refinement.
    /// Candidates outside the legal window are skipped; ties are broken by
    /// `(cost, |dx| + |dy|, dy, dx)` so the result is reproducible.
    fn search_mv(&self, prev: &[u8], cur: &[u8], mx: usize, my: usize) -> MotionVector {
        let p = &self.param;
        let pitch = p.pitch();
        let pitch_i = pitch.get() as isize;
        let offset = p.block_offset(mx, my);
        let cur_block = &cur[offset..];

        // fcode range clipped so every candidate block stays inside the
        // padded plane
        let limit = self.search_limit as isize;
        let x_min = (-limit).max(-((mx * MB_SIZE + EDGE) as isize));
        let x_max = limit.min(((p.mb_width.get() - 1 - mx) * MB_SIZE + EDGE) as isize);
        let y_min = (-limit).max(-((my * MB_SIZE + EDGE) as isize));
        let y_max = limit.min(((p.mb_height.get() - 1 - my) * MB_SIZE + EDGE) as isize);

        let sad_at = |dx: isize, dy: isize| -> u32 {
            let ref_offset = (offset as isize + dy * pitch_i + dx) as usize;
            sad_16x16(cur_block, pitch, &prev[ref_offset..], pitch)
        };

        let mut best = MotionVector::zero();
        best.sad = sad_at(0, 0);
        let mut best_cost = best.sad + LAMBDA * mv_bits(0, 0);

        let mut step = (self.search_limit / 2).max(1) as isize;
        loop {
            loop {
                let mut candidates: SmallVec<[(u32, u32, isize, isize); 4]> = SmallVec::new();
                for (dx, dy) in [(step, 0), (-step, 0), (0, step), (0, -step)] {
                    let x = best.x + dx;
                    let y = best.y + dy;
                    if x < x_min || x > x_max || y < y_min || y > y_max {
                        continue;
                    }
                    let sad = sad_at(x, y);
                    candidates.push((sad + LAMBDA * mv_bits(x, y), sad, x, y));
                }

                let winner = candidates
                    .into_iter()
                    .min_by_key(|&(cost, _, x, y)| (cost, x.unsigned_abs() + y.unsigned_abs(), y, x));
                match winner {
                    Some((cost, sad, x, y)) if cost < best_cost => {
                        best = MotionVector { x, y, sad };
                        best_cost = cost;
                    }
                    _ => break,
                }
            }

            if step == 1 {
                break;
            }
            step /= 2;
        }

        best
    }
}

// SAFETY: constant is non-zero
const FLAT_PITCH: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(8) };

/// Residual of a spatial-only predictor: each 8x8 quadrant measured against
/// a flat block of its own (truncating) mean, summed over the macroblock.
fn spatial_deviation(block: &[u8], pitch: NonZeroUsize) -> u32 {
    let half = MB_SIZE / 2;
    let quadrants = [(0, 0), (half, 0), (0, half), (half, half)];
    quadrants
        .iter()
        .map(|&(qx, qy)| {
            let sub = &block[qy * pitch.get() + qx..];
            let mean = luma_sum_8x8(sub, pitch) / 64;
            let flat = [mean as u8; 64];
            sad_8x8(sub, pitch, &flat, FLAT_PITCH)
        })
        .sum()
}
