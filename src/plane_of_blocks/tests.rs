#![allow(clippy::unwrap_used, reason = "allow in test files")]

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;

use std::num::NonZeroUsize;

use super::{PlaneOfBlocks, spatial_deviation};
use crate::plane::{MBParam, PaddedPlane};

fn plane_from(src: &[u8], param: MBParam) -> PaddedPlane {
    let mut plane = PaddedPlane::new(param);
    plane.fill_plane(src);
    plane.pad();
    plane
}

#[test]
fn identical_frames_produce_zero_vectors_and_no_intra() {
    let param = MBParam::new(64, 48).unwrap();
    let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
    let src: Vec<u8> = (0..64 * 48).map(|_| rng.random()).collect();
    let prev = plane_from(&src, param);
    let cur = plane_from(&src, param);

    let mut pob = PlaneOfBlocks::new(param, 2);
    let stats = pob.analyse(&prev, &cur);

    assert_eq!(stats.intra_blocks, 0);
    assert_eq!(stats.sum_sad_inter, 0);
    for mb in pob.blocks() {
        assert_eq!((mb.mv.x, mb.mv.y), (0, 0));
        assert_eq!(mb.sad, 0);
        assert!(!mb.is_intra);
    }
}

#[test]
fn flat_frames_stay_at_the_origin() {
    // every candidate has zero SAD; the origin must win on bit cost
    let param = MBParam::new(32, 32).unwrap();
    let src = vec![128u8; 32 * 32];
    let prev = plane_from(&src, param);
    let cur = plane_from(&src, param);

    let mut pob = PlaneOfBlocks::new(param, 4);
    pob.analyse(&prev, &cur);
    for mb in pob.blocks() {
        assert_eq!((mb.mv.x, mb.mv.y), (0, 0));
    }
}

#[test]
fn one_pixel_pan_is_fully_compensated() {
    // horizontal gradient shifted right by one pixel: the SAD surface is
    // monotone in |dx + 1| and flat in dy, so the search must land on (-1, 0)
    let param = MBParam::new(64, 64).unwrap();
    let base: Vec<u8> = (0..64 * 64).map(|i| ((i % 64) * 4) as u8).collect();
    let shifted: Vec<u8> = (0..64usize * 64)
        .map(|i| {
            let x = i % 64;
            ((x.saturating_sub(1)) * 4) as u8
        })
        .collect();
    let prev = plane_from(&base, param);
    let cur = plane_from(&shifted, param);

    let mut pob = PlaneOfBlocks::new(param, 2);
    let stats = pob.analyse(&prev, &cur);

    assert_eq!(stats.intra_blocks, 0);
    for mb in pob.blocks() {
        assert_eq!((mb.mv.x, mb.mv.y), (-1, 0));
        assert_eq!(mb.sad, 0);
    }
}

#[test]
fn hard_cut_marks_every_block_intra() {
    let param = MBParam::new(48, 32).unwrap();
    let prev = plane_from(&vec![0u8; 48 * 32], param);
    let cur = plane_from(&vec![255u8; 48 * 32], param);

    let mut pob = PlaneOfBlocks::new(param, 2);
    let stats = pob.analyse(&prev, &cur);

    assert_eq!(stats.intra_blocks, param.mb_count());
    assert_eq!(stats.sum_sad_inter, param.mb_count() as u64 * 256 * 255);
    for mb in pob.blocks() {
        assert!(mb.is_intra);
        assert_eq!(mb.variance, 0);
    }
}

#[test]
fn analysis_is_deterministic() {
    let param = MBParam::new(80, 64).unwrap();
    let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
    let a: Vec<u8> = (0..80 * 64).map(|_| rng.random()).collect();
    let b: Vec<u8> = (0..80 * 64).map(|_| rng.random()).collect();
    let prev = plane_from(&a, param);
    let cur = plane_from(&b, param);

    let mut first = PlaneOfBlocks::new(param, 3);
    let mut second = PlaneOfBlocks::new(param, 3);
    let stats_first = first.analyse(&prev, &cur);
    let stats_second = second.analyse(&prev, &cur);

    assert_eq!(stats_first, stats_second);
    for (x, y) in first.blocks().iter().zip(second.blocks().iter()) {
        assert_eq!((x.mv.x, x.mv.y, x.sad), (y.mv.x, y.mv.y, y.sad));
    }
}

#[test]
fn spatial_deviation_of_a_flat_block_is_zero() {
    let block = vec![200u8; 16 * 16];
    assert_eq!(spatial_deviation(&block, NonZeroUsize::new(16).unwrap()), 0);
}

#[test]
fn spatial_deviation_sums_the_four_quadrant_residuals() {
    // top-left quadrant: 32 pixels at 64 and 32 at 0, mean 32, residual
    // 64 * 32; the other three quadrants are flat
    let mut block = vec![0u8; 16 * 16];
    for y in 0..8 {
        for x in 0..8 {
            if (y * 8 + x) % 2 == 0 {
                block[y * 16 + x] = 64;
            }
        }
    }
    assert_eq!(
        spatial_deviation(&block, NonZeroUsize::new(16).unwrap()),
        64 * 32
    );
}

#[test]
fn spatial_deviation_uses_the_truncating_mean() {
    // a single pixel at 63 leaves the quadrant mean at zero
    let mut block = vec![0u8; 16 * 16];
    block[0] = 63;
    assert_eq!(
        spatial_deviation(&block, NonZeroUsize::new(16).unwrap()),
        63
    );
}

#[test]
fn search_window_is_clipped_at_the_frame_corner() {
    // a large fcode must not push candidate reads outside the padded plane;
    // a run over a tiny frame exercises the clipping on all four sides
    let param = MBParam::new(16, 16).unwrap();
    let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
    let a: Vec<u8> = (0..16 * 16).map(|_| rng.random()).collect();
    let b: Vec<u8> = (0..16 * 16).map(|_| rng.random()).collect();
    let prev = plane_from(&a, param);
    let cur = plane_from(&b, param);

    let mut pob = PlaneOfBlocks::new(param, 6);
    pob.analyse(&prev, &cur);
    let mb = pob.blocks()[0];
    assert!(mb.mv.x.unsigned_abs() <= 64);
    assert!(mb.mv.y.unsigned_abs() <= 64);
}
