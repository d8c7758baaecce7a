#![allow(clippy::unwrap_used, reason = "allow in test files")]

use std::num::NonZeroUsize;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;

use super::{rust, sad_8x8, sad_16x16};

fn pitch(p: usize) -> NonZeroUsize {
    NonZeroUsize::new(p).unwrap()
}

#[test]
fn identical_blocks_have_zero_sad() {
    let block = vec![173u8; 16 * 16];
    assert_eq!(sad_16x16(&block, pitch(16), &block, pitch(16)), 0);
    assert_eq!(sad_8x8(&block, pitch(16), &block, pitch(16)), 0);
}

#[test]
fn max_contrast_16x16() {
    let black = vec![0u8; 16 * 16];
    let white = vec![255u8; 16 * 16];
    assert_eq!(sad_16x16(&black, pitch(16), &white, pitch(16)), 256 * 255);
}

#[test]
fn max_contrast_8x8() {
    let black = vec![0u8; 8 * 8];
    let white = vec![255u8; 8 * 8];
    assert_eq!(sad_8x8(&black, pitch(8), &white, pitch(8)), 64 * 255);
}

#[test]
fn sad_is_symmetric() {
    let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
    let src: Vec<u8> = (0..16 * 16).map(|_| rng.random()).collect();
    let ref_: Vec<u8> = (0..16 * 16).map(|_| rng.random()).collect();
    assert_eq!(
        sad_16x16(&src, pitch(16), &ref_, pitch(16)),
        sad_16x16(&ref_, pitch(16), &src, pitch(16)),
    );
}

#[test]
fn respects_pitch() {
    // Two 8x8 blocks embedded side by side in a pitch-32 buffer
    let mut buf = vec![0u8; 32 * 8];
    for y in 0..8 {
        for x in 0..8 {
            buf[y * 32 + x] = 10;
            buf[y * 32 + 16 + x] = 14;
        }
    }
    assert_eq!(sad_8x8(&buf, pitch(32), &buf[16..], pitch(32)), 64 * 4);
}

#[test]
fn known_small_case() {
    // Row-varying difference: |1-0|, |3-1|, ... summed by hand over 8x8
    let src: Vec<u8> = (0..64).map(|i| (i % 8) as u8).collect();
    let ref_: Vec<u8> = (0..64).map(|i| (2 * (i % 8)) as u8).collect();
    // per row: 0+1+2+...+7 = 28
    assert_eq!(sad_8x8(&src, pitch(8), &ref_, pitch(8)), 8 * 28);
}

#[test]
fn dispatch_matches_scalar_reference() {
    let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
    let src: Vec<u8> = (0..64 * 64).map(|_| rng.random()).collect();
    let ref_: Vec<u8> = (0..64 * 64).map(|_| rng.random()).collect();
    let p = pitch(64);

    for offset in [0usize, 1, 17, 64 * 3 + 5] {
        assert_eq!(
            sad_16x16(&src[offset..], p, &ref_[offset..], p),
            rust::get_sad::<16, 16>(&src[offset..], p, &ref_[offset..], p),
        );
        assert_eq!(
            sad_8x8(&src[offset..], p, &ref_[offset..], p),
            rust::get_sad::<8, 8>(&src[offset..], p, &ref_[offset..], p),
        );
    }
}
