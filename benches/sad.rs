use std::{hint::black_box, num::NonZeroUsize};

use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;
use scenecut::sad::{sad_8x8, sad_16x16};

pub fn bench_sad_16x16(c: &mut Criterion) {
    c.bench_function("sad 16x16", |b| {
        let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
        let pitch = NonZeroUsize::new(16).unwrap();
        let mut src = vec![0u8; 16 * 16];
        let mut ref_ = vec![0u8; 16 * 16];

        for p in src.iter_mut() {
            *p = rng.random();
        }
        for p in ref_.iter_mut() {
            *p = rng.random();
        }

        b.iter(|| {
            sad_16x16(
                black_box(&src),
                black_box(pitch),
                black_box(&ref_),
                black_box(pitch),
            )
        })
    });
}

pub fn bench_sad_8x8(c: &mut Criterion) {
    c.bench_function("sad 8x8", |b| {
        let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
        let pitch = NonZeroUsize::new(8).unwrap();
        let mut src = vec![0u8; 8 * 8];
        let mut ref_ = vec![0u8; 8 * 8];

        for p in src.iter_mut() {
            *p = rng.random();
        }
        for p in ref_.iter_mut() {
            *p = rng.random();
        }

        b.iter(|| {
            sad_8x8(
                black_box(&src),
                black_box(pitch),
                black_box(&ref_),
                black_box(pitch),
            )
        })
    });
}

criterion_group!(bench_sad, bench_sad_16x16, bench_sad_8x8);
criterion_main!(bench_sad);
