#![allow(clippy::undocumented_unsafe_blocks)]
#![allow(unsafe_op_in_unsafe_fn)]

use std::{arch::x86_64::*, num::NonZeroUsize};

#[must_use]
#[target_feature(enable = "avx2")]
pub unsafe fn luma_sum_8x8(src: &[u8], src_pitch: NonZeroUsize) -> u32 {
    let src = src.as_ptr();
    let src_pitch = src_pitch.get();

    // 8-byte loads zero the upper lane, so the upper sad lane stays zero
    let zero = _mm_setzero_si128();
    let mut acc = _mm_setzero_si128();
    for j in 0..8 {
        let row = _mm_loadl_epi64(src.add(j * src_pitch) as *const __m128i);
        acc = _mm_add_epi64(acc, _mm_sad_epu8(row, zero));
    }
    _mm_cvtsi128_si64(acc) as u32
}

#[must_use]
#[target_feature(enable = "avx2")]
unsafe fn luma_sum_16x16(src: *const u8, src_pitch: usize) -> u32 {
    let zero = _mm_setzero_si128();
    let mut acc = _mm_setzero_si128();
    for j in 0..16 {
        let row = _mm_loadu_si128(src.add(j * src_pitch) as *const __m128i);
        acc = _mm_add_epi64(acc, _mm_sad_epu8(row, zero));
    }

    let high = _mm_unpackhi_epi64(acc, acc);
    let total = _mm_add_epi64(acc, high);
    _mm_cvtsi128_si64(total) as u32
}

#[must_use]
#[target_feature(enable = "avx2")]
pub unsafe fn variance_16x16(src: &[u8], src_pitch: NonZeroUsize) -> u32 {
    let base = src.as_ptr();
    let pitch = src_pitch.get();

    let zero = _mm_setzero_si128();
    let mut sq_acc = _mm_setzero_si128();
    for j in 0..16 {
        let row = _mm_loadu_si128(base.add(j * pitch) as *const __m128i);
        // widen bytes to u16 and square-accumulate pairwise into u32 lanes
        let lo = _mm_unpacklo_epi8(row, zero);
        let hi = _mm_unpackhi_epi8(row, zero);
        sq_acc = _mm_add_epi32(sq_acc, _mm_madd_epi16(lo, lo));
        sq_acc = _mm_add_epi32(sq_acc, _mm_madd_epi16(hi, hi));
    }

    // Horizontal sum of 4 x u32 lanes
    let sum2 = _mm_add_epi32(sq_acc, _mm_shuffle_epi32(sq_acc, 0x4e));
    let sum4 = _mm_add_epi32(sum2, _mm_shuffle_epi32(sum2, 0xb1));
    let sqsum = _mm_cvtsi128_si32(sum4) as u32;

    let sum = luma_sum_16x16(base, pitch);
    sqsum - sum * sum / 256
}
