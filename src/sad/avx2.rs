#![allow(clippy::undocumented_unsafe_blocks)]
#![allow(unsafe_op_in_unsafe_fn)]

use std::{arch::x86_64::*, num::NonZeroUsize};

#[must_use]
#[target_feature(enable = "avx2")]
pub unsafe fn sad_16x16(
    src: &[u8],
    src_pitch: NonZeroUsize,
    ref_: &[u8],
    ref_pitch: NonZeroUsize,
) -> u32 {
    let src = src.as_ptr();
    let ref_ = ref_.as_ptr();
    let src_pitch = src_pitch.get();
    let ref_pitch = ref_pitch.get();

    let mut acc = _mm_setzero_si128();
    for y in 0..16 {
        let s = _mm_loadu_si128(src.add(y * src_pitch) as *const __m128i);
        let r = _mm_loadu_si128(ref_.add(y * ref_pitch) as *const __m128i);
        acc = _mm_add_epi64(acc, _mm_sad_epu8(s, r));
    }

    // Reduce 2x u64 lanes to scalar
    let high = _mm_unpackhi_epi64(acc, acc);
    let total = _mm_add_epi64(acc, high);
    _mm_cvtsi128_si64(total) as u32
}

#[must_use]
#[target_feature(enable = "avx2")]
pub unsafe fn sad_8x8(
    src: &[u8],
    src_pitch: NonZeroUsize,
    ref_: &[u8],
    ref_pitch: NonZeroUsize,
) -> u32 {
    let src = src.as_ptr();
    let ref_ = ref_.as_ptr();
    let src_pitch = src_pitch.get();
    let ref_pitch = ref_pitch.get();

    // 8-byte loads zero the upper lane, so the upper sad lane stays zero
    let mut acc = _mm_setzero_si128();
    for y in 0..8 {
        let s = _mm_loadl_epi64(src.add(y * src_pitch) as *const __m128i);
        let r = _mm_loadl_epi64(ref_.add(y * ref_pitch) as *const __m128i);
        acc = _mm_add_epi64(acc, _mm_sad_epu8(s, r));
    }
    _mm_cvtsi128_si64(acc) as u32
}
