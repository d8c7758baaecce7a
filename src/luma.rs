cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))] {
        mod avx2;
    }
}
mod rust;


use std::num::NonZeroUsize;

/// Sum of the pixel values in an 8x8 block.
#[must_use]
pub fn luma_sum_8x8(src: &[u8], src_pitch: NonZeroUsize) -> u32 {
    #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))]
    if crate::util::has_avx2() {
        // SAFETY: AVX2 support was just verified
        return unsafe { avx2::luma_sum_8x8(src, src_pitch) };
    }
    rust::luma_sum::<8, 8>(src, src_pitch)
}

/// Spatial variance of a 16x16 block.
///
/// Computed as `sum(p^2) - sum(p)^2 / 256` in integer arithmetic; a flat
/// block scores zero. Used as the spatial-complexity proxy in the
/// macroblock classifier.
#[must_use]
pub fn variance_16x16(src: &[u8], src_pitch: NonZeroUsize) -> u32 {
    #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))]
    if crate::util::has_avx2() {
        // SAFETY: AVX2 support was just verified
        return unsafe { avx2::variance_16x16(src, src_pitch) };
    }
    rust::variance_16x16(src, src_pitch)
}
