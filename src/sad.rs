cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))] {
        mod avx2;
    }
}
mod rust;

#[cfg(test)]
mod tests;

use std::num::NonZeroUsize;

/// Sum of absolute differences between two 16x16 blocks.
///
/// Both blocks start at index 0 of their slice and advance by the given
/// pitch per row. Positions inside a padded plane can be addressed by
/// slicing the plane at the block offset.
#[must_use]
pub fn sad_16x16(src: &[u8], src_pitch: NonZeroUsize, ref_: &[u8], ref_pitch: NonZeroUsize) -> u32 {
    #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))]
    if crate::util::has_avx2() {
        // SAFETY: AVX2 support was just verified
        return unsafe { avx2::sad_16x16(src, src_pitch, ref_, ref_pitch) };
    }
    rust::get_sad::<16, 16>(src, src_pitch, ref_, ref_pitch)
}

/// Sum of absolute differences between two 8x8 blocks.
#[must_use]
pub fn sad_8x8(src: &[u8], src_pitch: NonZeroUsize, ref_: &[u8], ref_pitch: NonZeroUsize) -> u32 {
    #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))]
    if crate::util::has_avx2() {
        // SAFETY: AVX2 support was just verified
        return unsafe { avx2::sad_8x8(src, src_pitch, ref_, ref_pitch) };
    }
    rust::get_sad::<8, 8>(src, src_pitch, ref_, ref_pitch)
}
