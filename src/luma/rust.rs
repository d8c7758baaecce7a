use std::num::NonZeroUsize;

#[must_use]
pub(super) fn luma_sum<const WIDTH: usize, const HEIGHT: usize>(
    src: &[u8],
    src_pitch: NonZeroUsize,
) -> u32 {
    let mut sum = 0u32;
    for j in 0..HEIGHT {
        let src_row = &src[j * src_pitch.get()..][..WIDTH];
        for &pix in src_row {
            sum += u32::from(pix);
        }
    }
    sum
}

#[must_use]
fn luma_sqsum<const WIDTH: usize, const HEIGHT: usize>(
    src: &[u8],
    src_pitch: NonZeroUsize,
) -> u32 {
    let mut sqsum = 0u32;
    for j in 0..HEIGHT {
        let src_row = &src[j * src_pitch.get()..][..WIDTH];
        for &pix in src_row {
            let val = u32::from(pix);
            sqsum += val * val;
        }
    }
    sqsum
}

#[must_use]
pub(super) fn variance_16x16(src: &[u8], src_pitch: NonZeroUsize) -> u32 {
    let sum = luma_sum::<16, 16>(src, src_pitch);
    let sqsum = luma_sqsum::<16, 16>(src, src_pitch);
    // sum is at most 255 * 256, so sum * sum stays inside u32
    sqsum - sum * sum / 256
}
