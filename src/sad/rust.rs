use std::num::NonZeroUsize;

#[must_use]
pub(super) fn get_sad<const WIDTH: usize, const HEIGHT: usize>(
    src: &[u8],
    src_pitch: NonZeroUsize,
    ref_: &[u8],
    ref_pitch: NonZeroUsize,
) -> u32 {
    let mut sum = 0u32;
    for y in 0..HEIGHT {
        let src_row = &src[y * src_pitch.get()..][..WIDTH];
        let ref_row = &ref_[y * ref_pitch.get()..][..WIDTH];
        sum += src_row.iter().zip(ref_row.iter()).fold(0, |acc, (s, r)| {
            // smaller types for faster code generation
            let val1 = i16::from(*s);
            let val2 = i16::from(*r);
            acc + u32::from((val1 - val2).unsigned_abs())
        });
    }
    sum
}
