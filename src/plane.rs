
use std::num::NonZeroUsize;

use crate::error::{Error, Result};

/// Pixel margin kept on every side of the aligned interior so motion search
/// can read up to 64 pixels past any macroblock without bounds checks.
pub const EDGE: usize = 64;
/// Macroblock side length in pixels.
pub const MB_SIZE: usize = 16;
/// Largest frame dimension the detector accepts.
pub const MAX_DIMENSION: usize = 8192;

/// Plane geometry derived deterministically from the frame dimensions.
///
/// The interior is rounded up to whole macroblocks (`aligned_*`), then a
/// 64-pixel border is added on every side (`padded_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MBParam {
    pub width: NonZeroUsize,
    pub height: NonZeroUsize,
    pub mb_width: NonZeroUsize,
    pub mb_height: NonZeroUsize,
    pub aligned_width: NonZeroUsize,
    pub aligned_height: NonZeroUsize,
    pub padded_width: NonZeroUsize,
    pub padded_height: NonZeroUsize,
}

impl MBParam {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
            return Err(Error::InvalidFrame(format!(
                "dimensions must be between 1 and {MAX_DIMENSION}, got {width}x{height}"
            )));
        }

        let mb_width = (width + MB_SIZE - 1) / MB_SIZE;
        let mb_height = (height + MB_SIZE - 1) / MB_SIZE;

        // SAFETY: width and height were checked to be at least 1 above, and
        // every derived value below only grows from there.
        unsafe {
            Ok(Self {
                width: NonZeroUsize::new_unchecked(width),
                height: NonZeroUsize::new_unchecked(height),
                mb_width: NonZeroUsize::new_unchecked(mb_width),
                mb_height: NonZeroUsize::new_unchecked(mb_height),
                aligned_width: NonZeroUsize::new_unchecked(mb_width * MB_SIZE),
                aligned_height: NonZeroUsize::new_unchecked(mb_height * MB_SIZE),
                padded_width: NonZeroUsize::new_unchecked(mb_width * MB_SIZE + 2 * EDGE),
                padded_height: NonZeroUsize::new_unchecked(mb_height * MB_SIZE + 2 * EDGE),
            })
        }
    }

    /// Number of macroblocks in the frame.
    #[must_use]
    pub fn mb_count(&self) -> usize {
        self.mb_width.get() * self.mb_height.get()
    }

    /// Row stride of the padded plane.
    #[must_use]
    pub fn pitch(&self) -> NonZeroUsize {
        self.padded_width
    }

    /// Total size of the padded plane in pixels.
    #[must_use]
    pub fn plane_len(&self) -> usize {
        self.padded_width.get() * self.padded_height.get()
    }

    /// Index of the top-left pixel of macroblock `(mx, my)`.
    #[must_use]
    pub fn block_offset(&self, mx: usize, my: usize) -> usize {
        debug_assert!(mx < self.mb_width.get() && my < self.mb_height.get());
        (EDGE + my * MB_SIZE) * self.padded_width.get() + EDGE + mx * MB_SIZE
    }
}

/// An edge-replicated luma plane owned by the detection driver.
///
/// Two of these are allocated up front and swapped between frames; the
/// buffer is only reallocated on a mid-stream resolution change.
#[derive(Debug, Clone)]
pub struct PaddedPlane {
    param: MBParam,
    data: Vec<u8>,
}

impl PaddedPlane {
    #[must_use]
    pub fn new(param: MBParam) -> Self {
        Self {
            param,
            data: vec![0; param.plane_len()],
        }
    }

    #[must_use]
    pub fn param(&self) -> &MBParam {
        &self.param
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copies a raw `width`x`height` luma plane into the interior and
    /// replicates the last real column/row out to the macroblock-aligned
    /// boundary. The caller has validated `src.len() >= width * height`.
    pub fn fill_plane(&mut self, src: &[u8]) {
        let p = self.param;
        let pitch = p.padded_width.get();
        let width = p.width.get();
        let height = p.height.get();
        let aligned_width = p.aligned_width.get();
        let aligned_height = p.aligned_height.get();
        let interior = EDGE * pitch + EDGE;

        self.data.fill(0);
        for y in 0..height {
            let dest = interior + y * pitch;
            self.data[dest..dest + width].copy_from_slice(&src[y * width..(y + 1) * width]);
        }

        // replicate the last real column out to the macroblock boundary
        if width < aligned_width {
            for y in 0..height {
                let row = interior + y * pitch;
                let value = self.data[row + width - 1];
                self.data[row + width..row + aligned_width].fill(value);
            }
        }

        // replicate the last (already extended) row down to the boundary
        if height < aligned_height {
            let last = interior + (height - 1) * pitch;
            for y in height..aligned_height {
                let dest = interior + y * pitch;
                self.data.copy_within(last..last + aligned_width, dest);
            }
        }
    }

    /// Replicates the aligned interior into the 64-pixel border.
    ///
    /// The top and bottom border rows take a copy of the nearest interior
    /// row, then every row of the plane replicates its edge columns
    /// outward, which fills the corners as a side effect.
    pub fn pad(&mut self) {
        let p = self.param;
        let pitch = p.padded_width.get();
        let aligned_width = p.aligned_width.get();
        let aligned_height = p.aligned_height.get();

        let first_row = EDGE * pitch + EDGE;
        for y in 0..EDGE {
            self.data
                .copy_within(first_row..first_row + aligned_width, y * pitch + EDGE);
        }
        let last_row = (EDGE + aligned_height - 1) * pitch + EDGE;
        for y in EDGE + aligned_height..p.padded_height.get() {
            self.data
                .copy_within(last_row..last_row + aligned_width, y * pitch + EDGE);
        }

        for y in 0..p.padded_height.get() {
            let row = y * pitch;
            let left = self.data[row + EDGE];
            self.data[row..row + EDGE].fill(left);
            let right = self.data[row + EDGE + aligned_width - 1];
            self.data[row + EDGE + aligned_width..row + pitch].fill(right);
        }
    }
}
