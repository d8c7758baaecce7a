
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// Stream-level details a decoder reports before any frame is decoded.
///
/// A pull decoder over a pipe may not know the frame count up front;
/// `total_frames` and `duration` are filled in when they can be derived.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VideoMetadata {
    pub width: usize,
    pub height: usize,
    pub fps: f64,
    pub total_frames: Option<u64>,
    pub duration: Option<f64>,
}

/// One decoded grayscale frame, borrowed from the decoder until the next
/// pull. The driver copies the plane into its padded buffer and never
/// retains this reference.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    /// Luma plane, row-major, one byte per pixel, stride equal to `width`.
    pub data: &'a [u8],
    pub width: usize,
    pub height: usize,
    /// Presentation time in seconds.
    pub pts: f64,
    /// 0-indexed, strictly increasing by one.
    pub frame_number: u64,
}

/// A source of decoded grayscale frames, in decode order.
///
/// y4m decoding is built in; the trait is the seam for feeding the
/// detector from any other source.
pub trait Decoder {
    /// Stream-level details, available before the first frame.
    fn metadata(&self) -> VideoMetadata;

    /// Pulls the next frame. `Ok(None)` signals a clean end of stream.
    fn next_frame(&mut self) -> Result<Option<RawFrame<'_>>>;
}

/// Decoder for YUV4MPEG2 streams. Only the luma plane is read; chroma is
/// skipped over. 8-bit input only.
pub struct Y4mDecoder<R: Read> {
    inner: y4m::Decoder<R>,
    width: usize,
    height: usize,
    fps: f64,
    colorspace: y4m::Colorspace,
    total_frames: Option<u64>,
    frame_number: u64,
    y_plane_buf: Vec<u8>,
}

impl<R: Read> std::fmt::Debug for Y4mDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Y4mDecoder")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fps", &self.fps)
            .field("colorspace", &self.colorspace)
            .field("total_frames", &self.total_frames)
            .field("frame_number", &self.frame_number)
            .finish()
    }
}

impl Y4mDecoder<BufReader<File>> {
    /// Opens a y4m file. The frame count is estimated from the file size
    /// and the fixed frame length so progress can report percent and ETA.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();

        // measure the stream header, then hand a rewound reader to the parser
        let mut reader = BufReader::new(file);
        let mut header = Vec::new();
        reader.read_until(b'\n', &mut header)?;
        let header_len = header.len() as u64;
        reader.seek(SeekFrom::Start(0))?;

        let mut decoder = Self::new(reader)?;
        decoder.estimate_total_frames(file_len, header_len);
        Ok(decoder)
    }
}

impl<R: Read> Y4mDecoder<R> {
    pub fn new(reader: R) -> Result<Self> {
        let inner =
            y4m::Decoder::new(reader).map_err(|err| Error::Decoder(err.to_string()))?;

        let bit_depth = inner.get_bit_depth();
        if bit_depth != 8 {
            return Err(Error::UnsupportedInput(format!(
                "only 8-bit input is supported, stream is {bit_depth}-bit"
            )));
        }
        let framerate = inner.get_framerate();
        if framerate.den == 0 || framerate.num == 0 {
            return Err(Error::UnsupportedInput(format!(
                "invalid frame rate {}:{}",
                framerate.num, framerate.den
            )));
        }

        Ok(Self {
            width: inner.get_width(),
            height: inner.get_height(),
            fps: framerate.num as f64 / framerate.den as f64,
            colorspace: inner.get_colorspace(),
            total_frames: None,
            frame_number: 0,
            y_plane_buf: Vec::new(),
            inner,
        })
    }

    /// Sizes the fixed-length frames against the file length. Streams with
    /// per-frame parameters will be off by a little; the count only feeds
    /// progress reporting.
    fn estimate_total_frames(&mut self, file_len: u64, header_len: u64) {
        let (chroma_width, chroma_height) =
            chroma_dimensions(self.colorspace, self.width, self.height);
        let frame_bytes =
            6 + (self.width * self.height + 2 * chroma_width * chroma_height) as u64;
        let payload = file_len.saturating_sub(header_len);
        if payload > 0 {
            self.total_frames = Some(payload / frame_bytes);
        }
    }
}

impl<R: Read> Decoder for Y4mDecoder<R> {
    fn metadata(&self) -> VideoMetadata {
        VideoMetadata {
            width: self.width,
            height: self.height,
            fps: self.fps,
            total_frames: self.total_frames,
            duration: self
                .total_frames
                .map(|total| total as f64 / self.fps),
        }
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame<'_>>> {
        let width = self.width;
        let height = self.height;
        let fps = self.fps;
        match self.inner.read_frame() {
            Ok(frame) => {
                let frame_number = self.frame_number;
                self.frame_number += 1;
                self.y_plane_buf.clear();
                self.y_plane_buf.extend_from_slice(frame.get_y_plane());
                Ok(Some(RawFrame {
                    data: &self.y_plane_buf,
                    width,
                    height,
                    pts: frame_number as f64 / fps,
                    frame_number,
                }))
            }
            Err(y4m::Error::EOF) => Ok(None),
            // a trailing frame cut short mid-payload also ends the stream,
            // whichever way the parser reports the underlying EOF
            Err(y4m::Error::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(Error::Decoder(err.to_string())),
        }
    }
}

/// Chroma plane dimensions for the subsampling of `colorspace`. High-depth
/// variants never reach this point; the constructor rejects them.
fn chroma_dimensions(
    colorspace: y4m::Colorspace,
    width: usize,
    height: usize,
) -> (usize, usize) {
    match colorspace {
        y4m::Colorspace::Cmono => (0, 0),
        y4m::Colorspace::C422 => ((width + 1) / 2, height),
        y4m::Colorspace::C444 => (width, height),
        // 4:2:0 and anything the parser adds later
        _ => ((width + 1) / 2, (height + 1) / 2),
    }
}
