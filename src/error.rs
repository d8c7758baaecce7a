use thiserror::Error;

/// Faults surfaced by the detection pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Frame with invalid geometry or a short luma plane.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
    /// Input the detector cannot analyze (wrong bit depth, bad parameter).
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
    /// Failure reported by the decoder collaborator.
    #[error("Decoder error: {0}")]
    Decoder(String),
    /// I/O failure while reading the input or writing results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialised `Result` type for detection operations.
pub type Result<T> = ::std::result::Result<T, Error>;
