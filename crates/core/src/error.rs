//! Error types for the hamming-sim system.
//!
//! Structural and parameter problems are reported as structured errors.
//! Channel-induced bit corruption is never an error: the decoder corrects
//! or passes it through, and accuracy is measured by comparing against the
//! original data.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Code: Hamming parameters or message/codeword lengths
/// - Interleave: grid dimensions or oversized blocks
/// - Channel: probabilities outside `[0, 1]`
/// - Bit I/O: packing and parsing bit strings
/// - Container: header parsing of encoded streams
/// - CRC: header corruption detected
/// - I/O: file system operations
#[derive(Debug, Error)]
pub enum Error {
    /// Hamming code construction or encode/decode failure
    #[error("hamming code error: {0}")]
    Code(#[from] CodeError),

    /// Interleaver construction or block error
    #[error("interleaver error: {0}")]
    Interleave(#[from] InterleaveError),

    /// Channel model configuration error
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Encoded stream container error (e.g., invalid header)
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// CRC validation of a container header failed
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Hamming code errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    /// Order outside the supported range; no parameters are created
    #[error("invalid order {order}: must be between {min} and {max}")]
    InvalidOrder { order: u32, min: u32, max: u32 },

    /// Message or codeword is not exactly the required number of bits
    #[error("length mismatch: expected {expected} bits, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Interleaver errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterleaveError {
    /// Depth or width of zero
    #[error("invalid interleaver dimensions {depth}x{width}: both must be at least 1")]
    InvalidDimensions { depth: usize, width: usize },

    /// More bits supplied than the grid holds
    #[error("block of {len} bits exceeds grid capacity {capacity}")]
    BlockOverflow { len: usize, capacity: usize },
}

/// Channel model errors.
#[derive(Debug, Error, PartialEq)]
pub enum ChannelError {
    /// Probability parameter outside `[0, 1]` or not a number
    #[error("probability {name} = {value} is outside [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Character other than '0' or '1' in a bit string
    #[error("invalid bit digit {digit:?} at index {index}")]
    InvalidDigit { digit: char, index: usize },
}

/// Encoded stream container errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Unsupported container version
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),

    /// Buffer is too short to contain a valid header
    #[error("container too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Payload length doesn't match header specification
    #[error("payload length mismatch: header says {expected} bytes, got {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },

    /// Header lengths are inconsistent with the code parameters
    #[error("inconsistent header: {0}")]
    Inconsistent(String),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
