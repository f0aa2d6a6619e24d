//! Common types and constants for the asset codec layer
//!
//! This module defines the configuration types, wire-level constants, and
//! error type shared by the window codec, the match-copy decoder, and the
//! array framing layer.

use thiserror::Error;

/// Codec family negotiated by a format schema for a compressed field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFamily {
    /// Sliding-window literal/match codec (encode and decode)
    Window = 0,
    /// Byte-oriented match-copy codec (decode only; encoder is external)
    MatchCopy = 1,
}

impl CodecFamily {
    /// Create a CodecFamily from a raw selector byte
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(CodecFamily::Window),
            1 => Ok(CodecFamily::MatchCopy),
            _ => Err(AssetLzError::UnsupportedCodec(value)),
        }
    }
}

/// Checksum interpretation used by the guarded legacy decoder
///
/// The two compressed-block conventions in the asset formats disagree on
/// whether the running sum treats bytes as signed or unsigned. Both are
/// kept; the caller picks per format context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumMode {
    /// No checksum accumulation
    None,
    /// Sum of sign-extended bytes
    Signed,
    /// Sum of zero-extended bytes
    Unsigned,
}

/// Sliding-window codec configuration
///
/// `window_size` is the ring size N, `max_match` the longest encodable
/// match F, `threshold` the longest match still emitted as literals, and
/// `fill_byte` the value the window is pre-filled with. Both sides of a
/// stream must agree on all four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Ring buffer size N (power of two, at most 4096)
    pub window_size: usize,
    /// Maximum match length F
    pub max_match: usize,
    /// Matches of this length or shorter are emitted as literals
    pub threshold: usize,
    /// Byte value the window starts out filled with
    pub fill_byte: u8,
}

impl WindowConfig {
    /// Create a validated configuration
    ///
    /// The match pair packs the window position into 12 bits and the
    /// length into 4, so `window_size` must be a power of two no larger
    /// than 4096 and `max_match` must satisfy
    /// `threshold + 2 <= max_match <= threshold + 16`.
    pub fn new(
        window_size: usize,
        max_match: usize,
        threshold: usize,
        fill_byte: u8,
    ) -> Result<Self> {
        if !window_size.is_power_of_two() || !(64..=WINDOW_SIZE).contains(&window_size) {
            return Err(AssetLzError::InvalidConfig(format!(
                "window size {window_size} is not a power of two in 64..=4096"
            )));
        }
        if max_match < threshold + 2 || max_match > threshold + 16 {
            return Err(AssetLzError::InvalidConfig(format!(
                "max match {max_match} does not fit threshold {threshold} plus a 4-bit length"
            )));
        }
        if window_size < 2 * max_match {
            return Err(AssetLzError::InvalidConfig(format!(
                "window size {window_size} holds less than two max-length matches of {max_match}"
            )));
        }
        Ok(Self {
            window_size,
            max_match,
            threshold,
            fill_byte,
        })
    }

    /// Position mask for ring arithmetic
    pub(crate) fn mask(&self) -> usize {
        self.window_size - 1
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_size: WINDOW_SIZE,
            max_match: MAX_MATCH,
            threshold: MATCH_THRESHOLD,
            fill_byte: FILL_BYTE,
        }
    }
}

/// Error type for codec operations
#[derive(Debug, Error)]
pub enum AssetLzError {
    /// Decoded byte count does not match the declared size
    #[error("decoded {actual} bytes where {expected} were declared")]
    SizeMismatch {
        /// Byte count the envelope declared
        expected: usize,
        /// Byte count the decoder produced
        actual: usize,
    },

    /// Trailing integrity value disagrees with the accumulated sum
    #[error("checksum mismatch: stored {stored:08X}, computed {computed:08X}")]
    ChecksumMismatch {
        /// Value stored after the compressed block
        stored: i32,
        /// Value accumulated while decoding
        computed: i32,
    },

    /// A match references data before the start of the output
    #[error("match reaches {distance} bytes back with only {available} bytes decoded")]
    LookbehindOutOfRange {
        /// Backward distance the opcode encodes
        distance: usize,
        /// Bytes decoded so far
        available: usize,
    },

    /// A copy would write past the end of the output buffer
    #[error("copy of {needed} bytes exceeds remaining output space {remaining}")]
    OutputOverrun {
        /// Bytes the opcode wants to write
        needed: usize,
        /// Bytes of output space left
        remaining: usize,
    },

    /// The stream terminated before the output buffer was filled
    #[error("stream ended after {written} of {expected} output bytes")]
    OutputUnderrun {
        /// Bytes written before the terminator
        written: usize,
        /// Bytes the caller expected
        expected: usize,
    },

    /// Unrecognized codec family selector
    #[error("unsupported codec family selector: {0}")]
    UnsupportedCodec(u8),

    /// Element size the framing layer cannot handle
    #[error("unsupported element size: {0}")]
    UnsupportedElementSize(usize),

    /// Invalid codec configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Array envelope declared a negative element count
    #[error("array count {0} is negative")]
    NegativeCount(i32),

    /// Compressed input ended in the middle of an opcode
    #[error("compressed input truncated mid-opcode")]
    TruncatedInput,

    /// No encoder exists for the match-copy family
    #[error("the match-copy codec has no encoder; write raw or replay tracked bytes")]
    ExternalEncoder,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetLzError {
    /// Fold an unexpected-EOF read error into the truncation variant
    pub(crate) fn from_read(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            AssetLzError::TruncatedInput
        } else {
            AssetLzError::Io(e)
        }
    }
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, AssetLzError>;

// Wire-level constants shared by every format schema

/// Sliding window size N
pub const WINDOW_SIZE: usize = 4096;

/// Maximum match length F
pub const MAX_MATCH: usize = 18;

/// Longest match still stored as literals
pub const MATCH_THRESHOLD: usize = 2;

/// Default window filler byte (ASCII space)
pub const FILL_BYTE: u8 = 0x20;

/// Payloads below this many bytes are stored raw instead of compressed
pub const SIZE_THRESHOLD: usize = 1024;

/// Tokens per flag byte in the window codec stream
pub const FLAG_GROUP: usize = 8;
