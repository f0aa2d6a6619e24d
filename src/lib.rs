//! assetlz - Rust implementation of a legacy game-asset codec layer
//!
//! This crate provides pure Rust implementations of the two LZ-family
//! codecs shared by a closed ecosystem of binary asset formats (textures,
//! models, terrain, archives, configuration and animation files), plus the
//! array framing protocol those formats funnel their bulk data through.
//! Streams are bit-exact compatible with the original tooling.
//!
//! # Features
//!
//! - **Window codec** - sliding-window literal/match compression and
//!   decompression (4KB ring, 18-byte matches, tree-based match finding)
//! - **Match-copy codec** - decoder for the second stream family, with
//!   strict lookbehind/overrun guards and sentinel termination
//! - **Guarded blocks** - legacy checksum-trailed block decoding, signed
//!   or unsigned per format context
//! - **Array framing** - counted arrays with per-field raw-vs-compressed
//!   decisions, condensed constant-fill arrays, and tracked arrays that
//!   rewrite byte-for-byte without re-encoding
//!
//! # Example - Window codec
//!
//! ```
//! use assetlz::{compress_bytes, decompress_bytes, WindowConfig};
//!
//! let config = WindowConfig::default();
//! let data = b"hello hello hello hello";
//! let coded = compress_bytes(data, &config);
//! let decoded = decompress_bytes(&coded, data.len(), &config)?;
//! assert_eq!(decoded, data);
//! # Ok::<(), assetlz::AssetLzError>(())
//! ```
//!
//! # Example - Array framing
//!
//! ```
//! use assetlz::framing::{read_array, write_array, FrameOptions};
//! use std::io::Cursor;
//!
//! let opts = FrameOptions::default();
//! let heights: Vec<i32> = (0..2000).collect();
//! let mut buf = Vec::new();
//! write_array(&mut buf, &heights, &opts)?;
//! let back: Vec<i32> = read_array(&mut Cursor::new(&buf), &opts)?;
//! assert_eq!(back, heights);
//! # Ok::<(), assetlz::AssetLzError>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod common;
pub mod error;
pub mod framing;
pub mod matchcopy;
pub mod tracked;
pub mod window;

// Re-export commonly used types
pub use common::{
    AssetLzError, ChecksumMode, CodecFamily, Result, WindowConfig, FILL_BYTE, MATCH_THRESHOLD,
    MAX_MATCH, SIZE_THRESHOLD, WINDOW_SIZE,
};
pub use framing::{CondensedArray, Element, FrameOptions};
pub use tracked::TrackedArray;
pub use window::WindowEncoder;

// Convenience functions

/// Compress data with the sliding-window codec
///
/// # Arguments
/// * `data` - The data to compress
/// * `config` - Window configuration shared with the decoder
///
/// # Returns
/// The token stream; decompress with the original length as target
pub fn compress_bytes(data: &[u8], config: &WindowConfig) -> Vec<u8> {
    window::compress_bytes(data, config)
}

/// Decompress a sliding-window token stream
///
/// # Arguments
/// * `data` - The compressed token stream
/// * `expected` - Original data length to reproduce
/// * `config` - Window configuration the stream was encoded with
///
/// # Returns
/// A vector containing the decompressed data
pub fn decompress_bytes(data: &[u8], expected: usize, config: &WindowConfig) -> Result<Vec<u8>> {
    window::decompress_bytes(data, expected, config)
}
