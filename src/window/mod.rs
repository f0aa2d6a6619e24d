//! Sliding-window literal/match codec
//!
//! The primary codec of the asset ecosystem: a ring window of the last
//! N bytes, a token stream of flag-byte groups, and an encoder that finds
//! matches through per-leading-byte binary search trees over the window.
//! The decoder is also the core of the checksum-guarded legacy block
//! format in [`guarded`].

mod decoder;
mod encoder;
pub mod guarded;
mod index;

pub use decoder::decompress_from;
pub use encoder::WindowEncoder;
pub use guarded::{decode_guarded, encode_guarded};

use std::io::Cursor;

use crate::common::{Result, WindowConfig};

/// Compress a byte slice into a fresh token stream
///
/// One-shot form of [`WindowEncoder::compress`]; callers encoding many
/// fields should hold an encoder and reuse it.
pub fn compress_bytes(input: &[u8], config: &WindowConfig) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() / 2 + 8);
    WindowEncoder::new(*config).compress(input, &mut out);
    out
}

/// Decompress a token-stream slice back to `expected` bytes
pub fn decompress_bytes(input: &[u8], expected: usize, config: &WindowConfig) -> Result<Vec<u8>> {
    decompress_from(&mut Cursor::new(input), expected, config)
}
