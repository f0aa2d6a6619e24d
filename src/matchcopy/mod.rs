//! Byte-oriented match-copy codec (decode only)
//!
//! The second codec family of the asset ecosystem. Streams are sequences
//! of control bytes selecting one of five opcode families by their top
//! bits, with distances split across following bytes and lengths extended
//! by zero-valued continuation bytes. Only the decoder lives here: the
//! matching encoder ships with the original tooling and is treated as an
//! external producer of compatible streams.

mod decoder;

pub use decoder::decompress_into;

use std::io::Cursor;

use crate::common::Result;

/// Largest distance a one-extra-byte short match can express
pub const SHORT_MATCH_RANGE: usize = 2048;

/// Largest distance a medium match can express
pub const MEDIUM_MATCH_RANGE: usize = 16384;

/// Largest distance a far match can express
pub const FAR_MATCH_RANGE: usize = 49152;

/// Decompress a match-copy slice into a fresh buffer
///
/// Returns the decoded bytes together with the number of input bytes the
/// stream occupied, so callers slicing a larger file know where the next
/// field starts.
pub fn decompress_bytes(input: &[u8], expected: usize) -> Result<(Vec<u8>, usize)> {
    let mut out = vec![0u8; expected];
    let consumed = decompress_into(&mut Cursor::new(input), &mut out)?;
    Ok((out, consumed as usize))
}
