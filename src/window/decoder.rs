//! Sliding-window decoder
//!
//! The token stream is read one flag byte per eight tokens, least
//! significant bit first: a set bit is a literal byte, a clear bit a
//! two-byte match pair. The pair packs a window position into twelve bits
//! and a length into four; the copy replays `length + 1` bytes through
//! the window one at a time, so a match may run past the write cursor and
//! re-read bytes it has just produced.

use std::io::{self, Read};

use crate::common::{ChecksumMode, Result, WindowConfig};

/// Running sum of emitted bytes for the guarded decode paths
#[derive(Debug)]
pub(crate) struct ChecksumAccum {
    mode: ChecksumMode,
    sum: i32,
}

impl ChecksumAccum {
    pub fn new(mode: ChecksumMode) -> Self {
        Self { mode, sum: 0 }
    }

    pub fn add(&mut self, byte: u8) {
        self.sum = match self.mode {
            ChecksumMode::None => self.sum,
            ChecksumMode::Signed => self.sum.wrapping_add(i32::from(byte as i8)),
            ChecksumMode::Unsigned => self.sum.wrapping_add(i32::from(byte)),
        };
    }

    pub fn value(&self) -> i32 {
        self.sum
    }
}

/// Read one byte, `None` on a clean end of input
pub(crate) fn read_byte<R: Read>(reader: &mut R) -> Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
}

/// Shared token-stream decode loop
///
/// Decodes until `expected` output bytes have been produced or the input
/// ends, accumulating the checksum the caller asked for. Exact-size
/// enforcement belongs to the callers: the framing layer raises a size
/// mismatch and the guarded decoder a checksum failure.
pub(crate) fn decode_stream<R: Read>(
    reader: &mut R,
    expected: usize,
    config: &WindowConfig,
    mode: ChecksumMode,
) -> Result<(Vec<u8>, i32)> {
    let threshold = config.threshold;
    let mask = config.mask();
    let mut text = vec![config.fill_byte; config.window_size];
    let mut r = config.window_size - config.max_match;
    let mut out = Vec::with_capacity(expected);
    let mut sum = ChecksumAccum::new(mode);

    // High byte counts down the eight tokens of the current group.
    let mut flags: u32 = 0;
    'tokens: while out.len() < expected {
        flags >>= 1;
        if flags & 0x100 == 0 {
            let Some(c) = read_byte(reader)? else {
                break;
            };
            flags = u32::from(c) | 0xFF00;
        }
        if flags & 1 != 0 {
            let Some(c) = read_byte(reader)? else {
                break;
            };
            text[r] = c;
            r = (r + 1) & mask;
            sum.add(c);
            out.push(c);
        } else {
            let Some(lo) = read_byte(reader)? else {
                break;
            };
            let Some(hi) = read_byte(reader)? else {
                break;
            };
            let p = usize::from(lo) | (usize::from(hi & 0xF0) << 4);
            let len = usize::from(hi & 0x0F) + threshold;
            for k in 0..=len {
                if out.len() >= expected {
                    break 'tokens;
                }
                let c = text[(p + k) & mask];
                text[r] = c;
                r = (r + 1) & mask;
                sum.add(c);
                out.push(c);
            }
        }
    }
    Ok((out, sum.value()))
}

/// Decompress `expected` bytes of token stream from a positioned reader
///
/// Consumes exactly the input bytes the tokens occupy, leaving the reader
/// on the byte after the stream. Returns fewer than `expected` bytes only
/// when the input ends early.
pub fn decompress_from<R: Read>(
    reader: &mut R,
    expected: usize,
    config: &WindowConfig,
) -> Result<Vec<u8>> {
    let (out, _) = decode_stream(reader, expected, config, ChecksumMode::None)?;
    Ok(out)
}
