//! Checksum-guarded legacy block decode
//!
//! Older asset blocks carry their own trailing integrity value instead of
//! relying on container-level validation: the token stream (or, for small
//! blocks, the raw bytes) is followed by a 4-byte little-endian signed
//! sum of every emitted byte. Two block conventions exist and disagree on
//! byte signedness; the caller states which one its format uses. Blocks
//! under the size threshold are stored raw, except in contexts where
//! compression is mandatory regardless of size.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::trace;

use super::compress_bytes;
use super::decoder::{decode_stream, ChecksumAccum};
use crate::common::{AssetLzError, ChecksumMode, Result, WindowConfig, SIZE_THRESHOLD};

/// Decode one guarded block and verify its trailing checksum
///
/// Reads the block payload (raw when `expected` is under the size
/// threshold and `always_compressed` is not set) followed by the 4-byte
/// trailing value, and fails with [`AssetLzError::ChecksumMismatch`] if
/// the accumulated sum disagrees. With [`ChecksumMode::None`] the
/// trailing value is still consumed but not compared.
pub fn decode_guarded<R: Read>(
    reader: &mut R,
    expected: usize,
    mode: ChecksumMode,
    always_compressed: bool,
    config: &WindowConfig,
) -> Result<Vec<u8>> {
    let compressed = always_compressed || expected >= SIZE_THRESHOLD;
    let (out, computed) = if compressed {
        decode_stream(reader, expected, config, mode)?
    } else {
        let mut buf = vec![0u8; expected];
        reader.read_exact(&mut buf).map_err(AssetLzError::from_read)?;
        let mut sum = ChecksumAccum::new(mode);
        for &b in &buf {
            sum.add(b);
        }
        let value = sum.value();
        (buf, value)
    };
    if out.len() != expected {
        return Err(AssetLzError::SizeMismatch {
            expected,
            actual: out.len(),
        });
    }

    let stored = reader
        .read_i32::<LittleEndian>()
        .map_err(AssetLzError::from_read)?;
    trace!(
        "guarded block: {} bytes, stored sum {:08X}, computed {:08X}",
        expected,
        stored,
        computed
    );
    if mode != ChecksumMode::None && stored != computed {
        return Err(AssetLzError::ChecksumMismatch { stored, computed });
    }
    Ok(out)
}

/// Encode one guarded block with its trailing checksum
///
/// Mirror of [`decode_guarded`] for rewrite paths: compresses when the
/// data reaches the size threshold or the context mandates it, stores raw
/// otherwise, then appends the sum of the data bytes under `mode`.
pub fn encode_guarded<W: Write>(
    writer: &mut W,
    data: &[u8],
    mode: ChecksumMode,
    always_compressed: bool,
    config: &WindowConfig,
) -> Result<()> {
    let mut sum = ChecksumAccum::new(mode);
    for &b in data {
        sum.add(b);
    }
    if always_compressed || data.len() >= SIZE_THRESHOLD {
        writer.write_all(&compress_bytes(data, config))?;
    } else {
        writer.write_all(data)?;
    }
    writer.write_i32::<LittleEndian>(sum.value())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(data: &[u8], mode: ChecksumMode, always: bool) -> Vec<u8> {
        let mut out = Vec::new();
        encode_guarded(&mut out, data, mode, always, &WindowConfig::default()).unwrap();
        out
    }

    #[test]
    fn test_small_block_stored_raw() {
        let data = b"raw little block";
        let coded = block(data, ChecksumMode::Unsigned, false);
        // Payload bytes verbatim plus the trailing sum
        assert_eq!(&coded[..data.len()], data);
        assert_eq!(coded.len(), data.len() + 4);

        let out = decode_guarded(
            &mut io::Cursor::new(&coded),
            data.len(),
            ChecksumMode::Unsigned,
            false,
            &WindowConfig::default(),
        )
        .unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_mandatory_compression_context() {
        // The always-compressed context token-encodes even tiny blocks.
        let data = b"ababababababababababab";
        let coded = block(data, ChecksumMode::Signed, true);
        assert_ne!(&coded[..data.len().min(coded.len())], &data[..]);

        let out = decode_guarded(
            &mut io::Cursor::new(&coded),
            data.len(),
            ChecksumMode::Signed,
            true,
            &WindowConfig::default(),
        )
        .unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_signedness_changes_the_sum() {
        let data = [0x90u8; 8];
        let signed = block(&data, ChecksumMode::Signed, false);
        let unsigned = block(&data, ChecksumMode::Unsigned, false);
        assert_ne!(
            signed[signed.len() - 4..],
            unsigned[unsigned.len() - 4..],
            "high-bit bytes must sum differently per mode"
        );

        // Decoding with the wrong convention is a checksum failure, not
        // silent success.
        let err = decode_guarded(
            &mut io::Cursor::new(&signed),
            data.len(),
            ChecksumMode::Unsigned,
            false,
            &WindowConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AssetLzError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_corrupt_payload_detected() {
        let data: Vec<u8> = (0..2000u32).map(|i| (i % 251) as u8).collect();
        let coded = block(&data, ChecksumMode::Unsigned, false);
        assert!(data.len() >= SIZE_THRESHOLD, "block must take the token path");

        let mut corrupt = coded.clone();
        let mid = corrupt.len() / 2;
        corrupt[mid] ^= 0x40;
        let err = decode_guarded(
            &mut io::Cursor::new(&corrupt),
            data.len(),
            ChecksumMode::Unsigned,
            false,
            &WindowConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AssetLzError::ChecksumMismatch { .. } | AssetLzError::SizeMismatch { .. }
        ));
    }

    #[test]
    fn test_truncated_block() {
        let data = b"short";
        let coded = block(data, ChecksumMode::Unsigned, false);
        let err = decode_guarded(
            &mut io::Cursor::new(&coded[..coded.len() - 2]),
            data.len(),
            ChecksumMode::Unsigned,
            false,
            &WindowConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AssetLzError::TruncatedInput));
    }
}
