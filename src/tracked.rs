//! Round-trip byte cache for rewritten arrays
//!
//! The external encoder that produced an asset's compressed payloads is
//! not canonical, so re-encoding a field the tool never touched could
//! change its bytes. A tracked array keeps the original payload alongside
//! the decoded values; a rewrite replays those bytes verbatim, and any
//! mutation of the values drops them, forcing a real re-encode.

use std::io::{Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::common::Result;
use crate::framing::{
    count_as_i32, decode_elements, decode_payload, ensure_size, payload_size, read_compressed_flag,
    read_count, write_array, Element, FrameOptions,
};

/// Original payload bytes of a decoded field
#[derive(Debug, Clone)]
pub(crate) struct RawFrame {
    pub compressed: bool,
    pub bytes: Vec<u8>,
}

/// Decoded array values paired with their original compressed bytes
///
/// Holding the original bytes and mutating the values are mutually
/// exclusive: [`values_mut`](TrackedArray::values_mut) clears the cache.
#[derive(Debug, Clone)]
pub struct TrackedArray<T> {
    values: Vec<T>,
    raw: Option<RawFrame>,
}

impl<T> TrackedArray<T> {
    /// Wrap freshly built values with no original bytes
    pub fn new(values: Vec<T>) -> Self {
        Self { values, raw: None }
    }

    pub(crate) fn from_decoded(values: Vec<T>, raw: RawFrame) -> Self {
        Self {
            values,
            raw: Some(raw),
        }
    }

    /// Shared view of the decoded values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable access; drops the original bytes
    pub fn values_mut(&mut self) -> &mut Vec<T> {
        self.raw = None;
        &mut self.values
    }

    /// Consume into the decoded values
    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Element count
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True while a rewrite would replay the original bytes
    pub fn has_original_bytes(&self) -> bool {
        self.raw.is_some()
    }
}

/// `Read` adapter that remembers every byte handed out
#[derive(Debug)]
struct RecordingReader<'a, R> {
    inner: &'a mut R,
    seen: Vec<u8>,
}

impl<R: Read> Read for RecordingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.seen.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// Read a counted array, retaining the payload bytes for rewrite
pub fn read_array_tracked<T: Element, R: Read>(
    reader: &mut R,
    opts: &FrameOptions,
) -> Result<TrackedArray<T>> {
    let count = read_count(reader)?;
    let expected = payload_size(count, T::SIZE)?;
    let compressed = read_compressed_flag(reader, expected, opts)?;
    let mut recorder = RecordingReader {
        inner: reader,
        seen: Vec::new(),
    };
    let payload = decode_payload(&mut recorder, expected, compressed, opts)?;
    ensure_size(expected, payload.len())?;
    let values = decode_elements(&payload, count);
    Ok(TrackedArray::from_decoded(
        values,
        RawFrame {
            compressed,
            bytes: recorder.seen,
        },
    ))
}

/// Write a tracked array, replaying original bytes when still intact
pub fn write_array_tracked<T: Element, W: Write>(
    writer: &mut W,
    tracked: &TrackedArray<T>,
    opts: &FrameOptions,
) -> Result<()> {
    match &tracked.raw {
        Some(frame) => {
            writer.write_i32::<LittleEndian>(count_as_i32(tracked.len())?)?;
            if opts.explicit_flag {
                writer.write_u8(u8::from(frame.compressed))?;
            }
            writer.write_all(&frame.bytes)?;
            Ok(())
        }
        None => write_array(writer, tracked.values(), opts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::read_array;
    use std::io::Cursor;

    fn frame(values: &[u32], opts: &FrameOptions) -> Vec<u8> {
        let mut buf = Vec::new();
        write_array(&mut buf, values, opts).unwrap();
        buf
    }

    #[test]
    fn test_rewrite_replays_original_bytes() {
        let opts = FrameOptions::default();
        let values: Vec<u32> = (0..600).map(|i| i % 7).collect();
        let original = frame(&values, &opts);

        let tracked: TrackedArray<u32> =
            read_array_tracked(&mut Cursor::new(&original), &opts).unwrap();
        assert!(tracked.has_original_bytes());
        assert_eq!(tracked.values(), &values[..]);

        let mut rewritten = Vec::new();
        write_array_tracked(&mut rewritten, &tracked, &opts).unwrap();
        assert_eq!(rewritten, original);
    }

    #[test]
    fn test_replay_survives_noncanonical_bytes() {
        // A payload the in-repo encoder would never emit: literals only,
        // no matches. The tracked rewrite must still be byte-exact.
        let opts = FrameOptions {
            force_compressed: true,
            ..FrameOptions::default()
        };
        let values = [5u32, 5, 5];
        let mut payload = Vec::new();
        for v in &values {
            v.put(&mut payload);
        }
        let mut original = Vec::new();
        original.write_i32::<LittleEndian>(3).unwrap();
        for chunk in payload.chunks(8) {
            original.push(0xFF);
            original.extend_from_slice(chunk);
        }

        let tracked: TrackedArray<u32> =
            read_array_tracked(&mut Cursor::new(&original), &opts).unwrap();
        assert_eq!(tracked.values(), &values[..]);

        let mut rewritten = Vec::new();
        write_array_tracked(&mut rewritten, &tracked, &opts).unwrap();
        assert_eq!(rewritten, original);

        // The encoder would have used matches, so a plain write differs.
        let mut reencoded = Vec::new();
        write_array(&mut reencoded, &values, &opts).unwrap();
        assert_ne!(reencoded, original);
    }

    #[test]
    fn test_mutation_clears_cache() {
        let opts = FrameOptions::default();
        let values: Vec<u32> = (0..600).collect();
        let original = frame(&values, &opts);

        let mut tracked: TrackedArray<u32> =
            read_array_tracked(&mut Cursor::new(&original), &opts).unwrap();
        tracked.values_mut()[0] = 999;
        assert!(!tracked.has_original_bytes());

        let mut rewritten = Vec::new();
        write_array_tracked(&mut rewritten, &tracked, &opts).unwrap();
        let back: Vec<u32> = read_array(&mut Cursor::new(&rewritten), &opts).unwrap();
        assert_eq!(back[0], 999);
        assert_eq!(&back[1..], &values[1..]);
    }

    #[test]
    fn test_untracked_array_writes_normally() {
        let opts = FrameOptions::default();
        let tracked = TrackedArray::new(vec![1u32, 2, 3]);
        assert!(!tracked.has_original_bytes());

        let mut out = Vec::new();
        write_array_tracked(&mut out, &tracked, &opts).unwrap();
        assert_eq!(out, frame(&[1, 2, 3], &opts));
    }
}
