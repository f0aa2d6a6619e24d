//! Array compression framing
//!
//! Format schemas store bulk numeric fields as counted arrays whose
//! payload is either raw or compressed, decided per field by a size
//! threshold or, in newer protocol versions, an explicit flag byte. This
//! module owns that envelope: the count, the raw-vs-codec decision, the
//! dispatch into the negotiated codec family, and the condensed variant
//! that collapses all-identical arrays to a single element.

use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;

use crate::common::{AssetLzError, CodecFamily, Result, WindowConfig, SIZE_THRESHOLD};
use crate::{matchcopy, window};

/// Per-field framing parameters supplied by the format schema
///
/// The codec family and the flag-byte presence follow the schema's
/// version rules; the size threshold and force flag are per call site.
#[derive(Debug, Clone, Copy)]
pub struct FrameOptions {
    /// Codec family negotiated for this field
    pub family: CodecFamily,
    /// Window codec configuration (both directions)
    pub window: WindowConfig,
    /// Payloads below this many bytes are stored raw
    pub size_threshold: usize,
    /// Compress regardless of the size threshold
    pub force_compressed: bool,
    /// The protocol version writes a flag byte ahead of the payload
    pub explicit_flag: bool,
}

impl FrameOptions {
    /// Options for the given family, defaults otherwise
    pub fn family(family: CodecFamily) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            family: CodecFamily::Window,
            window: WindowConfig::default(),
            size_threshold: SIZE_THRESHOLD,
            force_compressed: false,
            explicit_flag: false,
        }
    }
}

/// Fixed-size little-endian element codec
///
/// Implemented for the numeric types asset fields are built from. `SIZE`
/// is the wire size; arrays declare their byte length as
/// `count * SIZE` and the framing layer enforces it exactly.
pub trait Element: Sized + Clone + PartialEq {
    /// Encoded size in bytes
    const SIZE: usize;
    /// Decode one element from a little-endian slice of `SIZE` bytes
    fn get(buf: &[u8]) -> Self;
    /// Append the little-endian encoding of `self`
    fn put(&self, out: &mut Vec<u8>);
}

impl Element for u8 {
    const SIZE: usize = 1;
    fn get(buf: &[u8]) -> Self {
        buf[0]
    }
    fn put(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }
}

impl Element for i8 {
    const SIZE: usize = 1;
    fn get(buf: &[u8]) -> Self {
        buf[0] as i8
    }
    fn put(&self, out: &mut Vec<u8>) {
        out.push(*self as u8);
    }
}

macro_rules! impl_element {
    ($($ty:ty, $size:expr, $read:ident, $write:ident;)*) => {
        $(impl Element for $ty {
            const SIZE: usize = $size;
            fn get(buf: &[u8]) -> Self {
                LittleEndian::$read(buf)
            }
            fn put(&self, out: &mut Vec<u8>) {
                let mut tmp = [0u8; $size];
                LittleEndian::$write(&mut tmp, *self);
                out.extend_from_slice(&tmp);
            }
        })*
    };
}

impl_element! {
    u16, 2, read_u16, write_u16;
    i16, 2, read_i16, write_i16;
    u32, 4, read_u32, write_u32;
    i32, 4, read_i32, write_i32;
    u64, 8, read_u64, write_u64;
    i64, 8, read_i64, write_i64;
    f32, 4, read_f32, write_f32;
}

/// Decode a payload of known size from a positioned cursor
///
/// Reads the flag byte when the protocol version has one, otherwise
/// applies the size-threshold rule, then reads raw bytes or runs the
/// negotiated decoder. The decoded length must equal `expected` exactly.
pub fn decode_known_size<R: Read>(
    reader: &mut R,
    expected: usize,
    opts: &FrameOptions,
) -> Result<Vec<u8>> {
    let compressed = read_compressed_flag(reader, expected, opts)?;
    let payload = decode_payload(reader, expected, compressed, opts)?;
    ensure_size(expected, payload.len())?;
    Ok(payload)
}

/// Read one counted array
pub fn read_array<T: Element, R: Read>(reader: &mut R, opts: &FrameOptions) -> Result<Vec<T>> {
    let count = read_count(reader)?;
    let expected = payload_size(count, T::SIZE)?;
    let payload = decode_known_size(reader, expected, opts)?;
    Ok(decode_elements(&payload, count))
}

/// Write one counted array
///
/// Compresses with the window codec when the payload reaches the size
/// threshold or compression is forced; the match-copy family has no
/// encoder, so a compressed write under it fails rather than producing a
/// stream the negotiated reader could not decode.
pub fn write_array<T: Element, W: Write>(
    writer: &mut W,
    values: &[T],
    opts: &FrameOptions,
) -> Result<()> {
    writer.write_i32::<LittleEndian>(count_as_i32(values.len())?)?;
    let mut payload = Vec::with_capacity(values.len() * T::SIZE);
    for value in values {
        value.put(&mut payload);
    }
    write_payload(writer, &payload, opts)
}

/// Read representation of a condensed array
///
/// The fill form stands for `count` logical copies of one value without
/// materializing them.
#[derive(Debug, Clone, PartialEq)]
pub enum CondensedArray<T> {
    /// Every element equals `value`
    Fill {
        /// Logical element count
        count: usize,
        /// The single stored value
        value: T,
    },
    /// Elements differ; stored as a full array envelope
    Values(Vec<T>),
}

impl<T: Clone> CondensedArray<T> {
    /// Logical element count
    pub fn len(&self) -> usize {
        match self {
            CondensedArray::Fill { count, .. } => *count,
            CondensedArray::Values(values) => values.len(),
        }
    }

    /// True when the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index`, if in range
    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            CondensedArray::Fill { count, value } => (index < *count).then(|| value.clone()),
            CondensedArray::Values(values) => values.get(index).cloned(),
        }
    }

    /// Iterate the logical elements
    pub fn iter(&self) -> Box<dyn Iterator<Item = T> + '_> {
        match self {
            CondensedArray::Fill { count, value } => {
                Box::new(std::iter::repeat(value.clone()).take(*count))
            }
            CondensedArray::Values(values) => Box::new(values.iter().cloned()),
        }
    }

    /// Materialize the logical elements
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            CondensedArray::Fill { count, value } => vec![value.clone(); *count],
            CondensedArray::Values(values) => values.clone(),
        }
    }
}

/// Write an array in the condensed envelope
///
/// All-identical arrays shrink to `(count, fill, one element)`; anything
/// else is the outer count, a cleared fill byte, and a complete array
/// envelope.
pub fn write_condensed_array<T: Element, W: Write>(
    writer: &mut W,
    values: &[T],
    opts: &FrameOptions,
) -> Result<()> {
    writer.write_i32::<LittleEndian>(count_as_i32(values.len())?)?;
    let uniform = values
        .split_first()
        .is_some_and(|(first, rest)| rest.iter().all(|v| v == first));
    writer.write_u8(u8::from(uniform))?;
    if uniform {
        let mut one = Vec::with_capacity(T::SIZE);
        values[0].put(&mut one);
        writer.write_all(&one)?;
    } else {
        write_array(writer, values, opts)?;
    }
    Ok(())
}

/// Read a condensed-envelope array
pub fn read_condensed_array<T: Element, R: Read>(
    reader: &mut R,
    opts: &FrameOptions,
) -> Result<CondensedArray<T>> {
    let count = read_count(reader)?;
    let fill = reader.read_u8().map_err(AssetLzError::from_read)? != 0;
    if fill {
        let mut one = vec![0u8; T::SIZE];
        reader.read_exact(&mut one).map_err(AssetLzError::from_read)?;
        Ok(CondensedArray::Fill {
            count,
            value: T::get(&one),
        })
    } else {
        let values: Vec<T> = read_array(reader, opts)?;
        if values.len() != count {
            return Err(AssetLzError::SizeMismatch {
                expected: payload_size(count, T::SIZE)?,
                actual: values.len() * T::SIZE,
            });
        }
        Ok(CondensedArray::Values(values))
    }
}

// Envelope plumbing shared with the tracked-array module.

pub(crate) fn read_count<R: Read>(reader: &mut R) -> Result<usize> {
    let count = reader
        .read_i32::<LittleEndian>()
        .map_err(AssetLzError::from_read)?;
    if count < 0 {
        return Err(AssetLzError::NegativeCount(count));
    }
    Ok(count as usize)
}

pub(crate) fn count_as_i32(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        AssetLzError::InvalidConfig(format!("array of {len} elements exceeds the i32 count field"))
    })
}

pub(crate) fn payload_size(count: usize, element_size: usize) -> Result<usize> {
    if element_size == 0 {
        return Err(AssetLzError::UnsupportedElementSize(0));
    }
    count.checked_mul(element_size).ok_or_else(|| {
        AssetLzError::InvalidConfig(format!(
            "array of {count} x {element_size}-byte elements overflows"
        ))
    })
}

pub(crate) fn read_compressed_flag<R: Read>(
    reader: &mut R,
    expected: usize,
    opts: &FrameOptions,
) -> Result<bool> {
    if opts.explicit_flag {
        Ok(reader.read_u8().map_err(AssetLzError::from_read)? != 0)
    } else {
        Ok(opts.force_compressed || expected >= opts.size_threshold)
    }
}

pub(crate) fn decode_payload<R: Read>(
    reader: &mut R,
    expected: usize,
    compressed: bool,
    opts: &FrameOptions,
) -> Result<Vec<u8>> {
    if !compressed {
        debug!("raw field: {expected} bytes");
        let mut buf = vec![0u8; expected];
        reader.read_exact(&mut buf).map_err(AssetLzError::from_read)?;
        return Ok(buf);
    }
    debug!("compressed field via {:?}: {expected} bytes expected", opts.family);
    match opts.family {
        CodecFamily::Window => window::decompress_from(reader, expected, &opts.window),
        CodecFamily::MatchCopy => {
            let mut out = vec![0u8; expected];
            matchcopy::decompress_into(reader, &mut out)?;
            Ok(out)
        }
    }
}

pub(crate) fn write_payload<W: Write>(
    writer: &mut W,
    payload: &[u8],
    opts: &FrameOptions,
) -> Result<()> {
    let compressed = opts.force_compressed || payload.len() >= opts.size_threshold;
    if opts.explicit_flag {
        writer.write_u8(u8::from(compressed))?;
    }
    if compressed {
        if opts.family == CodecFamily::MatchCopy {
            return Err(AssetLzError::ExternalEncoder);
        }
        writer.write_all(&window::compress_bytes(payload, &opts.window))?;
    } else {
        writer.write_all(payload)?;
    }
    Ok(())
}

pub(crate) fn decode_elements<T: Element>(payload: &[u8], count: usize) -> Vec<T> {
    payload
        .chunks_exact(T::SIZE)
        .take(count)
        .map(T::get)
        .collect()
}

pub(crate) fn ensure_size(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(AssetLzError::SizeMismatch { expected, actual });
    }
    Ok(())
}
