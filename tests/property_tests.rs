//! Property-based tests for the asset codec layer
//!
//! These tests use randomized inputs to verify correctness across a wide
//! range of data patterns and edge cases.

use assetlz::framing::{
    read_array, read_condensed_array, write_array, write_condensed_array, FrameOptions,
};
use assetlz::window::{decode_guarded, encode_guarded};
use assetlz::{compress_bytes, decompress_bytes, ChecksumMode, WindowConfig};
use proptest::prelude::*;
use std::io::Cursor;

proptest! {
    #[test]
    fn test_window_round_trip(data in prop::collection::vec(any::<u8>(), 0..5000)) {
        let config = WindowConfig::default();
        let coded = compress_bytes(&data, &config);
        let decoded = decompress_bytes(&coded, data.len(), &config).unwrap();
        prop_assert_eq!(&data[..], &decoded[..]);
    }
}

proptest! {
    #[test]
    fn test_window_round_trip_small_windows(
        data in prop::collection::vec(any::<u8>(), 0..2000),
        window_bits in 6..13usize,
    ) {
        // Every legal window size must agree with itself.
        let config = WindowConfig::new(1 << window_bits, 18, 2, 0x20).unwrap();
        let coded = compress_bytes(&data, &config);
        let decoded = decompress_bytes(&coded, data.len(), &config).unwrap();
        prop_assert_eq!(&data[..], &decoded[..]);
    }
}

proptest! {
    #[test]
    fn test_repetitive_patterns_compress(
        pattern in prop::collection::vec(any::<u8>(), 1..24),
        repeat_count in 50..300usize,
    ) {
        let mut data = Vec::new();
        for _ in 0..repeat_count {
            data.extend_from_slice(&pattern);
        }

        let config = WindowConfig::default();
        let coded = compress_bytes(&data, &config);
        let decoded = decompress_bytes(&coded, data.len(), &config).unwrap();
        prop_assert_eq!(&data[..], &decoded[..]);
        // Periodic data past a few windows' worth must actually shrink.
        if data.len() > 2048 {
            prop_assert!(coded.len() < data.len());
        }
    }
}

proptest! {
    #[test]
    fn test_runs_longer_than_window(byte in any::<u8>(), extra in 0..200usize) {
        let config = WindowConfig::default();
        let data = vec![byte; 4096 + extra];
        let coded = compress_bytes(&data, &config);
        let decoded = decompress_bytes(&coded, data.len(), &config).unwrap();
        prop_assert_eq!(&data[..], &decoded[..]);
    }
}

proptest! {
    #[test]
    fn test_window_decoder_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..600),
        expected in 0..4096usize,
    ) {
        // Garbage is not valid token data, but it must fail or fall
        // short gracefully, never panic or read out of bounds.
        let _ = decompress_bytes(&data, expected, &WindowConfig::default());
    }
}

proptest! {
    #[test]
    fn test_matchcopy_decoder_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..600),
        expected in 0..4096usize,
    ) {
        let _ = assetlz::matchcopy::decompress_bytes(&data, expected);
    }
}

proptest! {
    #[test]
    fn test_framed_arrays_round_trip(
        values in prop::collection::vec(any::<u32>(), 0..800),
        explicit_flag in any::<bool>(),
        force_compressed in any::<bool>(),
    ) {
        let opts = FrameOptions {
            explicit_flag,
            force_compressed,
            ..FrameOptions::default()
        };
        let mut buf = Vec::new();
        write_array(&mut buf, &values, &opts).unwrap();
        let mut cursor = Cursor::new(&buf[..]);
        let back: Vec<u32> = read_array(&mut cursor, &opts).unwrap();
        prop_assert_eq!(&values[..], &back[..]);
        prop_assert_eq!(cursor.position() as usize, buf.len());
    }
}

proptest! {
    #[test]
    fn test_condensed_arrays_round_trip(
        values in prop::collection::vec(any::<i16>(), 0..600),
        make_uniform in any::<bool>(),
    ) {
        let values = if make_uniform && !values.is_empty() {
            vec![values[0]; values.len()]
        } else {
            values
        };
        let opts = FrameOptions::default();
        let mut buf = Vec::new();
        write_condensed_array(&mut buf, &values, &opts).unwrap();
        let back = read_condensed_array::<i16, _>(&mut Cursor::new(&buf), &opts).unwrap();
        prop_assert_eq!(&values[..], &back.to_vec()[..]);
    }
}

proptest! {
    #[test]
    fn test_guarded_blocks_round_trip(
        data in prop::collection::vec(any::<u8>(), 0..3000),
        signed in any::<bool>(),
        always_compressed in any::<bool>(),
    ) {
        let mode = if signed { ChecksumMode::Signed } else { ChecksumMode::Unsigned };
        let config = WindowConfig::default();
        let mut buf = Vec::new();
        encode_guarded(&mut buf, &data, mode, always_compressed, &config).unwrap();
        let out = decode_guarded(
            &mut Cursor::new(&buf),
            data.len(),
            mode,
            always_compressed,
            &config,
        ).unwrap();
        prop_assert_eq!(&data[..], &out[..]);
    }
}
