//! LZW conformance tests.
//!
//! Every stream is decoded with `weezl`, an independent GIF-compatible LZW
//! implementation, and compared against the input indices.

use animgif::compress::lzw::{lzw_compress, min_code_size, LzwEncoder, MAX_TABLE_SIZE};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use weezl::{decode::Decoder, BitOrder};

fn weezl_decode(bytes: &[u8], min_code_size: u8) -> Vec<u8> {
    Decoder::new(BitOrder::Lsb, min_code_size)
        .decode(bytes)
        .expect("weezl rejected the stream")
}

fn assert_roundtrip(indices: &[u8], color_count: usize) {
    let out = lzw_compress(indices, color_count);
    assert_eq!(out.min_code_size, min_code_size(color_count));
    let decoded = weezl_decode(&out.bytes, out.min_code_size);
    assert_eq!(decoded.len(), indices.len());
    assert_eq!(decoded, indices);
}

/// Seeded random indices in `0..colors`.
fn random_indices(seed: u64, len: usize, colors: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..colors) as u8).collect()
}

#[test]
fn test_single_pixel_stream() {
    let out = lzw_compress(&[0], 256);
    assert_eq!(out.bytes, vec![0x00, 0x01, 0x04, 0x04]);
    assert_eq!(weezl_decode(&out.bytes, 8), vec![0]);
}

#[test]
fn test_empty_stream() {
    let out = lzw_compress(&[], 256);
    assert_eq!(out.stats.codes_emitted, 2);
    assert!(weezl_decode(&out.bytes, 8).is_empty());
}

#[test]
fn test_solid_runs() {
    for len in [1usize, 2, 3, 10, 1000, 100_000] {
        assert_roundtrip(&vec![7u8; len], 256);
    }
}

#[test]
fn test_gradient_rows() {
    let indices: Vec<u8> = (0..64 * 64).map(|i| ((i % 64) * 4) as u8).collect();
    assert_roundtrip(&indices, 256);
}

#[test]
fn test_every_min_code_size() {
    for color_count in [1usize, 2, 3, 4, 5, 8, 16, 17, 64, 128, 129, 256] {
        let indices = random_indices(color_count as u64, 5000, color_count);
        assert_roundtrip(&indices, color_count);
    }
}

#[test]
fn test_noise_forces_clear_codes() {
    let indices = random_indices(0xC0FFEE, 200_000, 256);
    let out = lzw_compress(&indices, 256);
    assert!(
        out.stats.clear_codes >= 2,
        "expected a mid-stream clear, got {:?}",
        out.stats
    );
    assert_eq!(weezl_decode(&out.bytes, 8), indices);
}

#[test]
fn test_table_fill_boundary() {
    // Random pairs are mostly fresh, so these land around the point the table fills.
    let entries = (MAX_TABLE_SIZE - 258) as usize;
    for extra in [0usize, 1, 2, 3] {
        let indices = random_indices(extra as u64 + 10, entries + extra + 1, 256);
        assert_roundtrip(&indices, 256);
    }
}

#[test]
fn test_incremental_matches_one_shot() {
    let indices = random_indices(5, 30_000, 40);
    let mut encoder = LzwEncoder::new(40);
    for chunk in indices.chunks(777) {
        encoder.extend(chunk.iter().copied());
    }
    assert_eq!(encoder.finish(), lzw_compress(&indices, 40));
}

#[test]
fn test_code_size_never_exceeds_twelve() {
    let mut encoder = LzwEncoder::new(256);
    let mut rng = StdRng::seed_from_u64(77);
    for _ in 0..50_000 {
        encoder.push(rng.gen());
        assert!(encoder.code_size() <= 12);
        assert!(encoder.code_size() >= 9);
    }
}

proptest! {
    #[test]
    fn prop_roundtrip_full_palette(indices in prop::collection::vec(any::<u8>(), 0..4000)) {
        let out = lzw_compress(&indices, 256);
        prop_assert_eq!(weezl_decode(&out.bytes, out.min_code_size), indices);
    }

    #[test]
    fn prop_roundtrip_small_palette(
        (color_count, indices) in (1usize..=256).prop_flat_map(|n| {
            (Just(n), prop::collection::vec(0..n as u16, 0..3000))
        })
    ) {
        let indices: Vec<u8> = indices.into_iter().map(|i| i as u8).collect();
        let out = lzw_compress(&indices, color_count);
        prop_assert_eq!(weezl_decode(&out.bytes, out.min_code_size), indices);
    }
}
