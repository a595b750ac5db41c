use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::WireError;
use crate::S;

/// Decompresses and delta-decodes a Compressed-mode block payload into `S`
/// reconstructed samples.
///
/// The decompressed stream must be exactly `2 * S` bytes (S little-endian
/// `i16` first-differences). Reconstruction is a running sum from a zero
/// seed; the result is neither re-sign-extended nor clamped back into the
/// 24-bit range, so values outside `[-2^23, 2^23)` are possible and
/// expected for large cumulative drift.
pub fn delta_decode(compressed_bytes: &[u8]) -> Result<Vec<i32>, WireError> {
    let mut decoder = DeflateDecoder::new(compressed_bytes);
    let mut raw = Vec::with_capacity(S * 2);
    decoder
        .read_to_end(&mut raw)
        .map_err(|e| WireError::Decompress(e.to_string()))?;

    if raw.len() != S * 2 {
        return Err(WireError::SizeMismatch {
            expected: S * 2,
            got: raw.len(),
        });
    }

    let mut samples = Vec::with_capacity(S);
    let mut running: i32 = 0;
    for chunk in raw.chunks_exact(2) {
        let delta = i16::from_le_bytes([chunk[0], chunk[1]]) as i32;
        running += delta;
        samples.push(running);
    }
    Ok(samples)
}

/// Delta-encodes `samples` as `S` little-endian `i16` first-differences,
/// then DEFLATE-compresses the result. Inverse of [`delta_decode`] for
/// samples whose successive differences fit in `i16`.
pub fn delta_encode(samples: &[i32]) -> Result<Vec<u8>, WireError> {
    let mut raw = Vec::with_capacity(samples.len() * 2);
    let mut prev: i32 = 0;
    for &sample in samples {
        let delta = (sample - prev) as i16;
        raw.extend_from_slice(&delta.to_le_bytes());
        prev = sample;
    }

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&raw)
        .map_err(|e| WireError::Decompress(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| WireError::Decompress(e.to_string()))
}
