use crc32fast::Hasher;

use crate::samples::pack_24bit_samples;

/// CRC-32 (IEEE 802.3, reflected, poly 0xEDB88320) over a raw byte slice.
pub fn crc32_bytes(bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

/// CRC-32 over a sample array, computed as if the samples had been packed
/// into their 24-bit little-endian wire form first. Equal to
/// `crc32_bytes(&pack_24bit_samples(samples))` for any input.
pub fn crc32_samples(samples: &[i32]) -> u32 {
    crc32_bytes(&pack_24bit_samples(samples))
}
