use crate::error::WireError;
use crate::{R, S};

/// Unpacks `R` bytes of little-endian 24-bit signed samples into `S`
/// sign-extended 32-bit values.
pub fn unpack_24bit_samples(bytes: &[u8]) -> Result<Vec<i32>, WireError> {
    if bytes.len() < R {
        return Err(WireError::ShortFrame {
            need: R,
            got: bytes.len(),
        });
    }
    let mut out = Vec::with_capacity(S);
    for chunk in bytes[..R].chunks_exact(3) {
        let raw = (chunk[0] as u32) | ((chunk[1] as u32) << 8) | ((chunk[2] as u32) << 16);
        let sign_extended = if raw & 0x0080_0000 != 0 {
            raw | 0xff00_0000
        } else {
            raw
        };
        out.push(sign_extended as i32);
    }
    Ok(out)
}

/// Packs `S` samples into `R` bytes, little-endian, keeping only the low
/// 24 bits of each sample (callers are expected to pass already-sign-
/// extended values).
pub fn pack_24bit_samples(samples: &[i32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * 3);
    for &sample in samples {
        let raw = sample as u32;
        out.push((raw & 0xff) as u8);
        out.push(((raw >> 8) & 0xff) as u8);
        out.push(((raw >> 16) & 0xff) as u8);
    }
    out
}
