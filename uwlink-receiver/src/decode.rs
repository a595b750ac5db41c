use uwlink_wire::{crc32_samples, delta::delta_decode, samples::unpack_24bit_samples, BlockHeader, WireError};

use crate::config::ReceiverLimits;
use crate::error::ReceiverError;
use crate::observer::DecodedBlock;

/// Decodes one assembled block's bytes, choosing Raw vs Compressed by
/// comparing the assembled size against `limits.block_size_bound`.
///
/// The Raw path is not CRC-checked; only the Compressed path validates
/// the header's `crc32` field. This asymmetry is inherited deliberately
/// (see the design notes on Raw-path CRC) rather than silently added.
pub fn decode_block(bytes: &[u8], limits: &ReceiverLimits) -> Result<DecodedBlock, ReceiverError> {
    if bytes.len() < limits.block_header_len {
        return Err(WireError::ShortFrame {
            need: limits.block_header_len,
            got: bytes.len(),
        }
        .into());
    }

    let mut cursor = &bytes[..];
    let header = BlockHeader::decode(&mut cursor)?;
    let payload = &bytes[limits.block_header_len..];

    if bytes.len() < limits.block_size_bound {
        decode_compressed(header, payload)
    } else {
        decode_raw(header, payload, limits)
    }
}

fn decode_raw(
    header: BlockHeader,
    payload: &[u8],
    limits: &ReceiverLimits,
) -> Result<DecodedBlock, ReceiverError> {
    if payload.len() < limits.raw_payload_len {
        return Err(WireError::ShortFrame {
            need: limits.raw_payload_len,
            got: payload.len(),
        }
        .into());
    }
    let samples = unpack_24bit_samples(payload)?;
    Ok(DecodedBlock {
        header,
        samples,
        was_compressed: false,
    })
}

fn decode_compressed(header: BlockHeader, payload: &[u8]) -> Result<DecodedBlock, ReceiverError> {
    let samples = delta_decode(payload)?;
    let computed = crc32_samples(&samples);
    if computed != header.crc32 {
        return Err(WireError::CrcMismatch {
            expected: header.crc32,
            computed,
        }
        .into());
    }
    Ok(DecodedBlock {
        header,
        samples,
        was_compressed: true,
    })
}
