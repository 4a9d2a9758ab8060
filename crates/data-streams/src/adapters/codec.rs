//! Binary wire format for propagated pathways
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┬──────────────────────┐
//! │ chain hash (u64 LE)  │ origin ms (varint)   │ hop ms (varint)      │
//! │ 8 bytes              │ zig-zag, 1-10 bytes  │ zig-zag, 1-10 bytes  │
//! └──────────────────────┴──────────────────────┴──────────────────────┘
//! ```
//!
//! Timestamps travel at millisecond precision. Edge tags and the service are
//! not on the wire: a decoded pathway belongs to the receiving service.

use crate::domain::{from_unix_millis, unix_millis, Pathway};
use crate::error::DecodeError;

/// Header key under which an encoded pathway is propagated.
pub const PROPAGATION_KEY: &str = "dd-pathway-ctx";

/// Longest encoding of a 64-bit varint.
const MAX_VARINT_LEN64: usize = 10;

/// Encode a pathway for propagation to the next process.
pub fn encode(pathway: &Pathway) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + 2 * MAX_VARINT_LEN64);
    data.extend_from_slice(&pathway.chain_hash().to_le_bytes());
    put_varint(&mut data, unix_millis(pathway.origin_time()));
    put_varint(&mut data, unix_millis(pathway.hop_time()));
    data
}

/// Decode a propagated pathway on behalf of the local `service`.
///
/// Trailing bytes after the two timestamps are ignored.
pub fn decode(data: &[u8], service: &str) -> Result<Pathway, DecodeError> {
    if data.len() < 8 {
        return Err(DecodeError::TooShort { len: data.len() });
    }
    let mut hash = [0u8; 8];
    hash.copy_from_slice(&data[..8]);
    let chain_hash = u64::from_le_bytes(hash);

    let rest = &data[8..];
    let (origin_ms, used) = read_varint(rest, "origin time")?;
    let (hop_ms, _) = read_varint(&rest[used..], "hop time")?;

    Ok(Pathway::from_parts(
        chain_hash,
        from_unix_millis(origin_ms),
        from_unix_millis(hop_ms),
        service.to_string(),
    ))
}

/// Append a zig-zag encoded signed varint.
fn put_varint(buf: &mut Vec<u8>, x: i64) {
    let mut ux = (x as u64) << 1;
    if x < 0 {
        ux = !ux;
    }
    while ux >= 0x80 {
        buf.push((ux as u8) | 0x80);
        ux >>= 7;
    }
    buf.push(ux as u8);
}

/// Read a zig-zag encoded signed varint, returning the value and bytes used.
fn read_varint(data: &[u8], field: &'static str) -> Result<(i64, usize), DecodeError> {
    let mut ux: u64 = 0;
    let mut shift = 0u32;
    for (i, &b) in data.iter().enumerate() {
        if i == MAX_VARINT_LEN64 {
            return Err(DecodeError::VarintOverflow { field });
        }
        if b < 0x80 {
            if i == MAX_VARINT_LEN64 - 1 && b > 1 {
                return Err(DecodeError::VarintOverflow { field });
            }
            ux |= u64::from(b) << shift;
            let mut x = (ux >> 1) as i64;
            if ux & 1 != 0 {
                x = !x;
            }
            return Ok((x, i + 1));
        }
        ux |= u64::from(b & 0x7f) << shift;
        shift += 7;
    }
    Err(DecodeError::Truncated { field })
}
