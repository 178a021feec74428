//! Variable-length natural numbers ("Nat").
//!
//! Each byte carries 7 value bits and a continuation flag in the top bit.
//! The most significant group comes first; the last byte has the flag clear.
//! Leading zero groups are accepted on decode.

use crate::cursor::ByteCursor;
use crate::{Error, Result};

/// Largest number of bytes a canonical `u64` Nat can occupy.
pub const MAX_CANONICAL_LEN: usize = 10;

/// Appends the canonical encoding of `value` to `out`.
pub fn encode(out: &mut Vec<u8>, value: u64) {
    if value < 0x80 {
        out.push(value as u8);
        return;
    }
    let len = encoded_len(value);
    for i in (0..len).rev() {
        let group = ((value >> (7 * i)) & 0x7F) as u8;
        if i == 0 {
            out.push(group);
        } else {
            out.push(0x80 | group);
        }
    }
}

/// Number of bytes [`encode`] emits for `value`.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Decodes one Nat, reading until the first byte with the top bit clear.
///
/// There is no iteration bound; an unterminated Nat fails once the cursor
/// runs out of bytes.
#[inline]
pub fn decode<C: ByteCursor + ?Sized>(cursor: &mut C) -> Result<u64> {
    decode_bounded(cursor, None)
}

/// Like [`decode`], but fails with [`Error::MalformedVarint`] after
/// `max_bytes` continuation bytes when a limit is given.
pub fn decode_bounded<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    max_bytes: Option<usize>,
) -> Result<u64> {
    let byte = cursor.read_byte()?;
    if byte & 0x80 == 0 {
        return Ok(u64::from(byte));
    }
    let mut value = u64::from(byte & 0x7F);
    let mut consumed = 1usize;
    loop {
        if max_bytes.is_some_and(|max| consumed >= max) {
            return Err(Error::MalformedVarint);
        }
        let byte = cursor.read_byte()?;
        consumed += 1;
        // Die oberen 7 Bits muessen frei sein, sonst gehen Bits verloren.
        if value >> 57 != 0 {
            return Err(Error::NatOverflow);
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
}

/// Decodes a Nat that is used as a length or index.
pub fn decode_usize<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    max_bytes: Option<usize>,
) -> Result<usize> {
    let value = decode_bounded(cursor, max_bytes)?;
    usize::try_from(value).map_err(|_| Error::NatOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::SliceCursor;

    fn round_trip(value: u64) -> u64 {
        let mut out = Vec::new();
        encode(&mut out, value);
        let mut c = SliceCursor::new(&out);
        let decoded = decode(&mut c).unwrap();
        assert_eq!(c.position() as usize, out.len(), "trailing bytes for {value}");
        decoded
    }

    #[test]
    fn single_byte_values() {
        let mut out = Vec::new();
        encode(&mut out, 0);
        encode(&mut out, 127);
        assert_eq!(out, vec![0x00, 0x7F]);
    }

    #[test]
    fn two_byte_value_is_msb_first() {
        // 128 = 0b1_0000000 -> high group 1 with continuation, low group 0
        let mut out = Vec::new();
        encode(&mut out, 128);
        assert_eq!(out, vec![0x81, 0x00]);

        let mut out = Vec::new();
        encode(&mut out, 300);
        assert_eq!(out, vec![0x82, 0x2C]);
    }

    #[test]
    fn round_trip_diverse_values() {
        for &val in &[
            0,
            1,
            63,
            127,
            128,
            255,
            16383,
            16384,
            1_000_000,
            (1u64 << 31) - 1,
            1u64 << 62,
            (1u64 << 63) - 1,
            u64::MAX,
        ] {
            assert_eq!(round_trip(val), val, "round-trip failed for {val}");
        }
    }

    #[test]
    fn continuation_bit_set_on_all_but_last() {
        for &val in &[128u64, 1 << 20, 1 << 40, 1 << 62, u64::MAX] {
            let mut out = Vec::new();
            encode(&mut out, val);
            let (last, init) = out.split_last().unwrap();
            assert!(init.iter().all(|b| b & 0x80 != 0), "{val}: {out:02X?}");
            assert_eq!(last & 0x80, 0);
            assert_eq!(out.len(), encoded_len(val));
        }
    }

    #[test]
    fn encoded_len_boundaries() {
        assert_eq!(encoded_len(0), 1);
        assert_eq!(encoded_len(127), 1);
        assert_eq!(encoded_len(128), 2);
        assert_eq!(encoded_len(u64::MAX), MAX_CANONICAL_LEN);
    }

    #[test]
    fn leading_zero_groups_are_accepted() {
        let mut c = SliceCursor::new(&[0x80, 0x80, 0x05]);
        assert_eq!(decode(&mut c).unwrap(), 5);
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn decode_stops_at_terminator() {
        let mut c = SliceCursor::new(&[0x81, 0x00, 0x7F]);
        assert_eq!(decode(&mut c).unwrap(), 128);
        assert_eq!(decode(&mut c).unwrap(), 127);
    }

    #[test]
    fn unterminated_is_truncated() {
        let mut c = SliceCursor::new(&[]);
        assert_eq!(decode(&mut c).unwrap_err(), Error::TruncatedInput);

        let mut c = SliceCursor::new(&[0xFF, 0xFF, 0x80]);
        assert_eq!(decode(&mut c).unwrap_err(), Error::TruncatedInput);
    }

    #[test]
    fn bounded_decode_rejects_long_runs() {
        let data = [0x80u8; 16];
        let mut c = SliceCursor::new(&data);
        assert_eq!(decode_bounded(&mut c, Some(4)).unwrap_err(), Error::MalformedVarint);
        assert_eq!(c.position(), 4);

        let mut c = SliceCursor::new(&[0x81, 0x00]);
        assert_eq!(decode_bounded(&mut c, Some(2)).unwrap(), 128);
    }

    #[test]
    fn overflowing_value_is_rejected() {
        let mut data = vec![0xFF; 10];
        data.push(0x7F);
        let mut c = SliceCursor::new(&data);
        assert_eq!(decode(&mut c).unwrap_err(), Error::NatOverflow);
    }
}
