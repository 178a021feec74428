//! Header-only pass that maps entry index to byte offset.
//!
//! Only the universal `tag length` prefix of each entry is read; payloads are
//! skipped by seeking. The resulting table is what makes random access by
//! index possible for the resolver.

use log::debug;

use crate::cursor::ByteCursor;
use crate::nat;
use crate::tag::Tag;
use crate::Result;

/// Start offset of every entry, in index order.
///
/// The tag byte read while skipping is kept as well so that entries which
/// never get decoded can still be reported by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexTable {
    offsets: Vec<u64>,
    tags: Vec<Tag>,
}

impl IndexTable {
    /// Scans the entry region starting at the cursor's position.
    ///
    /// The cursor is left after the last entry; callers reposition it before
    /// resolving.
    pub fn build<C: ByteCursor + ?Sized>(cursor: &mut C) -> Result<Self> {
        Self::build_bounded(cursor, None)
    }

    /// Like [`IndexTable::build`], with an optional byte limit per Nat.
    pub fn build_bounded<C: ByteCursor + ?Sized>(
        cursor: &mut C,
        max_nat_bytes: Option<usize>,
    ) -> Result<Self> {
        let count = nat::decode_usize(cursor, max_nat_bytes)?;
        // Jeder Eintrag braucht mindestens 2 Bytes (Tag + Laenge).
        let remaining = cursor.len().saturating_sub(cursor.position()) as usize;
        let capacity = count.min(remaining / 2);
        let mut offsets = Vec::with_capacity(capacity);
        let mut tags = Vec::with_capacity(capacity);
        for _ in 0..count {
            offsets.push(cursor.position());
            tags.push(Tag(cursor.read_byte()?));
            let len = nat::decode_bounded(cursor, max_nat_bytes)?;
            cursor.skip(len)?;
        }
        debug!("index table: {} entries, region ends at {}", offsets.len(), cursor.position());
        Ok(Self { offsets, tags })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offset of the tag byte of entry `index`.
    pub fn offset(&self, index: usize) -> Option<u64> {
        self.offsets.get(index).copied()
    }

    /// Tag byte seen at the start of entry `index`.
    pub fn tag(&self, index: usize) -> Option<Tag> {
        self.tags.get(index).copied()
    }

    /// All offsets in index order.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::SliceCursor;
    use crate::Error;

    #[test]
    fn offsets_follow_declared_lengths() {
        // count=3; (1, len 2, "ab") (9, len 0) (4, len 1, 0x00)
        let data = [3, 1, 2, b'a', b'b', 9, 0, 4, 1, 0];
        let mut c = SliceCursor::new(&data);
        let ix = IndexTable::build(&mut c).unwrap();
        assert_eq!(ix.len(), 3);
        assert_eq!(ix.offsets(), &[1, 5, 7]);
        assert_eq!(ix.tag(1), Some(Tag(9)));
        assert_eq!(c.position(), data.len() as u64);
    }

    #[test]
    fn first_offset_follows_count_nat() {
        // count = 128 needs two bytes; only check the first offset
        let mut data = vec![0x81, 0x00];
        for _ in 0..128 {
            data.extend_from_slice(&[11, 0]);
        }
        let mut c = SliceCursor::new(&data);
        let ix = IndexTable::build(&mut c).unwrap();
        assert_eq!(ix.len(), 128);
        assert_eq!(ix.offset(0), Some(2));
        assert_eq!(ix.offset(127), Some(2 + 127 * 2));
        assert_eq!(ix.offset(128), None);
    }

    #[test]
    fn offsets_are_non_decreasing() {
        let data = [4, 11, 0, 1, 1, b'x', 12, 0, 2, 3, b'a', b'b', b'c'];
        let mut c = SliceCursor::new(&data);
        let ix = IndexTable::build(&mut c).unwrap();
        assert!(ix.offsets().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_table() {
        let mut c = SliceCursor::new(&[0]);
        let ix = IndexTable::build(&mut c).unwrap();
        assert!(ix.is_empty());
    }

    #[test]
    fn missing_entry_header_is_truncated() {
        let mut c = SliceCursor::new(&[2, 1, 0]);
        assert_eq!(IndexTable::build(&mut c).unwrap_err(), Error::TruncatedInput);
    }

    #[test]
    fn payload_past_end_is_seek_error() {
        let mut c = SliceCursor::new(&[1, 1, 5, b'a']);
        assert_eq!(
            IndexTable::build(&mut c).unwrap_err(),
            Error::SeekOutOfRange { target: 8, len: 4 }
        );
    }

    #[test]
    fn payload_is_not_inspected() {
        // Payload bytes that look like entries must not be interpreted.
        let data = [1, 50, 3, 0xFF, 0xFF, 0xFF];
        let mut c = SliceCursor::new(&data);
        let ix = IndexTable::build(&mut c).unwrap();
        assert_eq!(ix.offsets(), &[1]);
    }
}
