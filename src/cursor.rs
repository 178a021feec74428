//! Seekable byte sources with an explicit read position.
//!
//! Every other component reads through [`ByteCursor`]. The position is a
//! single shared value: whoever seeks away from a caller's position must put
//! it back, which is what [`CursorCheckpoint`] is for.
//!
//! # Beispiel
//!
//! ```
//! use scalasig::cursor::{ByteCursor, SliceCursor};
//!
//! let mut c = SliceCursor::new(&[1, 2, 3]);
//! let cp = c.checkpoint();
//! assert_eq!(c.read_byte().unwrap(), 1);
//! c.restore(cp).unwrap();
//! assert_eq!(c.position(), 0);
//! ```

use std::io::{Read, Seek, SeekFrom};

use crate::{Error, Result};

/// Saved read position, restored with [`ByteCursor::restore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorCheckpoint {
    pos: u64,
}

impl CursorCheckpoint {
    /// Absolute position captured by this checkpoint.
    pub fn position(&self) -> u64 {
        self.pos
    }
}

/// A randomly addressable byte source.
pub trait ByteCursor {
    /// Current absolute read position.
    fn position(&self) -> u64;

    /// Total length of the underlying storage.
    fn len(&self) -> u64;

    /// `true` if the storage holds no bytes at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves to an absolute position. Valid targets are `0..=len`.
    fn seek(&mut self, pos: u64) -> Result<()>;

    /// Reads one byte, advancing by one.
    fn read_byte(&mut self) -> Result<u8>;

    /// Fills `buf` completely or fails with [`Error::TruncatedInput`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Advances by `n` bytes without reading them.
    fn skip(&mut self, n: u64) -> Result<()> {
        let target = self.position().checked_add(n).ok_or(Error::SeekOutOfRange {
            target: u64::MAX,
            len: self.len(),
        })?;
        self.seek(target)
    }

    /// Seeks to `pos`, parking at the end of storage if `pos` lies beyond it.
    ///
    /// Returns `true` if the cursor was parked.
    fn seek_saturating(&mut self, pos: u64) -> Result<bool> {
        let len = self.len();
        if pos > len {
            self.seek(len)?;
            Ok(true)
        } else {
            self.seek(pos)?;
            Ok(false)
        }
    }

    /// Captures the current position.
    fn checkpoint(&self) -> CursorCheckpoint {
        CursorCheckpoint { pos: self.position() }
    }

    /// Returns to a previously captured position.
    fn restore(&mut self, checkpoint: CursorCheckpoint) -> Result<()> {
        self.seek(checkpoint.pos)
    }
}

impl<C: ByteCursor + ?Sized> ByteCursor for &mut C {
    fn position(&self) -> u64 {
        (**self).position()
    }

    fn len(&self) -> u64 {
        (**self).len()
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        (**self).seek(pos)
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }
}

/// In-memory cursor over a byte slice.
#[derive(Debug, Clone, Copy)]
pub struct SliceCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceCursor<'a> {
    /// Creates a cursor positioned at the first byte.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Unread remainder of the slice.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteCursor for SliceCursor<'_> {
    #[inline]
    fn position(&self) -> u64 {
        self.pos as u64
    }

    #[inline]
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        if pos > self.data.len() as u64 {
            return Err(Error::SeekOutOfRange { target: pos, len: self.data.len() as u64 });
        }
        self.pos = pos as usize;
        Ok(())
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        let byte = *self.data.get(self.pos).ok_or(Error::TruncatedInput)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let end = self.pos.checked_add(buf.len()).ok_or(Error::TruncatedInput)?;
        if end > self.data.len() {
            return Err(Error::TruncatedInput);
        }
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(())
    }
}

/// Cursor over any `Read + Seek` source (files, `std::io::Cursor`, ...).
///
/// Die Laenge wird einmalig beim Erstellen ermittelt; die Position wird
/// lokal mitgefuehrt, damit `position()` ohne `&mut` auskommt.
#[derive(Debug)]
pub struct IoCursor<R> {
    inner: R,
    pos: u64,
    len: u64,
}

impl<R: Read + Seek> IoCursor<R> {
    /// Wraps `inner`, measuring its length and rewinding to offset 0.
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, pos: 0, len })
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteCursor for IoCursor<R> {
    fn position(&self) -> u64 {
        self.pos
    }

    fn len(&self) -> u64 {
        self.len
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        if pos > self.len {
            return Err(Error::SeekOutOfRange { target: pos, len: self.len });
        }
        self.inner.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        self.pos += 1;
        Ok(buf[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_reads_in_order() {
        let mut c = SliceCursor::new(&[0xAA, 0xBB]);
        assert_eq!(c.read_byte().unwrap(), 0xAA);
        assert_eq!(c.position(), 1);
        assert_eq!(c.read_byte().unwrap(), 0xBB);
        assert_eq!(c.read_byte().unwrap_err(), Error::TruncatedInput);
    }

    #[test]
    fn slice_seek_to_end_is_allowed() {
        let mut c = SliceCursor::new(&[1, 2, 3]);
        c.seek(3).unwrap();
        assert_eq!(c.position(), 3);
        assert!(c.remaining().is_empty());
    }

    #[test]
    fn slice_seek_past_end_fails() {
        let mut c = SliceCursor::new(&[1, 2, 3]);
        assert_eq!(c.seek(4).unwrap_err(), Error::SeekOutOfRange { target: 4, len: 3 });
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn skip_past_end_fails() {
        let mut c = SliceCursor::new(&[1, 2, 3]);
        c.seek(2).unwrap();
        assert!(matches!(c.skip(2), Err(Error::SeekOutOfRange { target: 4, .. })));
    }

    #[test]
    fn read_exact_short_fails_without_moving() {
        let mut c = SliceCursor::new(&[1, 2]);
        let mut buf = [0u8; 3];
        assert_eq!(c.read_exact(&mut buf).unwrap_err(), Error::TruncatedInput);
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn saturating_seek_parks_at_end() {
        let mut c = SliceCursor::new(&[1, 2, 3]);
        assert!(c.seek_saturating(9).unwrap());
        assert_eq!(c.position(), 3);
        assert!(!c.seek_saturating(1).unwrap());
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn checkpoint_restores_position() {
        let mut c = SliceCursor::new(&[1, 2, 3, 4]);
        c.seek(1).unwrap();
        let cp = c.checkpoint();
        assert_eq!(cp.position(), 1);
        c.seek(3).unwrap();
        c.restore(cp).unwrap();
        assert_eq!(c.read_byte().unwrap(), 2);
    }

    #[test]
    fn io_cursor_matches_slice_cursor() {
        let data = vec![5u8, 6, 7, 8];
        let mut c = IoCursor::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(c.len(), 4);
        c.seek(2).unwrap();
        assert_eq!(c.read_byte().unwrap(), 7);
        assert_eq!(c.position(), 3);
        let mut buf = [0u8; 2];
        assert_eq!(c.read_exact(&mut buf).unwrap_err(), Error::TruncatedInput);
        assert!(matches!(c.seek(5), Err(Error::SeekOutOfRange { .. })));
    }

    #[test]
    fn io_cursor_rewinds_on_creation() {
        let mut inner = std::io::Cursor::new(vec![1u8, 2, 3]);
        inner.set_position(2);
        let mut c = IoCursor::new(inner).unwrap();
        assert_eq!(c.position(), 0);
        assert_eq!(c.read_byte().unwrap(), 1);
    }
}
