//! Builds well-formed pickles.
//!
//! Used for fixtures, tests and fuzz seeds. Entries are numbered in the order
//! they are added; [`PickleWriter::reserve`] hands out an index up front so
//! entries can reference ones that are filled in later.
//!
//! # Beispiel
//!
//! ```
//! use scalasig::tag::Tag;
//! use scalasig::writer::PickleWriter;
//!
//! let mut w = PickleWriter::new(5, 0);
//! let name = w.name(Tag::TERM_NAME, "Foo");
//! assert_eq!(name, 0);
//! let bytes = w.finish();
//! assert_eq!(bytes, vec![5, 0, 1, 1, 3, b'F', b'o', b'o']);
//! ```

use crate::header::{self, PickleHeader};
use crate::nat;
use crate::tag::Tag;

/// Incremental pickle builder.
#[derive(Debug, Clone, Default)]
pub struct PickleWriter {
    header: PickleHeader,
    entries: Vec<(Tag, Vec<u8>)>,
}

impl PickleWriter {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { header: PickleHeader::new(major, minor), entries: Vec::new() }
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an entry with an arbitrary payload.
    pub fn raw(&mut self, tag: Tag, payload: &[u8]) -> usize {
        self.entries.push((tag, payload.to_vec()));
        self.entries.len() - 1
    }

    /// Adds a name literal.
    pub fn name(&mut self, tag: Tag, name: &str) -> usize {
        self.raw(tag, name.as_bytes())
    }

    /// Adds a symbol record.
    pub fn symbol(
        &mut self,
        tag: Tag,
        name: usize,
        owner: usize,
        flags: u64,
        private_within: Option<usize>,
        info: usize,
    ) -> usize {
        let payload = symbol_payload(name, owner, flags, private_within, info);
        self.entries.push((tag, payload));
        self.entries.len() - 1
    }

    /// Adds an empty `NOtpe` placeholder to be overwritten later.
    pub fn reserve(&mut self) -> usize {
        self.raw(Tag::NO_TPE, &[])
    }

    /// Replaces entry `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never handed out.
    pub fn set_raw(&mut self, id: usize, tag: Tag, payload: &[u8]) {
        self.entries[id] = (tag, payload.to_vec());
    }

    /// Replaces entry `id` with a symbol record.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never handed out.
    pub fn set_symbol(
        &mut self,
        id: usize,
        tag: Tag,
        name: usize,
        owner: usize,
        flags: u64,
        private_within: Option<usize>,
        info: usize,
    ) {
        self.entries[id] = (tag, symbol_payload(name, owner, flags, private_within, info));
    }

    /// Serializes header, entry count and entries.
    pub fn finish(self) -> Vec<u8> {
        let mut out = Vec::new();
        header::encode(&mut out, &self.header);
        nat::encode(&mut out, self.entries.len() as u64);
        for (tag, payload) in &self.entries {
            out.push(tag.byte());
            nat::encode(&mut out, payload.len() as u64);
            out.extend_from_slice(payload);
        }
        out
    }
}

fn symbol_payload(
    name: usize,
    owner: usize,
    flags: u64,
    private_within: Option<usize>,
    info: usize,
) -> Vec<u8> {
    let mut payload = Vec::new();
    nat::encode(&mut payload, name as u64);
    nat::encode(&mut payload, owner as u64);
    nat::encode(&mut payload, flags);
    if let Some(pw) = private_within {
        nat::encode(&mut payload, pw as u64);
    }
    nat::encode(&mut payload, info as u64);
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pickle() {
        assert_eq!(PickleWriter::new(5, 2).finish(), vec![5, 2, 0]);
    }

    #[test]
    fn symbol_layout() {
        let mut w = PickleWriter::new(5, 0);
        w.symbol(Tag::TYPE_SYM, 1, 2, 300, Some(3), 4);
        assert_eq!(w.finish(), vec![5, 0, 1, 4, 6, 1, 2, 0x82, 0x2C, 3, 4]);
    }

    #[test]
    fn reserve_then_set() {
        let mut w = PickleWriter::new(5, 0);
        let id = w.reserve();
        assert_eq!(w.len(), 1);
        w.set_raw(id, Tag::TYPE_NAME, b"T");
        assert_eq!(w.finish(), vec![5, 0, 1, 2, 1, b'T']);
    }
}
