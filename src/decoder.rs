//! Outer driver: header, index pass, then resolution of every entry.
//!
//! # Beispiel
//!
//! ```
//! use scalasig::decoder::decode;
//! use scalasig::tag::Tag;
//! use scalasig::writer::PickleWriter;
//!
//! let mut w = PickleWriter::new(5, 0);
//! let name = w.name(Tag::TYPE_NAME, "Foo");
//! let none = w.raw(Tag::NONE_SYM, &[]);
//! w.symbol(Tag::TYPE_SYM, name, none, 0, None, none);
//!
//! let table = decode(&w.finish()).unwrap();
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.name_of(2), Some("Foo"));
//! ```

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use log::info;

use crate::cursor::{ByteCursor, IoCursor, SliceCursor};
use crate::entry::{Descriptor, Resolution};
use crate::header::{self, PickleHeader};
use crate::index::IndexTable;
use crate::options::DecodeOptions;
use crate::resolver::Resolver;
use crate::tag::Tag;
use crate::Result;

/// Result of decoding one pickle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTable {
    header: PickleHeader,
    index: IndexTable,
    entries: Vec<Resolution>,
    order: Vec<usize>,
}

impl DecodedTable {
    pub fn header(&self) -> PickleHeader {
        self.header
    }

    pub fn index(&self) -> &IndexTable {
        &self.index
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Resolution> {
        self.entries.get(i)
    }

    /// `(index, resolution)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Resolution)> + '_ {
        self.entries.iter().enumerate()
    }

    pub fn descriptor(&self, i: usize) -> Option<&Descriptor> {
        self.get(i)?.descriptor()
    }

    /// Text of a name entry, or of the name a symbol entry refers to.
    pub fn name_of(&self, i: usize) -> Option<&str> {
        match self.descriptor(i)? {
            Descriptor::Name { name, .. } => Some(name),
            Descriptor::Symbol(sym) => self.descriptor(sym.name)?.as_name(),
        }
    }

    /// Number of decoded entries.
    pub fn decoded_count(&self) -> usize {
        self.entries.iter().filter(|r| r.is_decoded()).count()
    }

    /// Unresolved entries per tag.
    pub fn unsupported_tags(&self) -> BTreeMap<Tag, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.entries {
            if let Resolution::Unresolved { tag } = r {
                *counts.entry(*tag).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Indices in the order they were first decoded.
    ///
    /// Driven by references, not by index order.
    pub fn decode_order(&self) -> &[usize] {
        &self.order
    }
}

/// Decodes a pickle held in memory.
pub fn decode(data: &[u8]) -> Result<DecodedTable> {
    decode_with_options(data, &DecodeOptions::default())
}

pub fn decode_with_options(data: &[u8], options: &DecodeOptions) -> Result<DecodedTable> {
    decode_cursor(SliceCursor::new(data), options)
}

/// Decodes a pickle from any seekable reader.
pub fn decode_from_reader<R: Read + Seek>(reader: R, options: &DecodeOptions) -> Result<DecodedTable> {
    decode_cursor(IoCursor::new(reader)?, options)
}

/// Decodes a pickle through an arbitrary cursor positioned at its start.
pub fn decode_cursor<C: ByteCursor>(mut cursor: C, options: &DecodeOptions) -> Result<DecodedTable> {
    let header = header::decode_bounded(&mut cursor, options.max_nat_bytes())?;
    info!("pickle version {header}");
    let index = IndexTable::build_bounded(&mut cursor, options.max_nat_bytes())?;
    info!("table size: {}", index.len());
    // back to the start of the blob
    cursor.seek(0)?;

    let mut resolver = Resolver::new(cursor, index, options.clone());
    resolver.resolve_all()?;
    let (index, entries, order) = resolver.into_resolutions();
    Ok(DecodedTable { header, index, entries, order })
}
