//! scalasig: decoder for index-addressed pickled symbol tables
//!
//! A pickle is a version pair followed by a table of `tag length payload`
//! entries. Payloads refer to other entries by index, so decoding runs in two
//! passes: a header-only scan that records where every entry starts, then a
//! memoized resolver that decodes entries and follows their references.
//!
//! # Beispiel
//!
//! ```
//! use scalasig::{decode, Descriptor, Tag};
//! use scalasig::writer::PickleWriter;
//!
//! let mut w = PickleWriter::new(5, 2);
//! let name = w.name(Tag::TERM_NAME, "Foo");
//! let none = w.raw(Tag::NONE_SYM, &[]);
//! let sym = w.symbol(Tag::TYPE_SYM, name, none, 0x20, None, none);
//!
//! let table = decode(&w.finish()).unwrap();
//! assert_eq!(table.header().major(), 5);
//! assert_eq!(table.descriptor(name).and_then(Descriptor::as_name), Some("Foo"));
//! assert!(!table.get(none).unwrap().is_decoded());
//! assert_eq!(table.descriptor(sym).unwrap().to_string(), "symbol:4 [32]");
//! ```

pub mod cursor;
pub mod decoder;
pub mod entry;
pub mod error;
pub mod header;
pub mod index;
pub mod nat;
pub mod options;
pub mod resolver;
pub mod tag;
pub mod writer;

pub use error::{Error, Result};

// Public API: Decoder
pub use decoder::{decode, decode_cursor, decode_from_reader, decode_with_options, DecodedTable};

// Public API: Types
pub use cursor::{ByteCursor, IoCursor, SliceCursor};
pub use entry::{Descriptor, Resolution, SymbolDescriptor};
pub use header::PickleHeader;
pub use index::IndexTable;
pub use options::{DecodeOptions, EndSkip};
pub use resolver::{RefRole, Resolver};
pub use tag::{EntryKind, Tag};
