//! Memoized, recursive entry resolution.
//!
//! Payload fields reference other entries by index, so decoding one entry may
//! require jumping elsewhere in the pickle and back. [`Resolver::resolve`]
//! decodes an entry at most once; [`Resolver::resolve_reference`] wraps a
//! nested resolve in a cursor checkpoint so the caller's sequential field
//! reads continue where they left off.
//!
//! Entry grammars:
//!
//! ```text
//! TERMname / TYPEname   len_Nat  name_bytes[len]
//! TYPEsym / ALIASsym /
//! MODULEsym             len_Nat  name_Ref owner_Ref flags_Nat [privateWithin_Ref] info_Ref
//! other tags            len_Nat  (skipped)
//! ```
//!
//! `privateWithin_Ref` has no marker of its own: it is present exactly when
//! bytes remain in the payload after the Nat following `flags`.

use core::fmt;

use log::{debug, trace};

use crate::cursor::ByteCursor;
use crate::entry::{Descriptor, Resolution, SymbolDescriptor};
use crate::index::IndexTable;
use crate::nat;
use crate::options::{DecodeOptions, EndSkip};
use crate::tag::{EntryKind, Tag};
use crate::{Error, Result};

/// Field a reference was read from, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefRole {
    Name,
    Owner,
    PrivateWithin,
    Info,
}

impl RefRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Owner => "owner",
            Self::PrivateWithin => "privateWithin",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for RefRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache slot of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    /// Nothing produced. Entries with unsupported tags stay here for good.
    Pending,
    /// Currently being decoded further up the call chain.
    InProgress,
    Decoded(Descriptor),
}

/// Resolves entries of one pickle.
///
/// Owns the cursor and the resolution cache for exactly one decode pass.
pub struct Resolver<C> {
    cursor: C,
    index: IndexTable,
    slots: Vec<Slot>,
    options: DecodeOptions,
    depth: usize,
    order: Vec<usize>,
}

impl<C: ByteCursor> Resolver<C> {
    /// Creates a resolver with every slot pending.
    pub fn new(cursor: C, index: IndexTable, options: DecodeOptions) -> Self {
        let slots = vec![Slot::Pending; index.len()];
        Self { cursor, index, slots, options, depth: 0, order: Vec::new() }
    }

    pub fn index(&self) -> &IndexTable {
        &self.index
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut C {
        &mut self.cursor
    }

    /// Descriptor of entry `i` if it has been decoded.
    pub fn descriptor(&self, i: usize) -> Option<&Descriptor> {
        match self.slots.get(i)? {
            Slot::Decoded(d) => Some(d),
            Slot::Pending | Slot::InProgress => None,
        }
    }

    /// Indices in the order they became decoded.
    pub fn decode_order(&self) -> &[usize] {
        &self.order
    }

    /// Resolves every entry in ascending index order.
    pub fn resolve_all(&mut self) -> Result<()> {
        for i in 0..self.index.len() {
            self.resolve(i)?;
        }
        Ok(())
    }

    /// Decodes entry `i` unless it already has been.
    ///
    /// Leaves the cursor just past the entry (see [`EndSkip`]) when work was
    /// done, untouched otherwise.
    pub fn resolve(&mut self, i: usize) -> Result<()> {
        match self.slots.get(i) {
            None => {
                return Err(Error::ReferenceOutOfRange { index: i as u64, len: self.slots.len() });
            }
            Some(Slot::Decoded(_)) | Some(Slot::InProgress) => return Ok(()),
            Some(Slot::Pending) => {}
        }
        let max = self.options.max_reference_depth();
        if self.depth >= max {
            return Err(Error::ReferenceDepthExceeded { depth: max });
        }
        self.depth += 1;
        let result = self.resolve_entry(i);
        self.depth -= 1;
        result
    }

    /// Resolves `target` on behalf of entry `parent`, then puts the cursor
    /// back where it was.
    pub fn resolve_reference(&mut self, parent: usize, target: usize, role: RefRole) -> Result<()> {
        trace!("resolving {role} of entry {parent} -> {target}");
        let checkpoint = self.cursor.checkpoint();
        self.resolve(target)?;
        self.cursor.restore(checkpoint)
    }

    /// Final state of every entry, in index order.
    pub fn into_resolutions(self) -> (IndexTable, Vec<Resolution>, Vec<usize>) {
        let resolutions = self
            .slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                Slot::Decoded(d) => Resolution::Decoded(d),
                Slot::Pending | Slot::InProgress => Resolution::Unresolved {
                    tag: self.index.tag(i).unwrap_or(Tag(0)),
                },
            })
            .collect();
        (self.index, resolutions, self.order)
    }

    fn resolve_entry(&mut self, i: usize) -> Result<()> {
        // `resolve` has already bounds-checked `i` against the slots.
        let offset = self.index.offsets()[i];
        self.cursor.seek(offset)?;
        let tag = Tag(self.cursor.read_byte()?);
        let len = self.read_nat()?;
        let end = self.cursor.position().checked_add(len).ok_or(Error::NatOverflow)?;

        match tag.kind() {
            EntryKind::Name => self.read_name(i, tag, len)?,
            EntryKind::Symbol => self.read_symbol(i, tag, end)?,
            EntryKind::Unsupported => debug!("unsupported tag {tag} at entry {i}"),
        }
        self.skip_to_boundary(end)
    }

    fn read_name(&mut self, i: usize, tag: Tag, len: u64) -> Result<()> {
        let available = self.cursor.len().saturating_sub(self.cursor.position());
        if len > available {
            return Err(Error::TruncatedInput);
        }
        let mut buf = vec![0u8; len as usize];
        self.cursor.read_exact(&mut buf)?;
        let name = String::from_utf8_lossy(&buf).into_owned();
        self.store(i, Descriptor::Name { tag, name });
        Ok(())
    }

    fn read_symbol(&mut self, i: usize, tag: Tag, end: u64) -> Result<()> {
        self.slots[i] = Slot::InProgress;
        let name = self.read_reference(i, RefRole::Name)?;
        let owner = self.read_reference(i, RefRole::Owner)?;
        let flags = self.read_nat()?;
        let next = self.read_index()?;
        let (private_within, info) = if self.cursor.position() < end {
            (Some(next), self.read_index()?)
        } else {
            (None, next)
        };
        self.store(
            i,
            Descriptor::Symbol(SymbolDescriptor { tag, flags, name, owner, private_within, info }),
        );
        if let Some(pw) = private_within {
            self.resolve_reference(i, pw, RefRole::PrivateWithin)?;
        }
        self.resolve_reference(i, info, RefRole::Info)
    }

    fn read_reference(&mut self, parent: usize, role: RefRole) -> Result<usize> {
        let target = self.read_index()?;
        self.resolve_reference(parent, target, role)?;
        Ok(target)
    }

    fn store(&mut self, i: usize, descriptor: Descriptor) {
        self.slots[i] = Slot::Decoded(descriptor);
        self.order.push(i);
    }

    fn skip_to_boundary(&mut self, end: u64) -> Result<()> {
        let target = match self.options.end_skip() {
            EndSkip::PastEnd => end.saturating_add(1),
            EndSkip::Exact => end,
        };
        if self.cursor.seek_saturating(target)? {
            debug!("entry boundary {target} beyond storage, parked at {}", self.cursor.len());
        }
        Ok(())
    }

    fn read_nat(&mut self) -> Result<u64> {
        nat::decode_bounded(&mut self.cursor, self.options.max_nat_bytes())
    }

    fn read_index(&mut self) -> Result<usize> {
        nat::decode_usize(&mut self.cursor, self.options.max_nat_bytes())
    }
}
