//! Decoded entry summaries.

use core::fmt;

use crate::tag::Tag;

/// Summary of a decoded entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// A term or type name literal.
    Name { tag: Tag, name: String },
    /// A type, alias or module symbol.
    Symbol(SymbolDescriptor),
}

impl Descriptor {
    pub fn tag(&self) -> Tag {
        match self {
            Self::Name { tag, .. } => *tag,
            Self::Symbol(sym) => sym.tag,
        }
    }

    /// Name text for name entries.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name { name, .. } => Some(name),
            Self::Symbol(_) => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&SymbolDescriptor> {
        match self {
            Self::Symbol(sym) => Some(sym),
            Self::Name { .. } => None,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { tag, name } => write!(f, "tag:{} ({name})", tag.byte()),
            Self::Symbol(sym) => write!(f, "symbol:{} [{}]", sym.tag.byte(), sym.flags),
        }
    }
}

/// Fields of a symbol record.
///
/// References are entry indices into the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolDescriptor {
    pub tag: Tag,
    pub flags: u64,
    pub name: usize,
    pub owner: usize,
    pub private_within: Option<usize>,
    pub info: usize,
}

/// Terminal state of one entry after a decode pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Decoded(Descriptor),
    /// The entry's tag has no grammar; nothing was produced.
    Unresolved { tag: Tag },
}

impl Resolution {
    pub fn descriptor(&self) -> Option<&Descriptor> {
        match self {
            Self::Decoded(d) => Some(d),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }

    pub fn tag(&self) -> Tag {
        match self {
            Self::Decoded(d) => d.tag(),
            Self::Unresolved { tag } => *tag,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decoded(d) => fmt::Display::fmt(d, f),
            Self::Unresolved { tag } => write!(f, "unresolved tag {tag}"),
        }
    }
}
