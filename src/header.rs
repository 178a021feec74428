//! Pickle version header.
//!
//! A pickle starts with two Nats, `major` and `minor`. The versions are
//! informational: every version is decoded with the same grammar.
//!
//! # Beispiel
//!
//! ```
//! use scalasig::cursor::SliceCursor;
//! use scalasig::header::{self, PickleHeader};
//!
//! let mut c = SliceCursor::new(&[5, 0]);
//! let h = header::decode(&mut c).unwrap();
//! assert_eq!(h, PickleHeader::new(5, 0));
//! ```

use core::fmt;

use crate::cursor::ByteCursor;
use crate::nat;
use crate::Result;

/// Major version written by current Scala 2 compilers.
pub const CURRENT_MAJOR: u64 = 5;

/// Minor version written by current Scala 2 compilers.
pub const CURRENT_MINOR: u64 = 0;

/// Version pair at the start of a pickle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickleHeader {
    major: u64,
    minor: u64,
}

impl Default for PickleHeader {
    fn default() -> Self {
        Self::new(CURRENT_MAJOR, CURRENT_MINOR)
    }
}

impl PickleHeader {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// `true` if this is the version current compilers emit.
    pub fn is_current(&self) -> bool {
        self.major == CURRENT_MAJOR && self.minor == CURRENT_MINOR
    }
}

impl fmt::Display for PickleHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Reads the version pair.
pub fn decode<C: ByteCursor + ?Sized>(cursor: &mut C) -> Result<PickleHeader> {
    decode_bounded(cursor, None)
}

/// Like [`decode`], with an optional byte limit per Nat.
pub fn decode_bounded<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    max_nat_bytes: Option<usize>,
) -> Result<PickleHeader> {
    let major = nat::decode_bounded(cursor, max_nat_bytes)?;
    let minor = nat::decode_bounded(cursor, max_nat_bytes)?;
    Ok(PickleHeader { major, minor })
}

/// Writes the version pair.
pub fn encode(out: &mut Vec<u8>, header: &PickleHeader) {
    nat::encode(out, header.major);
    nat::encode(out, header.minor);
}
