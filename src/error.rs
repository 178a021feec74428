//! Central error types for the pickle decoder.
//!
//! Every variant is fatal for a decode pass. Entries with an unsupported tag
//! are not errors; they simply stay unresolved.

use core::fmt;

/// All errors the decoder can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A read ran past the available bytes.
    TruncatedInput,
    /// A seek target lies outside the underlying storage.
    SeekOutOfRange {
        /// Requested absolute position.
        target: u64,
        /// Length of the storage.
        len: u64,
    },
    /// A Nat exceeded the configured byte limit without a terminating byte.
    ///
    /// Only raised when `DecodeOptions::max_nat_bytes` is set.
    MalformedVarint,
    /// A Nat does not fit into the target integer type.
    NatOverflow,
    /// A reference names an entry index outside the index table.
    ReferenceOutOfRange { index: u64, len: usize },
    /// Nested reference resolution went deeper than allowed.
    ReferenceDepthExceeded { depth: usize },
    /// An I/O error from the underlying reader (other than unexpected EOF).
    IoError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedInput => write!(f, "truncated input: read past end of pickle"),
            Self::SeekOutOfRange { target, len } => {
                write!(f, "seek to offset {target} outside storage of {len} bytes")
            }
            Self::MalformedVarint => write!(f, "malformed Nat: no terminating byte within limit"),
            Self::NatOverflow => write!(f, "Nat value overflows target integer"),
            Self::ReferenceOutOfRange { index, len } => {
                write!(f, "reference to entry {index} outside table of {len} entries")
            }
            Self::ReferenceDepthExceeded { depth } => {
                write!(f, "reference nesting exceeded depth {depth}")
            }
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::TruncatedInput
        } else {
            Self::IoError(err.to_string())
        }
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_input_display() {
        let msg = Error::TruncatedInput.to_string();
        assert!(msg.contains("truncated"), "{msg}");
    }

    #[test]
    fn seek_out_of_range_display() {
        let msg = Error::SeekOutOfRange { target: 40, len: 12 }.to_string();
        assert!(msg.contains("40"), "{msg}");
        assert!(msg.contains("12"), "{msg}");
    }

    #[test]
    fn reference_out_of_range_display() {
        let msg = Error::ReferenceOutOfRange { index: 9, len: 3 }.to_string();
        assert!(msg.contains("entry 9"), "{msg}");
        assert!(msg.contains("3 entries"), "{msg}");
    }

    #[test]
    fn depth_exceeded_display() {
        let msg = Error::ReferenceDepthExceeded { depth: 16 }.to_string();
        assert!(msg.contains("16"), "{msg}");
    }

    #[test]
    fn unexpected_eof_maps_to_truncated() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(Error::from(io), Error::TruncatedInput);
    }

    #[test]
    fn other_io_errors_keep_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        match Error::from(io) {
            Error::IoError(msg) => assert!(msg.contains("nope")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn error_is_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(Error::MalformedVarint);
        assert!(!e.to_string().is_empty());
    }
}
