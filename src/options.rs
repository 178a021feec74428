//! Decoder configuration.
//!
//! # Beispiel
//!
//! ```
//! use scalasig::options::{DecodeOptions, EndSkip};
//!
//! let opts = DecodeOptions::default()
//!     .with_end_skip(EndSkip::Exact)
//!     .with_max_nat_bytes(10);
//! assert_eq!(opts.end_skip(), EndSkip::Exact);
//! ```

/// Default bound on nested reference resolution.
///
/// Resolution recurses once per reference level. 256 levels fit the 2 MiB
/// stack of a spawned thread even in debug builds; callers on a larger stack
/// may raise it with [`DecodeOptions::with_max_reference_depth`].
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 256;

/// Where the cursor goes after an entry has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndSkip {
    /// One byte past the declared payload end, as the reference decoder does.
    ///
    /// The next resolve seeks to its own offset, so the extra byte only shows
    /// when an entry is the last thing resolved.
    #[default]
    PastEnd,
    /// Exactly at the declared payload end.
    Exact,
}

/// Options for one decode pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    max_reference_depth: usize,
    max_nat_bytes: Option<usize>,
    end_skip: EndSkip,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_reference_depth: DEFAULT_MAX_REFERENCE_DEPTH,
            max_nat_bytes: None,
            end_skip: EndSkip::PastEnd,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum nesting of reference resolution.
    pub fn max_reference_depth(&self) -> usize {
        self.max_reference_depth
    }

    /// Byte limit for a single Nat, `None` for unbounded.
    pub fn max_nat_bytes(&self) -> Option<usize> {
        self.max_nat_bytes
    }

    pub fn end_skip(&self) -> EndSkip {
        self.end_skip
    }

    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth;
        self
    }

    /// Limits Nat length. A limit of 0 is treated as 1.
    pub fn with_max_nat_bytes(mut self, max: usize) -> Self {
        self.max_nat_bytes = Some(max.max(1));
        self
    }

    pub fn with_end_skip(mut self, end_skip: EndSkip) -> Self {
        self.end_skip = end_skip;
        self
    }

    /// Bounded settings for untrusted input.
    pub fn strict() -> Self {
        Self::default()
            .with_max_nat_bytes(crate::nat::MAX_CANONICAL_LEN)
            .with_max_reference_depth(128)
    }
}
