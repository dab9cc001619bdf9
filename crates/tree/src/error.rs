//! Construction errors

use derive_more::Display;

/// Failures raised while constructing a label unit, an arc or a seeded tree.
///
/// Every variant belongs to the "invalid construction" kind: the value being
/// built cannot exist. Expected runtime rejections on a live tree (duplicate
/// add, absent remove, attaching under a missing parent) are never reported
/// through this type; those operations return `bool` or `Option` instead.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TreeError {
    /// A label unit was requested without a label
    #[display(fmt = "invalid construction: missing label")]
    MissingLabel,
    /// An arc was requested whose source and target are the same label
    #[display(fmt = "invalid construction: arc endpoints must differ")]
    LoopEdge,
    /// A tree was seeded from an empty sequence
    #[display(fmt = "invalid construction: empty seed sequence")]
    EmptySeed,
    /// A seed sequence repeated a label
    #[display(fmt = "invalid construction: duplicate label at seed position {}", position)]
    DuplicateSeed {
        /// Zero-based position of the offending label in the seed sequence
        position: usize,
    },
}

impl TreeError {
    /// Always true; lets callers match on the error kind rather than the variant.
    pub fn is_invalid_construction(&self) -> bool {
        true
    }
}

impl std::error::Error for TreeError {}
