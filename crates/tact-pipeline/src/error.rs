//! Pipeline error types.

use thiserror::Error;

/// An error raised while producing a program.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The ABI names a fragment the backend does not have.
    #[error("unknown fragment `{0}`")]
    UnknownFragment(String),

    /// A fragment recorded an entry whose end precedes its start.
    #[error("fragment `{fragment}` has an inverted entry for {loc}: {start}..={end}")]
    InvalidEntry {
        /// The fragment the entry belongs to.
        fragment: String,
        /// The entry's source location.
        loc: String,
        /// Entry start.
        start: u32,
        /// Entry end.
        end: u32,
    },

    /// A fragment recorded an entry past the end of its emitted code.
    #[error("fragment `{fragment}` has an entry ending at {end}, past its code length {len}")]
    EntryOutOfBounds {
        /// The fragment the entry belongs to.
        fragment: String,
        /// Entry end.
        end: u32,
        /// Length of the fragment's code.
        len: u32,
    },

    /// Two fragments share a name.
    #[error("duplicate fragment name `{0}`")]
    DuplicateFragment(String),

    /// A fragment uses the name of a generated getter.
    #[error("fragment name `{0}` is reserved for a generated getter")]
    ReservedFragmentName(String),

    /// The ABI could not be serialized.
    #[error("failed to serialize ABI: {0}")]
    Serialize(#[from] serde_json::Error),
}
