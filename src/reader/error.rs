use crate::{FormatError, Unsupported};
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading bytes into the midi representation
"#]
#[derive(Debug, Error)]
#[error("reading at offset {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// A structural violation in the byte stream
    #[error("{0}")]
    Format(#[from] FormatError),
    /// Fewer bytes were available than the current read required
    #[error("truncated input, {missing} byte(s) missing")]
    Truncated {
        /// How many bytes the short read came up short by
        missing: usize,
    },
    /// A recognized but deliberately unhandled feature
    #[error("unsupported, {0}")]
    Unsupported(#[from] Unsupported),
    /// An underlying file open/read failure
    #[error("i/o, {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// True if the input ran out mid-read
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Truncated { .. })
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the byte offset at which the failing read was attempted.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
