use std::fmt;
use std::path::PathBuf;

use crate::bdf::header::HeaderError;
use crate::bdf::models::AttachmentKind;

/// Broad category of a [`BdfError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An operation was called in a state that does not permit it
    Usage,
    /// The MIME structure or an XML header is malformed
    Format,
    /// An attachment has no nonzero declared size
    Size,
    /// The stream could not be opened or ended unexpectedly
    Io,
    /// The attachments of a subset contradict the global header
    Domain,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Usage => "usage error",
            ErrorKind::Format => "format error",
            ErrorKind::Size => "size error",
            ErrorKind::Io => "I/O error",
            ErrorKind::Domain => "domain error",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while streaming a BDF file
#[derive(Debug, thiserror::Error)]
pub enum BdfError {
    /// Operation not permitted in the reader's current state
    #[error("{operation} is not permitted while the reader is in state {state}")]
    Usage {
        /// The attempted operation
        operation: super::Operation,
        /// State the reader was in
        state: super::ReaderState,
    },

    /// Malformed MIME structure
    #[error("{message} (at byte {offset})")]
    Format {
        /// What went wrong
        message: String,
        /// Stream offset where the problem was detected
        offset: u64,
    },

    /// The global XML header could not be decoded
    #[error("invalid global header: {0}")]
    GlobalHeader(#[source] HeaderError),

    /// A subset XML header could not be decoded
    #[error("invalid header in integration #{integration}: {source}")]
    SubsetHeader {
        /// 0-based integration index
        integration: usize,
        /// Underlying decoding error
        #[source]
        source: HeaderError,
    },

    /// An attachment was found whose declared size is absent or zero
    #[error("integration #{integration}: attachment '{attachment}' has no declared size in the global header")]
    Size {
        /// 0-based integration index
        integration: usize,
        /// Offending attachment
        attachment: AttachmentKind,
    },

    /// The file could not be opened for reading
    #[error("could not open '{}': {source}", path.display())]
    Open {
        /// Path that was requested
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// End of stream before an attachment was complete
    #[error("integration #{integration}: short read of '{attachment}', expected {expected} bytes at byte {offset}, got {actual}")]
    ShortRead {
        /// 0-based integration index
        integration: usize,
        /// Attachment being read
        attachment: AttachmentKind,
        /// Stream offset where the attachment starts
        offset: u64,
        /// Bytes expected
        expected: usize,
        /// Bytes actually read
        actual: usize,
    },

    /// I/O error on the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The attachment set contradicts the acquisition mode or correlator type
    #[error("integration #{integration}: {message}")]
    Domain {
        /// 0-based integration index
        integration: usize,
        /// Which rule was violated
        message: String,
    },
}

impl BdfError {
    /// Category of the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BdfError::Usage { .. } => ErrorKind::Usage,
            BdfError::Format { .. } | BdfError::GlobalHeader(_) | BdfError::SubsetHeader { .. } => {
                ErrorKind::Format
            }
            BdfError::Size { .. } => ErrorKind::Size,
            BdfError::Open { .. } | BdfError::ShortRead { .. } | BdfError::Io(_) => ErrorKind::Io,
            BdfError::Domain { .. } => ErrorKind::Domain,
        }
    }

    pub(crate) fn format(message: impl Into<String>, offset: u64) -> Self {
        BdfError::Format {
            message: message.into(),
            offset,
        }
    }
}
