//! ALMA Binary Data Format
//!
//! A BDF file is a MIME multipart document. Its first part is an XML header
//! describing the whole stream; every following part is one integration
//! (a *subset*) holding a small XML header and up to six binary attachments.
//!
//! - [`models`]: the decoded global header, subsets and attachments
//! - [`header`]: XML decoding of the global and subset headers
//! - [`streamer`]: the streaming reader and its state machine

pub mod header;
pub mod models;
pub mod streamer;

pub use header::HeaderError;
pub use models::{
    Attachment, AttachmentKind, AttachmentSet, AttachmentValues, ByteOrder, CorrelationMode,
    CorrelatorType, CrossDataType, ElementType, GlobalDescriptor, ProcessorType,
    SpectralResolutionType, Subset, SubsetHeader,
};
pub use streamer::{
    BdfError, BdfStreamReader, ErrorKind, Operation, ReaderConfig, ReaderState, SubsetIterator,
};
