//! Data models for BDF structures
//!
//! These models represent the decoded global header and the per-integration
//! subsets in a Rust-native form.

mod attachment;
mod descriptor;
mod subset;


pub use attachment::{
    Attachment, AttachmentKind, AttachmentSet, AttachmentValues, CrossDataType, ElementType,
};
pub use descriptor::{
    AbortObservation, Baseband, BinaryPart, ByteOrder, CorrelationMode, CorrelatorType,
    GlobalDescriptor, ProcessorType, ProjectPath, SpectralResolutionType, SpectralWindow,
};
pub use subset::{Subset, SubsetHeader};
