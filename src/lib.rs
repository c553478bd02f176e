//! # almabdf - Streaming reader for the ALMA Binary Data Format
//!
//! `almabdf` reads the BDF files written by the ALMA correlators and
//! radiometers. A BDF file is a MIME multipart document: an XML global
//! header describing the data layout, followed by one part per integration,
//! each carrying its own XML header and raw binary attachments.
//!
//! ## Key Features
//!
//! - **Streaming**: one integration (or one batch) in memory at a time.
//! - **Bounded scanning**: every search through the MIME structure gives up
//!   after a configurable number of lines, so corrupt input fails fast.
//! - **Checked call sequencing**: the reader is an explicit state machine and
//!   reports out-of-order calls as usage errors.
//! - **Typed attachments**: raw buffers with byte-order aware typed views.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use almabdf::prelude::*;
//!
//! let mut reader = BdfStreamReader::new();
//! reader.open("integrations.bdf")?;
//!
//! let batch = reader.all_remaining_subsets()?;
//! for subset in batch {
//!     if let Some(cross) = subset.cross_data() {
//!         println!("#{}: {} x {:?}", subset.integration_index(), cross.count(), cross.element_type());
//!     }
//! }
//! reader.close();
//! # Ok::<(), almabdf::bdf::BdfError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`bdf::models`]: global descriptor, subsets and attachments
//! - [`bdf::header`]: XML decoding of the global and subset headers
//! - [`bdf::streamer`]: the streaming reader
//! - [`validator`]: whole-file validation reports

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod bdf;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::bdf::models::{
        Attachment, AttachmentKind, AttachmentValues, ByteOrder, CorrelationMode,
        CorrelatorType, CrossDataType, ElementType, GlobalDescriptor, ProcessorType, Subset,
    };
    pub use crate::bdf::{BdfError, BdfStreamReader, ErrorKind, ReaderConfig, ReaderState};
    pub use crate::validator::{validate_bdf_file, ValidationReport};
}
