//! XML header decoding
//!
//! A BDF stream embeds two kinds of XML documents: one `<sdmDataHeader>`
//! describing the layout of the whole stream, and one
//! `<sdmDataSubsetHeader>` per integration. Both are small, so they are
//! accumulated in memory by the streamer and pulled through `quick-xml`
//! here.
//!
//! The decoders do not validate against the XML schema. They extract the
//! fields the reader needs and reject documents that lack them.

mod error;
mod global;
mod helpers;
mod subset;

#[cfg(test)]
mod tests;

pub use error::HeaderError;
pub use global::decode_global_header;
pub use subset::{decode_subset_header, SubsetSchema};
