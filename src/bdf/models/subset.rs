//! One integration (or subintegration) of a BDF stream

use std::collections::BTreeMap;

use serde::Serialize;

use super::attachment::{Attachment, AttachmentKind, AttachmentSet, CrossDataType};
use super::descriptor::{AbortObservation, ProjectPath};

/// Decoded per-subset XML header
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SubsetHeader {
    /// Execution block, scan and subscan numbers (checked against the global header)
    pub project_path: ProjectPath,
    /// Integration number, correlator data only
    pub integration_num: Option<u32>,
    /// Subintegration number, correlator channel-average data only
    pub subintegration_num: Option<u32>,
    /// Mid-point time of the subset, in nanoseconds since the MJD epoch
    pub time: i64,
    /// Duration of the subset in nanoseconds
    pub interval: i64,
    /// `ref` attribute of `<dataStruct>`
    pub data_struct_ref: String,
    /// `xlink:href` of each attachment announced by the header
    pub refs: BTreeMap<AttachmentKind, String>,
    /// Numeric representation of `crossData`
    pub cross_data_type: Option<CrossDataType>,
    /// Present when this subset cancels the observation
    pub abort: Option<AbortObservation>,
}

/// One integration and its binary attachments
#[derive(Debug, Clone, Default)]
pub struct Subset {
    integration_index: usize,
    starts_at: u64,
    header: SubsetHeader,
    attachments: BTreeMap<AttachmentKind, Attachment>,
    presence: AttachmentSet,
}

impl Subset {
    /// 0-based position of the subset in the stream
    pub fn integration_index(&self) -> usize {
        self.integration_index
    }

    /// Byte offset in the source stream where the subset's MIME part begins
    pub fn starts_at(&self) -> u64 {
        self.starts_at
    }

    /// Decoded subset header
    pub fn header(&self) -> &SubsetHeader {
        &self.header
    }

    /// Whether this subset cancels the observation
    pub fn is_aborted(&self) -> bool {
        self.header.abort.is_some()
    }

    /// Attachments that were found in the subset
    pub fn presence(&self) -> AttachmentSet {
        self.presence
    }

    /// An attachment, if present
    pub fn attachment(&self, kind: AttachmentKind) -> Option<&Attachment> {
        self.attachments.get(&kind)
    }

    /// Every attachment, in declaration order
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.values()
    }

    /// Element count of an attachment, 0 when absent
    pub fn count(&self, kind: AttachmentKind) -> usize {
        self.attachment(kind).map_or(0, Attachment::count)
    }

    /// Stream offset at which an attachment's bytes begin
    pub fn attachment_offset(&self, kind: AttachmentKind) -> Option<u64> {
        self.attachment(kind).map(Attachment::offset)
    }

    /// `actualDurations` attachment
    pub fn actual_durations(&self) -> Option<&Attachment> {
        self.attachment(AttachmentKind::ActualDurations)
    }

    /// `actualTimes` attachment
    pub fn actual_times(&self) -> Option<&Attachment> {
        self.attachment(AttachmentKind::ActualTimes)
    }

    /// `autoData` attachment
    pub fn auto_data(&self) -> Option<&Attachment> {
        self.attachment(AttachmentKind::AutoData)
    }

    /// `crossData` attachment
    pub fn cross_data(&self) -> Option<&Attachment> {
        self.attachment(AttachmentKind::CrossData)
    }

    /// `zeroLags` attachment
    pub fn zero_lags(&self) -> Option<&Attachment> {
        self.attachment(AttachmentKind::ZeroLags)
    }

    /// `flags` attachment
    pub fn flags(&self) -> Option<&Attachment> {
        self.attachment(AttachmentKind::Flags)
    }

    /// Prepare the subset for a new read, dropping everything it held
    pub(crate) fn reset(&mut self, integration_index: usize, starts_at: u64) {
        self.release();
        self.integration_index = integration_index;
        self.starts_at = starts_at;
    }

    pub(crate) fn set_header(&mut self, header: SubsetHeader) {
        self.header = header;
    }

    /// Drop attachment buffers and forget which attachments were present
    pub(crate) fn clear_attachments(&mut self) {
        self.attachments.clear();
        self.presence.clear();
    }

    /// Returns `false` if an attachment of the same kind was already stored
    pub(crate) fn insert_attachment(&mut self, attachment: Attachment) -> bool {
        let kind = attachment.kind();
        if self.presence.contains(kind) {
            return false;
        }
        self.presence.insert(kind);
        self.attachments.insert(kind, attachment);
        true
    }

    pub(crate) fn release(&mut self) {
        self.clear_attachments();
        self.header = SubsetHeader::default();
    }
}
