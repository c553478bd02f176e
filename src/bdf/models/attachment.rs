//! Binary attachments of a subset
//!
//! Attachment payloads are kept as the raw bytes read from the stream. Typed
//! views are produced on demand with [`Attachment::values`], honouring the
//! byte order declared in the global header.

use std::fmt;

use byteorder::{BigEndian, LittleEndian};
use serde::Serialize;

use super::descriptor::ByteOrder;

/// The six named binary attachments a subset can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentKind {
    /// Per-antenna actual integration durations
    ActualDurations,
    /// Per-antenna actual mid-point times
    ActualTimes,
    /// Auto-correlation (or total power) data
    AutoData,
    /// Cross-correlation data
    CrossData,
    /// Zero-lag values of an XF correlator
    ZeroLags,
    /// Flags
    Flags,
}

impl AttachmentKind {
    /// Every attachment kind, in declaration order
    pub const ALL: [AttachmentKind; 6] = [
        AttachmentKind::ActualDurations,
        AttachmentKind::ActualTimes,
        AttachmentKind::AutoData,
        AttachmentKind::CrossData,
        AttachmentKind::ZeroLags,
        AttachmentKind::Flags,
    ];

    /// Name used in XML elements and in `Content-Location` values
    pub fn name(&self) -> &'static str {
        match self {
            AttachmentKind::ActualDurations => "actualDurations",
            AttachmentKind::ActualTimes => "actualTimes",
            AttachmentKind::AutoData => "autoData",
            AttachmentKind::CrossData => "crossData",
            AttachmentKind::ZeroLags => "zeroLags",
            AttachmentKind::Flags => "flags",
        }
    }

    /// Look up an attachment kind by its name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Element type of this attachment
    ///
    /// `crossData` has no fixed type: it is taken from the subset header, and
    /// `None` is returned when the subset header did not declare one.
    pub fn element_type(&self, cross_data_type: Option<CrossDataType>) -> Option<ElementType> {
        match self {
            AttachmentKind::ActualDurations | AttachmentKind::ActualTimes => {
                Some(ElementType::Int64)
            }
            AttachmentKind::AutoData | AttachmentKind::ZeroLags => Some(ElementType::Float32),
            AttachmentKind::Flags => Some(ElementType::UInt32),
            AttachmentKind::CrossData => cross_data_type.map(CrossDataType::element_type),
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric representation of `crossData`, declared per subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrossDataType {
    /// 16-bit signed integers
    Int16,
    /// 32-bit signed integers
    Int32,
    /// 32-bit IEEE floats
    Float32,
}

impl CrossDataType {
    /// Parse a primitive data type literal
    ///
    /// Accepts the ALMA enumeration literals (`INT16_TYPE`, `INT32_TYPE`,
    /// `FLOAT32_TYPE`) as well as the short forms `int16`, `int32`, `float32`.
    /// Any other primitive type is not a valid representation of cross data.
    pub fn from_literal(literal: &str) -> Option<Self> {
        let upper = literal.trim().to_ascii_uppercase();
        match upper.strip_suffix("_TYPE").unwrap_or(&upper) {
            "INT16" => Some(CrossDataType::Int16),
            "INT32" => Some(CrossDataType::Int32),
            "FLOAT32" => Some(CrossDataType::Float32),
            _ => None,
        }
    }

    /// Element type used to store the data
    pub fn element_type(self) -> ElementType {
        match self {
            CrossDataType::Int16 => ElementType::Int16,
            CrossDataType::Int32 => ElementType::Int32,
            CrossDataType::Float32 => ElementType::Float32,
        }
    }
}

/// Storage type of one attachment element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElementType {
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit unsigned integer
    UInt32,
    /// 32-bit IEEE float
    Float32,
}

impl ElementType {
    /// Width of one element in bytes
    pub fn width(&self) -> usize {
        match self {
            ElementType::Int16 => 2,
            ElementType::Int32 | ElementType::UInt32 | ElementType::Float32 => 4,
            ElementType::Int64 => 8,
        }
    }
}

/// Set of attachments seen in one subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttachmentSet(u8);

impl AttachmentSet {
    /// An empty set
    pub fn new() -> Self {
        Self(0)
    }

    /// Add an attachment kind to the set
    pub fn insert(&mut self, kind: AttachmentKind) {
        self.0 |= kind.bit();
    }

    /// Whether the set contains `kind`
    pub fn contains(&self, kind: AttachmentKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Remove every member
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members of the set, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = AttachmentKind> + '_ {
        AttachmentKind::ALL
            .iter()
            .copied()
            .filter(move |kind| self.contains(*kind))
    }
}

/// Typed copy of an attachment's elements
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentValues {
    /// 16-bit signed integers
    Int16(Vec<i16>),
    /// 32-bit signed integers
    Int32(Vec<i32>),
    /// 64-bit signed integers
    Int64(Vec<i64>),
    /// 32-bit unsigned integers
    UInt32(Vec<u32>),
    /// 32-bit floats
    Float32(Vec<f32>),
}

impl AttachmentValues {
    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            AttachmentValues::Int16(v) => v.len(),
            AttachmentValues::Int32(v) => v.len(),
            AttachmentValues::Int64(v) => v.len(),
            AttachmentValues::UInt32(v) => v.len(),
            AttachmentValues::Float32(v) => v.len(),
        }
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One binary attachment read from a subset
///
/// The buffer is owned exclusively by the attachment and dropped when the
/// subset holding it is cleared or reused.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    kind: AttachmentKind,
    element_type: ElementType,
    count: usize,
    offset: u64,
    byte_order: ByteOrder,
    data: Vec<u8>,
}

impl Attachment {
    pub(crate) fn new(
        kind: AttachmentKind,
        element_type: ElementType,
        offset: u64,
        byte_order: ByteOrder,
        data: Vec<u8>,
    ) -> Self {
        let count = data.len() / element_type.width();
        Self {
            kind,
            element_type,
            count,
            offset,
            byte_order,
            data,
        }
    }

    /// Which attachment this is
    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    /// Storage type of the elements
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Number of elements
    pub fn count(&self) -> usize {
        self.count
    }

    /// Byte offset in the source stream of the first element
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Raw bytes, exactly `count * width` long
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Decode the elements into native values
    pub fn values(&self) -> AttachmentValues {
        match self.byte_order {
            ByteOrder::LittleEndian => self.decode::<LittleEndian>(),
            ByteOrder::BigEndian => self.decode::<BigEndian>(),
        }
    }

    fn decode<B: byteorder::ByteOrder>(&self) -> AttachmentValues {
        let chunks = self.data.chunks_exact(self.element_type.width());
        match self.element_type {
            ElementType::Int16 => AttachmentValues::Int16(chunks.map(B::read_i16).collect()),
            ElementType::Int32 => AttachmentValues::Int32(chunks.map(B::read_i32).collect()),
            ElementType::Int64 => AttachmentValues::Int64(chunks.map(B::read_i64).collect()),
            ElementType::UInt32 => AttachmentValues::UInt32(chunks.map(B::read_u32).collect()),
            ElementType::Float32 => AttachmentValues::Float32(chunks.map(B::read_f32).collect()),
        }
    }
}
