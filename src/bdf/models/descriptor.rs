//! The global header of a BDF stream
//!
//! A [`GlobalDescriptor`] is decoded once, from the first MIME part of the
//! stream, and is never modified afterwards.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;

use super::attachment::AttachmentKind;

/// Byte order of the binary attachments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ByteOrder {
    /// Least significant byte first (every ALMA BDF written so far)
    #[default]
    #[serde(rename = "Little_Endian")]
    LittleEndian,
    /// Most significant byte first
    #[serde(rename = "Big_Endian")]
    BigEndian,
}

impl ByteOrder {
    /// Parse the `byteOrder` attribute of `<sdmDataHeader>`
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "Little_Endian" => Some(ByteOrder::LittleEndian),
            "Big_Endian" => Some(ByteOrder::BigEndian),
            _ => None,
        }
    }

    /// Literal used in the XML header
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little_Endian",
            ByteOrder::BigEndian => "Big_Endian",
        }
    }
}

/// Which correlation products the stream carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrelationMode {
    /// Cross-correlations only: `crossData` mandatory, `autoData` forbidden
    CrossOnly,
    /// Auto-correlations only: `autoData` mandatory, `crossData` forbidden
    AutoOnly,
    /// Both `crossData` and `autoData` mandatory
    CrossAndAuto,
}

impl CorrelationMode {
    /// Parse a `<correlationMode>` literal
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "CROSS_ONLY" => Some(CorrelationMode::CrossOnly),
            "AUTO_ONLY" => Some(CorrelationMode::AutoOnly),
            "CROSS_AND_AUTO" => Some(CorrelationMode::CrossAndAuto),
            _ => None,
        }
    }

    /// Literal used in the XML header
    pub fn name(&self) -> &'static str {
        match self {
            CorrelationMode::CrossOnly => "CROSS_ONLY",
            CorrelationMode::AutoOnly => "AUTO_ONLY",
            CorrelationMode::CrossAndAuto => "CROSS_AND_AUTO",
        }
    }

    /// True when `crossData` must be present in every subset
    pub fn has_cross(&self) -> bool {
        matches!(self, CorrelationMode::CrossOnly | CorrelationMode::CrossAndAuto)
    }

    /// True when `autoData` must be present in every subset
    pub fn has_auto(&self) -> bool {
        matches!(self, CorrelationMode::AutoOnly | CorrelationMode::CrossAndAuto)
    }
}

impl fmt::Display for CorrelationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The back-end that produced the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessorType {
    /// An interferometric correlator
    Correlator,
    /// A square-law detector (total power)
    Radiometer,
    /// A single-dish spectrometer
    Spectrometer,
}

impl ProcessorType {
    /// Parse a `<processorType>` literal
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "CORRELATOR" => Some(ProcessorType::Correlator),
            "RADIOMETER" => Some(ProcessorType::Radiometer),
            "SPECTROMETER" => Some(ProcessorType::Spectrometer),
            _ => None,
        }
    }

    /// Literal used in the XML header
    pub fn name(&self) -> &'static str {
        match self {
            ProcessorType::Correlator => "CORRELATOR",
            ProcessorType::Radiometer => "RADIOMETER",
            ProcessorType::Spectrometer => "SPECTROMETER",
        }
    }
}

impl fmt::Display for ProcessorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Correlator architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrelatorType {
    /// FX correlator (the ACA correlator); never produces zero lags
    Fx,
    /// FXF correlator
    Fxf,
    /// XF correlator (the 64-antenna correlator)
    Xf,
}

impl CorrelatorType {
    /// Parse a `correlatorType` literal
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "FX" => Some(CorrelatorType::Fx),
            "FXF" => Some(CorrelatorType::Fxf),
            "XF" => Some(CorrelatorType::Xf),
            _ => None,
        }
    }

    /// Literal used in the XML header
    pub fn name(&self) -> &'static str {
        match self {
            CorrelatorType::Fx => "FX",
            CorrelatorType::Fxf => "FXF",
            CorrelatorType::Xf => "XF",
        }
    }
}

impl fmt::Display for CorrelatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spectral resolution of the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpectralResolutionType {
    /// Channel-averaged data
    ChannelAverage,
    /// One channel per baseband
    BasebandWide,
    /// Full spectral resolution
    FullResolution,
}

impl SpectralResolutionType {
    /// Parse a `<spectralResolution>` literal
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "CHANNEL_AVERAGE" => Some(SpectralResolutionType::ChannelAverage),
            "BASEBAND_WIDE" => Some(SpectralResolutionType::BasebandWide),
            "FULL_RESOLUTION" => Some(SpectralResolutionType::FullResolution),
            _ => None,
        }
    }

    /// Literal used in the XML header
    pub fn name(&self) -> &'static str {
        match self {
            SpectralResolutionType::ChannelAverage => "CHANNEL_AVERAGE",
            SpectralResolutionType::BasebandWide => "BASEBAND_WIDE",
            SpectralResolutionType::FullResolution => "FULL_RESOLUTION",
        }
    }
}

/// The `execBlockNum/scanNum/subscanNum/` triple of a project path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProjectPath {
    /// Execution block number
    pub exec_block_num: u32,
    /// Scan number
    pub scan_num: u32,
    /// Subscan number
    pub subscan_num: u32,
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/", self.exec_block_num, self.scan_num, self.subscan_num)
    }
}

/// Declared shape of one binary attachment
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BinaryPart {
    /// Number of elements in the attachment
    pub size: u64,
    /// Axis names, slowest varying first
    pub axes: Vec<String>,
    /// `normalized` attribute (autoData only)
    pub normalized: Option<bool>,
}

/// A spectral window inside a baseband
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SpectralWindow {
    /// `sw` identifier, unique within the baseband
    pub sw: String,
    /// `swbb` attribute
    pub swbb: String,
    /// `image` attribute, naming another window of the same baseband
    pub image: Option<String>,
    /// Index of the image window in the baseband, resolved from `image`
    pub image_index: Option<usize>,
    /// Polarization products of the cross-correlations
    pub cross_pol_products: Vec<String>,
    /// Polarization products of the auto-correlations
    pub sd_pol_products: Vec<String>,
    /// Scale factor applied to integer cross data
    pub scale_factor: Option<f32>,
    /// Number of spectral points
    pub num_spectral_point: u32,
    /// Number of bins (switching cycle steps)
    pub num_bin: u32,
    /// Net sideband literal
    pub sideband: String,
}

/// A baseband and its spectral windows
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Baseband {
    /// Baseband name (e.g. `BB_1`)
    pub name: String,
    /// Spectral windows in document order
    pub spectral_windows: Vec<SpectralWindow>,
}

/// Cancellation of an observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbortObservation {
    /// Time of the abort, in nanoseconds since the MJD epoch
    pub stop_time: i64,
    /// Free text reason
    pub reason: String,
}

/// Decoded global header of a BDF stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalDescriptor {
    /// `schemaVersion` attribute
    pub schema_version: Option<u32>,
    /// Byte order of every binary attachment
    pub byte_order: ByteOrder,
    /// Execution block, scan and subscan numbers
    pub project_path: ProjectPath,
    /// Start time, in nanoseconds since the MJD epoch (1858-11-17)
    pub start_time: i64,
    /// UID of the data object
    pub data_oid: String,
    /// Human readable title
    pub title: String,
    /// 0 for total power data, 1 for correlator data
    pub dimensionality: u32,
    /// Declared number of integrations (only present when dimensionality is 0)
    pub num_time: Option<u32>,
    /// UID of the execution block
    pub exec_block_uid: String,
    /// Number of antennas
    pub num_antenna: u32,
    /// Acquisition mode
    pub correlation_mode: CorrelationMode,
    /// Spectral resolution, when declared
    pub spectral_resolution: Option<SpectralResolutionType>,
    /// Processor type
    pub processor_type: ProcessorType,
    /// Correlator type, declared on the `zeroLags` description
    pub correlator_type: Option<CorrelatorType>,
    /// Atmospheric phase correction literals
    pub apc: Vec<String>,
    /// Basebands in document order
    pub basebands: Vec<Baseband>,
    /// Declared attachment shapes, as found in `<dataStruct>`
    pub binary_parts: BTreeMap<AttachmentKind, BinaryPart>,
    /// Observation abort, when announced in the global header
    pub abort: Option<AbortObservation>,
    #[serde(skip)]
    attachment_sizes: BTreeMap<AttachmentKind, u64>,
}

impl GlobalDescriptor {
    pub(crate) fn new(
        byte_order: ByteOrder,
        correlation_mode: CorrelationMode,
        processor_type: ProcessorType,
    ) -> Self {
        Self {
            schema_version: None,
            byte_order,
            project_path: ProjectPath::default(),
            start_time: 0,
            data_oid: String::new(),
            title: String::new(),
            dimensionality: 0,
            num_time: None,
            exec_block_uid: String::new(),
            num_antenna: 0,
            correlation_mode,
            spectral_resolution: None,
            processor_type,
            correlator_type: None,
            apc: Vec::new(),
            basebands: Vec::new(),
            binary_parts: BTreeMap::new(),
            abort: None,
            attachment_sizes: BTreeMap::new(),
        }
    }

    /// Record the element count of every declared attachment whose size is nonzero
    pub(crate) fn derive_attachment_sizes(&mut self) {
        self.attachment_sizes = self
            .binary_parts
            .iter()
            .filter(|(_, part)| part.size > 0)
            .map(|(kind, part)| (*kind, part.size))
            .collect();
    }

    /// Declared element count of an attachment, `None` if it may never appear
    pub fn declared_size(&self, kind: AttachmentKind) -> Option<u64> {
        self.attachment_sizes.get(&kind).copied()
    }

    /// All nonzero declared element counts
    pub fn attachment_sizes(&self) -> &BTreeMap<AttachmentKind, u64> {
        &self.attachment_sizes
    }

    /// Declared number of integrations, if the header announces one
    pub fn declared_integration_count(&self) -> Option<u32> {
        self.num_time
    }

    /// True when subsets use the correlator subset header schema
    pub fn is_correlation(&self) -> bool {
        self.processor_type == ProcessorType::Correlator
    }

    /// True if the global header announces an aborted observation
    pub fn is_aborted(&self) -> bool {
        self.abort.is_some()
    }

    /// Start time converted to UTC
    ///
    /// ALMA timestamps count nanoseconds from the MJD epoch, 1858-11-17T00:00:00.
    pub fn start_time_utc(&self) -> Option<DateTime<Utc>> {
        let epoch = Utc.with_ymd_and_hms(1858, 11, 17, 0, 0, 0).single()?;
        epoch.checked_add_signed(Duration::nanoseconds(self.start_time))
    }
}
