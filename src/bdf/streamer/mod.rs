//! Streaming BDF reader
//!
//! [`BdfStreamReader`] walks a BDF file top to bottom: the MIME preamble,
//! the global XML header, then one subset (integration) at a time, each with
//! its own XML header and binary attachments. Only one subset, or one batch
//! of subsets, is held in memory at once.
//!
//! The reader is a state machine. Each public operation belongs to an
//! [`Operation`] class, and [`ReaderState::permits`] decides whether it may
//! run in the current [`ReaderState`]; anything else is a usage error.
//!
//! # Example
//! ```no_run
//! use almabdf::bdf::BdfStreamReader;
//!
//! let mut reader = BdfStreamReader::new();
//! reader.open("integrations.bdf")?;
//! println!("{} in mode {}", reader.title()?, reader.correlation_mode()?);
//! while reader.has_subset()? {
//!     let subset = reader.get_subset()?;
//!     println!("#{}: {} cross values", subset.integration_index(), subset.count(almabdf::bdf::AttachmentKind::CrossData));
//! }
//! reader.close();
//! # Ok::<(), almabdf::bdf::BdfError>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::bdf::header::decode_global_header;
use crate::bdf::models::{
    AbortObservation, ByteOrder, CorrelationMode, CorrelatorType, GlobalDescriptor, ProcessorType,
    SpectralResolutionType, Subset,
};
use mime::is_mime_version_line;
use scanner::LineScanner;
use subset_part::{read_subset, SubsetContext};

pub use config::ReaderConfig;
pub use error::{BdfError, ErrorKind};
pub use iterators::SubsetIterator;
pub use mime::{
    attachment_from_location, boundary_from_content_type, split_header_field, BoundaryError,
};
pub use state::{Operation, ReaderState};

mod attachments;
mod config;
mod error;
mod iterators;
mod mime;
mod scanner;
mod state;
mod subset_part;


/// Streaming reader for BDF files
pub struct BdfStreamReader<R: BufRead = BufReader<File>> {
    config: ReaderConfig,
    state: ReaderState,
    source: String,
    scanner: Option<LineScanner<R>>,
    descriptor: Option<GlobalDescriptor>,
    top_boundary: String,
    integration_index: Option<usize>,
    current: Subset,
    batch: Vec<Subset>,
}

impl BdfStreamReader {
    /// Create a reader with the default scan bounds
    pub fn new() -> Self {
        Self::with_config(ReaderConfig::default())
    }

    /// Open a BDF file
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), BdfError> {
        self.check(Operation::Open)?;
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BdfError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.open_reader(BufReader::new(file), path.display().to_string())
    }
}

impl Default for BdfStreamReader {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead> BdfStreamReader<R> {
    /// Create a reader with explicit scan bounds
    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            config,
            state: ReaderState::NoStream,
            source: String::new(),
            scanner: None,
            descriptor: None,
            top_boundary: String::new(),
            integration_index: None,
            current: Subset::default(),
            batch: Vec::new(),
        }
    }

    /// Open any buffered byte source; `name` is used in log messages
    ///
    /// On failure the reader is left with no stream.
    pub fn open_reader(&mut self, source: R, name: impl Into<String>) -> Result<(), BdfError> {
        self.check(Operation::Open)?;
        self.source = name.into();

        let mut scanner = LineScanner::new(source);
        match read_preamble(&mut scanner, &self.config) {
            Ok((boundary, descriptor)) => {
                info!(
                    "opened '{}': {} {} stream, {}",
                    self.source,
                    descriptor.processor_type,
                    descriptor.correlation_mode,
                    match descriptor.declared_integration_count() {
                        Some(n) => format!("{} integrations declared", n),
                        None => "integration count not declared".to_string(),
                    }
                );
                self.top_boundary = boundary;
                self.descriptor = Some(descriptor);
                self.scanner = Some(scanner);
                self.integration_index = None;
                self.state = ReaderState::AtBeginning;
                Ok(())
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Release every buffer and return to [`ReaderState::NoStream`]
    ///
    /// Always permitted, even after a failed read.
    pub fn close(&mut self) {
        if self.state != ReaderState::NoStream {
            info!("closing '{}'", self.source);
        }
        self.reset();
    }

    /// Current state of the reader
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Scan bounds in use
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Byte offset of the next unread byte, `None` if no stream is open
    pub fn position(&self) -> Option<u64> {
        self.scanner.as_ref().map(LineScanner::position)
    }

    /// Whether another subset follows
    ///
    /// Returns `false`, and moves to [`ReaderState::AtEnd`], once the closing
    /// top-level boundary has been reached.
    pub fn has_subset(&mut self) -> Result<bool, BdfError> {
        self.check(Operation::TestEnd)?;
        Ok(self.test_end())
    }

    /// Read the next subset
    ///
    /// The returned subset is reused by the next call; copy what you need
    /// before reading further.
    pub fn get_subset(&mut self) -> Result<&Subset, BdfError> {
        self.check(Operation::Read)?;
        let mut subset = std::mem::take(&mut self.current);
        let result = self.decode_next(&mut subset);
        self.current = subset;

        match result {
            Ok(()) => {
                self.state = ReaderState::Reading;
                Ok(&self.current)
            }
            Err(e) => {
                self.current.release();
                Err(e)
            }
        }
    }

    /// Read at most `n` subsets
    ///
    /// The previous batch is released first. The batch is shorter than `n`
    /// only when the stream ends.
    pub fn next_subsets(&mut self, n: usize) -> Result<&[Subset], BdfError> {
        self.check(Operation::ReadNext)?;
        self.fill_batch(n)
    }

    /// Read every remaining subset
    pub fn all_remaining_subsets(&mut self) -> Result<&[Subset], BdfError> {
        self.check(Operation::ReadAll)?;
        self.fill_batch(usize::MAX)
    }

    /// Read the next subset as an owned value, `None` at the end of the stream
    pub fn next_subset(&mut self) -> Result<Option<Subset>, BdfError> {
        self.check(Operation::TestEnd)?;
        if !self.test_end() {
            return Ok(None);
        }
        self.check(Operation::Read)?;
        let mut subset = Subset::default();
        self.decode_next(&mut subset)?;
        self.state = ReaderState::Reading;
        Ok(Some(subset))
    }

    /// Iterate over the remaining subsets, consuming the reader
    pub fn subsets(self) -> SubsetIterator<R> {
        SubsetIterator::new(self)
    }

    /// The decoded global header
    pub fn descriptor(&self) -> Result<&GlobalDescriptor, BdfError> {
        self.check(Operation::Query)?;
        self.descriptor.as_ref().ok_or(BdfError::Usage {
            operation: Operation::Query,
            state: self.state,
        })
    }

    /// Title of the data object
    pub fn title(&self) -> Result<&str, BdfError> {
        Ok(&self.descriptor()?.title)
    }

    /// Byte order of the binary attachments
    pub fn byte_order(&self) -> Result<ByteOrder, BdfError> {
        Ok(self.descriptor()?.byte_order)
    }

    /// Start time, in nanoseconds since the MJD epoch
    pub fn start_time(&self) -> Result<i64, BdfError> {
        Ok(self.descriptor()?.start_time)
    }

    /// Declared number of integrations, when the header announces one
    pub fn num_time(&self) -> Result<Option<u32>, BdfError> {
        Ok(self.descriptor()?.declared_integration_count())
    }

    /// Correlation mode
    pub fn correlation_mode(&self) -> Result<CorrelationMode, BdfError> {
        Ok(self.descriptor()?.correlation_mode)
    }

    /// Processor type
    pub fn processor_type(&self) -> Result<ProcessorType, BdfError> {
        Ok(self.descriptor()?.processor_type)
    }

    /// Correlator type, when declared
    pub fn correlator_type(&self) -> Result<Option<CorrelatorType>, BdfError> {
        Ok(self.descriptor()?.correlator_type)
    }

    /// Spectral resolution type, when declared
    pub fn spectral_resolution(&self) -> Result<Option<SpectralResolutionType>, BdfError> {
        Ok(self.descriptor()?.spectral_resolution)
    }

    /// Abort announced by the global header
    pub fn abort(&self) -> Result<Option<&AbortObservation>, BdfError> {
        Ok(self.descriptor()?.abort.as_ref())
    }

    fn check(&self, operation: Operation) -> Result<(), BdfError> {
        if self.state.permits(operation) {
            Ok(())
        } else {
            Err(BdfError::Usage {
                operation,
                state: self.state,
            })
        }
    }

    fn test_end(&mut self) -> bool {
        let at_end = self
            .scanner
            .as_ref()
            .map_or(true, |s| s.at_closing_boundary(&self.top_boundary));
        if at_end && self.state != ReaderState::AtEnd {
            info!(
                "end of '{}' after {} subsets",
                self.source,
                self.integration_index.map_or(0, |i| i + 1)
            );
            self.state = ReaderState::AtEnd;
        }
        !at_end
    }

    fn decode_next(&mut self, subset: &mut Subset) -> Result<(), BdfError> {
        let integration = self.integration_index.map_or(0, |i| i + 1);
        self.integration_index = Some(integration);

        let (Some(scanner), Some(descriptor)) = (self.scanner.as_mut(), self.descriptor.as_ref())
        else {
            return Err(BdfError::Usage {
                operation: Operation::Read,
                state: self.state,
            });
        };
        let ctx = SubsetContext {
            descriptor,
            config: &self.config,
            integration,
        };
        read_subset(scanner, &ctx, subset)
    }

    fn fill_batch(&mut self, n: usize) -> Result<&[Subset], BdfError> {
        self.batch.clear();
        while self.batch.len() < n && self.test_end() {
            let mut subset = Subset::default();
            if let Err(e) = self.decode_next(&mut subset) {
                self.batch.clear();
                return Err(e);
            }
            self.batch.push(subset);
            self.state = ReaderState::Reading;
        }
        debug!("batch of {} subsets from '{}'", self.batch.len(), self.source);
        Ok(&self.batch)
    }

    fn reset(&mut self) {
        self.current.release();
        self.batch.clear();
        self.scanner = None;
        self.descriptor = None;
        self.top_boundary.clear();
        self.integration_index = None;
        self.state = ReaderState::NoStream;
    }
}

/// Read the MIME preamble and the global header part
///
/// Leaves the scanner on the top boundary that follows the global header.
fn read_preamble<R: BufRead>(
    scanner: &mut LineScanner<R>,
    config: &ReaderConfig,
) -> Result<(String, GlobalDescriptor), BdfError> {
    if !is_mime_version_line(scanner.next_line()?) {
        return Err(BdfError::format(
            format!("expected 'MIME-Version: 1.0', found '{}'", scanner.current_line()),
            0,
        ));
    }

    let offset = scanner.position();
    let content_type = scanner.require_header_field("CONTENT-TYPE")?;
    let boundary = boundary_from_content_type(&content_type).map_err(|e| {
        BdfError::format(
            format!("{:?} boundary in top-level Content-Type '{}'", e, content_type),
            offset,
        )
    })?;
    debug!("top-level boundary '{}'", boundary);

    // Content-Description and Content-Location are not needed
    scanner.skip_until_empty_line(config.header_scan_lines)?;
    scanner.require_boundary(&boundary, config.header_scan_lines)?;
    scanner.skip_until_empty_line(config.header_scan_lines)?;

    let xml = scanner.accumulate_until_boundary(&boundary, config.body_scan_lines)?;
    let descriptor = decode_global_header(&xml).map_err(BdfError::GlobalHeader)?;
    Ok((boundary, descriptor))
}
