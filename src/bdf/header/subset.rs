//! Decoders for the `<sdmDataSubsetHeader>` document of each integration

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::helpers::{
    element_name, get_attribute, parse_project_path, parse_value, require_attribute,
};
use super::HeaderError;
use crate::bdf::models::{
    AbortObservation, AttachmentKind, CorrelationMode, CrossDataType, GlobalDescriptor,
    ProjectPath, SubsetHeader,
};

/// Which flavour of subset header to expect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsetSchema {
    /// Correlator data: project path carries the integration number (and
    /// optionally the subintegration number), cross data declares its type
    Correlator,
    /// Total power data: three-number project path, `autoData` mandatory
    TotalPower,
}

impl SubsetSchema {
    /// Schema used for the subsets of a stream
    pub fn for_descriptor(descriptor: &GlobalDescriptor) -> Self {
        if descriptor.is_correlation() {
            SubsetSchema::Correlator
        } else {
            SubsetSchema::TotalPower
        }
    }

    fn path_lengths(&self) -> &'static [usize] {
        match self {
            SubsetSchema::Correlator => &[4, 5],
            SubsetSchema::TotalPower => &[3],
        }
    }
}

/// Decode one subset header, checking it against the global descriptor
pub fn decode_subset_header(
    xml: &str,
    global: &GlobalDescriptor,
    schema: SubsetSchema,
) -> Result<SubsetHeader, HeaderError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = SubsetHeaderState::default();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                state.start_element(e, global, schema)?;
                current = Some(element_name(e)?);
            }
            Event::Empty(ref e) => {
                state.start_element(e, global, schema)?;
            }
            Event::Text(ref t) => {
                if let Some(name) = current.as_deref() {
                    let text = t.unescape()?;
                    state.text(name, &text)?;
                }
            }
            Event::End(_) => current = None,
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish(global.correlation_mode, schema)
}

#[derive(Default)]
struct SubsetHeaderState {
    seen_root: bool,
    header: SubsetHeader,
    raw_cross_type: Option<String>,
    aborted: bool,
    stop_time: Option<i64>,
    abort_reason: Option<String>,
}

impl SubsetHeaderState {
    fn start_element(
        &mut self,
        e: &BytesStart,
        global: &GlobalDescriptor,
        schema: SubsetSchema,
    ) -> Result<(), HeaderError> {
        let name = element_name(e)?;
        match name.as_str() {
            "sdmDataSubsetHeader" => {
                self.seen_root = true;
                let path = require_attribute(e, "projectPath")?;
                let numbers = parse_project_path(&path, schema.path_lengths())?;
                let project_path = ProjectPath {
                    exec_block_num: numbers[0],
                    scan_num: numbers[1],
                    subscan_num: numbers[2],
                };
                if project_path != global.project_path {
                    return Err(HeaderError::ProjectPathMismatch {
                        subset: path,
                        global: global.project_path.to_string(),
                    });
                }
                self.header.project_path = project_path;
                self.header.integration_num = numbers.get(3).copied();
                self.header.subintegration_num = numbers.get(4).copied();
            }
            "dataStruct" => {
                self.header.data_struct_ref = get_attribute(e, "ref")?.unwrap_or_default();
            }
            "abortObservation" => self.aborted = true,
            other => {
                if let Some(kind) = AttachmentKind::from_name(other) {
                    let href = require_attribute(e, "href")?;
                    if kind == AttachmentKind::CrossData && schema == SubsetSchema::Correlator {
                        self.raw_cross_type = Some(require_attribute(e, "type")?);
                    }
                    self.header.refs.insert(kind, href);
                }
            }
        }
        Ok(())
    }

    fn text(&mut self, element: &str, text: &str) -> Result<(), HeaderError> {
        match element {
            "time" => self.header.time = parse_value(element, text)?,
            "interval" => self.header.interval = parse_value(element, text)?,
            "stopTime" => self.stop_time = Some(parse_value(element, text)?),
            "abortReason" => self.abort_reason = Some(text.to_string()),
            _ => {}
        }
        Ok(())
    }

    fn finish(
        mut self,
        mode: CorrelationMode,
        schema: SubsetSchema,
    ) -> Result<SubsetHeader, HeaderError> {
        if !self.seen_root {
            return Err(HeaderError::MissingElement("sdmDataSubsetHeader"));
        }

        if let Some(raw) = self.raw_cross_type.take() {
            self.header.cross_data_type = Some(
                CrossDataType::from_literal(&raw)
                    .ok_or(HeaderError::UnsupportedCrossDataType(raw))?,
            );
        }

        if self.aborted {
            self.header.abort = Some(AbortObservation {
                stop_time: self.stop_time.unwrap_or_default(),
                reason: self.abort_reason.unwrap_or_default(),
            });
            return Ok(self.header);
        }

        let refs: &BTreeMap<AttachmentKind, String> = &self.header.refs;
        match schema {
            SubsetSchema::Correlator => {
                if mode.has_cross() && !refs.contains_key(&AttachmentKind::CrossData) {
                    return Err(HeaderError::MissingElement("crossData"));
                }
                if mode.has_auto() && !refs.contains_key(&AttachmentKind::AutoData) {
                    return Err(HeaderError::MissingElement("autoData"));
                }
            }
            SubsetSchema::TotalPower => {
                if !refs.contains_key(&AttachmentKind::AutoData) {
                    return Err(HeaderError::MissingElement("autoData"));
                }
            }
        }
        Ok(self.header)
    }
}
