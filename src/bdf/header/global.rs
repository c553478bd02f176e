//! Decoder for the `<sdmDataHeader>` document of the first MIME part

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::helpers::{
    bool_attribute, element_name, get_attribute, list_attribute, parse_literal,
    parse_project_path, parse_value, require_attribute,
};
use super::HeaderError;
use crate::bdf::models::{
    AbortObservation, AttachmentKind, Baseband, BinaryPart, ByteOrder, CorrelationMode,
    CorrelatorType, GlobalDescriptor, ProcessorType, ProjectPath, SpectralResolutionType,
    SpectralWindow,
};

/// Decode the global header document into a [`GlobalDescriptor`]
pub fn decode_global_header(xml: &str) -> Result<GlobalDescriptor, HeaderError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = GlobalHeaderState::default();
    let mut stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                state.start_element(e, &stack)?;
                stack.push(element_name(e)?);
            }
            Event::Empty(ref e) => {
                state.start_element(e, &stack)?;
            }
            Event::Text(ref t) => {
                if let Some(current) = stack.last() {
                    let text = t.unescape()?;
                    state.text(current, &text)?;
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}

#[derive(Default)]
struct GlobalHeaderState {
    seen_root: bool,
    seen_data_struct: bool,
    schema_version: Option<u32>,
    byte_order: Option<ByteOrder>,
    project_path: Option<ProjectPath>,
    start_time: Option<i64>,
    data_oid: String,
    title: String,
    dimensionality: u32,
    num_time: Option<u32>,
    exec_block_uid: String,
    num_antenna: u32,
    correlation_mode: Option<CorrelationMode>,
    spectral_resolution: Option<SpectralResolutionType>,
    processor_type: Option<ProcessorType>,
    correlator_type: Option<CorrelatorType>,
    apc: Vec<String>,
    basebands: Vec<Baseband>,
    binary_parts: Vec<(AttachmentKind, BinaryPart)>,
    abort_stop_time: Option<i64>,
    abort_reason: Option<String>,
    aborted: bool,
}

impl GlobalHeaderState {
    fn start_element(&mut self, e: &BytesStart, stack: &[String]) -> Result<(), HeaderError> {
        let name = element_name(e)?;
        let parent = stack.last().map(String::as_str);

        match name.as_str() {
            "sdmDataHeader" => {
                self.seen_root = true;
                self.schema_version = get_attribute(e, "schemaVersion")?
                    .map(|v| parse_value("schemaVersion", &v))
                    .transpose()?;
                let byte_order = require_attribute(e, "byteOrder")?;
                self.byte_order = Some(parse_literal("byteOrder", &byte_order, ByteOrder::from_literal)?);
                let path = require_attribute(e, "projectPath")?;
                let numbers = parse_project_path(&path, &[3])?;
                self.project_path = Some(ProjectPath {
                    exec_block_num: numbers[0],
                    scan_num: numbers[1],
                    subscan_num: numbers[2],
                });
            }
            "dataOID" => {
                self.data_oid = get_attribute(e, "href")?.unwrap_or_default();
                self.title = get_attribute(e, "title")?.unwrap_or_default();
            }
            "execBlock" => {
                self.exec_block_uid = get_attribute(e, "href")?.unwrap_or_default();
            }
            "abortObservation" => self.aborted = true,
            "dataStruct" => {
                self.seen_data_struct = true;
                self.apc = list_attribute(e, "apc")?;
            }
            "baseband" => {
                self.basebands.push(Baseband {
                    name: require_attribute(e, "name")?,
                    spectral_windows: Vec::new(),
                });
            }
            "spectralWindow" => {
                let window = self.spectral_window(e)?;
                self.basebands
                    .last_mut()
                    .ok_or(HeaderError::MissingElement("baseband"))?
                    .spectral_windows
                    .push(window);
            }
            other if parent == Some("dataStruct") => {
                if let Some(kind) = AttachmentKind::from_name(other) {
                    self.binary_part(kind, e)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn spectral_window(&self, e: &BytesStart) -> Result<SpectralWindow, HeaderError> {
        let mode = self
            .correlation_mode
            .ok_or(HeaderError::MissingElement("correlationMode"))?;

        let mut window = SpectralWindow {
            sw: get_attribute(e, "sw")?.unwrap_or_default(),
            swbb: get_attribute(e, "swbb")?.unwrap_or_default(),
            image: get_attribute(e, "image")?,
            num_spectral_point: parse_value(
                "numSpectralPoint",
                &require_attribute(e, "numSpectralPoint")?,
            )?,
            num_bin: parse_value("numBin", &require_attribute(e, "numBin")?)?,
            sideband: require_attribute(e, "sideband")?,
            ..Default::default()
        };

        if mode.has_cross() {
            window.cross_pol_products = list_attribute(e, "crossPolProducts")?;
            window.scale_factor = Some(parse_value(
                "scaleFactor",
                &require_attribute(e, "scaleFactor")?,
            )?);
        }
        if mode.has_auto() {
            window.sd_pol_products = list_attribute(e, "sdPolProducts")?;
        }
        Ok(window)
    }

    fn binary_part(&mut self, kind: AttachmentKind, e: &BytesStart) -> Result<(), HeaderError> {
        let size = parse_value(kind.name(), &require_attribute(e, "size")?)?;
        let normalized = if kind == AttachmentKind::AutoData {
            bool_attribute(e, "normalized")?
        } else {
            None
        };
        if kind == AttachmentKind::ZeroLags {
            if let Some(literal) = get_attribute(e, "correlatorType")? {
                self.correlator_type = Some(parse_literal(
                    "correlatorType",
                    &literal,
                    CorrelatorType::from_literal,
                )?);
            }
        }

        self.binary_parts.push((
            kind,
            BinaryPart {
                size,
                axes: list_attribute(e, "axes")?,
                normalized,
            },
        ));
        Ok(())
    }

    fn text(&mut self, element: &str, text: &str) -> Result<(), HeaderError> {
        match element {
            "startTime" => self.start_time = Some(parse_value(element, text)?),
            "dimensionality" => self.dimensionality = parse_value(element, text)?,
            "numTime" => self.num_time = Some(parse_value(element, text)?),
            "numAntenna" => self.num_antenna = parse_value(element, text)?,
            "correlationMode" => {
                self.correlation_mode =
                    Some(parse_literal(element, text, CorrelationMode::from_literal)?)
            }
            "spectralResolution" => {
                self.spectral_resolution = Some(parse_literal(
                    element,
                    text,
                    SpectralResolutionType::from_literal,
                )?)
            }
            "processorType" => {
                self.processor_type = Some(parse_literal(element, text, ProcessorType::from_literal)?)
            }
            "stopTime" => self.abort_stop_time = Some(parse_value(element, text)?),
            "abortReason" => self.abort_reason = Some(text.to_string()),
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<GlobalDescriptor, HeaderError> {
        if !self.seen_root {
            return Err(HeaderError::MissingElement("sdmDataHeader"));
        }
        let byte_order = self
            .byte_order
            .ok_or(HeaderError::MissingElement("sdmDataHeader"))?;
        let correlation_mode = self
            .correlation_mode
            .ok_or(HeaderError::MissingElement("correlationMode"))?;
        let processor_type = self
            .processor_type
            .ok_or(HeaderError::MissingElement("processorType"))?;
        let start_time = self.start_time.ok_or(HeaderError::MissingElement("startTime"))?;
        if !self.seen_data_struct {
            return Err(HeaderError::MissingElement("dataStruct"));
        }

        let mut descriptor = GlobalDescriptor::new(byte_order, correlation_mode, processor_type);
        descriptor.schema_version = self.schema_version;
        descriptor.project_path = self.project_path.unwrap_or_default();
        descriptor.start_time = start_time;
        descriptor.data_oid = self.data_oid;
        descriptor.title = self.title;
        descriptor.dimensionality = self.dimensionality;
        descriptor.num_time = if self.dimensionality == 0 {
            self.num_time
        } else {
            None
        };
        descriptor.exec_block_uid = self.exec_block_uid;
        descriptor.num_antenna = self.num_antenna;
        descriptor.spectral_resolution = self.spectral_resolution;
        descriptor.correlator_type = self.correlator_type;
        descriptor.apc = self.apc;
        descriptor.basebands = self.basebands;
        descriptor.binary_parts = self.binary_parts.into_iter().collect();
        if self.aborted {
            descriptor.abort = Some(AbortObservation {
                stop_time: self.abort_stop_time.unwrap_or_default(),
                reason: self.abort_reason.unwrap_or_default(),
            });
        }

        resolve_images(&mut descriptor.basebands)?;
        descriptor.derive_attachment_sizes();
        Ok(descriptor)
    }
}

/// Link each spectral window naming an `image` to that window's index
fn resolve_images(basebands: &mut [Baseband]) -> Result<(), HeaderError> {
    for (ibb, baseband) in basebands.iter_mut().enumerate() {
        let index_of: HashMap<String, usize> = baseband
            .spectral_windows
            .iter()
            .enumerate()
            .filter(|(_, spw)| !spw.sw.is_empty())
            .map(|(i, spw)| (spw.sw.clone(), i))
            .collect();

        for (ispw, spw) in baseband.spectral_windows.iter_mut().enumerate() {
            let Some(image) = spw.image.as_ref().filter(|image| !image.is_empty()) else {
                continue;
            };
            match index_of.get(image) {
                Some(&i) => spw.image_index = Some(i),
                None => {
                    return Err(HeaderError::UndefinedImage {
                        baseband: ibb,
                        window: ispw,
                        image: image.clone(),
                    })
                }
            }
        }
    }
    Ok(())
}
