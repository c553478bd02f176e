//! Locating, reading and checking the binary attachments of a subset

use std::io::BufRead;

use log::{debug, warn};

use super::mime::attachment_from_location;
use super::scanner::LineScanner;
use super::subset_part::SubsetContext;
use super::BdfError;
use crate::bdf::models::{
    Attachment, AttachmentKind, AttachmentSet, CorrelationMode, CorrelatorType, ProcessorType,
    Subset,
};

/// Read attachments until the closing inner boundary
///
/// Expects the current line to be an inner boundary opening the first
/// attachment.
pub(super) fn read_attachments<R: BufRead>(
    scanner: &mut LineScanner<R>,
    ctx: &SubsetContext<'_>,
    boundary: &str,
    subset: &mut Subset,
) -> Result<(), BdfError> {
    let byte_order = ctx.descriptor.byte_order;
    let cross_data_type = subset.header().cross_data_type;

    loop {
        let part_offset = scanner.position();
        scanner.require_header_field("CONTENT-TYPE")?;
        let location = scanner.require_header_field("CONTENT-LOCATION")?;
        let kind = attachment_from_location(&location).ok_or_else(|| {
            BdfError::format(
                format!(
                    "integration #{}: '{}' does not name a binary attachment",
                    ctx.integration, location
                ),
                part_offset,
            )
        })?;

        let count = ctx
            .descriptor
            .declared_size(kind)
            .ok_or(BdfError::Size {
                integration: ctx.integration,
                attachment: kind,
            })?;
        scanner.skip_until_empty_line(ctx.config.header_scan_lines)?;

        let element_type = kind.element_type(cross_data_type).ok_or_else(|| {
            BdfError::format(
                format!(
                    "integration #{}: the subset header does not declare the type of crossData",
                    ctx.integration
                ),
                part_offset,
            )
        })?;

        let offset = scanner.position();
        let expected = usize::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(element_type.width()))
            .ok_or_else(|| {
                BdfError::format(
                    format!("declared size {} of '{}' is too large", count, kind),
                    offset,
                )
            })?;
        let data = scanner.read_bytes(expected)?;
        if data.len() < expected {
            return Err(BdfError::ShortRead {
                integration: ctx.integration,
                attachment: kind,
                offset,
                expected,
                actual: data.len(),
            });
        }
        debug!(
            "integration #{}: read {} x {:?} of '{}' at byte {}",
            ctx.integration, count, element_type, kind, offset
        );

        if !subset.insert_attachment(Attachment::new(kind, element_type, offset, byte_order, data)) {
            return Err(BdfError::format(
                format!(
                    "integration #{}: attachment '{}' appears twice",
                    ctx.integration, kind
                ),
                part_offset,
            ));
        }

        // line break after the binary payload
        if !scanner.next_line()?.is_empty() {
            warn!(
                "integration #{}: unexpected text after '{}': '{}'",
                ctx.integration,
                kind,
                scanner.current_line()
            );
        }

        let line_offset = scanner.position();
        scanner.next_line()?;
        if !scanner.at_boundary(boundary) {
            return Err(BdfError::format(
                format!(
                    "integration #{}: expected the boundary '--{}' after '{}', found '{}'",
                    ctx.integration,
                    boundary,
                    kind,
                    scanner.current_line()
                ),
                line_offset,
            ));
        }
        if scanner.at_closing_boundary(boundary) {
            return Ok(());
        }
    }
}

/// Check the attachments of a subset against the acquisition mode and the
/// correlator type
pub(super) fn validate_presence(
    ctx: &SubsetContext<'_>,
    presence: AttachmentSet,
) -> Result<(), BdfError> {
    let domain = |message: String| BdfError::Domain {
        integration: ctx.integration,
        message,
    };
    let descriptor = ctx.descriptor;
    let mode = descriptor.correlation_mode;
    let has_cross = presence.contains(AttachmentKind::CrossData);
    let has_auto = presence.contains(AttachmentKind::AutoData);

    match mode {
        CorrelationMode::CrossOnly if !has_cross => {
            return Err(domain(format!("crossData is missing in mode {}", mode)))
        }
        CorrelationMode::CrossOnly if has_auto => {
            return Err(domain(format!("autoData is not allowed in mode {}", mode)))
        }
        CorrelationMode::AutoOnly if !has_auto => {
            return Err(domain(format!("autoData is missing in mode {}", mode)))
        }
        CorrelationMode::AutoOnly if has_cross => {
            return Err(domain(format!("crossData is not allowed in mode {}", mode)))
        }
        CorrelationMode::CrossAndAuto if !(has_cross && has_auto) => {
            return Err(domain(format!(
                "crossData and autoData are both required in mode {}",
                mode
            )))
        }
        _ => {}
    }

    if presence.contains(AttachmentKind::ZeroLags) {
        if descriptor.correlator_type == Some(CorrelatorType::Fx) {
            return Err(domain(
                "zeroLags are not allowed with an FX correlator".to_string(),
            ));
        }
        if descriptor.processor_type != ProcessorType::Correlator {
            return Err(domain(format!(
                "zeroLags are not allowed with processor type {}",
                descriptor.processor_type
            )));
        }
    }
    Ok(())
}
