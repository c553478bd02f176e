//! Decoding of one subset MIME part

use std::io::BufRead;

use log::{debug, warn};

use super::attachments::{read_attachments, validate_presence};
use super::mime::boundary_from_content_type;
use super::scanner::LineScanner;
use super::{BdfError, ReaderConfig};
use crate::bdf::header::{decode_subset_header, SubsetSchema};
use crate::bdf::models::{GlobalDescriptor, Subset};

/// Everything a subset decode needs besides the scanner and the target
pub(super) struct SubsetContext<'a> {
    pub descriptor: &'a GlobalDescriptor,
    pub config: &'a ReaderConfig,
    pub integration: usize,
}

/// Decode the subset whose top boundary is the current line
///
/// On success the current line is the one following the subset's closing
/// inner boundary, normally the next top-level boundary.
pub(super) fn read_subset<R: BufRead>(
    scanner: &mut LineScanner<R>,
    ctx: &SubsetContext<'_>,
    subset: &mut Subset,
) -> Result<(), BdfError> {
    subset.reset(ctx.integration, scanner.position());
    let offset = scanner.position();

    let content_type = scanner.require_header_field("CONTENT-TYPE")?;
    let boundary = boundary_from_content_type(&content_type).map_err(|e| {
        BdfError::format(
            format!(
                "integration #{}: {:?} boundary in '{}'",
                ctx.integration, e, content_type
            ),
            offset,
        )
    })?;
    let description = scanner.require_header_field("CONTENT-DESCRIPTION")?;
    debug!(
        "integration #{} at byte {}: boundary '{}', {}",
        ctx.integration,
        subset.starts_at(),
        boundary,
        description
    );

    scanner.require_boundary(&boundary, ctx.config.header_scan_lines)?;
    scanner.skip_until_empty_line(ctx.config.header_scan_lines)?;
    let xml = scanner.accumulate_until_boundary(&boundary, ctx.config.body_scan_lines)?;

    let schema = SubsetSchema::for_descriptor(ctx.descriptor);
    let header = decode_subset_header(&xml, ctx.descriptor, schema).map_err(|source| {
        BdfError::SubsetHeader {
            integration: ctx.integration,
            source,
        }
    })?;
    let aborted = header.abort.is_some();
    if let Some(abort) = &header.abort {
        warn!(
            "integration #{} cancels the observation at {}: {}",
            ctx.integration, abort.stop_time, abort.reason
        );
    }
    subset.set_header(header);
    subset.clear_attachments();

    if !scanner.at_closing_boundary(&boundary) {
        read_attachments(scanner, ctx, &boundary, subset)?;
    }
    if !aborted {
        validate_presence(ctx, subset.presence())?;
    }

    // the line after the closing inner boundary
    scanner.next_line()?;
    Ok(())
}
