use std::path::Path;

use anyhow::Result;

use crate::bdf::models::{AttachmentKind, CorrelatorType, GlobalDescriptor};
use crate::bdf::BdfStreamReader;

use super::{ValidationCheck, ValidationReport};

/// Step 1: open the stream and check the global header
///
/// Returns `false` when the stream could not be opened, in which case no
/// further check can run.
pub(crate) fn check_global_header(
    path: &Path,
    reader: &mut BdfStreamReader,
    report: &mut ValidationReport,
) -> Result<bool> {
    if let Err(e) = reader.open(path) {
        report.add_check(ValidationCheck::failed(
            "Global header readable",
            format!("{} ({})", e, e.kind()),
        ));
        return Ok(false);
    }

    let descriptor = reader.descriptor()?;
    report.add_check(ValidationCheck::ok(format!(
        "Global header readable ({} {}, {})",
        descriptor.processor_type,
        descriptor.correlation_mode,
        descriptor.byte_order.name()
    )));

    check_declared_attachments(descriptor, report);
    check_zero_lags(descriptor, report);
    check_spectral_windows(descriptor, report);
    Ok(true)
}

fn check_declared_attachments(descriptor: &GlobalDescriptor, report: &mut ValidationReport) {
    let name = "Declared attachments match correlation mode";
    let mode = descriptor.correlation_mode;
    let mut missing = Vec::new();
    if mode.has_cross() && descriptor.declared_size(AttachmentKind::CrossData).is_none() {
        missing.push(AttachmentKind::CrossData.name());
    }
    if mode.has_auto() && descriptor.declared_size(AttachmentKind::AutoData).is_none() {
        missing.push(AttachmentKind::AutoData.name());
    }

    if missing.is_empty() {
        report.add_check(ValidationCheck::ok(name));
    } else {
        report.add_check(ValidationCheck::failed(
            name,
            format!("mode {} requires {} but no size is declared", mode, missing.join(", ")),
        ));
    }
}

fn check_zero_lags(descriptor: &GlobalDescriptor, report: &mut ValidationReport) {
    if descriptor.declared_size(AttachmentKind::ZeroLags).is_none() {
        return;
    }
    let name = "zeroLags compatible with correlator";
    if descriptor.correlator_type == Some(CorrelatorType::Fx) || !descriptor.is_correlation() {
        report.add_check(ValidationCheck::warning(
            name,
            format!(
                "zeroLags declared for {} {}, any subset carrying them will be rejected",
                descriptor.processor_type,
                descriptor
                    .correlator_type
                    .map_or("(no correlator type)".to_string(), |t| t.to_string())
            ),
        ));
    } else {
        report.add_check(ValidationCheck::ok(name));
    }
}

fn check_spectral_windows(descriptor: &GlobalDescriptor, report: &mut ValidationReport) {
    let name = "Basebands declared";
    let windows: usize = descriptor
        .basebands
        .iter()
        .map(|bb| bb.spectral_windows.len())
        .sum();
    if windows == 0 {
        report.add_check(ValidationCheck::warning(name, "no spectral window is declared"));
    } else {
        report.add_check(ValidationCheck::ok(format!(
            "{} ({} basebands, {} spectral windows)",
            name,
            descriptor.basebands.len(),
            windows
        )));
    }
}
