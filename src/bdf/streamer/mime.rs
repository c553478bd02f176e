//! The little MIME a BDF stream uses
//!
//! This is not a general MIME parser. It knows header fields, the
//! `boundary` parameter of `Content-Type`, and the `Content-Location`
//! values naming binary attachments.

use crate::bdf::models::AttachmentKind;

/// Split `Name: value` into the uppercased name and the trimmed value
pub fn split_header_field(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim().to_ascii_uppercase();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim().to_string()))
}

/// Why a `Content-Type` value did not yield a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryError {
    /// No `boundary` parameter
    Missing,
    /// More than one `boundary` parameter
    Ambiguous,
}

/// Extract the `boundary` parameter of a `Content-Type` value
///
/// The parameter name is matched case-insensitively and the value may be
/// quoted.
pub fn boundary_from_content_type(value: &str) -> Result<String, BoundaryError> {
    let mut found = value.split(';').filter_map(|parameter| {
        let (name, value) = parameter.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("boundary") {
            return None;
        }
        let value = value.trim();
        let unquoted = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Some(unquoted.to_string())
    });

    match (found.next(), found.next()) {
        (Some(boundary), None) if !boundary.is_empty() => Ok(boundary),
        (Some(_), None) | (None, _) => Err(BoundaryError::Missing),
        (Some(_), Some(_)) => Err(BoundaryError::Ambiguous),
    }
}

/// Identify the attachment named by a `Content-Location` value
///
/// The location must end with `<digits>/<name>.bin`, where `<name>` is one
/// of the six attachment names.
pub fn attachment_from_location(location: &str) -> Option<AttachmentKind> {
    let path = location.trim().strip_suffix(".bin")?;
    let (prefix, name) = path.rsplit_once('/')?;
    if !prefix.ends_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    AttachmentKind::from_name(name)
}

/// Whether the first line of a stream declares MIME version 1.0
pub fn is_mime_version_line(line: &str) -> bool {
    line.trim().to_ascii_uppercase().ends_with("IME-VERSION: 1.0")
}

/// `--boundary`
pub fn delimiter(boundary: &str) -> String {
    format!("--{}", boundary)
}

/// `--boundary--`
pub fn closing_delimiter(boundary: &str) -> String {
    format!("--{}--", boundary)
}
