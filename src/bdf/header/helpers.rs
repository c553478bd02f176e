use std::str::FromStr;

use quick_xml::events::BytesStart;

use super::HeaderError;

/// Local name of an element, without its namespace prefix
pub(super) fn element_name(e: &BytesStart) -> Result<String, HeaderError> {
    Ok(std::str::from_utf8(e.local_name().as_ref())?.to_string())
}

/// Get an attribute value by local name, so `xlink:href` matches `href`
pub(super) fn get_attribute(e: &BytesStart, name: &str) -> Result<Option<String>, HeaderError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| HeaderError::XmlError(quick_xml::Error::from(e)))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

pub(super) fn require_attribute(e: &BytesStart, name: &'static str) -> Result<String, HeaderError> {
    get_attribute(e, name)?.ok_or_else(|| HeaderError::MissingAttribute {
        element: element_name(e).unwrap_or_default(),
        attribute: name,
    })
}

pub(super) fn parse_value<T: FromStr>(field: &str, value: &str) -> Result<T, HeaderError> {
    value.trim().parse().map_err(|_| HeaderError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

pub(super) fn parse_literal<T>(
    field: &str,
    value: &str,
    from_literal: impl Fn(&str) -> Option<T>,
) -> Result<T, HeaderError> {
    from_literal(value.trim()).ok_or_else(|| HeaderError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Whitespace separated list attribute, empty when absent
pub(super) fn list_attribute(e: &BytesStart, name: &str) -> Result<Vec<String>, HeaderError> {
    Ok(get_attribute(e, name)?
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default())
}

pub(super) fn bool_attribute(e: &BytesStart, name: &str) -> Result<Option<bool>, HeaderError> {
    match get_attribute(e, name)?.as_deref().map(str::trim) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(HeaderError::InvalidValue {
            field: name.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Split a project path such as `3/1/4/` or `3/1/4/12/` into its numbers
///
/// The trailing slash is mandatory and the number of components must be one
/// of `allowed`.
pub(super) fn parse_project_path(path: &str, allowed: &[usize]) -> Result<Vec<u32>, HeaderError> {
    let invalid = || HeaderError::InvalidProjectPath(path.to_string());

    let body = path.strip_suffix('/').ok_or_else(invalid)?;
    let numbers = body
        .split('/')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u32>().map_err(|_| invalid())
        })
        .collect::<Result<Vec<_>, _>>()?;

    if allowed.contains(&numbers.len()) {
        Ok(numbers)
    } else {
        Err(invalid())
    }
}
