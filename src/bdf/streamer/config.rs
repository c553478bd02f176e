use serde::Deserialize;

/// Scan bounds used by [`BdfStreamReader`](super::BdfStreamReader)
///
/// Every search through the MIME structure reads at most a fixed number of
/// lines, so a corrupt stream fails with a format error instead of being
/// consumed to the end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Lines allowed while looking for a boundary or the blank line ending
    /// a MIME header block
    pub header_scan_lines: usize,
    /// Lines allowed while accumulating an XML header body
    pub body_scan_lines: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            header_scan_lines: 10,
            body_scan_lines: 100,
        }
    }
}
