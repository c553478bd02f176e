//! # BDF Validation Module
//!
//! Whole-file integrity validation for ALMA BDF files. Where the streaming
//! reader stops at the first problem, the validator keeps going as far as it
//! can and reports every check it ran.
//!
//! ## Validation Checklist
//!
//! 1. **Global Header**: the MIME preamble and global XML header decode, and
//!    the declared attachments agree with the correlation mode
//! 2. **Subsets**: every subset decodes, integration numbers increase, the
//!    subset count matches the declared integration count
//!
//! ## Usage
//!
//! ```rust,no_run
//! use almabdf::validator::validate_bdf_file;
//! use std::path::Path;
//!
//! let report = validate_bdf_file(Path::new("integrations.bdf"))?;
//! println!("{}", report);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::Path;

use anyhow::Result;

use crate::bdf::{BdfStreamReader, ReaderConfig};

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod global;
mod report;
mod subsets;

/// Validate a BDF file with the default scan bounds
pub fn validate_bdf_file(path: &Path) -> Result<ValidationReport> {
    validate_bdf_file_with_config(path, ReaderConfig::default())
}

/// Validate a BDF file with explicit scan bounds
pub fn validate_bdf_file_with_config(path: &Path, config: ReaderConfig) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(path.display().to_string());
    let mut reader: BdfStreamReader = BdfStreamReader::with_config(config);

    // 1. Global header
    if !global::check_global_header(path, &mut reader, &mut report)? {
        return Ok(report);
    }

    // 2. Subsets
    subsets::check_subsets(&mut reader, &mut report)?;

    reader.close();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_report_display() {
        let mut report = ValidationReport::new("test.bdf");
        report.add_check(ValidationCheck::ok("Test check 1"));
        report.add_check(ValidationCheck::warning("Test check 2", "This is a warning"));
        report.add_check(ValidationCheck::failed("Test check 3", "This failed"));

        let output = format!("{}", report);
        assert!(output.contains("BDF Validation Report"));
        assert!(output.contains("✓"));
        assert!(output.contains("⚠"));
        assert!(output.contains("✗"));
        assert!(output.contains("1 passed, 1 warnings, 1 failed"));
        assert!(output.contains("Validation FAILED"));
    }

    #[test]
    fn test_colored_report_lists_checks_and_counts() {
        let mut report = ValidationReport::new("uid___X1_X2_X3.bdf");
        report.add_check(ValidationCheck::ok("Global header"));
        report.add_check(ValidationCheck::warning("Integration count", "numTime not declared"));

        let output = report.format_colored();
        assert!(output.contains("uid___X1_X2_X3.bdf"));
        assert!(output.contains("Global header"));
        assert!(output.contains("numTime not declared"));
        assert!(output.contains("Validation PASSED with warnings"));
        assert!(output.contains("1 passed, 1 warnings, 0 failed"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let report = validate_bdf_file(Path::new("/nonexistent/integrations.bdf")).unwrap();
        assert!(report.has_failures());
        assert_eq!(report.checks.len(), 1);
    }
}
