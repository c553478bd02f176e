use anyhow::Result;
use log::info;
use std::path::PathBuf;

use super::Config;

/// Validate BDF file integrity
pub fn run(file: PathBuf, config: Option<PathBuf>) -> Result<()> {
    use almabdf::validator::validate_bdf_file_with_config;

    let config = Config::load(config.as_deref())?;

    info!("BDF Validator");
    info!("=============");
    info!("File: {}", file.display());
    info!("");

    match validate_bdf_file_with_config(&file, config.reader) {
        Ok(report) => {
            #[cfg(feature = "colorized_output")]
            {
                println!("{}", report.format_colored());
            }

            #[cfg(not(feature = "colorized_output"))]
            {
                println!("{}", report);
            }

            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
