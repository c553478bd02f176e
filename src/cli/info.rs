use anyhow::{Context, Result};
use std::path::PathBuf;

use almabdf::bdf::BdfStreamReader;

/// Display the global header of a BDF file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let mut reader = BdfStreamReader::new();
    reader
        .open(&file)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let d = reader.descriptor()?;

    println!("BDF File Information");
    println!("====================");
    println!("File: {}", file.display());
    println!();

    println!("Global Header:");
    println!("  Title: {}", d.title);
    println!("  Data OID: {}", d.data_oid);
    println!("  Exec block: {}", d.exec_block_uid);
    println!("  Project path: {}", d.project_path);
    if let Some(version) = d.schema_version {
        println!("  Schema version: {}", version);
    }
    println!("  Byte order: {}", d.byte_order.name());
    match d.start_time_utc() {
        Some(utc) => println!("  Start time: {} ({})", d.start_time, utc.to_rfc3339()),
        None => println!("  Start time: {}", d.start_time),
    }
    match d.declared_integration_count() {
        Some(n) => println!("  Integrations declared: {}", n),
        None => println!("  Integrations declared: -"),
    }
    println!("  Antennas: {}", d.num_antenna);
    println!("  Correlation mode: {}", d.correlation_mode);
    println!("  Processor type: {}", d.processor_type);
    if let Some(t) = d.correlator_type {
        println!("  Correlator type: {}", t);
    }
    if let Some(r) = d.spectral_resolution {
        println!("  Spectral resolution: {}", r.name());
    }
    if !d.apc.is_empty() {
        println!("  APC: {}", d.apc.join(" "));
    }
    if let Some(abort) = &d.abort {
        println!("  Aborted at {}: {}", abort.stop_time, abort.reason);
    }
    println!();

    println!("Basebands:");
    for baseband in &d.basebands {
        println!("  {}", baseband.name);
        for spw in &baseband.spectral_windows {
            let image = spw
                .image_index
                .map_or(String::new(), |i| format!(", image of #{}", i));
            println!(
                "    sw {}: {} points, {} bins, {}{}",
                spw.sw, spw.num_spectral_point, spw.num_bin, spw.sideband, image
            );
        }
    }
    println!();

    println!("Declared Attachments:");
    for (kind, part) in &d.binary_parts {
        println!("  {:16} {:>10}  [{}]", kind.name(), part.size, part.axes.join(" "));
    }

    reader.close();
    Ok(())
}
