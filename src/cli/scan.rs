use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use almabdf::bdf::models::{ElementType, GlobalDescriptor, Subset};
use almabdf::bdf::{AttachmentKind, BdfStreamReader};

use super::Config;

#[derive(Serialize)]
struct AttachmentSummary {
    count: usize,
    element_type: ElementType,
    offset: u64,
}

#[derive(Serialize)]
struct SubsetSummary {
    index: usize,
    starts_at: u64,
    integration_num: Option<u32>,
    subintegration_num: Option<u32>,
    time: i64,
    interval: i64,
    aborted: bool,
    attachments: BTreeMap<AttachmentKind, AttachmentSummary>,
}

impl From<&Subset> for SubsetSummary {
    fn from(subset: &Subset) -> Self {
        let header = subset.header();
        Self {
            index: subset.integration_index(),
            starts_at: subset.starts_at(),
            integration_num: header.integration_num,
            subintegration_num: header.subintegration_num,
            time: header.time,
            interval: header.interval,
            aborted: subset.is_aborted(),
            attachments: subset
                .attachments()
                .map(|a| {
                    (
                        a.kind(),
                        AttachmentSummary {
                            count: a.count(),
                            element_type: a.element_type(),
                            offset: a.offset(),
                        },
                    )
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct ScanDocument<'a> {
    file: String,
    header: &'a GlobalDescriptor,
    subsets: Vec<SubsetSummary>,
}

/// Stream every subset of a BDF file
pub fn run(
    file: PathBuf,
    batch: Option<usize>,
    json: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let batch_size = batch.or(config.scan.batch_size).filter(|n| *n > 0);

    let mut reader: BdfStreamReader = BdfStreamReader::with_config(config.reader);
    reader
        .open(&file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let start = Instant::now();
    let mut summaries = Vec::new();
    match batch_size {
        Some(n) => loop {
            let subsets = reader.next_subsets(n)?;
            if subsets.is_empty() {
                break;
            }
            info!("read a batch of {} subsets", subsets.len());
            summaries.extend(subsets.iter().map(SubsetSummary::from));
        },
        None => {
            while reader.has_subset()? {
                let subset = reader.get_subset()?;
                summaries.push(SubsetSummary::from(subset));
            }
        }
    }
    info!(
        "scanned {} subsets in {:.2?}",
        summaries.len(),
        start.elapsed()
    );

    if json {
        let document = ScanDocument {
            file: file.display().to_string(),
            header: reader.descriptor()?,
            subsets: summaries,
        };
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        for s in &summaries {
            let attachments: Vec<String> = s
                .attachments
                .iter()
                .map(|(kind, a)| format!("{}={}", kind, a.count))
                .collect();
            println!(
                "#{:<5} @{:<10} time={} interval={}{} {}",
                s.index,
                s.starts_at,
                s.time,
                s.interval,
                if s.aborted { " ABORTED" } else { "" },
                attachments.join(" ")
            );
        }
        println!("{} subsets", summaries.len());
    }

    reader.close();
    Ok(())
}
