use anyhow::Result;

use crate::bdf::BdfStreamReader;

use super::{ValidationCheck, ValidationReport};

/// Step 2: read every subset
pub(crate) fn check_subsets(
    reader: &mut BdfStreamReader,
    report: &mut ValidationReport,
) -> Result<()> {
    let declared = reader.num_time()?;

    let mut count = 0usize;
    let mut aborted = 0usize;
    let mut previous_num: Option<(u32, u32)> = None;
    let mut previous_time: Option<i64> = None;
    let mut order_issues = Vec::new();
    let mut time_issues = Vec::new();
    let mut failure = None;

    loop {
        let subset = match reader.next_subset() {
            Ok(Some(subset)) => subset,
            Ok(None) => break,
            Err(e) => {
                failure = Some(format!("{} ({})", e, e.kind()));
                break;
            }
        };
        count += 1;
        let header = subset.header();
        if subset.is_aborted() {
            aborted += 1;
        }

        if let Some(num) = header.integration_num {
            let current = (num, header.subintegration_num.unwrap_or(0));
            if previous_num.is_some_and(|previous| current <= previous) {
                order_issues.push(subset.integration_index());
            }
            previous_num = Some(current);
        }
        if previous_time.is_some_and(|previous| header.time < previous) {
            time_issues.push(subset.integration_index());
        }
        previous_time = Some(header.time);
    }

    match failure {
        Some(message) => report.add_check(ValidationCheck::failed("All subsets readable", message)),
        None => report.add_check(ValidationCheck::ok(format!(
            "All subsets readable ({} subsets)",
            count
        ))),
    }

    let name = "Subset count matches numTime";
    match declared {
        Some(n) if n as usize == count => report.add_check(ValidationCheck::ok(name)),
        Some(n) => report.add_check(ValidationCheck::failed(
            name,
            format!("{} declared, {} read", n, count),
        )),
        None => report.add_check(ValidationCheck::warning(
            name,
            "the global header does not declare an integration count",
        )),
    }

    let name = "Integration numbers increasing";
    if order_issues.is_empty() {
        report.add_check(ValidationCheck::ok(name));
    } else {
        report.add_check(ValidationCheck::warning(
            name,
            format!("out of order at subsets {:?}", order_issues),
        ));
    }

    let name = "Subset times non-decreasing";
    if time_issues.is_empty() {
        report.add_check(ValidationCheck::ok(name));
    } else {
        report.add_check(ValidationCheck::warning(
            name,
            format!("time goes backwards at subsets {:?}", time_issues),
        ));
    }

    if aborted > 0 {
        report.add_check(ValidationCheck::warning(
            "No aborted subsets",
            format!("{} subsets cancel the observation", aborted),
        ));
    }
    Ok(())
}
