use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one validation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed, but something looks off
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    fn is_warning(&self) -> bool {
        matches!(self, CheckStatus::Warning(_))
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }

    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
        }
    }
}

/// One named check and its outcome
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// What was checked
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Every check run against one BDF file
#[derive(Debug)]
pub struct ValidationReport {
    /// Checks in the order they ran
    pub checks: Vec<ValidationCheck>,
    /// Path of the validated file
    pub file_path: String,
}

impl ValidationReport {
    /// Create an empty report for `file_path`
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            file_path: file_path.into(),
        }
    }

    /// Record a check
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Whether any check produced a warning
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_warning())
    }

    /// Number of passed checks
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_warning()).count()
    }

    /// Number of failed checks
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    fn verdict(&self) -> &'static str {
        if self.has_failures() {
            "Validation FAILED"
        } else if self.has_warnings() {
            "Validation PASSED with warnings"
        } else {
            "Validation PASSED"
        }
    }

    fn tally(&self) -> String {
        format!(
            "{} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )
    }

    /// Format the report with colors (plain text without `colorized_output`)
    ///
    /// Checks are listed in the order they ran: the global header checks
    /// first, then the subset checks.
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = format!(
                "{} {}\n\n",
                style("BDF Validation Report for").bold().cyan(),
                style(&self.file_path).bold()
            );

            for check in &self.checks {
                let symbol = check.status.symbol();
                let line = match &check.status {
                    CheckStatus::Ok => format!("  {} {}", style(symbol).green(), check.name),
                    CheckStatus::Warning(msg) => format!(
                        "  {} {}: {}",
                        style(symbol).yellow(),
                        style(&check.name).yellow(),
                        msg
                    ),
                    CheckStatus::Failed(msg) => format!(
                        "  {} {}: {}",
                        style(symbol).red().bold(),
                        style(&check.name).red(),
                        style(msg).red()
                    ),
                };
                output.push_str(&line);
                output.push('\n');
            }

            let verdict = style(self.verdict()).bold();
            let verdict = match (self.has_failures(), self.has_warnings()) {
                (true, _) => verdict.red(),
                (false, true) => verdict.yellow(),
                (false, false) => verdict.green(),
            };
            output.push_str(&format!(
                "\n{} ({} checks: {})\n",
                verdict,
                self.checks.len(),
                self.tally()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BDF Validation Report for {}", self.file_path)?;
        writeln!(f)?;

        for check in &self.checks {
            let symbol = check.status.symbol();
            match &check.status {
                CheckStatus::Ok => writeln!(f, "  {} {}", symbol, check.name)?,
                CheckStatus::Warning(msg) | CheckStatus::Failed(msg) => {
                    writeln!(f, "  {} {}: {}", symbol, check.name, msg)?
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Summary: {}", self.tally())?;
        writeln!(f, "{}", self.verdict())
    }
}
