use crate::ports::outbound::ScanFormatter;
use crate::shared::Result;
use crate::threat_detection::domain::{Issue, PackageName, ScanResult, Severity};
use owo_colors::OwoColorize;
use std::fmt::Write;

const CHAIN_SEPARATOR: &str = " > ";

/// TextFormatter adapter for a human-readable report
///
/// Issues are grouped by severity, most urgent first. Colors are only
/// emitted when the formatter is created with `colored = true`.
pub struct TextFormatter {
    colored: bool,
}

impl TextFormatter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn heading(&self, severity: Severity, count: usize) -> String {
        let label = format!("{} ({})", severity.as_str().to_uppercase(), count);
        if !self.colored {
            return label;
        }
        match severity {
            Severity::Critical => label.red().bold().to_string(),
            Severity::High => label.bright_red().to_string(),
            Severity::Medium => label.yellow().to_string(),
            Severity::Low => label.cyan().to_string(),
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.colored {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn write_summary(&self, out: &mut String, result: &ScanResult) -> std::fmt::Result {
        let metadata = &result.metadata;
        writeln!(out, "{} {} scan report", metadata.tool_name(), metadata.tool_version())?;
        writeln!(out)?;

        match &result.lock_file {
            Some(lock_file) => writeln!(out, "Scan mode:        {} ({})", result.scan_mode, lock_file)?,
            None => writeln!(out, "Scan mode:        {}", result.scan_mode)?,
        }
        writeln!(
            out,
            "Packages scanned: {} ({} direct, {} transitive)",
            result.packages_scanned.total,
            result.packages_scanned.direct,
            result.packages_scanned.transitive
        )?;
        writeln!(
            out,
            "Threat database:  {} (updated {})",
            metadata.database_version(),
            metadata.database_updated()
        )?;
        writeln!(out)
    }

    fn write_issue(&self, out: &mut String, issue: &Issue) -> std::fmt::Result {
        let origin = if issue.is_direct { "direct" } else { "transitive" };
        let title = format!("{}@{}", issue.package, issue.version);
        let title = if self.colored {
            title.bold().to_string()
        } else {
            title
        };
        writeln!(out, "  - {} [{}] ({})", title, issue.category, origin)?;
        writeln!(out, "      Reason: {}", issue.reason)?;
        writeln!(out, "      Action: {}", issue.action)?;

        if !issue.chain.is_empty() {
            writeln!(out, "      Chain:  {}", format_chain(&issue.chain, &issue.package))?;
        }

        if let Some(campaign) = &issue.campaign {
            writeln!(out, "      Campaign: {}", campaign)?;
        }

        if issue.safe_version {
            let note = format!("Version {} is not listed as affected", issue.version);
            writeln!(out, "      {}", self.dim(&note))?;
        } else if let Some(versions) = &issue.affected_versions {
            writeln!(out, "      Affected versions: {}", versions.join(", "))?;
        }

        Ok(())
    }

    fn write_names(&self, out: &mut String, label: &str, names: &[PackageName]) -> std::fmt::Result {
        if names.is_empty() {
            return Ok(());
        }
        let joined = names
            .iter()
            .map(PackageName::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "{} ({}): {}", label, names.len(), self.dim(&joined))
    }
}

/// Renders `root > ... > package`
fn format_chain(chain: &[PackageName], package: &PackageName) -> String {
    chain
        .iter()
        .chain(std::iter::once(package))
        .map(PackageName::as_str)
        .collect::<Vec<_>>()
        .join(CHAIN_SEPARATOR)
}

impl ScanFormatter for TextFormatter {
    fn format(&self, result: &ScanResult) -> Result<String> {
        let mut out = String::new();
        self.write_summary(&mut out, result)?;

        if result.results.is_empty() {
            let message = "✅ No threats detected";
            if self.colored {
                writeln!(out, "{}", message.green())?;
            } else {
                writeln!(out, "{}", message)?;
            }
        } else {
            for severity in Severity::ALL {
                let issues = result.results.get(severity);
                if issues.is_empty() {
                    continue;
                }
                writeln!(out, "{}", self.heading(severity, issues.len()))?;
                for issue in issues {
                    self.write_issue(&mut out, issue)?;
                }
                writeln!(out)?;
            }
        }

        self.write_names(&mut out, "Trusted", &result.trusted)?;
        self.write_names(&mut out, "Ignored", &result.ignored)?;

        writeln!(
            out,
            "Summary: {} issue(s), {} in transitive dependencies",
            result.total_issues, result.transitive_issues
        )?;

        Ok(out)
    }
}
