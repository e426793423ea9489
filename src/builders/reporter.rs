use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

/// The level statistics gathered for a single source file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// The file name as listed in the source directory.
    pub name: String,
    /// One entry per level region, in source order.
    pub level_sizes: Vec<usize>,
}

impl FileReport {
    pub fn new(name: impl Into<String>, level_sizes: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            level_sizes,
        }
    }

    /// Total number of gates, i.e. the sum of every level size.
    pub fn gates(&self) -> usize {
        self.level_sizes.iter().sum()
    }

    /// Number of level regions found in the file.
    pub fn levels(&self) -> usize {
        self.level_sizes.len()
    }
}

/// Output formats understood by the report printers.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            _ => anyhow::bail!("Invalid report format: {s}"),
        }
    }
}

/// Writes a set of file reports to an output stream.
pub trait StatsReporter {
    fn write_report(&self, out: &mut dyn Write, reports: &[FileReport]) -> Result<()>;
}

/// Returns the reporter matching the requested format.
pub fn reporter_for(format: ReportFormat) -> Box<dyn StatsReporter> {
    match format {
        ReportFormat::Text => Box::new(TextReporter::new()),
        ReportFormat::Json | ReportFormat::Yaml => Box::new(StructuredReporter { format }),
    }
}

/// Plain text report: four lines per file followed by a blank separator.
///
/// ```text
/// move2_test_rs_fhe_lib.rs
/// - gates: 19
/// - levels: 4
/// - levels_size: [2, 3, 5, 9]
/// ```
pub struct TextReporter;

impl TextReporter {
    pub fn new() -> Self {
        Self
    }

    fn format_level_sizes(level_sizes: &[usize]) -> String {
        let joined = level_sizes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{joined}]")
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsReporter for TextReporter {
    fn write_report(&self, out: &mut dyn Write, reports: &[FileReport]) -> Result<()> {
        for report in reports {
            writeln!(out, "{}", report.name)?;
            writeln!(out, "- gates: {}", report.gates())?;
            writeln!(out, "- levels: {}", report.levels())?;
            writeln!(
                out,
                "- levels_size: {}",
                Self::format_level_sizes(&report.level_sizes)
            )?;
            writeln!(out)?;
        }
        out.flush().context("Failed to flush report output")?;
        Ok(())
    }
}

/// Serialized view of a report, carrying the derived aggregates alongside
/// the raw sizes so consumers do not need to recompute them.
#[derive(Serialize)]
struct ReportEntry<'a> {
    name: &'a str,
    gates: usize,
    levels: usize,
    levels_size: &'a [usize],
}

impl<'a> From<&'a FileReport> for ReportEntry<'a> {
    fn from(report: &'a FileReport) -> Self {
        Self {
            name: &report.name,
            gates: report.gates(),
            levels: report.levels(),
            levels_size: &report.level_sizes,
        }
    }
}

/// JSON or YAML report holding one document with every file.
pub struct StructuredReporter {
    format: ReportFormat,
}

impl StructuredReporter {
    /// Plain text is not a structured format; use `TextReporter` for it.
    pub fn new(format: ReportFormat) -> Result<Self> {
        if format == ReportFormat::Text {
            anyhow::bail!("StructuredReporter only writes json or yaml, not {format}");
        }
        Ok(Self { format })
    }
}

impl StatsReporter for StructuredReporter {
    fn write_report(&self, out: &mut dyn Write, reports: &[FileReport]) -> Result<()> {
        let entries: Vec<ReportEntry<'_>> = reports.iter().map(ReportEntry::from).collect();

        let content = match self.format {
            ReportFormat::Yaml => {
                serde_yaml::to_string(&entries).context("Failed to serialize report to YAML")?
            }
            ReportFormat::Json => {
                let mut json = serde_json::to_string_pretty(&entries)
                    .context("Failed to serialize report to JSON")?;
                json.push('\n');
                json
            }
            ReportFormat::Text => {
                anyhow::bail!("StructuredReporter cannot write the text format")
            }
        };

        out.write_all(content.as_bytes())
            .context("Failed to write report output")?;
        out.flush().context("Failed to flush report output")?;
        Ok(())
    }
}
