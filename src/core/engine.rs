use crate::builders::levels::{LevelMarker, LevelMatcher};
use crate::builders::reporter::{FileReport, reporter_for};
use crate::core::config::StatsConfig;
use crate::core::source::SourceTree;
use anyhow::Result;
use std::io::Write;
use tracing::{debug, info, warn_span};

/// Lists the matching sources, scans each one for level regions and hands
/// the results to the configured reporter.
pub struct StatsEngine<T: SourceTree> {
    config: StatsConfig,
    marker: LevelMarker,
    tree: T,
}

impl<T: SourceTree> StatsEngine<T> {
    pub fn new(config: StatsConfig, tree: T) -> Result<Self> {
        let marker = config.marker()?;
        Ok(Self {
            config,
            marker,
            tree,
        })
    }

    /// Scans every matching file, one at a time, in name order.
    ///
    /// The first unreadable file aborts the whole run; no partial list is returned.
    pub fn collect(&self) -> Result<Vec<FileReport>> {
        let names = self.tree.list_matching(&self.config.file_filter)?;
        info!(
            root = %self.tree.root().display(),
            files = names.len(),
            "scanning circuit sources"
        );

        let mut reports = Vec::with_capacity(names.len());
        for name in names {
            // WARN level so the file name reaches warnings under the default filter.
            let _scan = warn_span!("scan", file = %name).entered();
            let content = self.tree.read_source(&name)?;
            let level_sizes = self.marker.scan_content(&content);
            debug!(file = %name, levels = level_sizes.len(), "scanned");
            reports.push(FileReport::new(name, level_sizes));
        }
        Ok(reports)
    }

    /// Collects every report and writes them in the configured format.
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        let reports = self.collect()?;
        reporter_for(self.config.format).write_report(out, &reports)
    }
}
