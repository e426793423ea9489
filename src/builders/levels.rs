use anyhow::Result;
use tracing::warn;

/// The marker prefix the circuit generator writes in front of every level table.
pub const DEFAULT_LEVEL_MARKER: &str = "static LEVEL_";

/// The `LevelMatcher` trait defines how a source is split into level regions.
///
/// A level region opens on a marker line and closes on the next blank line.
/// Its size is the number of lines strictly between the two.
pub trait LevelMatcher {
    /// Returns `true` if `line` opens a level region.
    fn opens_level(&self, line: &str) -> bool;

    /// Scans the given lines and returns one size per closed level region,
    /// in the order the regions appear.
    ///
    /// A region still open when the input ends is dropped.
    fn scan_lines<'a, I>(&self, lines: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a str>;

    /// Convenience wrapper over [`LevelMatcher::scan_lines`] for whole file contents.
    fn scan_content(&self, content: &str) -> Vec<usize> {
        self.scan_lines(content.lines())
    }
}

/// A literal line prefix that marks the start of a level table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMarker {
    prefix: String,
}

impl LevelMarker {
    /// Creates a marker from its literal prefix.
    ///
    /// An empty prefix would turn every line into a marker, so it is rejected.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            anyhow::bail!("Level marker cannot be empty");
        }
        Ok(Self { prefix })
    }
}

impl Default for LevelMarker {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_LEVEL_MARKER.to_string(),
        }
    }
}

impl LevelMatcher for LevelMarker {
    fn opens_level(&self, line: &str) -> bool {
        line.starts_with(&self.prefix)
    }

    fn scan_lines<'a, I>(&self, lines: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut level_sizes = Vec::new();
        let mut size = 0;
        let mut in_level = false;

        for line in lines {
            // Trailing whitespace (and a stray `\r`) never makes a line non-blank.
            let line = line.trim_end();

            if self.opens_level(line) {
                in_level = true;
                continue;
            }

            if !in_level {
                continue;
            }

            if line.is_empty() {
                level_sizes.push(size);
                size = 0;
                in_level = false;
            } else {
                size += 1;
            }
        }

        if in_level {
            warn!(
                marker = %self.prefix,
                pending_lines = size,
                "level left open at end of input, dropping it"
            );
        }

        level_sizes
    }
}
