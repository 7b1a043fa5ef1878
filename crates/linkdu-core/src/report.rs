//! Reporting sinks for `(usage, path)` lines.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Receives one line per reported path, in post-order.
pub trait Reporter {
    /// Emit a usage figure (kilobyte-equivalent) for `path`.
    fn report(&mut self, usage: u64, path: &Path) -> io::Result<()>;

    /// Flush anything buffered. Called once the walk ends, successfully or not.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<F> Reporter for F
where
    F: FnMut(u64, &Path) -> io::Result<()>,
{
    fn report(&mut self, usage: u64, path: &Path) -> io::Result<()> {
        self(usage, path)
    }
}

/// Writes `usage<TAB>path` lines.
pub struct LineReporter<W: Write> {
    writer: W,
    format_usage: fn(u64) -> String,
}

impl<W: Write> LineReporter<W> {
    /// Create a reporter printing raw kilobyte counts.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            format_usage: |usage| usage.to_string(),
        }
    }

    /// Replace how the usage column is rendered.
    pub fn with_formatter(mut self, format_usage: fn(u64) -> String) -> Self {
        self.format_usage = format_usage;
        self
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for LineReporter<W> {
    fn report(&mut self, usage: u64, path: &Path) -> io::Result<()> {
        writeln!(
            self.writer,
            "{}\t{}",
            (self.format_usage)(usage),
            path.display()
        )
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// One reported line in machine-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// Usage in kilobyte-equivalent units.
    pub usage: u64,
    /// Reported path, lossily converted to UTF-8.
    pub path: String,
}

/// Writes newline-delimited JSON objects.
pub struct JsonReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, usage: u64, path: &Path) -> io::Result<()> {
        let line = ReportLine {
            usage,
            path: path.to_string_lossy().into_owned(),
        };
        serde_json::to_writer(&mut self.writer, &line)?;
        self.writer.write_all(b"\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Keeps every reported line in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectReporter {
    lines: Vec<(u64, PathBuf)>,
}

impl CollectReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines in the order they were reported.
    pub fn lines(&self) -> &[(u64, PathBuf)] {
        &self.lines
    }

    /// Usage reported for `path`, if it was reported.
    pub fn usage_of(&self, path: impl AsRef<Path>) -> Option<u64> {
        let path = path.as_ref();
        self.lines
            .iter()
            .find(|(_, reported)| reported == path)
            .map(|(usage, _)| *usage)
    }

    /// Position of `path` in the report order.
    pub fn position(&self, path: impl AsRef<Path>) -> Option<usize> {
        let path = path.as_ref();
        self.lines.iter().position(|(_, reported)| reported == path)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Reporter for CollectReporter {
    fn report(&mut self, usage: u64, path: &Path) -> io::Result<()> {
        self.lines.push((usage, path.to_path_buf()));
        Ok(())
    }
}
