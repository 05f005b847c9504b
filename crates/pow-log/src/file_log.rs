use crate::{text_block_line, text_footer, text_header};
use anyhow::{Context, Result};
use chrono::Local;
use pow_core::{
    chain::{BlockSink, ChainSummary},
    MinedBlock,
};
use serde::Serialize;
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Pipe-separated columns with a header and a statistics footer.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record<'a> {
    Block(&'a MinedBlock),
    Summary(&'a ChainSummary),
}

/// Mining log backed by a single file.
///
/// The file is only open for the duration of one write; every entry reopens
/// it in append mode.
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
    format: LogFormat,
}

impl FileLog {
    /// Creates (or truncates) the log file and writes the header.
    pub fn create<P: AsRef<Path>>(path: P, format: LogFormat) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::create(&path)
            .with_context(|| format!("creating mining log {}", path.display()))?;
        if format == LogFormat::Text {
            file.write_all(text_header(&Local::now()).as_bytes())
                .with_context(|| format!("writing header to {}", path.display()))?;
        }
        info!("mining log created at {}", path.display());
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    fn append(&self, entry: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening mining log {}", self.path.display()))?;
        file.write_all(entry.as_bytes())
            .with_context(|| format!("appending to mining log {}", self.path.display()))?;
        Ok(())
    }

    fn json_line(record: &Record<'_>) -> Result<String> {
        let mut line = serde_json::to_string(record).context("encoding log record")?;
        line.push('\n');
        Ok(line)
    }
}

impl BlockSink for FileLog {
    fn record_block(&mut self, block: &MinedBlock) -> Result<()> {
        let entry = match self.format {
            LogFormat::Text => text_block_line(block),
            LogFormat::Json => Self::json_line(&Record::Block(block))?,
        };
        self.append(&entry)?;
        debug!("logged block {}", block.index());
        Ok(())
    }

    fn record_summary(&mut self, summary: &ChainSummary) -> Result<()> {
        let entry = match self.format {
            LogFormat::Text => text_footer(summary, &Local::now()),
            LogFormat::Json => Self::json_line(&Record::Summary(summary))?,
        };
        self.append(&entry)
    }
}
