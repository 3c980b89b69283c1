use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::summary::SummaryStats;
use crate::render::style::VisualStyle;

#[derive(Debug, Serialize)]
struct StatsRecord<'a> {
    frame: u64,
    time: f64,
    style: VisualStyle,
    #[serde(flatten)]
    stats: &'a SummaryStats,
}

/// Writes one JSON object per rendered frame.
pub struct StatsWriter<W: Write> {
    out: W,
}

impl StatsWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create stats file: {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> StatsWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn record(&mut self, frame: u64, time: f64, style: VisualStyle, stats: &SummaryStats) -> Result<()> {
        let record = StatsRecord { frame, time, style, stats };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush().context("Failed to flush stats")?;
        Ok(self.out)
    }
}
