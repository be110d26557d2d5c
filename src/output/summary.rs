//! Run summary rendered for the operator

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::config::SummaryFormat;
use crate::pipeline::RunStats;

/// Trait for summary formatters
pub trait SummaryFormatter {
    fn render(&self, stats: &RunStats, source: &Path, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating summary formatters
pub struct SummaryFactory;

impl SummaryFactory {
    pub fn create(format: SummaryFormat) -> Box<dyn SummaryFormatter> {
        match format {
            SummaryFormat::Terminal => Box::new(TerminalSummary),
            SummaryFormat::Json => Box::new(JsonSummary),
        }
    }
}

/// Render a summary to stderr, keeping stdout free for exported rows
pub fn render_to_stderr(stats: &RunStats, source: &Path, format: SummaryFormat) -> Result<()> {
    let formatter = SummaryFactory::create(format);
    let mut stderr = std::io::stderr();
    formatter.render(stats, source, &mut stderr)
}

/// Aligned plain-text summary
pub struct TerminalSummary;

impl SummaryFormatter for TerminalSummary {
    fn render(&self, stats: &RunStats, source: &Path, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "Source: {} ({} rows)", source.display(), stats.rows_loaded)?;
        writeln!(writer)?;
        writeln!(writer, "Without name:        {}", stats.rows_without_name)?;
        writeln!(writer, "Duplicates dropped:  {}", stats.duplicates_dropped)?;
        writeln!(writer, "Duplicates merged:   {}", stats.duplicates_merged)?;
        writeln!(writer, "Duplicates kept:     {}", stats.duplicates_kept)?;
        writeln!(writer, "Retained:            {}", stats.rows_retained)?;

        match &stats.filter {
            Some(counts) => writeln!(
                writer,
                "Filtered:            {} of {}",
                counts.filtered, counts.original
            )?,
            None => writeln!(writer, "Filtered:            (no filter)")?,
        }

        let emails = &stats.emails;
        if emails.rows_with_multiple > 0 {
            writeln!(writer, "Multiple emails:     {}", emails.rows_with_multiple)?;
            writeln!(
                writer,
                "Reviewed:            {} fixed, {} aborted",
                emails.rows_fixed, emails.rows_aborted
            )?;
        }
        Ok(())
    }
}

/// Pretty-printed JSON summary
pub struct JsonSummary;

#[derive(Serialize)]
struct JsonRunSummary<'a> {
    source: String,
    #[serde(flatten)]
    stats: &'a RunStats,
}

impl SummaryFormatter for JsonSummary {
    fn render(&self, stats: &RunStats, source: &Path, writer: &mut dyn Write) -> Result<()> {
        let output = JsonRunSummary {
            source: source.display().to_string(),
            stats,
        };
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
        Ok(())
    }
}
