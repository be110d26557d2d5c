//! Contact pipeline: one fused pass (normalize, classify, deduplicate),
//! then filtering and optional email reconciliation.

mod dedup;
mod filter;
mod normalize;
pub mod reconcile;
mod tagger;

use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::config::{Config, ReconcileMode};
use crate::error::{ContactError, Result};
use crate::model::Table;

pub use dedup::{merge_rows, DedupOutcome, Deduplicator};
pub use filter::{Combinator, Filter, FilterCounts, Predicate};
pub use normalize::{format_phone, localize_phone, title_case, Normalizer, PhoneFormat};
pub use reconcile::{
    AutoReviewer, ConsoleReviewer, Decision, ReconcileReport, ReconcileRequest, Reviewer,
    ScriptedReviewer,
};
pub use tagger::{Classifier, Tagger};

/// Counters collected over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub rows_loaded: usize,
    pub rows_without_name: usize,
    pub duplicates_dropped: usize,
    pub duplicates_merged: usize,
    pub duplicates_kept: usize,
    pub rows_retained: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterCounts>,
    pub emails: ReconcileReport,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A filtered table is ready for export
    Exported,
    /// No filter ran, so there is nothing to export
    NothingToExport,
}

/// Result of a pipeline run
#[derive(Debug)]
pub struct RunReport {
    pub stats: RunStats,
    /// Filtered table, present only when a filter ran
    pub filtered: Option<Table>,
}

impl RunReport {
    pub fn outcome(&self) -> RunOutcome {
        match self.filtered {
            Some(_) => RunOutcome::Exported,
            None => RunOutcome::NothingToExport,
        }
    }
}

/// Contact pipeline
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Normalize, classify and deduplicate every row in a single pass.
    ///
    /// Rows without an identity are dropped after classification.
    pub fn process(&self, table: Table, stats: &mut RunStats) -> Result<Table> {
        let name_column = &self.config.name_column;
        if table.column_index(name_column).is_none() {
            return Err(ContactError::MissingColumn(name_column.clone()));
        }

        let phone = PhoneFormat::new(self.config.phone_prefix.as_str(), self.config.phone_style);
        let normalizer = Normalizer::new(&table.headers, phone);
        let mut dedup = Deduplicator::new(self.config.duplicates, name_column.as_str());
        let mut retained = table.empty_like();

        for mut row in table.rows {
            normalizer.normalize(&mut row);
            debug!(line = row.source_line, tags = ?row.sorted_tags(), "classified contact");

            match dedup.push(row, &mut retained)? {
                DedupOutcome::Appended => {}
                DedupOutcome::NoIdentity => stats.rows_without_name += 1,
                DedupOutcome::Dropped { .. } => stats.duplicates_dropped += 1,
                DedupOutcome::Merged { .. } => stats.duplicates_merged += 1,
                DedupOutcome::KeptDuplicate { .. } => stats.duplicates_kept += 1,
            }
        }

        stats.rows_retained = retained.row_count();
        info!(
            retained = stats.rows_retained,
            without_name = stats.rows_without_name,
            duplicates = stats.duplicates_dropped + stats.duplicates_merged + stats.duplicates_kept,
            policy = ?dedup.policy(),
            "normalized contacts"
        );
        Ok(retained)
    }

    /// Run every stage over a loaded table
    #[instrument(level = "debug", skip_all, fields(rows = table.row_count()))]
    pub fn run(&self, table: Table, reviewer: &mut dyn Reviewer) -> Result<RunReport> {
        let mut stats = RunStats {
            rows_loaded: table.row_count(),
            ..Default::default()
        };
        let retained = self.process(table, &mut stats)?;

        let Some(filter) = &self.config.filter else {
            if self.config.emails != ReconcileMode::Off {
                error!("email check requested before any filtering");
            }
            error!("nothing to export: no filter was applied");
            return Ok(RunReport {
                stats,
                filtered: None,
            });
        };

        let (mut filtered, counts) = filter.apply(&retained);
        stats.filter = Some(counts);
        stats.emails = reconcile::reconcile(
            &mut filtered,
            self.config.emails,
            &self.config.name_column,
            reviewer,
        );

        Ok(RunReport {
            stats,
            filtered: Some(filtered),
        })
    }
}

/// Convenience function to run the pipeline
pub fn filter_contacts(
    table: Table,
    config: &Config,
    reviewer: &mut dyn Reviewer,
) -> Result<RunReport> {
    Pipeline::new(config.clone()).run(table, reviewer)
}
