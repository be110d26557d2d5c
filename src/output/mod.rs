//! Exporting filtered contacts and reporting on the run

mod csv;
mod summary;

pub use self::csv::{export, write_table};
pub use summary::{render_to_stderr, JsonSummary, SummaryFactory, SummaryFormatter, TerminalSummary};
