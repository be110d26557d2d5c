//! Reconciliation of email cells holding several values
//!
//! Detection is pure and yields one [`ReconcileRequest`] per multi-valued
//! cell. Resolution walks those requests and asks a [`Reviewer`] about each
//! value. A reviewer may abort a row, which stops work on that row only.

use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{debug, info, warn};

use crate::config::ReconcileMode;
use crate::model::{join_values, split_values, FieldKind, Table};

/// Display name used when a row has no name
const UNNAMED: &str = "(unnamed)";

/// A multi-valued email cell awaiting decisions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileRequest {
    /// Row index in the filtered table
    pub row: usize,
    /// Column index of the cell
    pub column: usize,
    pub header: String,
    pub display_name: String,
    /// Values in cell order
    pub values: Vec<String>,
}

/// What the reviewer shows for one value
#[derive(Debug, Clone, Copy)]
pub struct ReviewPrompt<'a> {
    pub display_name: &'a str,
    pub header: &'a str,
    pub value: &'a str,
    /// 1-based position of `value` within the cell
    pub position: usize,
    pub total: usize,
}

/// Reviewer answer for one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Discard,
    /// Stop reviewing the current row
    Abort,
}

/// Source of keep/discard decisions
pub trait Reviewer {
    fn review(&mut self, prompt: &ReviewPrompt<'_>) -> Decision;
}

/// Counters reported by a reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Rows with at least one multi-valued email cell
    pub rows_with_multiple: usize,
    /// Rows fully reviewed
    pub rows_fixed: usize,
    /// Rows cut short by an abort
    pub rows_aborted: usize,
    /// Cells left empty because every value was discarded
    pub cells_cleared: usize,
}

/// Find every email cell holding two or more values
pub fn detect(table: &Table, name_column: &str) -> Vec<ReconcileRequest> {
    let columns = table.headers.matching(FieldKind::Email.pattern());
    let mut requests = Vec::new();

    for (row_idx, row) in table.rows.iter().enumerate() {
        for &column in &columns {
            let values = split_values(&row.cells[column]);
            if values.len() < 2 {
                continue;
            }
            let display_name = row
                .get(name_column)
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(UNNAMED);
            requests.push(ReconcileRequest {
                row: row_idx,
                column,
                header: table.headers.get(column).unwrap_or_default().to_string(),
                display_name: display_name.to_string(),
                values: values.into_iter().map(String::from).collect(),
            });
        }
    }

    requests
}

/// Number of distinct rows among the requests
pub fn affected_rows(requests: &[ReconcileRequest]) -> usize {
    requests.chunk_by(|a, b| a.row == b.row).count()
}

/// Apply reviewer decisions to the table.
///
/// Each reviewed cell becomes its kept values rejoined, or empty when none
/// were kept. On abort the current cell keeps what was already accepted and
/// the row's remaining cells are cleared, since none of their values was kept.
pub fn resolve(
    table: &mut Table,
    requests: &[ReconcileRequest],
    reviewer: &mut dyn Reviewer,
) -> ReconcileReport {
    let total = affected_rows(requests);
    let mut report = ReconcileReport {
        rows_with_multiple: total,
        ..Default::default()
    };

    for (done, row_requests) in requests.chunk_by(|a, b| a.row == b.row).enumerate() {
        let mut aborted = false;

        for (n, request) in row_requests.iter().enumerate() {
            let mut kept: Vec<&str> = Vec::new();
            for (i, value) in request.values.iter().enumerate() {
                let prompt = ReviewPrompt {
                    display_name: &request.display_name,
                    header: &request.header,
                    value: value.as_str(),
                    position: i + 1,
                    total: request.values.len(),
                };
                match reviewer.review(&prompt) {
                    Decision::Keep => kept.push(value.as_str()),
                    Decision::Discard => {}
                    Decision::Abort => {
                        aborted = true;
                        break;
                    }
                }
            }

            debug!(
                name = %request.display_name,
                column = %request.header,
                kept = kept.len(),
                of = request.values.len(),
                "reviewed email cell"
            );
            if kept.is_empty() {
                report.cells_cleared += 1;
            }
            table.rows[request.row].cells[request.column] = join_values(&kept);

            if aborted {
                for rest in &row_requests[n + 1..] {
                    table.rows[rest.row].cells[rest.column].clear();
                    report.cells_cleared += 1;
                }
                break;
            }
        }

        if aborted {
            warn!(name = %row_requests[0].display_name, "review aborted, moving to next contact");
            report.rows_aborted += 1;
        } else {
            report.rows_fixed += 1;
        }
        info!("reviewed {}/{} contacts with multiple emails", done + 1, total);
    }

    report
}

/// Detect and, in [`ReconcileMode::Fix`], resolve multi-valued emails
pub fn reconcile(
    table: &mut Table,
    mode: ReconcileMode,
    name_column: &str,
    reviewer: &mut dyn Reviewer,
) -> ReconcileReport {
    if mode == ReconcileMode::Off {
        return ReconcileReport::default();
    }

    let requests = detect(table, name_column);
    let found = affected_rows(&requests);
    info!("found {} contacts with multiple emails", found);

    match mode {
        ReconcileMode::Fix => resolve(table, &requests, reviewer),
        _ => ReconcileReport {
            rows_with_multiple: found,
            ..Default::default()
        },
    }
}

/// Answers from a fixed list; aborts once the list runs out
#[derive(Debug, Default)]
pub struct ScriptedReviewer {
    decisions: VecDeque<Decision>,
}

impl ScriptedReviewer {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
        }
    }
}

impl Reviewer for ScriptedReviewer {
    fn review(&mut self, _prompt: &ReviewPrompt<'_>) -> Decision {
        self.decisions.pop_front().unwrap_or(Decision::Abort)
    }
}

/// Gives the same answer to every value
#[derive(Debug, Clone, Copy)]
pub struct AutoReviewer {
    keep: bool,
}

impl AutoReviewer {
    pub fn keep_all() -> Self {
        Self { keep: true }
    }

    pub fn discard_all() -> Self {
        Self { keep: false }
    }
}

impl Reviewer for AutoReviewer {
    fn review(&mut self, _prompt: &ReviewPrompt<'_>) -> Decision {
        if self.keep {
            Decision::Keep
        } else {
            Decision::Discard
        }
    }
}

/// Interpret one line typed by the operator; anything unclear discards
pub fn parse_answer(line: &str) -> Decision {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" | "k" | "keep" => Decision::Keep,
        _ => Decision::Discard,
    }
}

/// Prompts on a color-capable writer and reads answers line by line.
/// End of input aborts the current row.
pub struct ConsoleReviewer<R, W> {
    input: R,
    output: W,
}

impl ConsoleReviewer<StdinLock<'static>, StandardStream> {
    /// Prompt on stderr, read from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), StandardStream::stderr(ColorChoice::Auto))
    }
}

impl<R: BufRead, W: WriteColor> ConsoleReviewer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn write_prompt(&mut self, prompt: &ReviewPrompt<'_>) -> io::Result<()> {
        self.output
            .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(self.output, "{}", prompt.display_name)?;
        self.output.reset()?;
        write!(
            self.output,
            " [{} {}/{}] ",
            prompt.header, prompt.position, prompt.total
        )?;
        self.output
            .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(self.output, "{}", prompt.value)?;
        self.output.reset()?;
        write!(self.output, " keep? [y/N] ")?;
        self.output.flush()
    }
}

impl<R: BufRead, W: WriteColor> Reviewer for ConsoleReviewer<R, W> {
    fn review(&mut self, prompt: &ReviewPrompt<'_>) -> Decision {
        if let Err(e) = self.write_prompt(prompt) {
            warn!(error = %e, "failed to write review prompt");
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                let _ = writeln!(self.output);
                Decision::Abort
            }
            Ok(_) => parse_answer(&line),
            Err(e) => {
                warn!(error = %e, "failed to read review answer");
                Decision::Abort
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Headers;
    use termcolor::NoColor;

    fn table(emails: &[(&str, &str, &str)]) -> Table {
        let headers = Headers::new(vec![
            "Name".into(),
            "E-mail 1 - Value".into(),
            "E-mail 2 - Value".into(),
        ])
        .unwrap();
        let mut table = Table::new(headers);
        for (i, (name, first, second)) in emails.iter().enumerate() {
            table
                .push_cells(vec![name.to_string(), first.to_string(), second.to_string()], i + 2)
                .unwrap();
        }
        table
    }

    #[test]
    fn test_detect() {
        let table = table(&[
            ("Ann", "a@x.com ::: a@x.com", ""),
            ("Bob", "b@x.com", "b@y.com :::"),
            ("", "c@x.com:::d@x.com", "e@x.com ::: f@x.com"),
        ]);
        let requests = detect(&table, "Name");

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].row, 0);
        assert_eq!(requests[0].values, vec!["a@x.com", "a@x.com"]);
        assert_eq!(requests[1].display_name, "(unnamed)");
        assert_eq!(requests[2].header, "E-mail 2 - Value");
        assert_eq!(affected_rows(&requests), 2);
    }

    #[test]
    fn test_keep_all() {
        let mut table = table(&[("Ann", "a@x.com ::: a@x.com", "")]);
        let requests = detect(&table, "Name");
        let report = resolve(&mut table, &requests, &mut AutoReviewer::keep_all());

        assert_eq!(table.rows[0].cells[1], "a@x.com ::: a@x.com");
        assert_eq!(report.rows_fixed, 1);
        assert_eq!(report.cells_cleared, 0);
    }

    #[test]
    fn test_discard_all() {
        let mut table = table(&[("Ann", "a@x.com ::: b@x.com", "")]);
        let requests = detect(&table, "Name");
        let report = resolve(&mut table, &requests, &mut AutoReviewer::discard_all());

        assert_eq!(table.rows[0].cells[1], "");
        assert_eq!(report.cells_cleared, 1);
    }

    #[test]
    fn test_abort_discards_undecided_values_of_row() {
        let mut table = table(&[
            ("Ann", "a@x.com ::: b@x.com ::: c@x.com", "d@x.com ::: e@x.com"),
            ("Bob", "f@x.com ::: g@x.com", ""),
        ]);
        let requests = detect(&table, "Name");
        let mut reviewer = ScriptedReviewer::new([
            Decision::Keep,
            Decision::Abort,
            Decision::Discard,
            Decision::Keep,
        ]);
        let report = resolve(&mut table, &requests, &mut reviewer);

        assert_eq!(table.rows[0].cells[1], "a@x.com");
        assert_eq!(table.rows[0].cells[2], "");
        assert_eq!(table.rows[1].cells[1], "g@x.com");
        assert_eq!(report.rows_aborted, 1);
        assert_eq!(report.rows_fixed, 1);
        assert_eq!(report.rows_with_multiple, 2);
        assert_eq!(report.cells_cleared, 1);
    }

    #[test]
    fn test_abort_on_first_cell_clears_sibling_cells() {
        let mut table = table(&[("Ann", "a@x.com ::: b@x.com", "c@x.com ::: d@x.com")]);
        let requests = detect(&table, "Name");
        let mut reviewer = ScriptedReviewer::new([Decision::Keep, Decision::Abort]);
        let report = resolve(&mut table, &requests, &mut reviewer);

        assert_eq!(table.rows[0].cells[1], "a@x.com");
        assert_eq!(table.rows[0].cells[2], "");
        assert_eq!(report.rows_aborted, 1);
        assert_eq!(report.cells_cleared, 1);
    }

    #[test]
    fn test_dry_run_does_not_mutate() {
        let mut table = table(&[("Ann", "a@x.com ::: b@x.com", "")]);
        let report = reconcile(
            &mut table,
            ReconcileMode::DryRun,
            "Name",
            &mut AutoReviewer::discard_all(),
        );

        assert_eq!(report.rows_with_multiple, 1);
        assert_eq!(report.rows_fixed, 0);
        assert_eq!(table.rows[0].cells[1], "a@x.com ::: b@x.com");
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("y\n"), Decision::Keep);
        assert_eq!(parse_answer(" YES "), Decision::Keep);
        assert_eq!(parse_answer("\n"), Decision::Discard);
        assert_eq!(parse_answer("maybe"), Decision::Discard);
    }

    #[test]
    fn test_console_reviewer_eof_aborts() {
        let mut table = table(&[
            ("Ann", "a@x.com ::: b@x.com", ""),
            ("Bob", "c@x.com ::: d@x.com", ""),
        ]);
        let requests = detect(&table, "Name");
        let input = "y\n".as_bytes();
        let mut reviewer = ConsoleReviewer::new(input, NoColor::new(Vec::new()));
        let report = resolve(&mut table, &requests, &mut reviewer);

        assert_eq!(table.rows[0].cells[1], "a@x.com");
        assert_eq!(table.rows[1].cells[1], "");
        assert_eq!(report.rows_aborted, 2);

        let transcript = String::from_utf8(reviewer.output.into_inner()).unwrap();
        assert!(transcript.contains("Ann [E-mail 1 - Value 1/2] a@x.com keep? [y/N]"));
    }
}
