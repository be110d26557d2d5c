//! Duplicate contact detection by identity key

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::config::DuplicatePolicy;
use crate::error::{ContactError, Result};
use crate::model::{row_identity, Row, Table, JOIN_SEPARATOR};

/// What happened to a row handed to the deduplicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupOutcome {
    /// First row with this identity
    Appended,
    /// No identity; the row was discarded
    NoIdentity,
    /// Duplicate discarded
    Dropped { first: usize },
    /// Duplicate folded into the first row
    Merged { into: usize },
    /// Duplicate kept as its own row
    KeptDuplicate { first: usize },
}

/// Merge `incoming` into `existing` cell by cell.
///
/// Differing non-empty cells become `existing ::: incoming`; an empty or
/// equal incoming cell leaves the existing one alone.
pub fn merge_rows(existing: &mut Row, incoming: &Row) -> Result<()> {
    if existing.cells.len() != incoming.cells.len() {
        return Err(ContactError::MergeLengthMismatch {
            existing: existing.cells.len(),
            incoming: incoming.cells.len(),
        });
    }

    for (current, new) in existing.cells.iter_mut().zip(&incoming.cells) {
        if new.is_empty() || new == current {
            continue;
        }
        if current.is_empty() {
            *current = new.clone();
        } else {
            *current = format!("{}{}{}", current, JOIN_SEPARATOR, new);
        }
    }
    existing.tags.extend(incoming.tags.iter().copied());

    Ok(())
}

/// Tracks identity keys in first-seen order, each mapped to the output
/// position of the first row that carried it.
#[derive(Debug)]
pub struct Deduplicator {
    policy: DuplicatePolicy,
    name_column: String,
    seen: IndexMap<String, usize>,
}

impl Deduplicator {
    pub fn new(policy: DuplicatePolicy, name_column: impl Into<String>) -> Self {
        Self {
            policy,
            name_column: name_column.into(),
            seen: IndexMap::new(),
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Route one row into `output` according to the policy
    pub fn push(&mut self, row: Row, output: &mut Table) -> Result<DedupOutcome> {
        let key = row_identity(&row, &self.name_column);
        if key.is_empty() {
            info!(line = row.source_line, "dropping contact without a name");
            return Ok(DedupOutcome::NoIdentity);
        }

        let first = match self.seen.get(&key).copied() {
            Some(first) => first,
            None => {
                self.seen.insert(key, output.row_count());
                output.push(row);
                return Ok(DedupOutcome::Appended);
            }
        };

        match self.policy {
            DuplicatePolicy::Drop => {
                info!(line = row.source_line, %key, "dropping duplicate contact");
                Ok(DedupOutcome::Dropped { first })
            }
            DuplicatePolicy::Merge => {
                info!(line = row.source_line, %key, "merging duplicate contact");
                merge_rows(&mut output.rows[first], &row)?;
                Ok(DedupOutcome::Merged { into: first })
            }
            DuplicatePolicy::KeepBoth => {
                debug!(line = row.source_line, %key, "keeping duplicate contact");
                output.push(row);
                Ok(DedupOutcome::KeptDuplicate { first })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Headers, Tag};

    fn headers() -> Headers {
        Headers::new(vec!["Name".into(), "Phone 1 - Value".into()]).unwrap()
    }

    fn row(name: &str, phone: &str, line: usize) -> Row {
        Row::new(headers(), vec![name.into(), phone.into()], line)
    }

    fn run(policy: DuplicatePolicy, rows: Vec<Row>) -> (Table, Vec<DedupOutcome>) {
        let mut dedup = Deduplicator::new(policy, "Name");
        let mut output = Table::new(headers());
        let outcomes = rows
            .into_iter()
            .map(|r| dedup.push(r, &mut output).unwrap())
            .collect();
        (output, outcomes)
    }

    #[test]
    fn test_drop_keeps_first() {
        let (table, outcomes) = run(
            DuplicatePolicy::Drop,
            vec![row("John Doe", "+331", 2), row("john  doe", "+332", 3)],
        );
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].cells, vec!["John Doe", "+331"]);
        assert_eq!(
            outcomes,
            vec![DedupOutcome::Appended, DedupOutcome::Dropped { first: 0 }]
        );
    }

    #[test]
    fn test_merge_joins_differing_cells() {
        let (table, outcomes) = run(
            DuplicatePolicy::Merge,
            vec![
                row("Ann", "+331", 2),
                row("Bob", "", 3),
                row("Ann", "+332", 4),
                row("ann", "", 5),
            ],
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].cells, vec!["Ann ::: ann", "+331 ::: +332"]);
        assert_eq!(table.rows[1].cells, vec!["Bob", ""]);
        assert_eq!(outcomes[2], DedupOutcome::Merged { into: 0 });
        assert_eq!(outcomes[3], DedupOutcome::Merged { into: 0 });
    }

    #[test]
    fn test_merge_fills_empty_cells_and_tags() {
        let mut first = row("Ann", "", 2);
        first.tags.insert(Tag::Name);
        let mut second = row("Ann", "+331", 3);
        second.tags.insert(Tag::Phone);

        merge_rows(&mut first, &second).unwrap();
        assert_eq!(first.cells, vec!["Ann", "+331"]);
        assert!(first.has_tag(Tag::Name) && first.has_tag(Tag::Phone));
    }

    #[test]
    fn test_merge_length_mismatch() {
        let mut first = row("Ann", "", 2);
        let other_headers = Headers::new(vec!["Name".into()]).unwrap();
        let second = Row::new(other_headers, vec!["Ann".into()], 3);
        assert!(matches!(
            merge_rows(&mut first, &second),
            Err(ContactError::MergeLengthMismatch {
                existing: 2,
                incoming: 1
            })
        ));
    }

    #[test]
    fn test_keep_both_compares_against_first() {
        let mut dedup = Deduplicator::new(DuplicatePolicy::KeepBoth, "Name");
        let mut output = Table::new(headers());
        for (i, name) in ["Ann", "ann", "A.N.N", "Bob"].iter().enumerate() {
            dedup.push(row(name, "", i + 2), &mut output).unwrap();
        }
        assert_eq!(output.row_count(), 4);

        let outcome = dedup.push(row("ANN", "", 6), &mut output).unwrap();
        assert_eq!(outcome, DedupOutcome::KeptDuplicate { first: 0 });
    }

    #[test]
    fn test_nameless_row_dropped() {
        let (table, outcomes) = run(
            DuplicatePolicy::KeepBoth,
            vec![row("", "+331", 2), row(" 42 ", "+332", 3)],
        );
        assert_eq!(table.row_count(), 0);
        assert_eq!(outcomes, vec![DedupOutcome::NoIdentity, DedupOutcome::NoIdentity]);
    }
}
