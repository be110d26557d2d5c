//! Row selection by tag or predicate

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::error::{ContactError, Result};
use crate::model::{FieldKind, Row, Table, Tag};

/// A named check evaluated directly against a row's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    HasName,
    HasPhone,
    HasEmail,
}

impl Predicate {
    fn field(&self) -> FieldKind {
        match self {
            Predicate::HasName => FieldKind::Name,
            Predicate::HasPhone => FieldKind::Phone,
            Predicate::HasEmail => FieldKind::Email,
        }
    }

    /// True when at least one matching field is populated
    pub fn evaluate(&self, row: &Row) -> bool {
        row.headers()
            .matching(self.field().pattern())
            .into_iter()
            .any(|i| !row.is_blank(i))
    }
}

impl std::str::FromStr for Predicate {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" | "has_name" => Ok(Predicate::HasName),
            "phone" | "has_phone" => Ok(Predicate::HasPhone),
            "email" | "has_email" => Ok(Predicate::HasEmail),
            other => Err(ContactError::InvalidTag(other.to_string())),
        }
    }
}

/// How several predicates combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Combinator {
    /// At least one predicate holds
    #[default]
    Any,
    /// Every predicate holds
    All,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Any => write!(f, "any"),
            Combinator::All => write!(f, "all"),
        }
    }
}

/// Row selection policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Keep rows carrying at least one of these tags
    Tags(Vec<Tag>),
    /// Keep rows satisfying the predicates under the combinator
    Predicates {
        predicates: Vec<Predicate>,
        combinator: Combinator,
    },
}

/// Counts reported by a filter run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub original: usize,
    pub filtered: usize,
}

impl Filter {
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Tags(tags) => tags.iter().any(|t| row.has_tag(*t)),
            Filter::Predicates {
                predicates,
                combinator: Combinator::Any,
            } => predicates.iter().any(|p| p.evaluate(row)),
            Filter::Predicates {
                predicates,
                combinator: Combinator::All,
            } => predicates.iter().all(|p| p.evaluate(row)),
        }
    }

    /// Copy the matching rows into a new table, preserving order
    pub fn apply(&self, table: &Table) -> (Table, FilterCounts) {
        let mut filtered = table.empty_like();
        for row in table.rows.iter().filter(|r| self.matches(r)) {
            filtered.push(row.clone());
        }

        let counts = FilterCounts {
            original: table.row_count(),
            filtered: filtered.row_count(),
        };
        info!(
            original = counts.original,
            filtered = counts.filtered,
            filter = %self,
            "filtered contacts"
        );
        (filtered, counts)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Tags(tags) => {
                let names: Vec<_> = tags.iter().map(Tag::as_str).collect();
                write!(f, "tags({})", names.join(","))
            }
            Filter::Predicates {
                predicates,
                combinator,
            } => write!(f, "{}({:?})", combinator, predicates),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Headers;

    fn table() -> Table {
        let headers = Headers::new(vec![
            "Name".into(),
            "Phone 1 - Value".into(),
            "E-mail 1 - Value".into(),
        ])
        .unwrap();
        let mut table = Table::new(headers);
        let rows = [
            ("Ann", "+331", "", vec![Tag::Name, Tag::Phone]),
            ("Bob", "", "bob@x.com", vec![Tag::Name, Tag::Email]),
            ("Cid", "", "", vec![Tag::Name]),
            ("Dee", "+332", "dee@x.com", vec![Tag::Name, Tag::Phone, Tag::Email]),
        ];
        for (i, (name, phone, email, tags)) in rows.into_iter().enumerate() {
            table
                .push_cells(vec![name.into(), phone.into(), email.into()], i + 2)
                .unwrap();
            table.rows[i].tags.extend(tags);
        }
        table
    }

    fn names(table: &Table) -> Vec<&str> {
        table.rows.iter().map(|r| r.cells[0].as_str()).collect()
    }

    #[test]
    fn test_tag_filter_is_or() {
        let source = table();
        let requested = [Tag::Phone, Tag::Email];
        let filter = Filter::Tags(requested.to_vec());
        let (filtered, counts) = filter.apply(&source);

        assert_eq!(names(&filtered), vec!["Ann", "Bob", "Dee"]);
        assert_eq!(counts, FilterCounts { original: 4, filtered: 3 });

        for row in &source.rows {
            let intersects = row.tags.iter().any(|t| requested.contains(t));
            assert_eq!(filter.matches(row), intersects);
        }
    }

    #[test]
    fn test_tag_filter_single() {
        let (filtered, _) = Filter::Tags(vec![Tag::Email]).apply(&table());
        assert_eq!(names(&filtered), vec!["Bob", "Dee"]);
    }

    #[test]
    fn test_predicate_parsing() {
        assert_eq!("phone".parse::<Predicate>().unwrap(), Predicate::HasPhone);
        assert_eq!(" Has_Email".parse::<Predicate>().unwrap(), Predicate::HasEmail);
        assert!(matches!(
            "fax".parse::<Predicate>(),
            Err(ContactError::InvalidTag(t)) if t == "fax"
        ));
    }

    #[test]
    fn test_predicates_any() {
        let filter = Filter::Predicates {
            predicates: vec![Predicate::HasPhone, Predicate::HasEmail],
            combinator: Combinator::Any,
        };
        let (filtered, _) = filter.apply(&table());
        assert_eq!(names(&filtered), vec!["Ann", "Bob", "Dee"]);
    }

    #[test]
    fn test_predicates_all() {
        let filter = Filter::Predicates {
            predicates: vec![Predicate::HasPhone, Predicate::HasEmail],
            combinator: Combinator::All,
        };
        let (filtered, counts) = filter.apply(&table());
        assert_eq!(names(&filtered), vec!["Dee"]);
        assert_eq!(counts.filtered, 1);
    }

    #[test]
    fn test_predicates_ignore_tags() {
        let mut source = table();
        for row in &mut source.rows {
            row.tags.clear();
        }
        let filter = Filter::Predicates {
            predicates: vec![Predicate::HasEmail],
            combinator: Combinator::Any,
        };
        assert_eq!(names(&filter.apply(&source).0), vec!["Bob", "Dee"]);
        assert!(Filter::Tags(vec![Tag::Email]).apply(&source).0.rows.is_empty());
    }
}
