//! Table, Row, and Tag data structures

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{ContactError, Result};

use super::fields::FieldPattern;

/// Semantic category of populated contact data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Name,
    Phone,
    Email,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Name => "name",
            Tag::Phone => "phone",
            Tag::Email => "email",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tag {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Tag::Name),
            "phone" => Ok(Tag::Phone),
            "email" | "e-mail" => Ok(Tag::Email),
            other => Err(ContactError::InvalidTag(other.to_string())),
        }
    }
}

/// Header names shared between a table and its rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers(Arc<[String]>);

impl Headers {
    /// Build headers, rejecting duplicate names
    pub fn new(names: Vec<String>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ContactError::DuplicateHeader(name.clone()));
            }
        }
        Ok(Self(names.into()))
    }

    /// Position of a header by exact name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|h| h == name)
    }

    /// Positions of every header matching a pattern
    pub fn matching(&self, pattern: &FieldPattern) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, h)| pattern.matches(h))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A contact row
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in header order
    pub cells: Vec<String>,
    /// Tags assigned by the classifier
    pub tags: FxHashSet<Tag>,
    /// Line in the source file (1-indexed, header is line 1)
    pub source_line: usize,
    headers: Headers,
}

impl Row {
    /// Create an untagged row
    pub fn new(headers: Headers, cells: Vec<String>, source_line: usize) -> Self {
        Self {
            cells,
            tags: FxHashSet::default(),
            source_line,
            headers,
        }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Cell value by header name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .index_of(name)
            .and_then(|i| self.cells.get(i))
            .map(String::as_str)
    }

    /// True when the cell at `index` is missing or only whitespace
    pub fn is_blank(&self, index: usize) -> bool {
        self.cells.get(index).map_or(true, |c| c.trim().is_empty())
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// Tags in a stable order, for display
    pub fn sorted_tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self.tags.iter().copied().collect();
        tags.sort();
        tags
    }
}

/// A contact table
#[derive(Debug, Clone)]
pub struct Table {
    /// Column names
    pub headers: Headers,
    /// Rows in source order
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table
    pub fn new(headers: Headers) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// An empty table sharing this table's headers
    pub fn empty_like(&self) -> Self {
        Self::new(self.headers.clone())
    }

    /// Append a record, enforcing one cell per header
    pub fn push_cells(&mut self, cells: Vec<String>, source_line: usize) -> Result<()> {
        if cells.len() != self.headers.len() {
            return Err(ContactError::MalformedRow {
                line: source_line,
                expected: self.headers.len(),
                found: cells.len(),
            });
        }
        self.rows
            .push(Row::new(self.headers.clone(), cells, source_line));
        Ok(())
    }

    /// Append an already-built row
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.index_of(name)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}
