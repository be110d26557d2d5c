//! Field normalization: noise cleanup, name casing, phone shape

use crate::config::PhoneStyle;
use crate::model::{join_values, noise_patterns, split_values, Headers, Row, JOIN_TOKEN};

use super::tagger::Classifier;

/// Title-case a name: each whitespace-separated word gets an upper-case
/// first letter and a lower-case remainder. Words are rejoined with a
/// single space.
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rewrite a phone cell to international form.
///
/// Spaces and parentheses are stripped, a leading `0` on each value is
/// replaced by `prefix`, and multiple values are rejoined with spaces
/// around the join token.
pub fn format_phone(value: &str, prefix: &str) -> String {
    let compact: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')'))
        .collect();

    let numbers: Vec<String> = compact
        .split(JOIN_TOKEN)
        .filter(|n| !n.is_empty())
        .map(|n| match n.strip_prefix('0') {
            Some(rest) => format!("{}{}", prefix, rest),
            None => n.to_string(),
        })
        .collect();

    join_values(&numbers)
}

/// Inverse of the prefix substitution in [`format_phone`]
pub fn localize_phone(value: &str, prefix: &str) -> String {
    let numbers: Vec<String> = split_values(value)
        .into_iter()
        .map(|n| match n.strip_prefix(prefix) {
            Some(rest) if !prefix.is_empty() => format!("0{}", rest),
            _ => n.to_string(),
        })
        .collect();

    join_values(&numbers)
}

/// Phone rewriting settings
#[derive(Debug, Clone)]
pub struct PhoneFormat {
    pub prefix: String,
    pub style: PhoneStyle,
}

impl PhoneFormat {
    pub fn new(prefix: impl Into<String>, style: PhoneStyle) -> Self {
        Self {
            prefix: prefix.into(),
            style,
        }
    }

    pub fn apply(&self, value: &str) -> String {
        let international = format_phone(value, &self.prefix);
        match self.style {
            PhoneStyle::International => international,
            PhoneStyle::Local => localize_phone(&international, &self.prefix),
        }
    }
}

/// Per-row normalizer: blanks noise columns, then classifies the row
/// (which applies name casing and phone formatting to populated fields).
#[derive(Debug)]
pub struct Normalizer {
    noise_columns: Vec<usize>,
    classifier: Classifier,
}

impl Normalizer {
    /// Resolve the columns each rule applies to
    pub fn new(headers: &Headers, phone: PhoneFormat) -> Self {
        let mut noise_columns: Vec<usize> = noise_patterns()
            .iter()
            .flat_map(|p| headers.matching(p))
            .collect();
        noise_columns.sort_unstable();
        noise_columns.dedup();

        Self {
            noise_columns,
            classifier: Classifier::new(headers, phone),
        }
    }

    /// Blank every noise column
    pub fn cleanup(&self, row: &mut Row) {
        for &i in &self.noise_columns {
            if let Some(cell) = row.cells.get_mut(i) {
                cell.clear();
            }
        }
    }

    /// Apply every rule to a row in place
    pub fn normalize(&self, row: &mut Row) {
        self.cleanup(row);
        self.classifier.classify(row);
    }
}
