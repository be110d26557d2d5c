//! Row classification: which meaningful fields a row populates

use tracing::trace;

use crate::model::{FieldKind, Headers, Row, Tag};

use super::normalize::{title_case, PhoneFormat};

/// A tagging rule. Detection of a populated field is what triggers that
/// field's normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tagger {
    HasName,
    HasPhone,
    HasEmail,
}

impl Tagger {
    pub const ALL: [Tagger; 3] = [Tagger::HasName, Tagger::HasPhone, Tagger::HasEmail];

    /// Columns this tagger inspects
    pub fn field(&self) -> FieldKind {
        match self {
            Tagger::HasName => FieldKind::Name,
            Tagger::HasPhone => FieldKind::Phone,
            Tagger::HasEmail => FieldKind::Email,
        }
    }

    /// Tag added for each populated field
    pub fn tag(&self) -> Tag {
        match self {
            Tagger::HasName => Tag::Name,
            Tagger::HasPhone => Tag::Phone,
            Tagger::HasEmail => Tag::Email,
        }
    }

    /// Normalization applied to a populated field
    pub fn normalize(&self, value: &str, phone: &PhoneFormat) -> String {
        match self {
            Tagger::HasName => title_case(value),
            Tagger::HasPhone => phone.apply(value),
            Tagger::HasEmail => value.trim().to_string(),
        }
    }
}

/// Taggers bound to the column positions of one table
#[derive(Debug)]
pub struct Classifier {
    rules: Vec<(Tagger, Vec<usize>)>,
    phone: PhoneFormat,
}

impl Classifier {
    pub fn new(headers: &Headers, phone: PhoneFormat) -> Self {
        Self::with_taggers(headers, phone, &Tagger::ALL)
    }

    /// Classifier restricted to a subset of taggers
    fn with_taggers(headers: &Headers, phone: PhoneFormat, taggers: &[Tagger]) -> Self {
        let rules = taggers
            .iter()
            .map(|&t| (t, headers.matching(t.field().pattern())))
            .collect();
        Self { rules, phone }
    }

    /// Tag the row and normalize every populated field a tagger covers.
    /// Rows without any tag are left in place.
    pub fn classify(&self, row: &mut Row) {
        for (tagger, columns) in &self.rules {
            for &i in columns {
                if row.is_blank(i) {
                    continue;
                }
                row.tags.insert(tagger.tag());
                let normalized = tagger.normalize(&row.cells[i], &self.phone);
                if normalized != row.cells[i] {
                    trace!(line = row.source_line, column = i, %normalized, "normalized field");
                    row.cells[i] = normalized;
                }
            }
        }
    }
}
