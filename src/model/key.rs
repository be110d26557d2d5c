//! Identity keys for duplicate detection

use super::table::Row;

/// Separator replacing every run of non-letter characters
const SEPARATOR: char = '-';

/// Derive the identity key of a contact name.
///
/// Trims, lowercases and collapses each run of non-letters into a single
/// `-`. Leading and trailing runs are dropped, so `"O'Brien "` and
/// `"o brien"` both give `o-brien`.
pub fn identity_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.trim().chars() {
        if ch.is_alphabetic() {
            if pending_separator && !key.is_empty() {
                key.push(SEPARATOR);
            }
            pending_separator = false;
            key.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    key
}

/// Identity key of a row, read from `name_column`. Empty when the column
/// is absent or holds no letters.
pub fn row_identity(row: &Row, name_column: &str) -> String {
    row.get(name_column).map(identity_key).unwrap_or_default()
}
