//! Cells holding several values joined by `:::`

/// Token separating values inside one cell
pub const JOIN_TOKEN: &str = ":::";

/// Separator written between values, spaced for readability
pub const JOIN_SEPARATOR: &str = " ::: ";

/// Split a cell into its trimmed, non-empty values
pub fn split_values(cell: &str) -> Vec<&str> {
    cell.split(JOIN_TOKEN)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}

/// Join values back into a single cell
pub fn join_values<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(JOIN_SEPARATOR)
}
