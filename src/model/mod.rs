//! Data model for contact tables

mod fields;
mod key;
mod multi_value;
mod table;

pub use fields::{noise_patterns, FieldKind, FieldPattern};
pub use key::{identity_key, row_identity};
pub use multi_value::{join_values, split_values, JOIN_SEPARATOR, JOIN_TOKEN};
pub use table::{Headers, Row, Table, Tag};
