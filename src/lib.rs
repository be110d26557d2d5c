//! gcontact-filter - Filter exported Google contacts
//!
//! Normalizes a contacts export, drops or merges duplicate contacts, keeps
//! the rows that carry the requested fields, and optionally reconciles
//! email cells holding several addresses.

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;

pub use config::Config;
pub use error::{ContactError, Result};
pub use model::{Row, Table, Tag};
pub use pipeline::{filter_contacts, Pipeline, RunOutcome, RunReport};
