//! Configuration handling for gcontact-filter

use std::path::PathBuf;

use crate::error::{ContactError, Result};
use crate::pipeline::Filter;

/// Default international prefix substituted for a leading `0`
pub const DEFAULT_PHONE_PREFIX: &str = "+33";

/// Default header holding the contact display name
pub const DEFAULT_NAME_COLUMN: &str = "Name";

/// Diagnostic verbosity. Never affects control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    #[default]
    Info,
    Debug,
}

impl Verbosity {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// What to do with a row whose identity key was already seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    #[default]
    KeepBoth,
    Drop,
    Merge,
}

impl DuplicatePolicy {
    /// Build the policy from the two command-line switches
    pub fn from_flags(drop: bool, merge: bool) -> Result<Self> {
        match (drop, merge) {
            (true, true) => Err(ContactError::ConflictingDuplicateModes),
            (true, false) => Ok(DuplicatePolicy::Drop),
            (false, true) => Ok(DuplicatePolicy::Merge),
            (false, false) => Ok(DuplicatePolicy::KeepBoth),
        }
    }
}

/// Email reconciliation mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcileMode {
    #[default]
    Off,
    /// Count rows with several emails, change nothing
    DryRun,
    /// Ask a reviewer about every value
    Fix,
}

/// Which phone number shape is written out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PhoneStyle {
    #[default]
    International,
    Local,
}

/// Character encoding of the source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceEncoding {
    /// Google exports; transcoded to a sibling UTF-8 file first
    #[default]
    Utf16,
    Utf8,
}

/// Format of the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(SummaryFormat::Terminal),
            "json" => Ok(SummaryFormat::Json),
            _ => Err(format!("Unknown summary format: {}", s)),
        }
    }
}

/// Configuration for a filtering run
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the exported contacts
    pub source: PathBuf,
    /// Destination; `None` writes to stdout
    pub output: Option<PathBuf>,
    /// Encoding of `source`
    pub encoding: SourceEncoding,
    /// Row selection; `None` means nothing will be exported
    pub filter: Option<Filter>,
    /// Duplicate handling
    pub duplicates: DuplicatePolicy,
    /// Email reconciliation
    pub emails: ReconcileMode,
    /// Prefix replacing a leading `0` in phone numbers
    pub phone_prefix: String,
    /// Phone number shape written out
    pub phone_style: PhoneStyle,
    /// Header used to derive identity keys and display names
    pub name_column: String,
    /// Diagnostic verbosity
    pub verbosity: Verbosity,
    /// Print a run summary to stderr
    pub summary: Option<SummaryFormat>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            output: None,
            encoding: SourceEncoding::default(),
            filter: None,
            duplicates: DuplicatePolicy::default(),
            emails: ReconcileMode::default(),
            phone_prefix: DEFAULT_PHONE_PREFIX.to_string(),
            phone_style: PhoneStyle::default(),
            name_column: DEFAULT_NAME_COLUMN.to_string(),
            verbosity: Verbosity::default(),
            summary: None,
        }
    }
}

impl Config {
    /// Create a new Config for a source file
    pub fn new(source: PathBuf) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    /// Set the output path
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    /// Set the source encoding
    pub fn with_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the row filter
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set duplicate handling
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Set email reconciliation mode
    pub fn with_emails(mut self, mode: ReconcileMode) -> Self {
        self.emails = mode;
        self
    }

    /// Set the international phone prefix
    pub fn with_phone_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.phone_prefix = prefix.into();
        self
    }

    /// Set the phone style
    pub fn with_phone_style(mut self, style: PhoneStyle) -> Self {
        self.phone_style = style;
        self
    }

    /// Set the name column
    pub fn with_name_column(mut self, column: impl Into<String>) -> Self {
        self.name_column = column.into();
        self
    }

    /// Set verbosity
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Enable the run summary
    pub fn with_summary(mut self, format: SummaryFormat) -> Self {
        self.summary = Some(format);
        self
    }
}
