//! gcontact-filter - Filter exported Google contacts

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use gcontact_filter::config::{
    Config, DuplicatePolicy, PhoneStyle, ReconcileMode, SourceEncoding, SummaryFormat, Verbosity,
    DEFAULT_NAME_COLUMN, DEFAULT_PHONE_PREFIX,
};
use gcontact_filter::output::{export, render_to_stderr};
use gcontact_filter::parser::load_table;
use gcontact_filter::pipeline::{Combinator, ConsoleReviewer, Filter, Pipeline, Predicate};
use gcontact_filter::{RunOutcome, Tag};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCombinator {
    Any,
    All,
}

impl From<CliCombinator> for Combinator {
    fn from(c: CliCombinator) -> Self {
        match c {
            CliCombinator::Any => Combinator::Any,
            CliCombinator::All => Combinator::All,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEncoding {
    #[value(name = "utf-16", alias = "utf16")]
    Utf16,
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
}

impl From<CliEncoding> for SourceEncoding {
    fn from(e: CliEncoding) -> Self {
        match e {
            CliEncoding::Utf16 => SourceEncoding::Utf16,
            CliEncoding::Utf8 => SourceEncoding::Utf8,
        }
    }
}

/// Filter exported Google contacts
#[derive(Parser, Debug)]
#[command(name = "gcontact-filter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Google contacts CSV export
    csv_path: PathBuf,

    /// Keep contacts carrying any of these tags: name, phone, email (comma-separated)
    #[arg(short, long, value_delimiter = ',', conflicts_with = "require")]
    tags: Vec<Tag>,

    /// Keep contacts whose fields satisfy these checks: name, phone, email (comma-separated)
    #[arg(long, value_delimiter = ',')]
    require: Vec<Predicate>,

    /// How --require checks combine
    #[arg(long = "match", value_enum, default_value = "any", requires = "require")]
    combinator: CliCombinator,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Drop contacts whose name was already seen
    #[arg(long, conflicts_with = "merge_duplicates")]
    drop_duplicates: bool,

    /// Merge contacts whose name was already seen into the first one
    #[arg(long)]
    merge_duplicates: bool,

    /// Report contacts with several emails in one field
    #[arg(long, conflicts_with = "fix_emails")]
    check_emails: bool,

    /// Review every email of contacts with several emails in one field
    #[arg(long)]
    fix_emails: bool,

    /// Encoding of the export
    #[arg(long, value_enum, default_value = "utf-16")]
    encoding: CliEncoding,

    /// Prefix replacing a leading 0 in phone numbers
    #[arg(long, default_value = DEFAULT_PHONE_PREFIX)]
    phone_prefix: String,

    /// Write phone numbers in local form (leading 0)
    #[arg(long)]
    local_phones: bool,

    /// Column holding the contact name
    #[arg(long, default_value = DEFAULT_NAME_COLUMN)]
    name_column: String,

    /// Print a run summary to stderr
    #[arg(long)]
    summary: Option<SummaryFormat>,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Debug
        } else {
            Verbosity::Info
        }
    }

    fn filter(&self) -> Option<Filter> {
        if !self.tags.is_empty() {
            Some(Filter::Tags(self.tags.clone()))
        } else if !self.require.is_empty() {
            Some(Filter::Predicates {
                predicates: self.require.clone(),
                combinator: self.combinator.into(),
            })
        } else {
            None
        }
    }

    fn into_config(self) -> Result<Config> {
        let duplicates = DuplicatePolicy::from_flags(self.drop_duplicates, self.merge_duplicates)?;
        let emails = match (self.check_emails, self.fix_emails) {
            (_, true) => ReconcileMode::Fix,
            (true, false) => ReconcileMode::DryRun,
            (false, false) => ReconcileMode::Off,
        };
        let phone_style = if self.local_phones {
            PhoneStyle::Local
        } else {
            PhoneStyle::International
        };

        let mut config = Config::new(self.csv_path.clone())
            .with_encoding(self.encoding.into())
            .with_duplicates(duplicates)
            .with_emails(emails)
            .with_phone_prefix(self.phone_prefix.clone())
            .with_phone_style(phone_style)
            .with_name_column(self.name_column.clone())
            .with_verbosity(self.verbosity());

        if let Some(filter) = self.filter() {
            config = config.with_filter(filter);
        }
        if let Some(output) = self.output {
            config = config.with_output(output);
        }
        if let Some(format) = self.summary {
            config = config.with_summary(format);
        }
        Ok(config)
    }
}

fn init_logging(verbosity: Verbosity) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(verbosity.as_directive()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))
}

fn main() -> ExitCode {
    match run() {
        Ok(RunOutcome::Exported) => ExitCode::SUCCESS,
        Ok(RunOutcome::NothingToExport) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<RunOutcome> {
    let config = Cli::parse().into_config()?;
    init_logging(config.verbosity)?;

    let table = load_table(&config.source, config.encoding)
        .with_context(|| format!("Failed to load contacts: {}", config.source.display()))?;

    let mut reviewer = ConsoleReviewer::stdio();
    let report = Pipeline::new(config.clone()).run(table, &mut reviewer)?;

    if let Some(filtered) = &report.filtered {
        export(filtered, config.output.as_deref()).context("Failed to export contacts")?;
    }

    if let Some(format) = config.summary {
        render_to_stderr(&report.stats, &config.source, format)?;
    }

    Ok(report.outcome())
}
