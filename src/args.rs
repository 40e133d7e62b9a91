//! These structs provide the CLI interface for the cash-audit CLI.

use crate::filter::{Criteria, DivergenceFilter, UnitFilter};
use crate::model::parse_date_iso;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;
use url::Url;

/// cash-audit: audit daily cash-register reconciliations across business units.
///
/// The program downloads the CSV export of a published reconciliation spreadsheet, one row per
/// unit per day, and shows which units have divergences, their latest cash balances and the rows
/// matching your filters.
///
/// Sources are read from the config file (see `cash-audit init`) or given with --source. When
/// several sources are available they are tried in order until one succeeds.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a config file holding the sources given with --source.
    ///
    /// The file is written to --config, or to the default location if --config is not given. It
    /// is an error if the file already exists.
    Init(InitArgs),
    /// Show the number of units, the number of units with divergences, the total cash balance
    /// (latest record of each unit) and the most recent date.
    Summary,
    /// Show the records that match the filters.
    List(ListArgs),
    /// List the distinct unit names, sorted.
    Units,
    /// Print a one-line analysis of one of the records that match the filters, ready to paste.
    Analysis(AnalysisArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The config file. Defaults to cash-audit/config.json in your platform's config directory,
    /// which is used only if it exists.
    #[arg(long, global = true, env = "CASH_AUDIT_CONFIG")]
    config: Option<PathBuf>,

    /// A URL of the published CSV export. May be repeated; they are tried in order. Replaces the
    /// sources from the config file.
    #[arg(long = "source", global = true)]
    sources: Vec<Url>,
}

impl Common {
    pub fn new(log_level: LevelFilter, config: Option<PathBuf>, sources: Vec<Url>) -> Self {
        Self {
            log_level,
            config,
            sources,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    pub fn sources(&self) -> &[Url] {
        &self.sources
    }
}

/// Args for the `cash-audit init` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct InitArgs {
    /// When set, each source is also tried through this mirror after all sources have failed, by
    /// appending the full source URL to it, e.g. https://cors.isomorphic-git.org/
    #[arg(long)]
    mirror_prefix: Option<String>,

    /// A brand name to remove from unit names, ignoring case. May be repeated.
    #[arg(long = "brand-affix")]
    brand_affixes: Vec<String>,
}

impl InitArgs {
    pub fn new(mirror_prefix: Option<String>, brand_affixes: Vec<String>) -> Self {
        Self {
            mirror_prefix,
            brand_affixes,
        }
    }

    pub fn mirror_prefix(&self) -> Option<&str> {
        self.mirror_prefix.as_deref()
    }

    pub fn brand_affixes(&self) -> &[String] {
        &self.brand_affixes
    }
}

/// The criteria shared by `list` and `analysis`.
#[derive(Debug, Parser, Clone, Default)]
pub struct FilterArgs {
    /// Only show records of this unit (exact name, see `cash-audit units`).
    #[arg(long)]
    unit: Option<String>,

    /// Only show records with this status.
    #[arg(long, value_enum, default_value_t = DivergenceFilter::All)]
    status: DivergenceFilter,

    /// Only show records whose date, unit or status contains this text, ignoring case.
    #[arg(long)]
    search: Option<String>,

    /// Only show records on or after this date, as YYYY-MM-DD.
    #[arg(long, value_parser = iso_date)]
    from: Option<NaiveDate>,

    /// Only show records on or before this date, as YYYY-MM-DD.
    #[arg(long, value_parser = iso_date)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn new(
        unit: Option<String>,
        status: DivergenceFilter,
        search: Option<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        Self {
            unit,
            status,
            search,
            from,
            to,
        }
    }

    /// The filter `Criteria` these arguments describe.
    pub fn criteria(&self) -> Criteria {
        Criteria {
            unit: match &self.unit {
                Some(unit) => UnitFilter::Only(unit.clone()),
                None => UnitFilter::All,
            },
            divergence: self.status,
            search: self.search.clone().unwrap_or_default(),
            date_from: self.from,
            date_to: self.to,
        }
    }
}

fn iso_date(s: &str) -> Result<NaiveDate, String> {
    parse_date_iso(s).ok_or_else(|| format!("'{s}' is not a date in the form YYYY-MM-DD"))
}

/// How `cash-audit list` prints records.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// A Markdown table.
    #[default]
    Table,
    /// A JSON array of records.
    Json,
    /// CSV with plain decimal numbers.
    Csv,
}

serde_plain::derive_display_from_serialize!(Format);
serde_plain::derive_fromstr_from_deserialize!(Format);

/// Args for the `cash-audit list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    #[clap(flatten)]
    filter: FilterArgs,

    /// The output format.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

impl ListArgs {
    pub fn new(filter: FilterArgs, format: Format) -> Self {
        Self { filter, format }
    }

    pub fn filter(&self) -> &FilterArgs {
        &self.filter
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

/// Args for the `cash-audit analysis` command.
#[derive(Debug, Parser, Clone)]
pub struct AnalysisArgs {
    /// The position of the record among the filtered records, starting at 1 (as numbered by
    /// `cash-audit list`).
    row: usize,

    #[clap(flatten)]
    filter: FilterArgs,
}

impl AnalysisArgs {
    pub fn new(row: usize, filter: FilterArgs) -> Self {
        Self { row, filter }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn filter(&self) -> &FilterArgs {
        &self.filter
    }
}
