//! Command handlers for the cash-audit CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod analysis;
mod init;
mod list;
mod summary;
mod units;

use crate::api::{self, Mode, TEST_SOURCE_URL};
use crate::{Config, Result, Session};
use anyhow::{bail, Context};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};
use url::Url;

pub use analysis::analysis;
pub use init::init;
pub use list::list;
pub use summary::{summary, SummaryFigures};
pub use units::units;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to stdout and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        println!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads the records from the configured sources into a new `Session`.
///
/// In `Mode::Testing`, a config without sources falls back to `TEST_SOURCE_URL`, which serves the
/// seed data.
async fn load_session(config: &Config, mode: Mode) -> Result<Session> {
    let mut urls = config.candidate_urls()?;
    if urls.is_empty() {
        match mode {
            Mode::Testing => urls.push(Url::parse(TEST_SOURCE_URL)?),
            Mode::Http => bail!(
                "No data sources are configured, pass --source or create a config with \
                'cash-audit init'"
            ),
        }
    }
    let parser = config.parser()?;
    let mut source = api::source(mode)?;
    let mut session = Session::new();
    session
        .refresh(source.as_mut(), &urls, &parser)
        .await
        .context("Unable to load the cash records")?;
    info!("{}", session.status());
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_session_in_test_mode() {
        let session = load_session(&Config::default(), Mode::Testing)
            .await
            .unwrap();
        assert_eq!(session.records().len(), 7);
        assert!(session.status().starts_with("Updated at "));
    }

    #[tokio::test]
    async fn test_load_session_without_sources() {
        let err = load_session(&Config::default(), Mode::Http)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No data sources"));
    }

    #[test]
    fn test_out_from_message() {
        let out: Out<()> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
    }
}
