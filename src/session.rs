//! The state of one dashboard session: the loaded records, the current criteria and everything
//! derived from them.
//!
//! The filtered view and the summary are recomputed synchronously whenever the records or the
//! criteria change, so they always agree with each other.

use crate::api::{fetch_first_available, Source};
use crate::filter::Criteria;
use crate::model::Record;
use crate::parser::RecordParser;
use crate::summary::{summarize, Summary};
use crate::Result;
use chrono::Local;
use tracing::{debug, info};
use url::Url;

/// Identifies one refresh. Tickets increase monotonically in the order refreshes are started.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RefreshTicket(u64);

/// Fetches CSV text from the first available of `urls` and parses it into records.
pub async fn fetch_records(
    source: &mut (dyn Source + Send),
    urls: &[Url],
    parser: &RecordParser,
) -> Result<Vec<Record>> {
    let text = fetch_first_available(source, urls).await?;
    Ok(parser.parse(&text))
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    records: Vec<Record>,
    criteria: Criteria,
    /// Indexes into `records` of the records that match `criteria`.
    filtered: Vec<usize>,
    summary: Summary,
    status: String,
    /// The last ticket handed out by `begin_refresh`.
    issued: u64,
    /// The ticket of the refresh whose records are currently shown.
    applied: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record from the last successful refresh, in sheet order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Replaces the criteria and recomputes the filtered view.
    pub fn set_criteria(&mut self, criteria: Criteria) {
        self.criteria = criteria;
        self.refilter();
    }

    /// The records that match the current criteria, in sheet order.
    pub fn filtered(&self) -> Vec<&Record> {
        self.filtered.iter().map(|&ix| &self.records[ix]).collect()
    }

    /// The summary of all records, regardless of the criteria.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// The sorted, distinct unit names; the choices for the unit filter.
    pub fn units(&self) -> Vec<&str> {
        self.summary
            .distinct_units
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// A one-line description of the last refresh, for display.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Marks the start of a refresh and returns its ticket.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        self.status = "Loading data...".to_string();
        RefreshTicket(self.issued)
    }

    /// Applies the outcome of the refresh identified by `ticket`.
    ///
    /// On success, the records are replaced wholesale and everything derived from them is
    /// recomputed. On failure, the current records stay in place and the status line shows the
    /// error, which is then returned. The outcome of a refresh that started before the refresh
    /// currently shown is discarded.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        outcome: Result<Vec<Record>>,
    ) -> Result<()> {
        if ticket.0 <= self.applied {
            debug!(
                "Discarding refresh {} because refresh {} is newer",
                ticket.0, self.applied
            );
            return Ok(());
        }
        match outcome {
            Ok(records) => {
                info!("Loaded {} records", records.len());
                self.applied = ticket.0;
                self.replace_records(records);
                self.status = format!("Updated at {}", Local::now().format("%H:%M:%S"));
                Ok(())
            }
            Err(e) => {
                self.status = format!("Failed to load data: {e:#}");
                Err(e)
            }
        }
    }

    /// Fetches and parses fresh records and applies them. See `complete_refresh`.
    pub async fn refresh(
        &mut self,
        source: &mut (dyn Source + Send),
        urls: &[Url],
        parser: &RecordParser,
    ) -> Result<()> {
        let ticket = self.begin_refresh();
        let outcome = fetch_records(source, urls, parser).await;
        self.complete_refresh(ticket, outcome)
    }

    fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.summary = summarize(&self.records);
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.criteria.matches(r))
            .map(|(ix, _)| ix)
            .collect();
        debug!(
            "{} of {} records match the criteria",
            self.filtered.len(),
            self.records.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{TestResponse, TestSource};
    use crate::filter::{DivergenceFilter, UnitFilter};
    use crate::test::{csv_text, record};
    use anyhow::anyhow;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.records().is_empty());
        assert!(session.filtered().is_empty());
        assert_eq!(session.summary().unit_count(), 0);
    }

    #[test]
    fn test_criteria_change_refilters_but_summary_covers_everything() {
        let mut session = Session::new();
        let ticket = session.begin_refresh();
        session
            .complete_refresh(
                ticket,
                Ok(vec![
                    record("01/01/2024", "A", "100", "OK"),
                    record("02/01/2024", "B", "50", "ERRO"),
                ]),
            )
            .unwrap();
        assert_eq!(session.filtered().len(), 2);

        session.set_criteria(Criteria {
            divergence: DivergenceFilter::Ok,
            ..Default::default()
        });
        assert_eq!(session.filtered().len(), 1);
        assert_eq!(session.filtered()[0].unit, "A");
        assert_eq!(session.summary().unit_count(), 2);
        assert_eq!(session.summary().divergent_unit_count, 1);
    }

    #[test]
    fn test_new_records_keep_criteria() {
        let mut session = Session::new();
        session.set_criteria(Criteria {
            unit: UnitFilter::Only("B".into()),
            ..Default::default()
        });
        let ticket = session.begin_refresh();
        session
            .complete_refresh(
                ticket,
                Ok(vec![
                    record("01/01/2024", "A", "1", "OK"),
                    record("01/01/2024", "B", "1", "OK"),
                ]),
            )
            .unwrap();
        assert_eq!(session.filtered().len(), 1);
        assert_eq!(session.units(), vec!["A", "B"]);
    }

    #[test]
    fn test_failure_keeps_previous_records() {
        let mut session = Session::new();
        let first = session.begin_refresh();
        session
            .complete_refresh(first, Ok(vec![record("01/01/2024", "A", "1", "OK")]))
            .unwrap();

        let second = session.begin_refresh();
        assert_eq!(session.status(), "Loading data...");
        let result = session.complete_refresh(second, Err(anyhow!("HTTP 503")));

        assert!(result.is_err());
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.status(), "Failed to load data: HTTP 503");
    }

    #[test]
    fn test_stale_refresh_is_discarded() {
        let mut session = Session::new();
        let older = session.begin_refresh();
        let newer = session.begin_refresh();

        session
            .complete_refresh(newer, Ok(vec![record("02/01/2024", "New", "1", "OK")]))
            .unwrap();
        session
            .complete_refresh(older, Ok(vec![record("01/01/2024", "Old", "1", "OK")]))
            .unwrap();

        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].unit, "New");
    }

    #[test]
    fn test_older_refresh_applies_when_newer_failed() {
        let mut session = Session::new();
        let older = session.begin_refresh();
        let newer = session.begin_refresh();

        assert!(session
            .complete_refresh(newer, Err(anyhow!("fetch failed")))
            .is_err());
        session
            .complete_refresh(older, Ok(vec![record("01/01/2024", "Old", "1", "OK")]))
            .unwrap();

        assert_eq!(session.records()[0].unit, "Old");
        assert!(session.status().starts_with("Updated at "));
    }

    #[tokio::test]
    async fn test_refresh_end_to_end() {
        let primary = url("https://primary.test/sheet.csv");
        let mirror = url("https://mirror.test/sheet.csv");
        let body = csv_text(&[
            ("01/01/2024", "A", "100", "OK"),
            ("02/01/2024", "A", "150", "OK"),
            ("02/01/2024", "B", "10", "DIVERGENTE"),
        ]);
        let mut source = TestSource::empty()
            .with(&primary, TestResponse::Status(404))
            .with(&mirror, TestResponse::Body(body));

        let mut session = Session::new();
        session
            .refresh(&mut source, &[primary, mirror], &RecordParser::default())
            .await
            .unwrap();

        assert_eq!(session.records().len(), 3);
        assert_eq!(
            session.summary().total_balance.value(),
            rust_decimal::Decimal::from(160)
        );
        assert_eq!(session.summary().divergent_unit_count, 1);
    }
}
