//! The filter engine: selects the records an operator is currently looking at.

use crate::model::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The sentinel meaning "do not filter on this".
pub const ALL: &str = "ALL";

/// Restricts records to a single unit, or lets all of them through.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub enum UnitFilter {
    #[default]
    All,
    Only(String),
}

impl FromStr for UnitFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL {
            UnitFilter::All
        } else {
            UnitFilter::Only(s.to_string())
        })
    }
}

impl Display for UnitFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitFilter::All => f.write_str(ALL),
            UnitFilter::Only(unit) => f.write_str(unit),
        }
    }
}

/// Restricts records by their reconciliation status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum DivergenceFilter {
    /// Every record, whatever its status.
    #[default]
    All,
    /// Only records whose status is `OK`.
    Ok,
    /// Only records with a divergence.
    Divergent,
}

serde_plain::derive_display_from_serialize!(DivergenceFilter);
serde_plain::derive_fromstr_from_deserialize!(DivergenceFilter);

/// The full set of criteria. A record is selected when it satisfies all of them; the default value
/// selects everything.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Criteria {
    pub unit: UnitFilter,
    pub divergence: DivergenceFilter,
    /// Case-insensitive text that must appear in the date, unit or status of a record.
    pub search: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl Criteria {
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_unit(record)
            && self.matches_divergence(record)
            && self.matches_search(record)
            && self.matches_dates(record)
    }

    fn matches_unit(&self, record: &Record) -> bool {
        match &self.unit {
            UnitFilter::All => true,
            UnitFilter::Only(unit) => &record.unit == unit,
        }
    }

    fn matches_divergence(&self, record: &Record) -> bool {
        match self.divergence {
            DivergenceFilter::All => true,
            DivergenceFilter::Ok => record.status.is_ok(),
            DivergenceFilter::Divergent => record.status.is_divergent(),
        }
    }

    fn matches_search(&self, record: &Record) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [
            record.date.as_str(),
            record.unit.as_str(),
            record.status.label(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }

    /// A record without a parseable date only passes when no bound is set.
    fn matches_dates(&self, record: &Record) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        let Some(date) = record.parsed_date else {
            return false;
        };
        self.date_from.map_or(true, |from| date >= from)
            && self.date_to.map_or(true, |to| date <= to)
    }
}

/// Returns the records that satisfy `criteria`, in their original order.
pub fn apply_filters<'a>(records: &'a [Record], criteria: &Criteria) -> Vec<&'a Record> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_date_iso;
    use crate::test::record;

    fn dates(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.date.clone()).collect()
    }

    #[test]
    fn test_default_criteria_select_everything() {
        let records = vec![
            record("01/01/2024", "Centro", "1", "OK"),
            record("bad date", "Norte", "1", "ERRO"),
        ];
        assert_eq!(apply_filters(&records, &Criteria::default()).len(), 2);
    }

    #[test]
    fn test_unit_filter() {
        let records = vec![
            record("01/01/2024", "Centro", "1", "OK"),
            record("02/01/2024", "Norte", "1", "OK"),
            record("03/01/2024", "Centro", "1", "OK"),
        ];
        let criteria = Criteria {
            unit: "Centro".parse().unwrap(),
            ..Default::default()
        };
        let selected = apply_filters(&records, &criteria);
        assert_eq!(dates(&selected), vec!["01/01/2024", "03/01/2024"]);
    }

    #[test]
    fn test_unit_filter_is_exact() {
        let records = vec![record("01/01/2024", "Centro Sul", "1", "OK")];
        let criteria = Criteria {
            unit: UnitFilter::Only("Centro".into()),
            ..Default::default()
        };
        assert!(apply_filters(&records, &criteria).is_empty());
    }

    #[test]
    fn test_divergent_filter() {
        let records = vec![
            record("01/01/2024", "Centro", "1", "OK"),
            record("02/01/2024", "Centro", "1", "ERRO"),
        ];
        let criteria = Criteria {
            divergence: DivergenceFilter::Divergent,
            ..Default::default()
        };
        let selected = apply_filters(&records, &criteria);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].status.label(), "ERRO");
    }

    #[test]
    fn test_ok_filter() {
        let records = vec![
            record("01/01/2024", "Centro", "1", "sem dia anterior"),
            record("02/01/2024", "Centro", "1", "ERRO"),
        ];
        let criteria = Criteria {
            divergence: DivergenceFilter::Ok,
            ..Default::default()
        };
        assert_eq!(dates(&apply_filters(&records, &criteria)), vec!["01/01/2024"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_date_unit_and_status() {
        let records = vec![
            record("01/01/2024", "Centro", "1", "OK"),
            record("02/01/2024", "Norte", "1", "FALTA"),
            record("03/02/2024", "Sul", "1", "OK"),
        ];
        let search = |text: &str| {
            let criteria = Criteria {
                search: text.to_string(),
                ..Default::default()
            };
            dates(&apply_filters(&records, &criteria))
        };
        assert_eq!(search("cEnTr"), vec!["01/01/2024"]);
        assert_eq!(search("falta"), vec!["02/01/2024"]);
        assert_eq!(search("/02/"), vec!["03/02/2024"]);
        assert_eq!(search("ok"), vec!["01/01/2024", "03/02/2024"]);
        assert!(search("nothing").is_empty());
    }

    #[test]
    fn test_date_range_inclusive() {
        let records = vec![
            record("15/01/2024", "Centro", "1", "OK"),
            record("01/02/2024", "Centro", "1", "OK"),
            record("01/01/2024", "Centro", "1", "OK"),
            record("31/01/2024", "Centro", "1", "OK"),
        ];
        let criteria = Criteria {
            date_from: parse_date_iso("2024-01-01"),
            date_to: parse_date_iso("2024-01-31"),
            ..Default::default()
        };
        assert_eq!(
            dates(&apply_filters(&records, &criteria)),
            vec!["15/01/2024", "01/01/2024", "31/01/2024"]
        );
    }

    #[test]
    fn test_single_bound() {
        let records = vec![
            record("15/01/2024", "Centro", "1", "OK"),
            record("01/02/2024", "Centro", "1", "OK"),
        ];
        let criteria = Criteria {
            date_from: parse_date_iso("2024-02-01"),
            ..Default::default()
        };
        assert_eq!(dates(&apply_filters(&records, &criteria)), vec!["01/02/2024"]);
    }

    #[test]
    fn test_unparsable_date_fails_active_bound_only() {
        let records = vec![record("sem data", "Centro", "1", "OK")];
        let bounded = Criteria {
            date_to: parse_date_iso("2030-12-31"),
            ..Default::default()
        };
        assert!(apply_filters(&records, &bounded).is_empty());
        assert_eq!(apply_filters(&records, &Criteria::default()).len(), 1);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let records = vec![
            record("01/01/2024", "Centro", "1", "ERRO"),
            record("02/01/2024", "Norte", "1", "ERRO"),
            record("03/01/2024", "Centro", "1", "OK"),
        ];
        let criteria = Criteria {
            unit: UnitFilter::Only("Centro".into()),
            divergence: DivergenceFilter::Divergent,
            ..Default::default()
        };
        assert_eq!(dates(&apply_filters(&records, &criteria)), vec!["01/01/2024"]);
    }

    #[test]
    fn test_unit_filter_parse() {
        assert_eq!("ALL".parse::<UnitFilter>().unwrap(), UnitFilter::All);
        assert_eq!(
            "Centro".parse::<UnitFilter>().unwrap(),
            UnitFilter::Only("Centro".into())
        );
    }

    #[test]
    fn test_divergence_filter_plain() {
        assert_eq!(DivergenceFilter::Divergent.to_string(), "DIVERGENT");
        assert_eq!(
            "OK".parse::<DivergenceFilter>().unwrap(),
            DivergenceFilter::Ok
        );
    }
}
