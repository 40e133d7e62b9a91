//! The summary aggregator: dataset-wide figures shown above the table.
//!
//! The summary always describes every record that was loaded, never just the filtered view.

use crate::model::{Amount, Record};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct Summary {
    /// Every unit name that appears in the records.
    pub distinct_units: BTreeSet<String>,
    /// The most recent record of each unit.
    pub latest_by_unit: BTreeMap<String, Record>,
    /// How many units have at least one divergent record.
    pub divergent_unit_count: usize,
    /// The sum of the cash balance of each unit's most recent record.
    pub total_balance: Amount,
    /// The latest parseable date of any record.
    pub most_recent_date: Option<NaiveDate>,
}

impl Summary {
    pub fn unit_count(&self) -> usize {
        self.distinct_units.len()
    }
}

/// Computes the `Summary` of `records`.
///
/// For each unit the first record seen is kept unless a later record has a strictly later date.
/// Dates are only compared when both parse, so a first record without a parseable date is never
/// replaced.
pub fn summarize(records: &[Record]) -> Summary {
    let mut distinct_units = BTreeSet::new();
    let mut divergent_units = BTreeSet::new();
    let mut latest_by_unit: BTreeMap<String, Record> = BTreeMap::new();

    for record in records {
        distinct_units.insert(record.unit.clone());
        if record.is_divergent() {
            divergent_units.insert(record.unit.as_str());
        }
        let replace = latest_by_unit
            .get(&record.unit)
            .map_or(true, |current| is_later(record, current));
        if replace {
            trace!("Latest record for '{}' is now {}", record.unit, record.date);
            latest_by_unit.insert(record.unit.clone(), record.clone());
        }
    }

    let total_balance: Amount = latest_by_unit.values().map(|r| r.cash_balance).sum();
    let most_recent_date = records.iter().filter_map(|r| r.parsed_date).max();

    Summary {
        divergent_unit_count: divergent_units.len(),
        distinct_units,
        latest_by_unit,
        total_balance,
        most_recent_date,
    }
}

/// True when both dates parse and `candidate`'s is strictly later than `current`'s.
fn is_later(candidate: &Record, current: &Record) -> bool {
    match (candidate.parsed_date, current.parsed_date) {
        (Some(new), Some(old)) => new > old,
        _ => false,
    }
}
