//! Turns the published CSV export of the reconciliation sheet into `Record`s.

use crate::model::{Record, UnitCleaner};
use csv::StringRecord;
use tracing::{debug, trace};

/// Parses CSV text into `Record`s using a fixed, positional column layout.
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    cleaner: UnitCleaner,
}

impl RecordParser {
    /// Create a parser that cleans unit names with `cleaner`.
    pub fn new(cleaner: UnitCleaner) -> Self {
        Self { cleaner }
    }

    /// Parses `text` into one `Record` per line, in input order.
    ///
    /// The first line is the header and is always discarded without looking at it. Lines that are
    /// blank or contain only whitespace are skipped. Nothing in a row can make parsing fail:
    /// malformed cells are normalized to their defaults.
    pub fn parse(&self, text: &str) -> Vec<Record> {
        let records: Vec<Record> = text
            .trim()
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let cells = split_csv_line(line);
                trace!("{} cells in line '{line}'", cells.len());
                Record::from_cells(&cells, &self.cleaner)
            })
            .collect();
        debug!("Parsed {} records", records.len());
        records
    }
}

/// Parses `text` with the default `RecordParser`, which keeps unit names as written.
pub fn parse_csv(text: &str) -> Vec<Record> {
    RecordParser::default().parse(text)
}

/// Splits one CSV line into its cells.
///
/// Commas inside double-quoted cells are not delimiters. The surrounding quotes are removed and a
/// doubled quote (`""`) inside a quoted cell becomes a single `"`. An unterminated quote runs to
/// the end of the line, and a quote that does not start its cell is ordinary text.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(str::to_string).collect(),
        Ok(false) => vec![String::new()],
        Err(e) => {
            debug!("Falling back to a plain split for line '{line}': {e}");
            line.split(',').map(str::to_string).collect()
        }
    }
}
