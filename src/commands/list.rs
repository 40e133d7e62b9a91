//! The `list` command: the records that match the filters, as a table, JSON or CSV.

use crate::api::Mode;
use crate::args::{Format, ListArgs};
use crate::commands::{load_session, Out};
use crate::model::Record;
use crate::{Config, Result};
use anyhow::Context;

const TABLE_HEADERS: [&str; 11] = [
    "#",
    "Date",
    "Unit",
    "Opening",
    "Cash received",
    "Cash expenses",
    "Cash total",
    "Cash balance",
    "Previous day",
    "Opening diff",
    "Status",
];

/// Shows the records that match the filters in `args`, in sheet order.
pub async fn list(config: Config, mode: Mode, args: ListArgs) -> Result<Out<Vec<Record>>> {
    let mut session = load_session(&config, mode).await?;
    session.set_criteria(args.filter().criteria());
    let records: Vec<Record> = session.filtered().into_iter().cloned().collect();
    let message = render(&records, args.format())?;
    Ok(Out::new(message, records))
}

fn render(records: &[Record], format: Format) -> Result<String> {
    match format {
        Format::Table => Ok(format!(
            "{}\nRecords shown: {}",
            markdown_table(records),
            records.len()
        )),
        Format::Json => {
            serde_json::to_string_pretty(records).context("Unable to serialize the records")
        }
        Format::Csv => to_csv(records),
    }
}

fn table_row(position: usize, record: &Record) -> Vec<String> {
    vec![
        position.to_string(),
        record.date.clone(),
        record.unit.clone(),
        record.opening.to_string(),
        record.cash_received.to_string(),
        record.cash_expenses.to_string(),
        record.cash_total.to_string(),
        record.cash_balance.to_string(),
        record.previous_day_balance.to_string(),
        record.opening_vs_previous_diff.to_string(),
        record.status.badge(),
    ]
}

/// Renders the records as a Markdown table, numbering them from 1.
fn markdown_table(records: &[Record]) -> String {
    let headers: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .enumerate()
        .map(|(ix, record)| table_row(ix + 1, record))
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        format!("| {} |", padded.join(" | "))
    };
    let separator = format!(
        "|{}|",
        widths
            .iter()
            .map(|&width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("|")
    );

    let mut lines = vec![line(&headers), separator];
    lines.extend(rows.iter().map(|row| line(row)));
    lines.join("\n")
}

/// Writes the records as CSV with a header row, plain decimal amounts and the status label.
fn to_csv(records: &[Record]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "date",
        "unit",
        "opening",
        "withdrawal",
        "cash_received",
        "change",
        "cash_expenses",
        "cash_total",
        "cash_balance",
        "other_received",
        "other_expenses",
        "previous_day_balance",
        "opening_vs_previous_diff",
        "status",
    ])?;
    for r in records {
        let amounts = [
            r.opening,
            r.withdrawal,
            r.cash_received,
            r.change,
            r.cash_expenses,
            r.cash_total,
            r.cash_balance,
            r.other_received,
            r.other_expenses,
            r.previous_day_balance,
            r.opening_vs_previous_diff,
        ];
        let mut row = vec![r.date.clone(), r.unit.clone()];
        row.extend(amounts.iter().map(|a| a.value().normalize().to_string()));
        row.push(r.status.label().to_string());
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .context("Unable to finish writing the CSV")?;
    String::from_utf8(bytes).context("The CSV output is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FilterArgs;
    use crate::filter::DivergenceFilter;
    use crate::test::record;

    #[tokio::test]
    async fn test_list_divergent_seed_records() {
        let args = ListArgs::new(
            FilterArgs::new(None, DivergenceFilter::Divergent, None, None, None),
            Format::Table,
        );
        let out = list(Config::default(), Mode::Testing, args).await.unwrap();
        let records = out.structure().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].unit, "Shopping Norte");
        assert!(out.message().contains("⚠ DIVERGENTE"));
        assert!(out.message().ends_with("Records shown: 1"));
    }

    #[tokio::test]
    async fn test_list_search_is_case_insensitive() {
        let args = ListArgs::new(
            FilterArgs::new(None, DivergenceFilter::All, Some("QUIOSQUE".into()), None, None),
            Format::Json,
        );
        let out = list(Config::default(), Mode::Testing, args).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 1);
        assert!(out.message().contains("\"unit\": \"Quiosque Praia, Posto 6\""));
    }

    #[test]
    fn test_markdown_table_layout() {
        let table = markdown_table(&[
            record("01/01/2024", "A", "1234,5", "OK"),
            record("02/01/2024", "Long unit", "-3", "ERRO"),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("| # | Date"));
        assert!(lines[1].starts_with("|---|"));
        assert!(lines[2].contains("R$ 1.234,50"));
        assert!(lines[2].contains("✔ OK"));
        assert!(lines[3].contains("-R$ 3,00"));
        assert!(lines[3].contains("⚠ ERRO"));
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|&w| w == widths[0]));
    }

    #[test]
    fn test_csv_output() {
        let csv = to_csv(&[record("01/01/2024", "Praia, Posto 6", "1234,5", "ok")]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("date,unit,opening"));
        assert!(lines[1].starts_with("01/01/2024,\"Praia, Posto 6\","));
        assert!(lines[1].contains(",1234.5,"));
        assert!(lines[1].ends_with(",OK"));
    }
}
