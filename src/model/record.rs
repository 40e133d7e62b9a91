use crate::model::{parse_date_pt_br, Amount, Status, UnitCleaner};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed, positional columns of the reconciliation sheet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Date,
    Opening,
    Withdrawal,
    Unit,
    CashReceived,
    Change,
    CashExpenses,
    CashTotal,
    CashBalance,
    OtherReceived,
    OtherExpenses,
    PreviousDayBalance,
    OpeningVsPreviousDiff,
    Status,
}

impl Column {
    /// All columns in sheet order.
    pub const ALL: [Column; 14] = [
        Column::Date,
        Column::Opening,
        Column::Withdrawal,
        Column::Unit,
        Column::CashReceived,
        Column::Change,
        Column::CashExpenses,
        Column::CashTotal,
        Column::CashBalance,
        Column::OtherReceived,
        Column::OtherExpenses,
        Column::PreviousDayBalance,
        Column::OpeningVsPreviousDiff,
        Column::Status,
    ];

    /// The zero-based position of this column in a sheet row.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One row of the reconciliation sheet: a unit's cash figures for one day.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Record {
    /// The date exactly as written in the sheet, expected as `DD/MM/YYYY`.
    pub date: String,
    /// `date` as a calendar day, `None` when it cannot be parsed.
    pub parsed_date: Option<NaiveDate>,
    pub opening: Amount,
    pub withdrawal: Amount,
    pub unit: String,
    pub cash_received: Amount,
    pub change: Amount,
    pub cash_expenses: Amount,
    pub cash_total: Amount,
    pub cash_balance: Amount,
    pub other_received: Amount,
    pub other_expenses: Amount,
    pub previous_day_balance: Amount,
    pub opening_vs_previous_diff: Amount,
    pub status: Status,
}

impl Record {
    /// Builds a record from the cells of one sheet row. Missing trailing cells are treated as
    /// empty, and cells past the last known column are ignored.
    pub fn from_cells<S: AsRef<str>>(cells: &[S], cleaner: &UnitCleaner) -> Self {
        let mut record = Record::default();
        for column in Column::ALL {
            let value = cells.get(column.index()).map(|s| s.as_ref()).unwrap_or("");
            record.set(column, value, cleaner);
        }
        record
    }

    /// Normalizes `value` and stores it in the field for `column`.
    pub fn set(&mut self, column: Column, value: &str, cleaner: &UnitCleaner) {
        let amount = || Amount::from_str(value).unwrap_or_default();
        match column {
            Column::Date => {
                self.date = value.to_string();
                self.parsed_date = parse_date_pt_br(value);
            }
            Column::Opening => self.opening = amount(),
            Column::Withdrawal => self.withdrawal = amount(),
            Column::Unit => self.unit = cleaner.clean(value),
            Column::CashReceived => self.cash_received = amount(),
            Column::Change => self.change = amount(),
            Column::CashExpenses => self.cash_expenses = amount(),
            Column::CashTotal => self.cash_total = amount(),
            Column::CashBalance => self.cash_balance = amount(),
            Column::OtherReceived => self.other_received = amount(),
            Column::OtherExpenses => self.other_expenses = amount(),
            Column::PreviousDayBalance => self.previous_day_balance = amount(),
            Column::OpeningVsPreviousDiff => self.opening_vs_previous_diff = amount(),
            Column::Status => self.status = Status::parse(value),
        }
    }

    pub fn is_divergent(&self) -> bool {
        self.status.is_divergent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NOT_INFORMED;
    use rust_decimal::Decimal;

    #[test]
    fn test_column_index() {
        assert_eq!(Column::Date.index(), 0);
        assert_eq!(Column::Unit.index(), 3);
        assert_eq!(Column::CashBalance.index(), 8);
        assert_eq!(Column::Status.index(), 13);
    }

    #[test]
    fn test_from_cells_full_row() {
        let cells = [
            "15/01/2024",
            "100,00",
            "20,00",
            "Centro",
            "300,50",
            "10,00",
            "50,00",
            "250,50",
            "230,50",
            "400,00",
            "12,00",
            "100,00",
            "0,00",
            "ok",
        ];
        let record = Record::from_cells(&cells, &UnitCleaner::default());
        assert_eq!(record.date, "15/01/2024");
        assert_eq!(record.parsed_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(record.unit, "Centro");
        assert_eq!(record.withdrawal.value(), Decimal::new(20, 0));
        assert_eq!(record.cash_balance.value(), Decimal::new(23050, 2));
        assert_eq!(record.other_expenses.value(), Decimal::new(12, 0));
        assert_eq!(record.status, Status::Ok);
    }

    #[test]
    fn test_from_cells_short_row() {
        let record = Record::from_cells(&["01/01/2024", "5,5"], &UnitCleaner::default());
        assert_eq!(record.opening.value(), Decimal::new(55, 1));
        assert_eq!(record.unit, NOT_INFORMED);
        assert!(record.cash_balance.is_zero());
        assert_eq!(record.status, Status::Ok);
    }

    #[test]
    fn test_from_cells_unparsable_date() {
        let record = Record::from_cells(&["sem data"], &UnitCleaner::default());
        assert_eq!(record.date, "sem data");
        assert_eq!(record.parsed_date, None);
    }
}
