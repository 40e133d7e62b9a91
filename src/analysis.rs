//! A one-line, human readable description of a record that operators paste into chats and reports.

use crate::model::Record;

/// Describes `record` in one sentence: its date, unit, the difference between the opening and
/// the previous day's balance, its status and the current cash balance.
///
/// ```
/// # use cash_audit::model::{Record, UnitCleaner};
/// # use cash_audit::analysis_text;
/// let cells = ["15/01/2024", "", "", "Centro", "", "", "", "", "230,5", "", "", "", "-10", "falta"];
/// let record = Record::from_cells(&cells, &UnitCleaner::default());
/// assert_eq!(
///     analysis_text(&record),
///     "Em 15/01/2024, a unidade Centro apresentou diferença de -R$ 10,00 entre a abertura e o \
///     saldo do dia anterior (status: FALTA). Saldo atual em caixa: R$ 230,50."
/// );
/// ```
pub fn analysis_text(record: &Record) -> String {
    format!(
        "Em {}, a unidade {} apresentou diferença de {} entre a abertura e o saldo do dia \
        anterior (status: {}). Saldo atual em caixa: {}.",
        record.date,
        record.unit,
        record.opening_vs_previous_diff,
        record.status,
        record.cash_balance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::record;

    #[test]
    fn test_analysis_text_ok() {
        let text = analysis_text(&record("02/01/2024", "Norte", "1500", "sem dia anterior"));
        assert_eq!(
            text,
            "Em 02/01/2024, a unidade Norte apresentou diferença de R$ 0,00 entre a abertura e o \
            saldo do dia anterior (status: OK). Saldo atual em caixa: R$ 1.500,00."
        );
    }

    #[test]
    fn test_analysis_text_is_one_line() {
        let text = analysis_text(&record("", "", "", ""));
        assert!(!text.contains('\n'));
        assert!(text.contains("Nao informado"));
    }
}
