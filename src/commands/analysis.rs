use crate::analysis_text;
use crate::api::Mode;
use crate::args::AnalysisArgs;
use crate::commands::{load_session, Out};
use crate::model::Record;
use crate::{Config, Result};
use anyhow::bail;

/// Prints the analysis sentence for the record at position `args.row()` (starting at 1) among the
/// records that match the filters.
pub async fn analysis(config: Config, mode: Mode, args: AnalysisArgs) -> Result<Out<Record>> {
    let mut session = load_session(&config, mode).await?;
    session.set_criteria(args.filter().criteria());
    let filtered = session.filtered();
    let row = args.row();
    let record = match row.checked_sub(1).and_then(|ix| filtered.get(ix)) {
        Some(record) => (*record).clone(),
        None => bail!(
            "There is no record {row}, {} records match the filters",
            filtered.len()
        ),
    };
    Ok(Out::new(analysis_text(&record), record))
}
