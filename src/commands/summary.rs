use crate::api::Mode;
use crate::commands::{load_session, Out};
use crate::model::{format_date_pt_br, Amount};
use crate::summary::Summary;
use crate::{Config, Result};
use serde::{Deserialize, Serialize};

/// The headline figures of the summary.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SummaryFigures {
    pub units: usize,
    pub divergent_units: usize,
    pub total_balance: Amount,
    /// `DD/MM/YYYY`, absent when no record has a parseable date.
    pub most_recent_date: Option<String>,
}

impl From<&Summary> for SummaryFigures {
    fn from(summary: &Summary) -> Self {
        Self {
            units: summary.unit_count(),
            divergent_units: summary.divergent_unit_count,
            total_balance: summary.total_balance,
            most_recent_date: summary.most_recent_date.map(format_date_pt_br),
        }
    }
}

impl SummaryFigures {
    fn render(&self) -> String {
        format!(
            "Units:            {}\n\
             Divergent units:  {}\n\
             Total balance:    {}\n\
             Most recent date: {}",
            self.units,
            self.divergent_units,
            self.total_balance,
            self.most_recent_date.as_deref().unwrap_or("-"),
        )
    }
}

/// Shows the dataset-wide summary of the records.
pub async fn summary(config: Config, mode: Mode) -> Result<Out<SummaryFigures>> {
    let session = load_session(&config, mode).await?;
    let figures = SummaryFigures::from(session.summary());
    Ok(Out::new(figures.render(), figures))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_summary_of_seed_data() {
        let out = summary(Config::default(), Mode::Testing).await.unwrap();
        let figures = out.structure().unwrap();
        assert_eq!(figures.units, 3);
        assert_eq!(figures.divergent_units, 1);
        assert_eq!(figures.total_balance.to_string(), "R$ 4.076,10");
        assert_eq!(figures.most_recent_date.as_deref(), Some("03/10/2025"));
        assert!(out.message().contains("R$ 4.076,10"));
    }

    #[test]
    fn test_render_without_dates() {
        let rendered = SummaryFigures::default().render();
        assert!(rendered.ends_with("Most recent date: -"));
        assert!(rendered.contains("R$ 0,00"));
    }
}
