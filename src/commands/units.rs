use crate::api::Mode;
use crate::commands::{load_session, Out};
use crate::{Config, Result};

/// Lists the distinct unit names found in the records, sorted.
pub async fn units(config: Config, mode: Mode) -> Result<Out<Vec<String>>> {
    let session = load_session(&config, mode).await?;
    let units: Vec<String> = session.units().into_iter().map(String::from).collect();
    Ok(Out::new(units.join("\n"), units))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_units_from_seed_data() {
        let out = units(Config::default(), Mode::Testing).await.unwrap();
        assert_eq!(
            out.structure().unwrap(),
            &vec![
                "Centro".to_string(),
                "Quiosque Praia, Posto 6".to_string(),
                "Shopping Norte".to_string(),
            ]
        );
        assert_eq!(out.message().lines().count(), 3);
    }
}
