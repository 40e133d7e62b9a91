use crate::Result;
use anyhow::Context;
use regex::{Regex, RegexBuilder};

/// The display name used when a row does not say which unit it belongs to.
pub const NOT_INFORMED: &str = "Nao informado";

/// Turns the raw unit cell into a display name by removing brand names that are repeated in every
/// unit, e.g. `Padaria Sol Centro` -> `Centro` when `Padaria Sol` is an affix.
///
/// An empty cell becomes [`NOT_INFORMED`]. A name that consists of nothing but a brand falls back
/// to the original trimmed text, so the result is never empty.
#[derive(Debug, Clone, Default)]
pub struct UnitCleaner {
    affixes: Option<Regex>,
}

impl UnitCleaner {
    /// Creates a cleaner that removes each of `affixes` wherever it appears, ignoring case. Empty
    /// affixes are ignored.
    pub fn new<S, I>(affixes: I) -> Result<Self>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let alternatives: Vec<String> = affixes
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|s| regex::escape(&s))
            .collect();
        if alternatives.is_empty() {
            return Ok(Self::default());
        }
        let pattern = alternatives.join("|");
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("Unable to build the brand affix pattern '{pattern}'"))?;
        Ok(Self {
            affixes: Some(regex),
        })
    }

    pub fn clean(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return NOT_INFORMED.to_string();
        }
        let Some(affixes) = &self.affixes else {
            return trimmed.to_string();
        };
        let stripped = affixes.replace_all(trimmed, "");
        let stripped = stripped.trim();
        if stripped.is_empty() {
            trimmed.to_string()
        } else {
            stripped.to_string()
        }
    }
}

/// Convenience for [`UnitCleaner::clean`] with a one-off list of affixes.
pub fn clean_unit_name<S: AsRef<str>>(raw: &str, affixes: &[S]) -> Result<String> {
    Ok(UnitCleaner::new(affixes)?.clean(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_not_informed() {
        let cleaner = UnitCleaner::default();
        assert_eq!(cleaner.clean(""), NOT_INFORMED);
        assert_eq!(cleaner.clean("   "), NOT_INFORMED);
    }

    #[test]
    fn test_no_affixes_trims() {
        let cleaner = UnitCleaner::default();
        assert_eq!(cleaner.clean("  Centro "), "Centro");
    }

    #[test]
    fn test_strips_prefix_case_insensitive() {
        let cleaner = UnitCleaner::new(["Padaria Sol"]).unwrap();
        assert_eq!(cleaner.clean("PADARIA SOL Centro"), "Centro");
        assert_eq!(cleaner.clean("padaria sol  Shopping Norte"), "Shopping Norte");
    }

    #[test]
    fn test_strips_suffix() {
        let cleaner = UnitCleaner::new(["Ltda"]).unwrap();
        assert_eq!(cleaner.clean("Centro LTDA"), "Centro");
    }

    #[test]
    fn test_brand_only_falls_back_to_original() {
        let cleaner = UnitCleaner::new(["Padaria Sol"]).unwrap();
        assert_eq!(cleaner.clean(" Padaria Sol "), "Padaria Sol");
    }

    #[test]
    fn test_affix_is_literal_text() {
        let cleaner = UnitCleaner::new(["Loja (1)."]).unwrap();
        assert_eq!(cleaner.clean("Loja (1). Sul"), "Sul");
        assert_eq!(cleaner.clean("Loja 1x Sul"), "Loja 1x Sul");
    }

    #[test]
    fn test_clean_unit_name() {
        assert_eq!(clean_unit_name("Rede X Norte", &["rede x"]).unwrap(), "Norte");
        assert_eq!(clean_unit_name::<&str>("", &[]).unwrap(), NOT_INFORMED);
    }
}
