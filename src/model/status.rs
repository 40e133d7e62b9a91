use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// The label used for a healthy reconciliation.
pub const OK: &str = "OK";

/// Raw values which mean there is nothing to reconcile yet. They count as healthy.
const HEALTHY_LABELS: &[&str] = &["", OK, "SEM DIA ANTERIOR"];

/// The reconciliation status of a single day for a single unit.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Status {
    #[default]
    Ok,
    /// A discrepancy that requires review. Holds the trimmed, uppercase label from the sheet.
    Divergent(String),
}

impl Status {
    /// Normalizes a raw status cell. See [`normalize_status`].
    pub fn parse(raw: &str) -> Self {
        let label = normalize_status(raw);
        if label == OK {
            Status::Ok
        } else {
            Status::Divergent(label)
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    pub fn is_divergent(&self) -> bool {
        !self.is_ok()
    }

    pub fn label(&self) -> &str {
        match self {
            Status::Ok => OK,
            Status::Divergent(label) => label,
        }
    }

    /// The badge shown next to a row, e.g. `✔ OK` or `⚠ DIVERGENTE`.
    pub fn badge(&self) -> String {
        match self {
            Status::Ok => format!("✔ {OK}"),
            Status::Divergent(label) => format!("⚠ {label}"),
        }
    }
}

/// Trims and uppercases `raw`. Empty values, `OK` and `SEM DIA ANTERIOR` all become `OK`, anything
/// else is returned as the divergence label.
pub fn normalize_status(raw: &str) -> String {
    let value = raw.trim().to_uppercase();
    if HEALTHY_LABELS.contains(&value.as_str()) {
        OK.to_string()
    } else {
        value
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Status::parse(&s))
    }
}
