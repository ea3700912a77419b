//! Listing record schema

use serde::Deserialize;

/// The subset of a RESO listing this rule set reads
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Listing {
    #[serde(rename = "ListPrice")]
    pub list_price: f64,

    #[serde(rename = "MlsStatus")]
    pub mls_status: MlsStatus,
}

/// Listing status.
///
/// The enumeration is owned by the host; only the values this rule set
/// refers to are named, everything else is carried through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MlsStatus {
    Active,
    Pending,
    Closed,
    Other(String),
}

impl MlsStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MlsStatus::Active => "Active",
            MlsStatus::Pending => "Pending",
            MlsStatus::Closed => "Closed",
            MlsStatus::Other(status) => status,
        }
    }
}

impl Default for MlsStatus {
    fn default() -> Self {
        MlsStatus::Other(String::new())
    }
}

impl From<String> for MlsStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "Active" => MlsStatus::Active,
            "Pending" => MlsStatus::Pending,
            "Closed" => MlsStatus::Closed,
            _ => MlsStatus::Other(status),
        }
    }
}

impl std::fmt::Display for MlsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
