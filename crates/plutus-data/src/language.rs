use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(
    Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "camelCase")]
pub enum Language {
    #[default]
    PlutusV1,
    PlutusV2,
}

impl Language {
    /// Identifier used by the ledger for cost models.
    pub fn id(&self) -> u64 {
        match self {
            Language::PlutusV1 => 0,
            Language::PlutusV2 => 1,
        }
    }

    /// Prefix byte of serialized scripts when hashing them.
    pub fn script_tag(&self) -> u8 {
        match self {
            Language::PlutusV1 => 1,
            Language::PlutusV2 => 2,
        }
    }

    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            0 => Some(Language::PlutusV1),
            1 => Some(Language::PlutusV2),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::PlutusV1 => write!(f, "PlutusV1"),
            Language::PlutusV2 => write!(f, "PlutusV2"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "plutusv1" | "v1" => Ok(Language::PlutusV1),
            "plutusv2" | "v2" => Ok(Language::PlutusV2),
            _ => Err(format!("unknown plutus language '{s}'")),
        }
    }
}
