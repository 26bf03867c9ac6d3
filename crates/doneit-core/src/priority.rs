use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::{fmt, str::FromStr};

/// Task priority.
///
/// Only `High`, `Medium` and `Low` are accepted for new writes, but records read
/// back from a store may carry anything; those keep their raw text in `Other`
/// and sort after every known priority.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    /// Most urgent.
    High,
    /// Default urgency.
    Medium,
    /// Least urgent.
    Low,
    /// Unrecognized value kept verbatim.
    Other(String),
}

impl Priority {
    /// Known priorities in display order.
    pub const KNOWN: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Parse a priority label. Matching is case-sensitive.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "High" => Self::High,
            "Medium" => Self::Medium,
            "Low" => Self::Low,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Label as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Other(raw) => raw,
        }
    }

    /// Sort rank: lower sorts first.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
            Self::Other(_) => 3,
        }
    }

    /// Returns true for `High`, `Medium` and `Low`.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Display colour used by list renderers.
    #[must_use]
    pub const fn color_hex(&self) -> Option<&'static str> {
        match self {
            Self::High => Some("#de1b1b"),
            Self::Medium => Some("#de891b"),
            Self::Low => Some("#4ea832"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.as_str() {
            "High" => Self::High,
            "Medium" => Self::Medium,
            "Low" => Self::Low,
            _ => Self::Other(value),
        }
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}
