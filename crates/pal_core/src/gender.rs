use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Unknown(String),
}

impl Gender {
    pub const SEPARATOR: &'static str = "::";

    /// Parses an enumerated value such as `EPalGenderType::Female`. Returns
    /// `None` when the value has no `::` separator.
    pub fn from_raw(raw: &str) -> Option<Self> {
        raw.split(Self::SEPARATOR).nth(1).map(Self::from_name)
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "Male" => Self::Male,
            "Female" => Self::Female,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown(other) => other,
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
