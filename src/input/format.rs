use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Layout conventions understood by the tabular parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// TOMKAT lab export: one report per `ReportID` (or `Date`) group
    #[default]
    Tomkat,
    /// Plain sample table: one report per sheet
    Generic,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown table format: {0}")]
pub struct UnknownTableFormat(pub String);

impl TableFormat {
    /// Every supported table format, in declaration order
    pub const ALL: [TableFormat; 2] = [TableFormat::Tomkat, TableFormat::Generic];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::Tomkat => "tomkat",
            TableFormat::Generic => "generic",
        }
    }
}

impl FromStr for TableFormat {
    type Err = UnknownTableFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| UnknownTableFormat(s.to_string()))
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
