use crate::input::PayloadClass;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File types the converter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedType {
    Xml,
    Csv,
    Xlsx,
    Json,
    Zip,
}

impl SupportedType {
    /// Detection order
    pub const ALL: [SupportedType; 5] = [
        SupportedType::Xml,
        SupportedType::Csv,
        SupportedType::Xlsx,
        SupportedType::Json,
        SupportedType::Zip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedType::Xml => "xml",
            SupportedType::Csv => "csv",
            SupportedType::Xlsx => "xlsx",
            SupportedType::Json => "json",
            SupportedType::Zip => "zip",
        }
    }

    /// Extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            SupportedType::Xml => ".xml",
            SupportedType::Csv => ".csv",
            SupportedType::Xlsx => ".xlsx",
            SupportedType::Json => ".json",
            SupportedType::Zip => ".zip",
        }
    }

    /// CSV and XLSX go through the tabular parser
    pub fn is_tabular(&self) -> bool {
        matches!(self, SupportedType::Csv | SupportedType::Xlsx)
    }

    /// Payload representation this type must arrive in
    pub fn payload_class(&self) -> PayloadClass {
        match self {
            SupportedType::Xlsx | SupportedType::Zip => PayloadClass::Binary,
            SupportedType::Xml | SupportedType::Csv | SupportedType::Json => PayloadClass::Text,
        }
    }
}

impl fmt::Display for SupportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a filename to its type by trailing extension.
///
/// Matching is case-sensitive and never looks at content.
pub fn detect(filename: &str) -> Option<SupportedType> {
    SupportedType::ALL
        .into_iter()
        .find(|file_type| filename.ends_with(file_type.extension()))
}
