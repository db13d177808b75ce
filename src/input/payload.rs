use serde::{Deserialize, Serialize};
use std::fmt;

/// File contents in one of the accepted representations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    /// UTF-8 text (XML, CSV, JSON)
    Str(String),
    /// Raw binary content (XLSX, ZIP)
    ArrBuf(Vec<u8>),
    /// Base64-encoded binary content (XLSX, ZIP)
    Base64(String),
}

/// Representation class a file type requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadClass {
    Text,
    Binary,
}

impl Payload {
    pub fn class(&self) -> PayloadClass {
        match self {
            Payload::Str(_) => PayloadClass::Text,
            Payload::ArrBuf(_) | Payload::Base64(_) => PayloadClass::Binary,
        }
    }

    /// Text content, if this is a text payload
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Str(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for PayloadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadClass::Text => f.write_str("text (str)"),
            PayloadClass::Binary => f.write_str("binary (arrbuf or base64)"),
        }
    }
}
