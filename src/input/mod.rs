mod format;
mod payload;


pub use format::{TableFormat, UnknownTableFormat};
pub use payload::{Payload, PayloadClass};

use crate::convert::detect;
use serde::{Deserialize, Serialize};

/// One unit of batch input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    /// Original filename, possibly with a path prefix
    pub filename: String,
    /// Table format name for CSV/XLSX input (defaults to `tomkat`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// File contents, if any were supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl InputFile {
    /// Create an input carrying a text payload
    pub fn text(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_payload(filename, Payload::Str(text.into()))
    }

    /// Create an input carrying raw binary content
    pub fn bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::with_payload(filename, Payload::ArrBuf(bytes.into()))
    }

    /// Create an input carrying base64-encoded binary content
    pub fn base64(filename: impl Into<String>, encoded: impl Into<String>) -> Self {
        Self::with_payload(filename, Payload::Base64(encoded.into()))
    }

    /// Create an input with no payload at all
    pub fn empty(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            format: None,
            payload: None,
        }
    }

    /// Build an input from raw file contents, choosing the payload
    /// representation the detected type expects.
    ///
    /// Text types that are not valid UTF-8 keep their bytes so the pipeline
    /// reports a payload mismatch for them instead of failing here.
    pub fn from_contents(filename: impl Into<String>, contents: Vec<u8>) -> Self {
        let filename = filename.into();
        let wants_text = detect(&filename)
            .map(|file_type| file_type.payload_class() == PayloadClass::Text)
            .unwrap_or(false);

        if !wants_text {
            return Self::bytes(filename, contents);
        }

        match String::from_utf8(contents) {
            Ok(text) => Self::text(filename, text),
            Err(err) => Self::bytes(filename, err.into_bytes()),
        }
    }

    /// Set the table format name
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    fn with_payload(filename: impl Into<String>, payload: Payload) -> Self {
        Self {
            filename: filename.into(),
            format: None,
            payload: Some(payload),
        }
    }
}
