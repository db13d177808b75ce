use crate::security::PathError;
use thiserror::Error;

/// Failure inside a parsing collaborator
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read XLSX workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("Failed to parse XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Failed to parse ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid path in archive: {0}")]
    ArchivePath(#[from] PathError),

    #[error("Archive member {path} too large: {size} bytes (max: {max})")]
    MemberTooLarge { path: String, size: u64, max: u64 },

    #[error("Archives nested deeper than {max} levels")]
    ArchiveTooDeep { max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Invalid(String),
}
