mod error;
mod registry;
mod schema;
mod tabular;
mod xml;


pub use error::ParseError;
pub use registry::Collaborators;
pub use schema::{ModusSchema, SchemaViolation, SchemaViolations};
pub use tabular::SheetParser;
pub use xml::ModusXmlParser;

use crate::input::{InputFile, TableFormat};
use crate::report::StructuredReport;
use serde_json::Value;

/// Tabular content handed to a [`TabularParser`]
#[derive(Debug, Clone, Copy)]
pub enum TabularData<'a> {
    /// Delimited text (CSV)
    Text(&'a str),
    /// Spreadsheet workbook bytes (XLSX)
    Bytes(&'a [u8]),
}

#[derive(Debug, Clone, Copy)]
pub struct TabularInput<'a> {
    pub data: TabularData<'a>,
    pub format: TableFormat,
}

/// Turns delimited or spreadsheet data into reports
pub trait TabularParser: Send + Sync {
    /// Parse tabular data into reports, in the order they appear
    fn parse(&self, input: TabularInput<'_>) -> Result<Vec<StructuredReport>, ParseError>;
}

/// Turns an XML document into at most one report
pub trait XmlParser: Send + Sync {
    /// `Ok(None)` means the document was well formed but held no report
    fn parse_report(&self, text: &str) -> Result<Option<StructuredReport>, ParseError>;
}

/// Splits an archive into member files
pub trait ArchiveExtractor: Send + Sync {
    /// Members in archive-entry order, each reified as an ordinary input
    fn members(&self, archive: &[u8], max_member_size: u64) -> Result<Vec<InputFile>, ParseError>;
}

/// Structural check for JSON input
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, candidate: &Value) -> Result<(), SchemaViolations>;
}
