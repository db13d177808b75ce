// Public API exports
pub mod archive;
pub mod config;
pub mod convert;
pub mod input;
pub mod parser;
pub mod report;
pub mod security;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use config::{ConfigError, ConvertConfig};

pub use convert::{
    ConvertError, Converter, Diagnostics, ErrorKind, FilenameArgs, SupportedType,
    TracingDiagnostics, derive_filename, detect,
};

pub use input::{InputFile, Payload, PayloadClass, TableFormat};

pub use parser::{
    ArchiveExtractor, Collaborators, ModusSchema, ModusXmlParser, ParseError, SchemaValidator,
    SchemaViolation, SchemaViolations, SheetParser, TabularData, TabularInput, TabularParser,
    XmlParser,
};

pub use archive::ZipExtractor;
pub use report::{ConversionResult, StructuredReport};
