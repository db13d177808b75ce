use super::{
    ArchiveExtractor, ModusSchema, ModusXmlParser, SchemaValidator, SheetParser, TabularParser,
    XmlParser,
};
use crate::archive::ZipExtractor;

/// Dispatch table of the parsers the converter delegates to
pub struct Collaborators {
    tabular: Box<dyn TabularParser>,
    xml: Box<dyn XmlParser>,
    archive: Box<dyn ArchiveExtractor>,
    schema: Box<dyn SchemaValidator>,
}

impl Collaborators {
    /// Create a table backed by the built-in parsers
    pub fn new() -> Self {
        Self {
            tabular: Box::new(SheetParser),
            xml: Box::new(ModusXmlParser),
            archive: Box::new(ZipExtractor),
            schema: Box::new(ModusSchema),
        }
    }

    /// Register the parser used for CSV and XLSX files
    pub fn with_tabular(mut self, parser: impl TabularParser + 'static) -> Self {
        self.tabular = Box::new(parser);
        self
    }

    pub fn with_xml(mut self, parser: impl XmlParser + 'static) -> Self {
        self.xml = Box::new(parser);
        self
    }

    pub fn with_archive(mut self, extractor: impl ArchiveExtractor + 'static) -> Self {
        self.archive = Box::new(extractor);
        self
    }

    /// Register the validator applied to JSON input
    pub fn with_schema(mut self, validator: impl SchemaValidator + 'static) -> Self {
        self.schema = Box::new(validator);
        self
    }

    pub fn tabular(&self) -> &dyn TabularParser {
        &*self.tabular
    }

    pub fn xml(&self) -> &dyn XmlParser {
        &*self.xml
    }

    pub fn archive(&self) -> &dyn ArchiveExtractor {
        &*self.archive
    }

    pub fn schema(&self) -> &dyn SchemaValidator {
        &*self.schema
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new()
    }
}
