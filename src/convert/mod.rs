mod diagnostics;
mod dispatch;
mod error;
mod filename;

pub mod detect;
pub mod precondition;


pub use detect::{detect, SupportedType};
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{ConvertError, ErrorKind};
pub use filename::{derive_filename, sanitize_label, FilenameArgs};

use crate::config::ConvertConfig;
use crate::input::InputFile;
use crate::parser::Collaborators;
use crate::report::ConversionResult;
use dispatch::Extracted;

/// Batch converter from lab-report files to modus reports
pub struct Converter {
    collaborators: Collaborators,
    config: ConvertConfig,
    diagnostics: Box<dyn Diagnostics>,
}

impl Converter {
    /// Create a converter with the built-in parsers and default config
    pub fn new() -> Self {
        Self::with_config(ConvertConfig::default())
    }

    pub fn with_config(config: ConvertConfig) -> Self {
        Self {
            collaborators: Collaborators::new(),
            config,
            diagnostics: Box::new(TracingDiagnostics),
        }
    }

    /// Replace the parsing collaborators
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// Replace the diagnostics sink
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert a batch of files.
    ///
    /// Files are processed one at a time in input order. A file that cannot
    /// be converted is reported to the diagnostics sink and left out of the
    /// result; it never aborts the batch.
    pub fn convert<I>(&self, files: I) -> Vec<ConversionResult>
    where
        I: IntoIterator<Item = InputFile>,
    {
        self.convert_at_depth(files, 0)
    }

    /// Convert a single file
    pub fn convert_one(&self, file: InputFile) -> Vec<ConversionResult> {
        self.convert([file])
    }

    pub(crate) fn convert_at_depth<I>(&self, files: I, depth: usize) -> Vec<ConversionResult>
    where
        I: IntoIterator<Item = InputFile>,
    {
        let mut results = Vec::new();
        let mut inputs = 0;

        for file in files {
            inputs += 1;
            self.convert_file(&file, depth, &mut results);
        }

        self.diagnostics.batch_finished(depth, inputs, results.len());
        results
    }

    fn convert_file(&self, file: &InputFile, depth: usize, results: &mut Vec<ConversionResult>) {
        let Some(file_type) = detect(&file.filename) else {
            self.diagnostics
                .skipped(&file.filename, None, &ConvertError::UnknownType);
            return;
        };

        let extracted = precondition::check(file, file_type, self.config.default_format)
            .and_then(|format| dispatch::dispatch(self, file, file_type, format, depth));

        match extracted {
            Ok(Extracted::Archive(members)) => results.extend(members),
            Ok(Extracted::Reports(reports)) => {
                if reports.is_empty() {
                    self.diagnostics.no_report(&file.filename, file_type);
                }

                for (report, index) in reports {
                    let output_filename = derive_filename(&FilenameArgs {
                        report: &report,
                        filename: &file.filename,
                        file_type,
                        index,
                        archive_member: depth > 0,
                    });
                    let result = ConversionResult {
                        original_filename: file.filename.clone(),
                        original_type: file_type,
                        output_filename,
                        structured_report: report,
                    };
                    self.diagnostics.converted(&result);
                    results.push(result);
                }
            }
            Err(err) => self
                .diagnostics
                .skipped(&file.filename, Some(file_type), &err),
        }
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
