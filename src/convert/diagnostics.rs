use super::{ConvertError, SupportedType};
use crate::report::ConversionResult;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Operator-facing side channel for conversion outcomes.
///
/// Implementations only observe; they never change what the converter does.
pub trait Diagnostics: Send + Sync {
    /// A file was skipped
    fn skipped(&self, filename: &str, file_type: Option<SupportedType>, error: &ConvertError);

    /// A parser ran successfully but found nothing to convert
    fn no_report(&self, _filename: &str, _file_type: SupportedType) {}

    fn converted(&self, _result: &ConversionResult) {}

    /// A batch (or an expanded archive, when `depth > 0`) finished
    fn batch_finished(&self, _depth: usize, _inputs: usize, _outputs: usize) {}
}

/// Emits every outcome as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn skipped(&self, filename: &str, file_type: Option<SupportedType>, error: &ConvertError) {
        let file_type = file_type.map(|t| t.as_str()).unwrap_or("unknown");
        let kind = error.kind();

        if let ConvertError::SchemaValidation { items } = error {
            for item in items {
                warn!(
                    filename,
                    file_type,
                    path = %item.instance_path,
                    detail = %item.message,
                    "schema_violation"
                );
            }
        }

        warn!(filename, file_type, kind = %kind, error = %error, "file_skipped");
    }

    fn no_report(&self, filename: &str, file_type: SupportedType) {
        debug!(filename, file_type = %file_type, "no_report_found");
    }

    fn converted(&self, result: &ConversionResult) {
        debug!(
            filename = %result.original_filename,
            file_type = %result.original_type,
            output = %result.output_filename,
            "report_converted"
        );
    }

    fn batch_finished(&self, depth: usize, inputs: usize, outputs: usize) {
        if depth == 0 {
            info!(inputs, outputs, "batch_converted");
        } else {
            debug!(depth, inputs, outputs, "archive_expanded");
        }
    }
}

impl<T: Diagnostics + ?Sized> Diagnostics for Arc<T> {
    fn skipped(&self, filename: &str, file_type: Option<SupportedType>, error: &ConvertError) {
        (**self).skipped(filename, file_type, error)
    }

    fn no_report(&self, filename: &str, file_type: SupportedType) {
        (**self).no_report(filename, file_type)
    }

    fn converted(&self, result: &ConversionResult) {
        (**self).converted(result)
    }

    fn batch_finished(&self, depth: usize, inputs: usize, outputs: usize) {
        (**self).batch_finished(depth, inputs, outputs)
    }
}
