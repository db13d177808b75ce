use super::{ConvertError, SupportedType};
use crate::input::{InputFile, Payload, TableFormat};

/// Validate a file against the requirements of its detected type.
///
/// Returns the resolved table format for tabular types and `None` otherwise.
/// Rules run in order: table format, then payload representation.
pub fn check(
    file: &InputFile,
    file_type: SupportedType,
    default_format: TableFormat,
) -> Result<Option<TableFormat>, ConvertError> {
    let format = if file_type.is_tabular() {
        Some(resolve_format(file, file_type, default_format)?)
    } else {
        None
    };

    let expected = file_type.payload_class();
    if file.payload.as_ref().map(Payload::class) != Some(expected) {
        return Err(ConvertError::PayloadShapeMismatch {
            file_type,
            expected,
        });
    }

    Ok(format)
}

fn resolve_format(
    file: &InputFile,
    file_type: SupportedType,
    default_format: TableFormat,
) -> Result<TableFormat, ConvertError> {
    match &file.format {
        None => Ok(default_format),
        Some(name) => name
            .parse()
            .map_err(|_| ConvertError::UnsupportedFormat {
                format: name.clone(),
                file_type,
            }),
    }
}
