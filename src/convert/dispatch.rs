use super::{ConvertError, Converter, SupportedType};
use crate::input::{InputFile, Payload, TableFormat};
use crate::parser::{ParseError, TabularData, TabularInput};
use crate::report::{ConversionResult, StructuredReport};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::borrow::Cow;

/// What a single file turned into
#[derive(Debug)]
pub(crate) enum Extracted {
    /// Reports still needing names, paired with their index when the file
    /// produced more than one
    Reports(Vec<(StructuredReport, Option<usize>)>),
    /// Archive members, already named by the recursive pass
    Archive(Vec<ConversionResult>),
}

/// Route a validated file to the collaborator for its type
pub(crate) fn dispatch(
    converter: &Converter,
    file: &InputFile,
    file_type: SupportedType,
    format: Option<TableFormat>,
    depth: usize,
) -> Result<Extracted, ConvertError> {
    let payload = file
        .payload
        .as_ref()
        .ok_or(ConvertError::PayloadShapeMismatch {
            file_type,
            expected: file_type.payload_class(),
        })?;
    let collaborators = converter.collaborators();

    match file_type {
        SupportedType::Zip => {
            let bytes = binary_payload(payload, file_type)?;
            expand_archive(converter, file, &bytes, depth)
        }
        SupportedType::Json => {
            let text = text_payload(payload, file_type)?;
            let value = serde_json::from_str(text).map_err(ParseError::from)?;
            collaborators.schema().validate(&value)?;
            Ok(Extracted::Reports(vec![(StructuredReport::new(value), None)]))
        }
        SupportedType::Xml => {
            let text = text_payload(payload, file_type)?;
            let report = collaborators.xml().parse_report(text)?;
            Ok(Extracted::Reports(
                report.into_iter().map(|report| (report, None)).collect(),
            ))
        }
        SupportedType::Csv | SupportedType::Xlsx => {
            let format = format.unwrap_or(converter.config().default_format);
            let reports = if file_type == SupportedType::Csv {
                let text = text_payload(payload, file_type)?;
                collaborators.tabular().parse(TabularInput {
                    data: TabularData::Text(text),
                    format,
                })?
            } else {
                let bytes = binary_payload(payload, file_type)?;
                collaborators.tabular().parse(TabularInput {
                    data: TabularData::Bytes(&bytes),
                    format,
                })?
            };
            Ok(Extracted::Reports(index_reports(reports)))
        }
    }
}

/// Pair reports with their position, but only when there is more than one
fn index_reports(reports: Vec<StructuredReport>) -> Vec<(StructuredReport, Option<usize>)> {
    let multiple = reports.len() > 1;
    reports
        .into_iter()
        .enumerate()
        .map(|(index, report)| (report, multiple.then_some(index)))
        .collect()
}

/// Reify archive members as inputs and run them through the batch entry point
fn expand_archive(
    converter: &Converter,
    file: &InputFile,
    bytes: &[u8],
    depth: usize,
) -> Result<Extracted, ConvertError> {
    let config = converter.config();
    if depth >= config.max_archive_depth {
        return Err(ParseError::ArchiveTooDeep {
            max: config.max_archive_depth,
        }
        .into());
    }

    let mut members = converter
        .collaborators()
        .archive()
        .members(bytes, config.max_member_size)?;

    for member in &mut members {
        if member.format.is_none() {
            member.format = file.format.clone();
        }
    }

    Ok(Extracted::Archive(converter.convert_at_depth(members, depth + 1)))
}

fn text_payload(payload: &Payload, file_type: SupportedType) -> Result<&str, ConvertError> {
    payload
        .as_text()
        .ok_or(ConvertError::PayloadShapeMismatch {
            file_type,
            expected: file_type.payload_class(),
        })
}

fn binary_payload(
    payload: &Payload,
    file_type: SupportedType,
) -> Result<Cow<'_, [u8]>, ConvertError> {
    match payload {
        Payload::ArrBuf(bytes) => Ok(Cow::Borrowed(bytes)),
        Payload::Base64(encoded) => {
            let decoded = STANDARD.decode(encoded.trim()).map_err(ParseError::from)?;
            Ok(Cow::Owned(decoded))
        }
        Payload::Str(_) => Err(ConvertError::PayloadShapeMismatch {
            file_type,
            expected: file_type.payload_class(),
        }),
    }
}
