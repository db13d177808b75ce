//! Fixtures shared by the unit test modules.

use crate::convert::{ConvertError, Diagnostics, ErrorKind, SupportedType};
use crate::parser::{ParseError, TabularData, TabularInput, TabularParser};
use crate::report::{ConversionResult, StructuredReport};
use serde_json::{json, Value};
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build an in-memory ZIP archive; names ending in `/` become directories
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// A spreadsheet cell for [`xlsx_bytes`]
#[derive(Debug, Clone, Copy)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    /// Excel serial date, stored with the built-in `m/d/yyyy` format
    Date(f64),
    Empty,
}

const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Build a minimal XLSX workbook in memory, one `(name, rows)` pair per sheet
pub fn xlsx_bytes(sheets: &[(&str, &[&[Cell<'_>]])]) -> Vec<u8> {
    let mut strings: Vec<String> = Vec::new();
    let mut sheet_xml = Vec::new();

    for (_, rows) in sheets {
        let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="{SHEET_NS}"><sheetData>"#);
        for (r, row) in rows.iter().enumerate() {
            xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, cell) in row.iter().enumerate() {
                let reference = format!("{}{}", column_name(c), r + 1);
                match cell {
                    Cell::Text(text) => {
                        let index = match strings.iter().position(|s| s == text) {
                            Some(index) => index,
                            None => {
                                strings.push(text.to_string());
                                strings.len() - 1
                            }
                        };
                        xml.push_str(&format!(r#"<c r="{reference}" t="s"><v>{index}</v></c>"#));
                    }
                    Cell::Number(value) => {
                        xml.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#));
                    }
                    Cell::Date(serial) => {
                        xml.push_str(&format!(r#"<c r="{reference}" s="1"><v>{serial}</v></c>"#));
                    }
                    Cell::Empty => {}
                }
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData></worksheet>");
        sheet_xml.push(xml);
    }

    let mut workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="{SHEET_NS}" xmlns:r="{REL_NS}"><sheets>"#
    );
    let mut workbook_rels = format!(r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PACKAGE_REL_NS}">"#);
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );
    for (i, (name, _)) in sheets.iter().enumerate() {
        let id = i + 1;
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
            escape_xml(name)
        ));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{id}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{id}.xml"/>"#
        ));
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{id}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    workbook.push_str("</sheets></workbook>");
    workbook_rels.push_str(&format!(
        r#"<Relationship Id="rIdStrings" Type="{REL_NS}/sharedStrings" Target="sharedStrings.xml"/><Relationship Id="rIdStyles" Type="{REL_NS}/styles" Target="styles.xml"/></Relationships>"#
    ));
    content_types.push_str("</Types>");

    let mut shared = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sst xmlns="{SHEET_NS}" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );
    for text in &strings {
        shared.push_str(&format!("<si><t>{}</t></si>", escape_xml(text)));
    }
    shared.push_str("</sst>");

    let styles = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><styleSheet xmlns="{SHEET_NS}"><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#
    );
    let root_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{PACKAGE_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    );

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".to_string(), content_types),
        ("_rels/.rels".to_string(), root_rels),
        ("xl/workbook.xml".to_string(), workbook),
        ("xl/_rels/workbook.xml.rels".to_string(), workbook_rels),
        ("xl/sharedStrings.xml".to_string(), shared),
        ("xl/styles.xml".to_string(), styles),
    ];
    for (i, xml) in sheet_xml.into_iter().enumerate() {
        parts.push((format!("xl/worksheets/sheet{}.xml", i + 1), xml));
    }

    let entries: Vec<(&str, &[u8])> = parts
        .iter()
        .map(|(name, xml)| (name.as_str(), xml.as_bytes()))
        .collect();
    zip_bytes(&entries)
}

/// `0 -> A`, `25 -> Z`, `26 -> AA`
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Minimal valid modus document, optionally labelled
pub fn modus_report(label: Option<&str>) -> Value {
    let mut report = json!({ "ReportID": "1" });
    if let Some(label) = label {
        report["FileDescription"] = json!(label);
    }
    json!({
        "Events": [{
            "EventMetaData": { "EventDate": "2021-09-24", "EventType": { "Soil": true } },
            "LabMetaData": { "LabName": "A&L", "Reports": [report] }
        }]
    })
}

/// Skip reasons captured by [`RecordingDiagnostics`]
#[derive(Debug, Clone, PartialEq)]
pub struct Skip {
    pub filename: String,
    pub file_type: Option<SupportedType>,
    pub kind: ErrorKind,
    pub schema_paths: Vec<String>,
}

#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    pub skips: Mutex<Vec<Skip>>,
    pub empty: Mutex<Vec<String>>,
    pub converted: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn skips(&self) -> Vec<Skip> {
        self.skips.lock().unwrap().clone()
    }

    pub fn skip_kinds(&self) -> Vec<(String, ErrorKind)> {
        self.skips()
            .into_iter()
            .map(|skip| (skip.filename, skip.kind))
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn skipped(&self, filename: &str, file_type: Option<SupportedType>, error: &ConvertError) {
        let schema_paths = match error {
            ConvertError::SchemaValidation { items } => items
                .iter()
                .map(|item| item.instance_path.clone())
                .collect(),
            _ => Vec::new(),
        };
        self.skips.lock().unwrap().push(Skip {
            filename: filename.to_string(),
            file_type,
            kind: error.kind(),
            schema_paths,
        });
    }

    fn no_report(&self, filename: &str, _file_type: SupportedType) {
        self.empty.lock().unwrap().push(filename.to_string());
    }

    fn converted(&self, result: &ConversionResult) {
        self.converted
            .lock()
            .unwrap()
            .push(result.output_filename.clone());
    }
}

/// Tabular parser returning canned reports.
///
/// Text input is read as a list of labels, one report per line; `-` means an
/// unlabelled report and `!fail` raises a parse error. Binary input always
/// yields one unlabelled report.
#[derive(Debug, Default)]
pub struct ScriptedTabular;

impl TabularParser for ScriptedTabular {
    fn parse(&self, input: TabularInput<'_>) -> Result<Vec<StructuredReport>, ParseError> {
        match input.data {
            TabularData::Bytes(_) => Ok(vec![StructuredReport::new(modus_report(None))]),
            TabularData::Text(text) => text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| match line.trim() {
                    "!fail" => Err(ParseError::Invalid("scripted failure".to_string())),
                    "-" => Ok(StructuredReport::new(modus_report(None))),
                    label => Ok(StructuredReport::new(modus_report(Some(label)))),
                })
                .collect(),
        }
    }
}
