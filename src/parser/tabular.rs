use super::{ParseError, TabularData, TabularInput, TabularParser};
use crate::input::TableFormat;
use crate::report::StructuredReport;
use calamine::{open_workbook_from_rs, Data, ExcelDateTime, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{json, Map, Value};
use std::io::Cursor;

/// Columns with a fixed meaning in TOMKAT exports
const TOMKAT_COLUMNS: [&str; 10] = [
    "ReportID",
    "Date",
    "LabName",
    "FileDescription",
    "ReportName",
    "SampleID",
    "Point",
    "SampleNumber",
    "Depth",
    "DepthUnit",
];

/// Date layouts accepted in the `Date` column
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d"];

/// Timestamp layouts, as rendered from spreadsheet date cells
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

const DEFAULT_DEPTH_UNIT: &str = "in";

/// Built-in CSV/XLSX parser producing soil-sample modus reports
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetParser;

impl TabularParser for SheetParser {
    fn parse(&self, input: TabularInput<'_>) -> Result<Vec<StructuredReport>, ParseError> {
        let sheets = match input.data {
            TabularData::Text(text) => vec![read_csv(text)?],
            TabularData::Bytes(bytes) => read_xlsx(bytes)?,
        };

        let reports = match input.format {
            TableFormat::Tomkat => sheets.iter().flat_map(tomkat_reports).collect(),
            TableFormat::Generic => sheets.iter().filter_map(generic_report).collect(),
        };

        Ok(reports)
    }
}

/// Header row plus data rows, all cells rendered as trimmed strings
#[derive(Debug)]
struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    fn first_column(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.column(name))
    }
}

/// Cell lookup that treats missing and empty cells alike
fn cell(row: &[String], column: Option<usize>) -> Option<&str> {
    column
        .and_then(|i| row.get(i))
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn read_csv(text: &str) -> Result<Sheet, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Sheet {
        name: "Sheet1".to_string(),
        headers,
        rows,
    })
}

fn read_xlsx(bytes: &[u8]) -> Result<Vec<Sheet>, ParseError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|value| !value.is_empty()));

        // Sheets without a header row carry no data
        let Some(headers) = rows.next() else {
            continue;
        };
        sheets.push(Sheet {
            name,
            headers,
            rows: rows.collect(),
        });
    }

    Ok(sheets)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_string(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Data::DateTime(value) => excel_date_text(value),
        Data::DateTimeIso(text) => match text.split_once('T') {
            Some((date, "00:00:00")) => date.to_string(),
            _ => text.clone(),
        },
        other => other.to_string(),
    }
}

/// Date-formatted cells render as `YYYY-MM-DD`, keeping the time only when
/// it is not midnight
fn excel_date_text(value: &ExcelDateTime) -> String {
    match value.as_datetime() {
        Some(timestamp) if value.is_datetime() => {
            if timestamp.time() == NaiveTime::MIN {
                timestamp.format("%Y-%m-%d").to_string()
            } else {
                timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }
        _ => value.to_string(),
    }
}

fn tomkat_reports(sheet: &Sheet) -> Vec<StructuredReport> {
    let key = sheet.first_column(&["ReportID", "Date"]);
    let layout = Layout::tomkat(sheet);

    // Groups in first-seen order
    let mut groups: Vec<(Option<&str>, Vec<&[String]>)> = Vec::new();
    for row in &sheet.rows {
        let value = cell(row, key);
        match groups.iter_mut().find(|(group, _)| *group == value) {
            Some((_, rows)) => rows.push(row.as_slice()),
            None => groups.push((value, vec![row.as_slice()])),
        }
    }

    let report_column = sheet.column("ReportID");
    let date_column = sheet.column("Date");
    let lab_column = sheet.column("LabName");
    let description_column = sheet.first_column(&["FileDescription", "ReportName"]);

    groups
        .iter()
        .enumerate()
        .map(|(i, (_, rows))| {
            let first = rows[0];
            let meta = EventMeta {
                report_id: cell(first, report_column)
                    .map(str::to_string)
                    .unwrap_or_else(|| (i + 1).to_string()),
                date: rows
                    .iter()
                    .find_map(|row| cell(row, date_column))
                    .and_then(normalize_date),
                lab_name: rows.iter().find_map(|row| cell(row, lab_column)),
                description: rows.iter().find_map(|row| cell(row, description_column)),
            };
            StructuredReport::new(soil_event(&layout, rows, &meta))
        })
        .collect()
}

fn generic_report(sheet: &Sheet) -> Option<StructuredReport> {
    if sheet.rows.is_empty() {
        return None;
    }

    let layout = Layout::generic(sheet);
    let rows: Vec<&[String]> = sheet.rows.iter().map(Vec::as_slice).collect();
    let meta = EventMeta {
        report_id: sheet.name.clone(),
        date: None,
        lab_name: None,
        description: None,
    };
    Some(StructuredReport::new(soil_event(&layout, &rows, &meta)))
}

struct EventMeta<'a> {
    report_id: String,
    date: Option<String>,
    lab_name: Option<&'a str>,
    description: Option<&'a str>,
}

/// A result column: element name and optional unit, from `Name (unit)`
#[derive(Debug, PartialEq)]
struct Nutrient {
    column: usize,
    element: String,
    unit: Option<String>,
}

/// Which columns hold sample identity, depth, and results
struct Layout {
    sample: Option<usize>,
    depth: Option<usize>,
    depth_unit: Option<usize>,
    nutrients: Vec<Nutrient>,
}

impl Layout {
    fn tomkat(sheet: &Sheet) -> Self {
        let nutrients = sheet
            .headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.is_empty() && !TOMKAT_COLUMNS.contains(&header.as_str()))
            .map(|(column, header)| parse_nutrient_header(column, header))
            .collect();

        Self {
            sample: sheet.first_column(&["SampleID", "Point", "SampleNumber"]),
            depth: sheet.column("Depth"),
            depth_unit: sheet.column("DepthUnit"),
            nutrients,
        }
    }

    fn generic(sheet: &Sheet) -> Self {
        let nutrients = sheet
            .headers
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, header)| !header.is_empty())
            .map(|(column, header)| parse_nutrient_header(column, header))
            .collect();

        Self {
            sample: (!sheet.headers.is_empty()).then_some(0),
            depth: None,
            depth_unit: None,
            nutrients,
        }
    }
}

fn parse_nutrient_header(column: usize, header: &str) -> Nutrient {
    let split = header
        .strip_suffix(')')
        .and_then(|rest| rest.rsplit_once('('));

    match split {
        Some((element, unit)) if !element.trim().is_empty() && !unit.trim().is_empty() => {
            Nutrient {
                column,
                element: element.trim().to_string(),
                unit: Some(unit.trim().to_string()),
            }
        }
        _ => Nutrient {
            column,
            element: header.trim().to_string(),
            unit: None,
        },
    }
}

/// Depth interval parsed from `top-bottom`
#[derive(Debug, PartialEq)]
struct DepthRange {
    top: f64,
    bottom: f64,
}

fn parse_depth(text: &str) -> Option<DepthRange> {
    let (top, bottom) = text.split_once('-')?;
    Some(DepthRange {
        top: top.trim().parse().ok()?,
        bottom: bottom.trim().parse().ok()?,
    })
}

fn normalize_date(text: &str) -> Option<String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(text, format)
                    .ok()
                    .map(|timestamp| timestamp.date())
            })
        })
        .map(|date| date.format("%Y-%m-%d").to_string())
}

fn soil_event(layout: &Layout, rows: &[&[String]], meta: &EventMeta<'_>) -> Value {
    // DepthRefs keyed by the raw depth text, first-seen order
    let mut depth_keys: Vec<String> = Vec::new();
    let mut depth_refs = Vec::new();
    let mut samples = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let depth_text = cell(row, layout.depth).unwrap_or("").to_string();
        let depth_id = match depth_keys.iter().position(|key| *key == depth_text) {
            Some(position) => position + 1,
            None => {
                depth_keys.push(depth_text.clone());
                let unit = cell(row, layout.depth_unit).unwrap_or(DEFAULT_DEPTH_UNIT);
                depth_refs.push(depth_ref(depth_keys.len(), &depth_text, unit));
                depth_keys.len()
            }
        };

        let results: Vec<Value> = layout
            .nutrients
            .iter()
            .filter_map(|nutrient| {
                let value: f64 = cell(row, Some(nutrient.column))?.parse().ok()?;
                let mut result = Map::new();
                result.insert("Element".into(), json!(nutrient.element));
                result.insert("Value".into(), json!(value));
                if let Some(unit) = &nutrient.unit {
                    result.insert("ValueUnit".into(), json!(unit));
                }
                Some(Value::Object(result))
            })
            .collect();

        let sample_number = cell(row, layout.sample)
            .map(str::to_string)
            .unwrap_or_else(|| (i + 1).to_string());

        samples.push(json!({
            "SampleMetaData": { "SampleNumber": sample_number },
            "Depths": [{ "DepthID": depth_id.to_string(), "NutrientResults": results }]
        }));
    }

    let mut event_meta = Map::new();
    event_meta.insert("EventType".into(), json!({ "Soil": true }));
    if let Some(date) = &meta.date {
        event_meta.insert("EventDate".into(), json!(date));
    }

    let mut report = Map::new();
    report.insert("ReportID".into(), json!(meta.report_id));
    if let Some(description) = meta.description {
        report.insert("FileDescription".into(), json!(description));
    }

    let mut lab_meta = Map::new();
    if let Some(lab_name) = meta.lab_name {
        lab_meta.insert("LabName".into(), json!(lab_name));
    }
    lab_meta.insert("Reports".into(), json!([Value::Object(report)]));

    json!({
        "Events": [{
            "EventMetaData": Value::Object(event_meta),
            "LabMetaData": Value::Object(lab_meta),
            "EventSamples": {
                "Soil": {
                    "DepthRefs": depth_refs,
                    "SoilSamples": samples
                }
            }
        }]
    })
}

fn depth_ref(id: usize, depth_text: &str, unit: &str) -> Value {
    match parse_depth(depth_text) {
        Some(range) => json!({
            "DepthID": id.to_string(),
            "Name": depth_text,
            "StartingDepth": range.top,
            "EndingDepth": range.bottom,
            "ColumnDepth": range.bottom - range.top,
            "DepthUnit": unit
        }),
        None => {
            let name = if depth_text.is_empty() {
                "Unknown Depth"
            } else {
                depth_text
            };
            json!({ "DepthID": id.to_string(), "Name": name })
        }
    }
}
