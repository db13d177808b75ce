use super::SchemaValidator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Properties allowed at the top level of a modus document
const ROOT_PROPERTIES: [&str; 2] = ["Events", "Version"];

/// A single failed constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value (`""` for the root)
    pub instance_path: String,
    pub message: String,
}

/// Every constraint a candidate failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("document failed {} schema constraint(s)", .errors.len())]
pub struct SchemaViolations {
    pub errors: Vec<SchemaViolation>,
}

/// Structural validator for modus JSON documents
#[derive(Debug, Clone, Copy, Default)]
pub struct ModusSchema;

impl SchemaValidator for ModusSchema {
    fn validate(&self, candidate: &Value) -> Result<(), SchemaViolations> {
        let mut checker = Checker::default();
        checker.document(candidate);

        if checker.errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolations {
                errors: checker.errors,
            })
        }
    }
}

#[derive(Default)]
struct Checker {
    errors: Vec<SchemaViolation>,
}

impl Checker {
    fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(SchemaViolation {
            instance_path: path.to_string(),
            message: message.into(),
        });
    }

    fn object<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.fail(path, "must be object");
        }
        object
    }

    fn array<'v>(&mut self, path: &str, value: &'v Value) -> Option<&'v Vec<Value>> {
        let array = value.as_array();
        if array.is_none() {
            self.fail(path, "must be array");
        }
        array
    }

    fn document(&mut self, value: &Value) {
        let Some(root) = self.object("", value) else {
            return;
        };

        if !root.contains_key("Events") {
            self.fail("", "must have required property 'Events'");
        }

        for key in root.keys() {
            if !ROOT_PROPERTIES.contains(&key.as_str()) {
                self.fail("", format!("must NOT have additional properties ('{key}')"));
            }
        }

        if let Some(version) = root.get("Version") {
            if !version.is_string() {
                self.fail("/Version", "must be string");
            }
        }

        if let Some(events) = root.get("Events") {
            if let Some(events) = self.array("/Events", events) {
                for (i, event) in events.iter().enumerate() {
                    self.event(&format!("/Events/{i}"), event);
                }
            }
        }
    }

    fn event(&mut self, path: &str, value: &Value) {
        let Some(event) = self.object(path, value) else {
            return;
        };

        if let Some(meta) = event.get("EventMetaData") {
            self.event_meta(&format!("{path}/EventMetaData"), meta);
        }
        if let Some(lab) = event.get("LabMetaData") {
            self.lab_meta(&format!("{path}/LabMetaData"), lab);
        }
        if let Some(samples) = event.get("EventSamples") {
            self.object(&format!("{path}/EventSamples"), samples);
        }
    }

    fn event_meta(&mut self, path: &str, value: &Value) {
        let Some(meta) = self.object(path, value) else {
            return;
        };

        if let Some(date) = meta.get("EventDate") {
            let date_path = format!("{path}/EventDate");
            match date.as_str() {
                Some(date) if is_iso_date(date) => {}
                Some(_) => self.fail(&date_path, "must match format \"date\""),
                None => self.fail(&date_path, "must be string"),
            }
        }
    }

    fn lab_meta(&mut self, path: &str, value: &Value) {
        let Some(lab) = self.object(path, value) else {
            return;
        };

        if let Some(name) = lab.get("LabName") {
            if !name.is_string() {
                self.fail(&format!("{path}/LabName"), "must be string");
            }
        }

        let Some(reports) = lab.get("Reports") else {
            return;
        };
        let reports_path = format!("{path}/Reports");
        let Some(reports) = self.array(&reports_path, reports) else {
            return;
        };

        for (i, report) in reports.iter().enumerate() {
            let report_path = format!("{reports_path}/{i}");
            let Some(report) = self.object(&report_path, report) else {
                continue;
            };

            if let Some(id) = report.get("ReportID") {
                if !(id.is_string() || id.is_i64() || id.is_u64()) {
                    self.fail(&format!("{report_path}/ReportID"), "must be string,integer");
                }
            }
            if let Some(description) = report.get("FileDescription") {
                if !description.is_string() {
                    self.fail(&format!("{report_path}/FileDescription"), "must be string");
                }
            }
        }
    }
}

fn is_iso_date(date: &str) -> bool {
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}
