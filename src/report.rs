use crate::convert::SupportedType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON pointer to the label used for output naming
const LABEL_POINTER: &str = "/Events/0/LabMetaData/Reports/0/FileDescription";

/// A parsed modus document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredReport(Value);

impl StructuredReport {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Report description of the first report of the first event, if any
    pub fn label(&self) -> Option<&str> {
        self.0.pointer(LABEL_POINTER).and_then(Value::as_str)
    }
}

/// One converted report together with its naming information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub original_filename: String,
    pub original_type: SupportedType,
    pub output_filename: String,
    pub structured_report: StructuredReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_lookup() {
        let report = StructuredReport::new(json!({
            "Events": [{
                "LabMetaData": {
                    "Reports": [{ "ReportID": "1", "FileDescription": "Field 12 / 2021" }]
                }
            }]
        }));
        assert_eq!(report.label(), Some("Field 12 / 2021"));
    }

    #[test]
    fn test_label_missing() {
        assert_eq!(StructuredReport::new(json!({ "Events": [] })).label(), None);
        assert_eq!(StructuredReport::new(json!("text")).label(), None);

        let numeric = StructuredReport::new(json!({
            "Events": [{ "LabMetaData": { "Reports": [{ "FileDescription": 7 }] } }]
        }));
        assert_eq!(numeric.label(), None);
    }

    #[test]
    fn test_report_serializes_transparently() {
        let report = StructuredReport::new(json!({ "Events": [] }));
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"Events":[]}"#
        );
    }
}
