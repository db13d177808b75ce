use super::SupportedType;
use crate::report::StructuredReport;

/// Extensions swapped for `.json` when deriving an output name
const REPLACED_EXTENSIONS: [&str; 4] = [".xml", ".csv", ".xlsx", ".zip"];

const JSON_SUFFIX: &str = ".json";

/// Inputs for deriving one output filename
#[derive(Debug, Clone, Copy)]
pub struct FilenameArgs<'a> {
    pub report: &'a StructuredReport,
    pub filename: &'a str,
    pub file_type: SupportedType,
    /// Position within the file, present only for multi-report files
    pub index: Option<usize>,
    /// The file was extracted from an archive
    pub archive_member: bool,
}

/// Derive the output filename for one extracted report.
///
/// A sanitized report label takes precedence over the extraction index for
/// tabular files and archive members. Names are not deduplicated across files.
pub fn derive_filename(args: &FilenameArgs<'_>) -> String {
    let renamed = REPLACED_EXTENSIONS
        .iter()
        .find_map(|ext| args.filename.strip_suffix(ext))
        .map(|stem| format!("{stem}{JSON_SUFFIX}"))
        .unwrap_or_else(|| args.filename.to_string());

    let base = renamed.strip_suffix(JSON_SUFFIX).unwrap_or(&renamed);

    if let Some(label) = report_label(args) {
        return format!("{base}{label}{JSON_SUFFIX}");
    }

    match args.index {
        Some(index) => format!("{base}_{index}{JSON_SUFFIX}"),
        None => format!("{base}{JSON_SUFFIX}"),
    }
}

/// Keep only `[A-Za-z0-9_-]`
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn report_label(args: &FilenameArgs<'_>) -> Option<String> {
    if !(args.file_type.is_tabular() || args.archive_member) {
        return None;
    }

    args.report
        .label()
        .map(sanitize_label)
        .filter(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unlabelled() -> StructuredReport {
        StructuredReport::new(json!({ "Events": [] }))
    }

    fn labelled(label: &str) -> StructuredReport {
        StructuredReport::new(json!({
            "Events": [{ "LabMetaData": { "Reports": [{ "FileDescription": label }] } }]
        }))
    }

    fn derive(
        report: &StructuredReport,
        filename: &str,
        file_type: SupportedType,
        index: Option<usize>,
    ) -> String {
        derive_filename(&FilenameArgs {
            report,
            filename,
            file_type,
            index,
            archive_member: false,
        })
    }

    #[test]
    fn test_extension_replaced() {
        let report = unlabelled();
        assert_eq!(derive(&report, "a.xml", SupportedType::Xml, None), "a.json");
        assert_eq!(derive(&report, "dir/b.csv", SupportedType::Csv, None), "dir/b.json");
        assert_eq!(derive(&report, "c.xlsx", SupportedType::Xlsx, None), "c.json");
    }

    #[test]
    fn test_json_name_unchanged() {
        let report = unlabelled();
        assert_eq!(derive(&report, "b.json", SupportedType::Json, None), "b.json");
    }

    #[test]
    fn test_index_suffix() {
        let report = unlabelled();
        assert_eq!(derive(&report, "soil.csv", SupportedType::Csv, Some(0)), "soil_0.json");
        assert_eq!(derive(&report, "soil.csv", SupportedType::Csv, Some(3)), "soil_3.json");
    }

    #[test]
    fn test_label_replaces_index() {
        let report = labelled("Report #7");
        assert_eq!(
            derive(&report, "soil.csv", SupportedType::Csv, Some(1)),
            "soilReport7.json"
        );
        assert_eq!(
            derive(&report, "soil.xlsx", SupportedType::Xlsx, None),
            "soilReport7.json"
        );
    }

    #[test]
    fn test_label_ignored_for_xml_and_json() {
        let report = labelled("Report 7");
        assert_eq!(derive(&report, "a.xml", SupportedType::Xml, None), "a.json");
        assert_eq!(derive(&report, "a.json", SupportedType::Json, None), "a.json");
    }

    #[test]
    fn test_label_applies_to_archive_members_of_any_type() {
        let report = labelled("Spring 2021");
        for (filename, file_type) in [
            ("b.xml", SupportedType::Xml),
            ("c.json", SupportedType::Json),
            ("d.csv", SupportedType::Csv),
        ] {
            let name = derive_filename(&FilenameArgs {
                report: &report,
                filename,
                file_type,
                index: None,
                archive_member: true,
            });
            let stem = filename.split('.').next().unwrap();
            assert_eq!(name, format!("{stem}Spring2021.json"));
        }
    }

    #[test]
    fn test_archive_member_without_label_keeps_index() {
        let name = derive_filename(&FilenameArgs {
            report: &unlabelled(),
            filename: "nested/b.xml",
            file_type: SupportedType::Xml,
            index: None,
            archive_member: true,
        });
        assert_eq!(name, "nested/b.json");
    }

    #[test]
    fn test_label_that_sanitizes_to_nothing_falls_back() {
        let report = labelled("!!! ###");
        assert_eq!(derive(&report, "soil.csv", SupportedType::Csv, Some(2)), "soil_2.json");
        assert_eq!(derive(&report, "soil.csv", SupportedType::Csv, None), "soil.json");
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("Field 12/North-East_2021"), "Field12North-East_2021");
        assert_eq!(sanitize_label("Ünïcode lab"), "ncodelab");
        assert_eq!(sanitize_label(""), "");
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let report = labelled("X");
        let first = derive(&report, "s.csv", SupportedType::Csv, Some(0));
        let second = derive(&report, "s.csv", SupportedType::Csv, Some(0));
        assert_eq!(first, second);
    }
}
