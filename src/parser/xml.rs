use super::{ParseError, XmlParser};
use crate::report::StructuredReport;
use roxmltree::{Document, Node};
use serde_json::{json, Map, Value};

/// Wrapper elements whose children always become a JSON array
const LIST_WRAPPERS: [(&str, &str); 5] = [
    ("Reports", "Report"),
    ("SoilSamples", "SoilSample"),
    ("NutrientResults", "NutrientResult"),
    ("DepthRefs", "DepthRef"),
    ("Depths", "Depth"),
];

/// Built-in parser for modus XML documents
#[derive(Debug, Clone, Copy, Default)]
pub struct ModusXmlParser;

impl XmlParser for ModusXmlParser {
    fn parse_report(&self, text: &str) -> Result<Option<StructuredReport>, ParseError> {
        let document = Document::parse(text)?;
        let root = document.root_element();

        let events_node = match root.tag_name().name() {
            "Events" => Some(root),
            "ModusResult" | "ModusSubmit" => child_elements(root, "Events").next(),
            other => {
                return Err(ParseError::Invalid(format!(
                    "Unexpected XML root element <{}>",
                    other
                )));
            }
        };

        let events: Vec<Value> = events_node
            .into_iter()
            .flat_map(|node| child_elements(node, "Event"))
            .map(element_to_json)
            .collect();

        if events.is_empty() {
            return Ok(None);
        }

        Ok(Some(StructuredReport::new(json!({ "Events": events }))))
    }
}

fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// Convert an element tree to JSON.
///
/// Text-only elements become strings, attributes become fields, and repeated
/// siblings collapse into arrays.
fn element_to_json(node: Node<'_, '_>) -> Value {
    let has_children = node.children().any(|child| child.is_element());
    let has_attributes = node.attributes().next().is_some();
    let text = node.text().map(str::trim).unwrap_or("");

    if !has_children && !has_attributes {
        return Value::String(text.to_string());
    }

    let mut object = Map::new();
    for attribute in node.attributes() {
        object.insert(
            attribute.name().to_string(),
            Value::String(attribute.value().to_string()),
        );
    }
    if !has_children && !text.is_empty() {
        object.insert("#text".to_string(), Value::String(text.to_string()));
    }

    for child in node.children().filter(|child| child.is_element()) {
        let name = child.tag_name().name();
        let value = match LIST_WRAPPERS.iter().find(|(wrapper, _)| *wrapper == name) {
            Some((_, item)) => {
                Value::Array(child_elements(child, *item).map(element_to_json).collect())
            }
            None => element_to_json(child),
        };
        insert_repeated(&mut object, name, value);
    }

    Value::Object(object)
}

fn insert_repeated(object: &mut Map<String, Value>, key: &str, value: Value) {
    match object.get_mut(key) {
        None => {
            object.insert(key.to_string(), value);
        }
        Some(Value::Array(items)) if !is_list_wrapper(key) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

fn is_list_wrapper(key: &str) -> bool {
    LIST_WRAPPERS.iter().any(|(wrapper, _)| *wrapper == key)
}
