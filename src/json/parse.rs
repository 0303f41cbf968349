//! JSON array-of-objects parsing implementation.

use crate::DataFormat;
use crate::error::{ParseError, ValueError};
use crate::table::{Row, Table};
use serde_json::{Map, Value};

/// Parse a JSON array of objects into a table.
///
/// Columns appear in the order their keys are first seen. Scalars are
/// stringified, `null` becomes a missing cell, and nested arrays or objects
/// are kept as compact JSON text.
pub fn json_parse<S: AsRef<str>>(json_text: S) -> Result<Table, ParseError> {
    let text = json_text.as_ref();

    if text.trim().is_empty() {
        return Ok(Table::default());
    }

    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(ParseError::without_position(
            DataFormat::Json,
            ValueError::Syntax(format!(
                "expected an array of objects, found {}",
                kind_of(&value)
            )),
        ));
    };

    let objects = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(ParseError::without_position(
                DataFormat::Json,
                ValueError::Syntax(format!(
                    "element {index} of the array is {}, expected an object",
                    kind_of(&other)
                )),
            )),
        })
        .collect::<Result<Vec<Map<String, Value>>, _>>()?;

    let mut columns: Vec<String> = Vec::new();
    for object in &objects {
        for key in object.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = Table::new(columns.iter().cloned());
    for mut object in objects {
        let row: Row = columns
            .iter()
            .map(|column| object.remove(column).and_then(cell_text))
            .collect();
        table.push_row(row);
    }

    Ok(table)
}

fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_parse_basic() {
        let input = r#"[
  {"id": "9", "title": "Gold nanoparticles synthesized", "date": "01/01/2020", "journal": "Journal of photochemistry"},
  {"id": 10, "title": "Clinical implications of umbilical artery Doppler changes", "date": "01/01/2020", "journal": "The journal of maternal-fetal & neonatal medicine"}
]"#;
        let table = json_parse(input).unwrap();
        assert_eq!(table.columns(), &["id", "title", "date", "journal"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "id"), Some("10"));
    }

    #[test]
    fn test_json_parse_union_of_keys() {
        let input = r#"[{"id": "1", "title": "A"}, {"title": "B", "journal": "J"}]"#;
        let table = json_parse(input).unwrap();
        assert_eq!(table.columns(), &["id", "title", "journal"]);
        assert_eq!(table.get(1, "id"), None);
        assert_eq!(table.get(1, "journal"), Some("J"));
    }

    #[test]
    fn test_json_parse_cell_conversion() {
        let input = r#"[{"a": null, "b": "", "c": true, "d": 1.5, "e": [1, 2], "f": {"k": "v"}}]"#;
        let table = json_parse(input).unwrap();
        assert_eq!(table.get(0, "a"), None);
        assert_eq!(table.get(0, "b"), Some(""));
        assert_eq!(table.get(0, "c"), Some("true"));
        assert_eq!(table.get(0, "d"), Some("1.5"));
        assert_eq!(table.get(0, "e"), Some("[1,2]"));
        assert_eq!(table.get(0, "f"), Some(r#"{"k":"v"}"#));
    }

    #[test]
    fn test_json_parse_empty_array() {
        let table = json_parse("[]").unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_json_parse_rejects_non_array() {
        let err = json_parse(r#"{"id": 1}"#).unwrap_err();
        assert!(err.to_string().contains("expected an array of objects, found an object"));
    }

    #[test]
    fn test_json_parse_rejects_non_object_element() {
        let err = json_parse(r#"[{"id": 1}, 2]"#).unwrap_err();
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn test_json_parse_trailing_comma_is_syntax_error() {
        let err = json_parse("[\n{\"id\": 1},\n]").unwrap_err();
        assert_eq!(err.format, DataFormat::Json);
        assert_eq!(err.line, Some(3));
    }
}
