// ingest - turns raw jira/confluence exports into plain records for the search index

use serde_json::{Map, Value};

use crate::Error;

/// Flattens a Jira rich-text description into plain text, one line per paragraph.
/// Anything that is not an object is returned untouched; an object that is not a
/// `doc` becomes an empty string.
pub fn flatten_description(desc: &Value) -> Value {
    let Value::Object(doc) = desc else {
        return desc.clone();
    };

    let blocks = match (doc.get("type").and_then(Value::as_str), doc.get("content")) {
        (Some("doc"), Some(Value::Array(blocks))) => blocks,
        _ => return Value::String(String::new()),
    };

    let lines: Vec<String> = blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("paragraph"))
        .filter_map(|block| block.get("content").and_then(Value::as_array))
        .map(|inlines| {
            inlines
                .iter()
                .filter(|inline| inline.get("type").and_then(Value::as_str) == Some("text"))
                .map(|inline| inline.get("text").and_then(Value::as_str).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .filter(|texts| !texts.is_empty())
        .map(|texts| texts.join(" "))
        .collect();

    Value::String(lines.join("\n"))
}

/// Promotes the searchable parts of one exported record to the top level:
/// Jira `fields.summary` / `fields.description`, Confluence `body.storage.value`.
pub fn flatten_record(mut record: Value) -> Value {
    let Some(doc) = record.as_object_mut() else {
        return record;
    };

    let (summary, description) = match doc.get_mut("fields") {
        Some(Value::Object(fields)) => {
            let summary = fields.get("summary").cloned();
            let description = fields.get("description").map(flatten_description);
            if let Some(flat) = &description {
                fields.insert("description".to_string(), flat.clone());
            }
            (summary, description)
        }
        _ => (None, None),
    };
    promote(doc, "summary", summary);
    promote(doc, "description", description);

    let storage = doc
        .get("body")
        .and_then(|body| body.get("storage"))
        .and_then(|storage| storage.get("value"))
        .cloned();
    promote(doc, "content", storage);

    record
}

/// Flattens an export file: either a JSON array of records or a single record.
pub fn flatten_export(input: &str) -> Result<String, Error> {
    let flat = match serde_json::from_str::<Value>(input)? {
        Value::Array(records) => Value::Array(records.into_iter().map(flatten_record).collect()),
        record => flatten_record(record),
    };
    Ok(serde_json::to_string_pretty(&flat)?)
}

fn promote(doc: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        doc.insert(key.to_string(), value);
    }
}
