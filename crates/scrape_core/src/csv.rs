use serde::Serialize;
use serde_json::{Map, Value};

/// Converts flat JSON objects into CSV text.
///
/// The header row is the key order of the first record; later records are
/// read through those keys only. Missing and null values are empty cells,
/// strings are written raw and any other value as its JSON text. A cell that
/// contains a comma, a quote or a newline is quoted with embedded quotes
/// doubled. Rows are joined with `\n`; no records give an empty string.
pub fn to_csv(records: &[Map<String, Value>]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|header| escape_cell(header))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        let row = headers
            .iter()
            .map(|header| escape_cell(&cell_text(record.get(header.as_str()))))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

/// Two-space indented JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape_cell(text: &str) -> String {
    if text.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
