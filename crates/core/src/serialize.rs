//! Output serializers: CSV, JSON, XML, and HTML.
//!
//! A closed set of format variants behind one `serialize` entry point.
//! Adding a format means adding a variant here; the pipeline never
//! branches on formats itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transform::OutputRecord;

const HTML_TITLE: &str = "Scraped Data";

/// Output format tag from the settings document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Xml,
    Html,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Html => "html",
        }
    }

    /// File extension, which doubles as the default output file name
    /// suffix (`data/output.<ext>`).
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Serialize the record set into this format's textual content.
    pub fn serialize(&self, records: &[OutputRecord]) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Csv => Ok(to_csv(records)),
            OutputFormat::Json => to_json(records),
            OutputFormat::Xml => Ok(to_xml(records)),
            OutputFormat::Html => Ok(to_html(records)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar string representation shared by the serializers and the
/// `contains` filter operator: strings render bare, null renders
/// empty, everything else renders as its JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Union of record keys in first-seen order. CSV and HTML both use
/// this as the column header set.
fn collect_headers(records: &[OutputRecord]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

fn escape_csv_field(value: Option<&Value>) -> String {
    let text = value.map(display_value).unwrap_or_default();
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text
    }
}

/// CSV with a header row; empty input serializes to an empty string.
pub fn to_csv(records: &[OutputRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let headers = collect_headers(records);
    let mut lines = vec![headers.join(",")];

    for record in records {
        let line = headers
            .iter()
            .map(|h| escape_csv_field(record.get(h)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// Pretty-printed JSON array of records.
pub fn to_json(records: &[OutputRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// XML document with an `<items>` root and one `<item>` per record.
pub fn to_xml(records: &[OutputRecord]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<items>");

    for record in records {
        xml.push_str("\n  <item>");
        for (key, value) in record {
            let text = escape_xml(&display_value(value));
            xml.push_str(&format!("\n    <{key}>{text}</{key}>"));
        }
        xml.push_str("\n  </item>");
    }

    xml.push_str("\n</items>\n");
    xml
}

/// Standalone HTML page with a styled table of all records.
pub fn to_html(records: &[OutputRecord]) -> String {
    if records.is_empty() {
        return format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<p>No data available.</p>\n</body>\n</html>",
            title = HTML_TITLE
        );
    }

    let headers = collect_headers(records);
    let header_row = headers
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape::encode_text(h)))
        .collect::<String>();

    let body_rows = records
        .iter()
        .map(|record| {
            let cells = headers
                .iter()
                .map(|h| {
                    let text = record.get(h).map(display_value).unwrap_or_default();
                    format!("<td>{}</td>", html_escape::encode_text(&text))
                })
                .collect::<String>();
            format!("<tr>{cells}</tr>")
        })
        .collect::<Vec<_>>()
        .join("\n      ");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{title}</title>\n<style>\ntable {{ border-collapse: collapse; width: 100%; }}\nth, td {{ border: 1px solid #ccc; padding: 4px 8px; font-family: Arial, sans-serif; font-size: 13px; }}\nth {{ background-color: #f4f4f4; }}\ncaption {{ font-weight: bold; margin-bottom: 8px; }}\n</style>\n</head>\n<body>\n<table>\n<caption>{title}</caption>\n<thead>\n<tr>{header_row}</tr>\n</thead>\n<tbody>\n{body_rows}\n</tbody>\n</table>\n</body>\n</html>",
        title = HTML_TITLE
    )
}
