//! Free-text extractor for the per-station info blob.
//!
//! Each marker call carries a small HTML snippet of `Label: value` lines
//! (usually `<br>`-separated, often entity-escaped). Field lookup is
//! line-oriented and case-insensitive; numeric fields keep only the first
//! signed decimal found in the raw value.

use regex::Regex;
use scraper::Html;
use serde::Serialize;

use crate::utils::extract_decimal;

/// Fields parsed out of one info blob. Absent labels stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfoFields {
    pub code: Option<String>,
    pub rain: Option<String>,
    pub date: Option<String>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub battery_v: Option<f64>,
    pub solar_volt_v: Option<f64>,
    pub status_text: Option<String>,
}

/// Parse an info blob into labeled fields. An empty blob yields the
/// all-`None` default rather than an error.
pub fn parse_info_html(blob: &str) -> InfoFields {
    if blob.trim().is_empty() {
        return InfoFields::default();
    }

    let lines = blob_to_lines(blob);

    let find = |label: &str| find_labeled(&lines, label);
    let find_num =
        |label: &str| find_labeled(&lines, label).as_deref().and_then(extract_decimal);

    InfoFields {
        code: find("Code"),
        rain: find("Rain"),
        date: find("Date"),
        temperature_c: find_num("Temperature").or_else(|| find_num("Temp")),
        humidity_pct: find_num("Humidity"),
        battery_v: find_num("Battery"),
        solar_volt_v: find_num("Solar Panels Voltages").or_else(|| find_num("Solar")),
        status_text: find("Status"),
    }
}

/// Normalize the blob into trimmed non-empty lines: `<br>` tags become
/// line breaks, entities are decoded, remaining markup is dropped.
fn blob_to_lines(blob: &str) -> Vec<String> {
    let br = Regex::new(r"(?i)<br\s*/?>").unwrap();
    let tag = Regex::new(r"<[^>]+>").unwrap();

    // Literal <br> tags first, then entity decoding (which also strips any
    // real markup), then a second pass for tags that were entity-escaped.
    let text = br.replace_all(blob, "\n");
    let text = decode_entities(&text);
    let text = br.replace_all(&text, "\n");
    let text = tag.replace_all(&text, "");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode HTML entities by running the text through an HTML fragment parse
/// and collecting the text nodes.
fn decode_entities(input: &str) -> String {
    Html::parse_fragment(input).root_element().text().collect()
}

/// Case-insensitive `label: value` lookup; first matching line wins.
fn find_labeled(lines: &[String], label: &str) -> Option<String> {
    let re = Regex::new(&format!(r"(?i){}\s*:\s*(.+)", regex::escape(label))).unwrap();
    for line in lines {
        if let Some(caps) = re.captures(line) {
            return Some(caps[1].trim().to_string());
        }
    }
    None
}
