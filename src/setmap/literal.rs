//! Literal coercion for tokenized marker-call arguments.
//!
//! Scraped tokens are one of three shapes: a quoted string, a numeric
//! literal, or a flat `{key:value,...}` option object. Coercion is
//! best-effort and never fails: anything unrecognized passes through as
//! trimmed text.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A coerced script-literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Render the value the way it should appear in flat output (CSV cells,
    /// station-code comparisons). Objects render as compact JSON.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Object(_) => {
                let json = serde_json::to_string(self).unwrap_or_default();
                write!(f, "{json}")
            }
        }
    }
}

/// Strip matching quote delimiters and unescape `\'` / `\"` sequences.
/// Tokens that are not quote-delimited come back trimmed but untouched.
pub fn clean_str(token: &str) -> String {
    let token = token.trim();
    let quoted = (token.starts_with('\'') && token.ends_with('\'') && token.len() >= 2)
        || (token.starts_with('"') && token.ends_with('"') && token.len() >= 2);
    if quoted {
        token[1..token.len() - 1]
            .replace("\\'", "'")
            .replace("\\\"", "\"")
    } else {
        token.to_string()
    }
}

/// Numeric coercion: integer if the token is all digits, else float if it
/// parses as one, else the token passes through as text.
pub fn coerce_scalar(token: &str) -> Value {
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        }
    }
    if let Ok(f) = token.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Text(token.to_string())
}

/// Parse a flat `{key:value,...}` object literal.
///
/// A comma is a pair boundary only when the remainder of the body holds at
/// most one more `key:value` pair: exactly one colon left, or no further
/// comma. This keeps colons and commas inside a trailing value from
/// producing bogus splits. Parts without a colon are dropped. Keys lose
/// surrounding quotes; values get numeric coercion only.
pub fn parse_object(token: &str) -> Value {
    let token = token.trim();
    if !(token.starts_with('{') && token.ends_with('}')) {
        return Value::Text(token.to_string());
    }
    let body = token[1..token.len() - 1].trim();

    let mut map = BTreeMap::new();
    for part in split_pairs(body) {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        let key = key.trim().trim_matches(|c| c == '\'' || c == '"').to_string();
        map.insert(key, coerce_scalar(value.trim()));
    }
    Value::Object(map)
}

fn split_pairs(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in body.char_indices() {
        if c != ',' {
            continue;
        }
        let tail = &body[i + 1..];
        let one_pair_left = tail.matches(':').count() == 1;
        let no_more_commas = !tail.contains(',');
        if one_pair_left || no_more_commas {
            parts.push(&body[start..i]);
            start = i + 1;
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Coerce one raw token into a typed value: unquote strings, parse object
/// literals, numerically coerce the rest.
pub fn coerce_token(token: &str) -> Value {
    let cleaned = clean_str(token);
    if cleaned.starts_with('{') && cleaned.ends_with('}') {
        parse_object(&cleaned)
    } else {
        coerce_scalar(&cleaned)
    }
}
