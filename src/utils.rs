use std::path::PathBuf;

use chrono::{DateTime, Datelike, NaiveDate};
use rand::{Rng, distr::Alphanumeric};
use serde_json::Value;

use crate::Res;

/// Separators artist credits are split on, applied in order.
pub const ARTIST_DELIMITERS: [&str; 5] = [",", "&", " and ", " x ", " X "];

/// Last segment of a URN such as `soundcloud:tracks:123`.
pub fn urn_id(urn: &str) -> &str {
    urn.rsplit(':').next().unwrap_or(urn)
}

/// Identifier of a raw document: the URN suffix on the mobile API, the `id`
/// field on the web API.
pub fn entity_id(doc: &Value) -> Option<String> {
    if let Some(urn) = doc.get("urn").and_then(Value::as_str) {
        return Some(urn_id(urn).to_string());
    }

    match doc.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Looks up a required field, reporting a malformed document when absent.
pub fn require<'a>(doc: &'a Value, key: &str) -> Res<&'a Value> {
    doc.get(key)
        .filter(|v| !v.is_null())
        .ok_or_else(|| missing_field(key))
}

pub fn missing_field(key: &str) -> crate::ModuleError {
    <serde_json::Error as serde::de::Error>::custom(format!("missing field `{}`", key)).into()
}

/// Items of a `collection` array, or nothing.
pub fn collection(doc: &Value) -> Vec<Value> {
    doc.get("collection")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Splits an artist credit like `"A, B & C x D"` into individual names.
pub fn split_artists(credit: &str) -> Vec<String> {
    let mut parts = vec![credit.to_string()];
    for delimiter in ARTIST_DELIMITERS {
        parts = parts
            .iter()
            .flat_map(|p| p.split(delimiter))
            .map(str::to_string)
            .collect();
    }

    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Year of an API date. Accepts RFC 3339 timestamps, `YYYY-MM-DD`,
/// `YYYY/MM/DD hh:mm:ss +zzzz` and bare years.
pub fn parse_year(date: &str) -> Option<i32> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.year());
    }

    if let Some(day) = date.get(..10) {
        for format in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(d) = NaiveDate::parse_from_str(day, format) {
                return Some(d.year());
            }
        }
    }

    date.split(['-', '/'])
        .next()
        .filter(|y| y.len() == 4)
        .and_then(|y| y.parse().ok())
}

/// Full-size artwork URL. Mobile documents carry a `{size}` template, web
/// documents a `-large` thumbnail URL.
pub fn original_artwork(template: Option<&str>, artwork_url: Option<&str>) -> Option<String> {
    if let Some(template) = template.filter(|t| !t.is_empty()) {
        return Some(template.replace("{size}", "original"));
    }

    artwork_url
        .filter(|u| !u.is_empty())
        .map(|u| u.replace("-large", "-original"))
}

pub fn auth_header_value(access_token: &str) -> String {
    format!("OAuth {}", access_token)
}

/// A fresh, not yet existing path in the OS temp directory.
pub fn create_temp_filename() -> PathBuf {
    let name: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    std::env::temp_dir().join(name)
}
