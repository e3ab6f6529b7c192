use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use vitrina_fetch::Descriptor;

/// Longest leading decimal literal, the way a lenient float parser reads it.
static DECIMAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex"));

/// One product of the catalog.
///
/// Field names are part of the output format and stay in Spanish.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProductRecord {
    pub titulo: String,
    pub descripcion: String,
    /// Always finite and never negative.
    pub precio: f64,
    pub detalles: Vec<String>,
    /// Image links or `data:` URIs, in listing order.
    pub imagenes: Vec<String>,
}

impl ProductRecord {
    /// Reads a record out of a descriptor without ever failing: missing or
    /// mistyped fields fall back to empty values.
    pub fn from_descriptor(descriptor: &Descriptor, imagenes: Vec<String>) -> Self {
        Self {
            titulo: text(descriptor.get("titulo")),
            descripcion: text(descriptor.get("descripcion")),
            precio: price(descriptor.get("precio")),
            detalles: details(descriptor.get("detalles")),
            imagenes,
        }
    }
}

fn text(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn price(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(string)) => parse_price(string),
        _ => None,
    };
    parsed.filter(|price| price.is_finite() && *price > 0.0).unwrap_or(0.0)
}

/// Parses the leading number of a free-form price such as `"12.50 MXN"`.
pub fn parse_price(input: &str) -> Option<f64> {
    DECIMAL_PREFIX.find(input.trim_start()).and_then(|m| m.as_str().parse().ok())
}

fn details(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(string) => string.clone(),
            other => other.to_string(),
        })
        .collect()
}
