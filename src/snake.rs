//! Renames the camelCase keys of Lightsail response documents to snake_case.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static FIRST_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("static regex"));
static ALL_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new("([a-z0-9])([A-Z])").expect("static regex"));

/// `publicIpAddress` becomes `public_ip_address`, `HTTPEndpoint` becomes
/// `http_endpoint`.
pub fn camel_to_snake(name: &str) -> String {
    let words = FIRST_CAP.replace_all(name, "${1}_${2}");
    ALL_CAP
        .replace_all(&words, "${1}_${2}")
        .to_lowercase()
}

/// Converts every object key in the document, descending into nested objects
/// and arrays. Values are left untouched.
pub fn camel_dict_to_snake_dict(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (camel_to_snake(&k), camel_dict_to_snake_dict(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(camel_dict_to_snake_dict).collect())
        }
        other => other,
    }
}
