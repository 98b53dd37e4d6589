//! `field=value` arguments and their conversion into entity forms.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// One `field=value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub value: String,
}

/// Split `field=value` at the first `=`. The value may be empty.
pub fn parse_field(raw: &str) -> Result<Field, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok(Field {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

/// Build a form from the submitted fields. A repeated field keeps its
/// last value; fields the form does not know are ignored.
pub fn into_form<T: DeserializeOwned>(fields: Vec<Field>) -> Result<T, serde_json::Error> {
    let map: Map<String, Value> = fields
        .into_iter()
        .map(|f| (f.key, Value::String(f.value)))
        .collect();
    serde_json::from_value(Value::Object(map))
}
