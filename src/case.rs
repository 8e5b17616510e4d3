//! Key casing at the API boundary: columns are snake_case, clients see camelCase.

use serde_json::{Map, Value};

/// "release_year" -> "releaseYear"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = !out.is_empty();
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// "characterName" -> "character_name". Already snake_case input is unchanged.
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Recursively rename object keys to camelCase (objects and arrays of objects).
pub fn value_keys_to_camel_case(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let renamed = std::mem::take(map)
                .into_iter()
                .map(|(k, mut v)| {
                    value_keys_to_camel_case(&mut v);
                    (to_camel_case(&k), v)
                })
                .collect();
            *map = renamed;
        }
        Value::Array(arr) => arr.iter_mut().for_each(value_keys_to_camel_case),
        _ => {}
    }
}

/// A stored record as the client sees it.
pub fn record_to_api(record: Map<String, Value>) -> Value {
    let mut value = Value::Object(record);
    value_keys_to_camel_case(&mut value);
    value
}

/// Top-level request keys to column names. Nested values are left alone.
pub fn object_keys_to_snake_case(obj: Map<String, Value>) -> Map<String, Value> {
    obj.into_iter().map(|(k, v)| (to_snake_case(&k), v)).collect()
}
