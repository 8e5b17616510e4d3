//! Type coercion of path identifiers and request bodies against entity columns.

use super::entity::{ColumnInfo, ColumnKind, Entity, PK};
use super::Record;
use crate::case::object_keys_to_snake_case;
use crate::error::AppError;
use serde_json::Value;

/// Numeric conversion of a path segment. `None` is the "not a number" sentinel and matches no row.
pub fn coerce_id(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let f: f64 = s.parse().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Field set for an update of row `id`: keys to columns, values to column types.
/// `id` may appear only with the row's own value and is dropped.
pub fn coerce_update(entity: &Entity, id: i64, body: Record) -> Result<Record, AppError> {
    let mut out = Record::new();
    for (key, value) in object_keys_to_snake_case(body) {
        let col = lookup(entity, &key)?;
        if col.name == PK {
            match id_value(&value) {
                Some(n) if n == id => continue,
                _ => return Err(AppError::BadRequest(format!("{} id is immutable", entity.name))),
            }
        }
        if col.generated {
            return Err(AppError::BadRequest(format!("field '{}' is read-only", key)));
        }
        out.insert(key, coerce_value(entity, col, value)?);
    }
    Ok(out)
}

/// A row for bulk insert. Explicit ids are kept; required columns must be present.
pub fn coerce_insert(entity: &Entity, row: Record) -> Result<Record, AppError> {
    let mut out = Record::new();
    for (key, value) in object_keys_to_snake_case(row) {
        let col = lookup(entity, &key)?;
        if col.name == PK {
            let n = id_value(&value)
                .ok_or_else(|| AppError::BadRequest(format!("invalid {} id: {}", entity.name, value)))?;
            out.insert(key, Value::from(n));
            continue;
        }
        if col.generated {
            return Err(AppError::BadRequest(format!("field '{}' is read-only", key)));
        }
        out.insert(key, coerce_value(entity, col, value)?);
    }
    for col in entity.columns.iter().filter(|c| !c.generated && !c.nullable) {
        if out.get(col.name).map_or(true, Value::is_null) {
            return Err(AppError::BadRequest(format!(
                "{} requires field '{}'",
                entity.name, col.name
            )));
        }
    }
    Ok(out)
}

fn lookup<'e>(entity: &'e Entity, key: &str) -> Result<&'e ColumnInfo, AppError> {
    entity
        .column(key)
        .ok_or_else(|| AppError::BadRequest(format!("unknown field '{}' for {}", key, entity.name)))
}

fn id_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => coerce_id(s),
        _ => None,
    }
}

fn coerce_value(entity: &Entity, col: &ColumnInfo, value: Value) -> Result<Value, AppError> {
    let invalid = |expected: &str| {
        AppError::BadRequest(format!(
            "field '{}' of {} must be {}",
            col.name, entity.name, expected
        ))
    };
    match (col.kind, value) {
        (_, Value::Null) if col.nullable => Ok(Value::Null),
        (_, Value::Null) => Err(invalid("non-null")),
        (ColumnKind::Int, Value::Number(n)) => n
            .as_i64()
            .filter(|n| i32::try_from(*n).is_ok())
            .map(Value::from)
            .ok_or_else(|| invalid("a 32-bit integer")),
        (ColumnKind::Int, Value::String(s)) => s
            .trim()
            .parse::<i32>()
            .map(Value::from)
            .map_err(|_| invalid("a 32-bit integer")),
        (ColumnKind::Int, _) => Err(invalid("a 32-bit integer")),
        (ColumnKind::Text, Value::String(s)) => Ok(Value::String(s)),
        (ColumnKind::Text, _) => Err(invalid("a string")),
        (ColumnKind::Timestamp, _) => Err(invalid("generated by storage")),
    }
}
