//! In-process backend with the same semantics as PostgreSQL: generated ids and
//! timestamps, foreign keys, unique constraints, cascading deletes.

use super::Store;
use crate::error::AppError;
use crate::model::{coerce_insert, ColumnKind, Entity, Include, Record, ENTITIES, PK, UPDATED_AT};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone, Default)]
struct Table {
    rows: BTreeMap<i64, Record>,
    /// Last id handed out or inserted explicitly.
    last_id: i64,
}

type Tables = HashMap<&'static str, Table>;

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn int_field(row: &Record, column: &str) -> Option<i64> {
    row.get(column).and_then(Value::as_i64)
}

fn rows_of<'t>(tables: &'t Tables, entity: &Entity) -> impl Iterator<Item = &'t Record> + 't {
    tables
        .get(entity.table_name)
        .into_iter()
        .flat_map(|t| t.rows.values())
}

fn with_include(tables: &Tables, mut row: Record, include: Option<&Include>) -> Record {
    let Some(include) = include else { return row };
    let Some(id) = int_field(&row, PK) else { return row };
    let embedded: Vec<Value> = match include {
        Include::Rows { junction, fk, .. } => rows_of(tables, junction)
            .filter(|r| int_field(r, fk) == Some(id))
            .map(|r| Value::Object(r.clone()))
            .collect(),
        Include::Through {
            junction,
            fk,
            far_fk,
            far,
            far_name,
            ..
        } => {
            let far_rows = tables.get(far.table_name);
            rows_of(tables, junction)
                .filter(|r| int_field(r, fk) == Some(id))
                .filter_map(|r| {
                    let far_row = far_rows?.rows.get(&int_field(r, far_fk)?)?;
                    let mut obj = Record::new();
                    obj.insert(far_name.to_string(), Value::Object(far_row.clone()));
                    Some(Value::Object(obj))
                })
                .collect()
        }
    };
    row.insert(include.name().to_string(), Value::Array(embedded));
    row
}

/// Check one coerced row against `tables` and add it. Callers stage on a copy for atomicity.
fn insert_row(tables: &mut Tables, entity: &'static Entity, mut row: Record) -> Result<(), AppError> {
    for fk in entity.foreign_keys {
        let Some(target) = int_field(&row, fk.column) else { continue };
        let exists = tables
            .get(fk.references)
            .is_some_and(|t| t.rows.contains_key(&target));
        if !exists {
            return Err(AppError::Conflict(format!(
                "{} {} references missing {} row {}",
                entity.name, fk.column, fk.references, target
            )));
        }
    }
    let table = tables.entry(entity.table_name).or_default();
    for cols in entity.unique {
        let clash = table
            .rows
            .values()
            .any(|existing| cols.iter().all(|c| existing.get(*c) == row.get(*c)));
        if clash {
            return Err(AppError::Conflict(format!(
                "{} with the same ({}) already exists",
                entity.name,
                cols.join(", ")
            )));
        }
    }
    let id = match int_field(&row, PK) {
        Some(id) => id,
        None => table.last_id + 1,
    };
    if table.rows.contains_key(&id) {
        return Err(AppError::Conflict(format!("{} {} already exists", entity.name, id)));
    }
    table.last_id = table.last_id.max(id);
    row.insert(PK.to_string(), Value::from(id));
    for col in entity.columns {
        if row.contains_key(col.name) {
            continue;
        }
        let value = if col.kind == ColumnKind::Timestamp { now() } else { Value::Null };
        row.insert(col.name.to_string(), value);
    }
    table.rows.insert(id, row);
    Ok(())
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_many(
        &self,
        entity: &'static Entity,
        include: Option<&'static Include>,
    ) -> Result<Vec<Record>, AppError> {
        let tables = self.read()?;
        Ok(rows_of(&tables, entity)
            .map(|r| with_include(&tables, r.clone(), include))
            .collect())
    }

    async fn find_unique(
        &self,
        entity: &'static Entity,
        id: i64,
        include: Option<&'static Include>,
    ) -> Result<Option<Record>, AppError> {
        let tables = self.read()?;
        let row = tables.get(entity.table_name).and_then(|t| t.rows.get(&id)).cloned();
        Ok(row.map(|r| with_include(&tables, r, include)))
    }

    async fn update(&self, entity: &'static Entity, id: i64, fields: Record) -> Result<Record, AppError> {
        let mut tables = self.write()?;
        let row = tables
            .get_mut(entity.table_name)
            .and_then(|t| t.rows.get_mut(&id))
            .ok_or_else(|| AppError::not_found(entity.name, id))?;
        for (k, v) in fields {
            if entity.column(&k).is_some_and(|c| !c.generated) {
                row.insert(k, v);
            }
        }
        if entity.has_column(UPDATED_AT) {
            row.insert(UPDATED_AT.to_string(), now());
        }
        Ok(row.clone())
    }

    async fn delete(&self, entity: &'static Entity, id: i64) -> Result<Record, AppError> {
        let mut tables = self.write()?;
        let removed = tables
            .get_mut(entity.table_name)
            .and_then(|t| t.rows.remove(&id))
            .ok_or_else(|| AppError::not_found(entity.name, id))?;
        for child in ENTITIES {
            for fk in child.foreign_keys_to(entity.table_name) {
                if let Some(t) = tables.get_mut(child.table_name) {
                    t.rows.retain(|_, r| int_field(r, fk.column) != Some(id));
                }
            }
        }
        Ok(removed)
    }

    async fn create_many(&self, entity: &'static Entity, rows: Vec<Record>) -> Result<u64, AppError> {
        let rows = rows
            .into_iter()
            .map(|r| coerce_insert(entity, r))
            .collect::<Result<Vec<_>, _>>()?;
        let count = rows.len() as u64;
        let mut tables = self.write()?;
        let mut staged = tables.clone();
        for row in rows {
            insert_row(&mut staged, entity, row)?;
        }
        *tables = staged;
        Ok(count)
    }
}
