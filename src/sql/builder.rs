//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from static entity definitions.

use crate::model::{Entity, Include, Record, PK, UPDATED_AT};
use serde_json::Value;

/// Alias of the entity's own table in reads.
const MAIN_ALIAS: &str = "main";

/// Quote identifier for PostgreSQL (safe: only from entity definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn column_list(entity: &Entity, alias: Option<&str>) -> String {
    entity
        .columns
        .iter()
        .map(|c| match alias {
            Some(a) => format!("{}.{}", a, quoted(c.name)),
            None => quoted(c.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Scalar subquery aggregating the include into a JSON array (empty array when no rows).
fn include_subquery(include: &Include) -> String {
    match include {
        Include::Rows { junction, fk, .. } => format!(
            "(SELECT COALESCE(json_agg(row_to_json(sub) ORDER BY sub.{pk}), '[]'::json) FROM (SELECT {cols} FROM {table} WHERE {fk} = {main}.{pk}) sub)",
            pk = quoted(PK),
            cols = column_list(junction, None),
            table = quoted(junction.table_name),
            fk = quoted(fk),
            main = MAIN_ALIAS,
        ),
        Include::Through {
            junction,
            fk,
            far_fk,
            far,
            far_name,
            ..
        } => format!(
            "(SELECT COALESCE(json_agg(json_build_object('{far_name}', row_to_json(far)) ORDER BY j.{pk}), '[]'::json) FROM {junction} j JOIN (SELECT {cols} FROM {far_table}) far ON far.{pk} = j.{far_fk} WHERE j.{fk} = {main}.{pk})",
            far_name = far_name.replace('\'', "''"),
            pk = quoted(PK),
            junction = quoted(junction.table_name),
            cols = column_list(far, None),
            far_table = quoted(far.table_name),
            far_fk = quoted(far_fk),
            fk = quoted(fk),
            main = MAIN_ALIAS,
        ),
    }
}

fn select_from(entity: &Entity, include: Option<&Include>) -> String {
    let mut parts = vec![column_list(entity, Some(MAIN_ALIAS))];
    if let Some(inc) = include {
        parts.push(format!("{} AS {}", include_subquery(inc), quoted(inc.name())));
    }
    format!(
        "SELECT {} FROM {} {}",
        parts.join(", "),
        quoted(entity.table_name),
        MAIN_ALIAS
    )
}

/// All rows ordered by id, with the include as an extra JSON column.
pub fn select_list(entity: &Entity, include: Option<&Include>) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "{} ORDER BY {}.{}",
        select_from(entity, include),
        MAIN_ALIAS,
        quoted(PK)
    );
    q
}

/// One row by id ($1).
pub fn select_by_id(entity: &Entity, id: i64, include: Option<&Include>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "{} WHERE {}.{} = ${}",
        select_from(entity, include),
        MAIN_ALIAS,
        quoted(PK),
        n
    );
    q
}

/// UPDATE by id: SET each field (cast to its column type) and refresh `updated_at`.
/// With nothing to set, degrades to a SELECT of the row.
pub fn update(entity: &Entity, id: i64, fields: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(entity.table_name);
    let mut sets = Vec::new();
    for (k, v) in fields {
        let Some(c) = entity.column(k) else { continue };
        if c.generated {
            continue;
        }
        let n = q.push_param(v.clone());
        sets.push(format!("{} = ${}::{}", quoted(k), n, c.kind.pg_type()));
    }
    if entity.has_column(UPDATED_AT) {
        sets.push(format!("{} = NOW()", quoted(UPDATED_AT)));
    }
    let id_param = q.push_param(Value::from(id));
    let returning = column_list(entity, None);
    q.sql = if sets.is_empty() {
        format!("SELECT {} FROM {} WHERE {} = ${}", returning, table, quoted(PK), id_param)
    } else {
        format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
            table,
            sets.join(", "),
            quoted(PK),
            id_param,
            returning
        )
    };
    q
}

/// DELETE by id ($1), returning the removed row.
pub fn delete(entity: &Entity, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        quoted(entity.table_name),
        quoted(PK),
        n,
        column_list(entity, None)
    );
    q
}

/// INSERT one row. Columns absent from `row` fall back to their DB default.
pub fn insert(entity: &Entity, row: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in entity.columns {
        let Some(v) = row.get(c.name) else { continue };
        let n = q.push_param(v.clone());
        cols.push(quoted(c.name));
        placeholders.push(format!("${}::{}", n, c.kind.pg_type()));
    }
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", quoted(entity.table_name))
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quoted(entity.table_name),
            cols.join(", "),
            placeholders.join(", ")
        )
    };
    q
}

/// Move the id sequence past the largest stored id (after inserts with explicit ids).
pub fn reset_id_sequence(entity: &Entity) -> String {
    format!(
        "SELECT setval(pg_get_serial_sequence('{table}', '{pk}'), COALESCE((SELECT MAX({qpk}) FROM {qtable}), 0) + 1, false)",
        table = entity.table_name,
        pk = PK,
        qpk = quoted(PK),
        qtable = quoted(entity.table_name),
    )
}
