//! PostgreSQL backend: one pooled handle, queries from the SQL builder.

use super::Store;
use crate::error::AppError;
use crate::model::{coerce_insert, Entity, Include, Record, PK};
use crate::sql::{self, PgBindValue, QueryBuf};
use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Open the process-wide pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(PgStore { pool })
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind(q)?.fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_record).transpose().map_err(AppError::from)
    }
}

fn bind(q: &QueryBuf) -> Result<Query<'_, Postgres, PgArguments>, AppError> {
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(PgBindValue::from_json(p)?);
    }
    Ok(query)
}

#[async_trait]
impl Store for PgStore {
    async fn find_many(
        &self,
        entity: &'static Entity,
        include: Option<&'static Include>,
    ) -> Result<Vec<Record>, AppError> {
        let q = sql::select_list(entity, include);
        tracing::debug!(sql = %q.sql, "query");
        let rows = bind(&q)?.fetch_all(&self.pool).await?;
        rows.iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::from)
    }

    async fn find_unique(
        &self,
        entity: &'static Entity,
        id: i64,
        include: Option<&'static Include>,
    ) -> Result<Option<Record>, AppError> {
        self.fetch_optional(&sql::select_by_id(entity, id, include)).await
    }

    async fn update(&self, entity: &'static Entity, id: i64, fields: Record) -> Result<Record, AppError> {
        self.fetch_optional(&sql::update(entity, id, &fields))
            .await?
            .ok_or_else(|| AppError::not_found(entity.name, id))
    }

    async fn delete(&self, entity: &'static Entity, id: i64) -> Result<Record, AppError> {
        self.fetch_optional(&sql::delete(entity, id))
            .await?
            .ok_or_else(|| AppError::not_found(entity.name, id))
    }

    async fn create_many(&self, entity: &'static Entity, rows: Vec<Record>) -> Result<u64, AppError> {
        let rows = rows
            .into_iter()
            .map(|r| coerce_insert(entity, r))
            .collect::<Result<Vec<_>, _>>()?;
        let mut tx = self.pool.begin().await?;
        for row in &rows {
            let q = sql::insert(entity, row);
            tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
            bind(&q)?.execute(&mut *tx).await?;
        }
        if rows.iter().any(|r| r.contains_key(PK)) {
            sqlx::query(&sql::reset_id_sequence(entity)).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        tracing::info!(table = entity.table_name, count = rows.len(), "rows inserted");
        Ok(rows.len() as u64)
    }
}

fn row_to_record(row: &PgRow) -> Result<Record, sqlx::Error> {
    use sqlx::{Column, Row};
    let mut map = Record::new();
    for col in row.columns() {
        map.insert(col.name().to_string(), cell_to_value(row, col)?);
    }
    Ok(map)
}

fn cell_to_value(row: &PgRow, col: &sqlx::postgres::PgColumn) -> Result<Value, sqlx::Error> {
    use sqlx::{Column, Row, TypeInfo};
    let i = col.ordinal();
    let v = match col.type_info().name() {
        "INT2" => row.try_get::<Option<i16>, _>(i)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(i)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(i)?.map(Value::from),
        "BOOL" => row.try_get::<Option<bool>, _>(i)?.map(Value::from),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => row.try_get::<Option<String>, _>(i)?.map(Value::from),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(i)?
            .map(|d| Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(i)?
            .map(|d| Value::String(d.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(i)?,
        other => {
            tracing::warn!(column = col.name(), pg_type = other, "unsupported column type");
            None
        }
    };
    Ok(v.unwrap_or(Value::Null))
}
