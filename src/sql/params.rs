//! Convert coerced serde_json::Value fields to types that sqlx can bind.

use crate::error::AppError;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a PostgreSQL query. SQL casts on the placeholder pick the column type.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Int(i64),
    Text(String),
}

impl PgBindValue {
    pub fn from_json(v: &Value) -> Result<Self, AppError> {
        match v {
            Value::Null => Ok(PgBindValue::Null),
            Value::Number(n) => n
                .as_i64()
                .map(PgBindValue::Int)
                .ok_or_else(|| AppError::BadRequest(format!("unsupported number {}", n))),
            Value::String(s) => Ok(PgBindValue::Text(s.clone())),
            other => Err(AppError::BadRequest(format!("unsupported value {}", other))),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self {
            PgBindValue::Null => Ok(IsNull::Yes),
            PgBindValue::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        match self {
            PgBindValue::Int(_) => Some(<i64 as Type<Postgres>>::type_info()),
            PgBindValue::Null | PgBindValue::Text(_) => None,
        }
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
