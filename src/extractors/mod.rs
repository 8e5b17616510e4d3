//! Request extractors: coerced record ids and decoded update bodies.

pub mod body;
pub mod record_id;

pub use body::FieldSet;
pub use record_id::RecordId;
