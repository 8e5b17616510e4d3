//! REST backend for movies, actors and the castings joining them.

pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{ServerConfig, StoreKind};
pub use error::{AppError, ConfigError};
pub use routes::app;
pub use state::AppState;
pub use store::{MemoryStore, PgStore, Store};
