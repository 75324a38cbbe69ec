//! onboard-persistence
//!
//! Implementaciones Postgres (Diesel) de los puertos durables del core: el
//! log de acciones (`ActionLog`) y el store de snapshots (`SnapshotStore`),
//! más utilidades de conexión y migraciones. El aggregate de progreso vivo
//! queda en el store en memoria del core; lo que debe sobrevivir de forma
//! durable es el rastro de auditoría y los snapshots.
//!
//! Módulos:
//! - `pg`: implementaciones sobre Postgres (append-only flow_action_log y
//!   upsert de progress_snapshots).
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::init_dotenv;
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, ConnectionProvider, PgActionLog, PgPool, PgSnapshotStore,
             PoolProvider};
