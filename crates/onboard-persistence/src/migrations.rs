//! Wrapper para correr migraciones embebidas.
//!
//! Se espera un directorio `migrations/` en este crate con las migraciones
//! Diesel. Al construir el pool se ejecutan una vez.

use crate::error::PersistenceError;
use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<(), PersistenceError> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|e| PersistenceError::Unknown(format!("migration error: {e}")))
}
