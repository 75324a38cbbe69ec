//! Implementaciones Postgres (Diesel) de los puertos durables del core.
//!
//! Objetivo:
//! - `PgActionLog`: log de acciones append-only con orden total por `seq`
//!   (BIGSERIAL), sin updates ni deletes; lectura por `user_flow_id`
//!   ordenada por `seq`, con paridad 1:1 respecto al backend en memoria.
//! - `PgSnapshotStore`: un snapshot por (user_flow, paso, tipo); upsert
//!   transaccional (la tarea acumula intentos, el quiz reemplaza el árbol).
//! - Manejo básico de errores transitorios: reintento con backoff pequeño
//!   en escrituras y lecturas.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use serde_json::Value;
use uuid::Uuid;

use log::{debug, warn};
use onboard_core::snapshot::{ArticleSnapshot, QuizSnapshot, SnapshotError, SnapshotStore, TaskSnapshot};
use onboard_core::{ActionLog, ActionLogError, FlowAction, FlowActionKind};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::{flow_action_log, progress_snapshots};

/// Alias de tipo para el pool r2d2 de conexiones Postgres. Al construirlo
/// se corre automáticamente el set de migraciones pendientes (una sola
/// vez).
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones: permite inyectar un pool real o
/// simular en tests sin acoplar a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un
/// `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Fila para insertar en `flow_action_log`. Se inserta dentro de una
/// transacción Diesel, devolviendo `seq` y `ts` vía `RETURNING`.
#[derive(Insertable, Debug)]
#[diesel(table_name = flow_action_log)]
pub struct NewActionRow<'a> {
    pub user_flow_id: &'a Uuid,
    pub action_type: &'a str,
    pub performed_by: &'a Uuid,
    pub reason: Option<&'a str>,
    pub metadata: &'a Value,
}

/// Fila mapeada de `flow_action_log` para lecturas.
#[derive(Queryable, Debug)]
pub struct ActionRow {
    pub seq: i64,
    pub user_flow_id: Uuid,
    pub ts: DateTime<Utc>,
    pub action_type: String,
    pub performed_by: Uuid,
    pub reason: Option<String>,
    pub metadata: Value,
}

/// Fila para upsert en `progress_snapshots`.
#[derive(Insertable, Debug)]
#[diesel(table_name = progress_snapshots)]
pub struct NewSnapshotRow<'a> {
    pub user_flow_id: &'a Uuid,
    pub flow_step_id: &'a Uuid,
    pub kind: &'a str,
    pub payload: &'a Value,
    pub content_hash: &'a str,
}

/// Determina si un error es transitorio (recomendado reintentar con
/// backoff): conflictos de serialización, IO transitorio del pool y
/// mensajes comunes de desconexión detectados por texto (best-effort).
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("could not serialize access due to concurrent update")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Retry simple con backoff muy pequeño (hasta 3 intentos). No altera
/// semántica de negocio; sólo repite la unidad de trabajo provista por `f`.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Deserializa el `action_type` en minúsculas de vuelta al enum (misma
/// forma serde que se usó al escribir).
fn parse_action_type(raw: &str) -> Option<FlowActionKind> {
    serde_json::from_value(Value::String(raw.to_string())).ok()
}

fn row_to_action(row: ActionRow) -> Option<FlowAction> {
    let kind = match parse_action_type(&row.action_type) {
        Some(kind) => kind,
        None => {
            warn!("unknown action_type '{}' at seq {}", row.action_type, row.seq);
            return None;
        }
    };
    Some(FlowAction { seq: row.seq as u64,
                      user_flow_id: row.user_flow_id,
                      kind,
                      performed_by: row.performed_by,
                      reason: row.reason,
                      metadata: row.metadata,
                      ts: row.ts })
}

/// Implementación Postgres de `ActionLog` (append-only).
pub struct PgActionLog<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgActionLog<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> ActionLog for PgActionLog<P> {
    fn append(&self,
              user_flow_id: Uuid,
              kind: FlowActionKind,
              performed_by: Uuid,
              reason: Option<String>,
              metadata: Value)
              -> Result<FlowAction, ActionLogError> {
        debug!("append:start user_flow={user_flow_id} kind={}", kind.as_str());
        let inserted: (i64, DateTime<Utc>) =
            with_retry(|| {
                let mut conn = self.provider.connection()?;
                conn.build_transaction()
                    .read_write()
                    .run(|tx_conn| {
                        diesel::insert_into(flow_action_log::table)
                            .values(NewActionRow { user_flow_id: &user_flow_id,
                                                   action_type: kind.as_str(),
                                                   performed_by: &performed_by,
                                                   reason: reason.as_deref(),
                                                   metadata: &metadata })
                            .returning((flow_action_log::seq, flow_action_log::ts))
                            .get_result(tx_conn)
                    })
                    .map_err(PersistenceError::from)
            }).map_err(|e| ActionLogError(format!("append failed: {e}")))?;

        Ok(FlowAction { seq: inserted.0 as u64,
                        user_flow_id,
                        kind,
                        performed_by,
                        reason,
                        metadata,
                        ts: inserted.1 })
    }

    fn list(&self, user_flow_id: Uuid) -> Vec<FlowAction> {
        let rows: Vec<ActionRow> = with_retry(|| {
                                       let mut conn = self.provider.connection()?;
                                       flow_action_log::table.filter(flow_action_log::user_flow_id.eq(user_flow_id))
                                                             .order(flow_action_log::seq.asc())
                                                             .load(&mut conn)
                                                             .map_err(PersistenceError::from)
                                   }).unwrap_or_else(|e| {
                                         warn!("list:load error user_flow={user_flow_id} err={:?}", e);
                                         vec![]
                                     });
        rows.into_iter().filter_map(row_to_action).collect()
    }
}

/// Implementación Postgres de `SnapshotStore`: fila JSONB por
/// (user_flow, paso, tipo), reemplazada en cada upsert.
pub struct PgSnapshotStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgSnapshotStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn upsert(&self, user_flow_id: Uuid, step_id: Uuid, kind: &str, payload: Value, content_hash: &str)
              -> Result<(), SnapshotError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            conn.build_transaction()
                .read_write()
                .run(|tx_conn| {
                    diesel::insert_into(progress_snapshots::table)
                        .values(NewSnapshotRow { user_flow_id: &user_flow_id,
                                                 flow_step_id: &step_id,
                                                 kind,
                                                 payload: &payload,
                                                 content_hash })
                        .on_conflict((progress_snapshots::user_flow_id,
                                      progress_snapshots::flow_step_id,
                                      progress_snapshots::kind))
                        .do_update()
                        .set((progress_snapshots::payload.eq(&payload),
                              progress_snapshots::content_hash.eq(content_hash),
                              progress_snapshots::updated_at.eq(diesel::dsl::now)))
                        .execute(tx_conn)
                        .map(|_| ())
                })
                .map_err(PersistenceError::from)
        }).map_err(|e| SnapshotError(format!("snapshot upsert failed: {e}")))
    }

    fn fetch(&self, user_flow_id: Uuid, step_id: Uuid, kind: &str) -> Result<Option<Value>, SnapshotError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            progress_snapshots::table.filter(progress_snapshots::user_flow_id.eq(user_flow_id))
                                     .filter(progress_snapshots::flow_step_id.eq(step_id))
                                     .filter(progress_snapshots::kind.eq(kind))
                                     .select(progress_snapshots::payload)
                                     .first::<Value>(&mut conn)
                                     .optional()
                                     .map_err(PersistenceError::from)
        }).map_err(|e| SnapshotError(format!("snapshot read failed: {e}")))
    }
}

impl<P: ConnectionProvider> SnapshotStore for PgSnapshotStore<P> {
    fn put_article(&self, user_flow_id: Uuid, step_id: Uuid, snapshot: ArticleSnapshot) -> Result<(), SnapshotError> {
        let hash = snapshot.content_hash.clone();
        let payload = serde_json::to_value(snapshot).map_err(|e| SnapshotError(format!("serialize: {e}")))?;
        self.upsert(user_flow_id, step_id, "article", payload, &hash)
    }

    fn get_article(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<Option<ArticleSnapshot>, SnapshotError> {
        match self.fetch(user_flow_id, step_id, "article")? {
            Some(value) => serde_json::from_value(value).map(Some)
                                                        .map_err(|e| SnapshotError(format!("deserialize: {e}"))),
            None => Ok(None),
        }
    }

    fn put_task(&self, user_flow_id: Uuid, step_id: Uuid, snapshot: TaskSnapshot) -> Result<(), SnapshotError> {
        let hash = snapshot.content_hash.clone();
        let payload = serde_json::to_value(snapshot).map_err(|e| SnapshotError(format!("serialize: {e}")))?;
        self.upsert(user_flow_id, step_id, "task", payload, &hash)
    }

    fn get_task(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<Option<TaskSnapshot>, SnapshotError> {
        match self.fetch(user_flow_id, step_id, "task")? {
            Some(value) => serde_json::from_value(value).map(Some)
                                                        .map_err(|e| SnapshotError(format!("deserialize: {e}"))),
            None => Ok(None),
        }
    }

    fn put_quiz(&self, user_flow_id: Uuid, step_id: Uuid, snapshot: QuizSnapshot) -> Result<(), SnapshotError> {
        let hash = snapshot.content_hash.clone();
        let payload = serde_json::to_value(snapshot).map_err(|e| SnapshotError(format!("serialize: {e}")))?;
        self.upsert(user_flow_id, step_id, "quiz", payload, &hash)
    }

    fn get_quiz(&self, user_flow_id: Uuid, step_id: Uuid) -> Result<Option<QuizSnapshot>, SnapshotError> {
        match self.fetch(user_flow_id, step_id, "quiz")? {
            Some(value) => serde_json::from_value(value).map(Some)
                                                        .map_err(|e| SnapshotError(format!("deserialize: {e}"))),
            None => Ok(None),
        }
    }
}

/// Construye un pool Postgres r2d2 a partir de URL y corre las migraciones
/// pendientes en el primer checkout.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = if min_size == 0 { 1 } else { min_size };
    let validated_max = if max_size == 0 { 1 } else { max_size };
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee configuración y construye un
/// pool ya migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env();
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
