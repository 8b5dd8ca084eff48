//! libSQL backend — async store trait implementations.
//!
//! Supports local file and in-memory databases. One backend instance
//! implements all three store traits; the binary hands out `Arc` clones of
//! itself per collaborator.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::equipment::{BasketConfig, GrinderConfig};
use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::{BasketConfigStore, GrinderConfigStore, SetupStatusStore};

/// Settings key for the completion flag row.
const SETUP_COMPLETE_KEY: &str = "setup_complete";

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&backend.conn).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&backend.conn).await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn parse_weight(column: &str, raw: &str) -> Result<Decimal, DatabaseError> {
    raw.parse().map_err(|_| {
        DatabaseError::Serialization(format!("Invalid decimal in {column}: {raw}"))
    })
}

/// Map a libsql row to a BasketConfig.
///
/// Column order: 0:id, 1:coffee_in_min, 2:coffee_in_max, 3:coffee_out_min,
/// 4:coffee_out_max, 5:is_active
fn row_to_basket(row: &libsql::Row) -> Result<BasketConfig, DatabaseError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| DatabaseError::Query(format!("basket row: {e}")))?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|_| DatabaseError::Serialization(format!("Invalid basket id: {id_str}")))?;

    let mut weights = [Decimal::ZERO; 4];
    for (i, column) in ["coffee_in_min", "coffee_in_max", "coffee_out_min", "coffee_out_max"]
        .iter()
        .enumerate()
    {
        let raw: String = row
            .get((i + 1) as i32)
            .map_err(|e| DatabaseError::Query(format!("basket row: {e}")))?;
        weights[i] = parse_weight(column, &raw)?;
    }

    let is_active: i64 = row
        .get(5)
        .map_err(|e| DatabaseError::Query(format!("basket row: {e}")))?;

    Ok(BasketConfig {
        id,
        coffee_in_min: weights[0],
        coffee_in_max: weights[1],
        coffee_out_min: weights[2],
        coffee_out_max: weights[3],
        is_active: is_active != 0,
    })
}

// ── GrinderConfigStore ──────────────────────────────────────────────

#[async_trait]
impl GrinderConfigStore for LibSqlBackend {
    async fn save(&self, config: &GrinderConfig) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT INTO grinder_config (id, scale_min, scale_max, updated_at)
                 VALUES (1, ?1, ?2, ?3)
                 ON CONFLICT (id) DO UPDATE SET scale_min = ?1, scale_max = ?2, updated_at = ?3",
                params![config.scale_min as i64, config.scale_max as i64, now],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save grinder config: {e}")))?;
        Ok(())
    }

    async fn get_or_create_default(&self) -> Result<GrinderConfig, DatabaseError> {
        if let Some(config) = self.current().await? {
            return Ok(config);
        }
        let config = GrinderConfig::default();
        GrinderConfigStore::save(self, &config).await?;
        Ok(config)
    }

    async fn current(&self) -> Result<Option<GrinderConfig>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT scale_min, scale_max FROM grinder_config WHERE id = 1",
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get grinder config: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let scale_min: i64 = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("grinder row: {e}")))?;
                let scale_max: i64 = row
                    .get(1)
                    .map_err(|e| DatabaseError::Query(format!("grinder row: {e}")))?;
                Ok(Some(GrinderConfig {
                    scale_min: scale_min as i32,
                    scale_max: scale_max as i32,
                }))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get grinder config: {e}"))),
        }
    }
}

// ── BasketConfigStore ───────────────────────────────────────────────

#[async_trait]
impl BasketConfigStore for LibSqlBackend {
    async fn save(&self, config: &BasketConfig) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();

        // Active-row exclusivity lives here, not in the value object
        if config.is_active {
            self.conn()
                .execute(
                    "UPDATE basket_configs SET is_active = 0, updated_at = ?1
                     WHERE is_active = 1 AND id != ?2",
                    params![now.clone(), config.id.to_string()],
                )
                .await
                .map_err(|e| DatabaseError::Query(format!("deactivate baskets: {e}")))?;
        }

        self.conn()
            .execute(
                "INSERT INTO basket_configs
                     (id, coffee_in_min, coffee_in_max, coffee_out_min, coffee_out_max,
                      is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                 ON CONFLICT (id) DO UPDATE SET
                     coffee_in_min = ?2, coffee_in_max = ?3,
                     coffee_out_min = ?4, coffee_out_max = ?5,
                     is_active = ?6, updated_at = ?7",
                params![
                    config.id.to_string(),
                    config.coffee_in_min.to_string(),
                    config.coffee_in_max.to_string(),
                    config.coffee_out_min.to_string(),
                    config.coffee_out_max.to_string(),
                    config.is_active as i64,
                    now,
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save basket config: {e}")))?;
        Ok(())
    }

    async fn active(&self) -> Result<Option<BasketConfig>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, coffee_in_min, coffee_in_max, coffee_out_min, coffee_out_max, is_active
                 FROM basket_configs WHERE is_active = 1 LIMIT 1",
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get active basket: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_basket(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get active basket: {e}"))),
        }
    }
}

// ── SetupStatusStore ────────────────────────────────────────────────

#[async_trait]
impl SetupStatusStore for LibSqlBackend {
    async fn mark_complete(&self) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let value = serde_json::json!({
            "completed": true,
            "completed_at": now,
        });
        let value_str = serde_json::to_string(&value)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        // DO NOTHING keeps the first completion timestamp on repeat calls
        self.conn()
            .execute(
                "INSERT INTO app_settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (key) DO NOTHING",
                params![SETUP_COMPLETE_KEY, value_str, now],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("mark setup complete: {e}")))?;
        Ok(())
    }

    async fn is_complete(&self) -> Result<bool, DatabaseError> {
        Ok(self.completion_value().await?.is_some())
    }

    async fn completed_at(&self) -> Result<Option<DateTime<Utc>>, DatabaseError> {
        let value = self.completion_value().await?;
        Ok(value
            .as_ref()
            .and_then(|v| v.get("completed_at"))
            .and_then(|v| v.as_str())
            .map(parse_datetime))
    }
}

impl LibSqlBackend {
    async fn completion_value(&self) -> Result<Option<serde_json::Value>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT value FROM app_settings WHERE key = ?1",
                params![SETUP_COMPLETE_KEY],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get setup status: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("setup status row: {e}")))?;
                let value: serde_json::Value = serde_json::from_str(&value_str)
                    .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
                match value.get("completed").and_then(|v| v.as_bool()) {
                    Some(true) => Ok(Some(value)),
                    _ => Ok(None),
                }
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get setup status: {e}"))),
        }
    }
}
