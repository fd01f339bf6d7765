// ==========================================
// 区域能源需求分解系统 - 结果存储
// ==========================================
// 依据: Disagg_Engine_Specs_v0.2.md - 结果缓存
// ==========================================
// 职责: 按指纹持久化与读取分解结果
// 存储: disagg_result 表（指纹主键 + JSON 负载）
// 红线: 同指纹写入整体取代旧行，不做部分更新
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::result::DisaggregationResult;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

// ==========================================
// ResultStore - 结果存储
// ==========================================
pub struct ResultStore {
    conn: Arc<Mutex<Connection>>,
}

impl ResultStore {
    /// 打开（或创建）结果库
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::ensure_table(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
            Self::ensure_table(&guard)?;
        }
        Ok(Self { conn })
    }

    fn ensure_table(conn: &Connection) -> RepositoryResult<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS disagg_result (
                fingerprint TEXT PRIMARY KEY,
                result_id   TEXT NOT NULL,
                payload     TEXT NOT NULL,
                created_at  TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// 按指纹读取结果；未命中返回 None
    pub fn get(&self, fingerprint: &str) -> RepositoryResult<Option<DisaggregationResult>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM disagg_result WHERE fingerprint = ?1",
                params![fingerprint],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(raw) => {
                let result: DisaggregationResult =
                    serde_json::from_str(&raw).map_err(|e| {
                        RepositoryError::DeserializationError {
                            fingerprint: fingerprint.to_string(),
                            message: e.to_string(),
                        }
                    })?;
                debug!(fingerprint, "结果缓存命中");
                Ok(Some(result))
            }
            None => Ok(None),
        }
    }

    /// 写入结果（同指纹整体取代）
    pub fn put(&self, result: &DisaggregationResult) -> RepositoryResult<()> {
        let payload = serde_json::to_string(result)?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO disagg_result (fingerprint, result_id, payload, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                result.fingerprint,
                result.result_id.to_string(),
                payload,
                result.created_at.to_rfc3339(),
            ],
        )?;

        info!(
            fingerprint = %result.fingerprint,
            result_id = %result.result_id,
            cells = result.cells.len(),
            "分解结果已持久化"
        );
        Ok(())
    }

    /// 按指纹删除（用于人工失效）
    pub fn invalidate(&self, fingerprint: &str) -> RepositoryResult<bool> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let affected = conn.execute(
            "DELETE FROM disagg_result WHERE fingerprint = ?1",
            params![fingerprint],
        )?;
        Ok(affected > 0)
    }

    /// 缓存行数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM disagg_result", [], |row| row.get(0))?;
        Ok(n)
    }
}
