use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs4::fs_std::FileExt;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::DbInfraError;

/// Stable advisory-lock id for a textual key.
pub fn pg_lock_id(key: &str) -> i64 {
    xxh3_64(key.as_bytes()) as i64
}

enum GuardKind {
    Postgres {
        admin_pool: DatabaseConnection,
        lock_key: i64,
    },
    SqliteFile {
        file: File,
        lock_path: PathBuf,
    },
    InMemory,
}

/// A held migration lock. Must be released explicitly with [`Guard::release`].
pub struct Guard {
    kind: Option<GuardKind>,
}

impl Guard {
    pub async fn release(mut self) -> Result<(), DbInfraError> {
        match self.kind.take() {
            Some(GuardKind::Postgres {
                admin_pool,
                lock_key,
            }) => {
                let stmt = Statement::from_sql_and_values(
                    DatabaseBackend::Postgres,
                    "SELECT pg_advisory_unlock($1) AS unlocked",
                    vec![lock_key.into()],
                );
                match admin_pool.query_one(stmt).await {
                    Ok(Some(row)) => {
                        let unlocked: bool = row.try_get("", "unlocked").map_err(|e| {
                            DbInfraError::config(format!("failed to read unlock result: {e}"))
                        })?;
                        if !unlocked {
                            warn!(lock_key, "Advisory lock unlock returned false");
                        }
                    }
                    Ok(None) => warn!(lock_key, "No result from advisory lock unlock query"),
                    Err(e) => warn!(error = %e, lock_key, "Failed to unlock advisory lock"),
                }
            }
            Some(GuardKind::SqliteFile { file, lock_path }) => {
                if let Err(e) = FileExt::unlock(&file) {
                    debug!(error = %e, lock_path = %lock_path.display(), "SQLite file unlock returned error");
                }
            }
            Some(GuardKind::InMemory) | None => {}
        }
        Ok(())
    }
}

/// Non-blocking lock acquisition used by the migration backoff loop.
#[async_trait]
pub trait BootstrapLock {
    /// `Some(Guard)` when acquired, `None` when another process holds it.
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError>;
}

/// Postgres advisory lock. The admin pool must be min=max=1 so unlock runs on
/// the same session that locked.
pub struct PgAdvisoryLock {
    admin_pool: DatabaseConnection,
    lock_key: i64,
}

impl PgAdvisoryLock {
    pub fn new(admin_pool: DatabaseConnection, key: &str) -> Self {
        Self {
            admin_pool,
            lock_key: pg_lock_id(key),
        }
    }
}

#[async_trait]
impl BootstrapLock for PgAdvisoryLock {
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_try_advisory_lock($1) AS locked",
            vec![self.lock_key.into()],
        );

        let row = self
            .admin_pool
            .query_one(stmt)
            .await
            .map_err(|e| DbInfraError::config(format!("failed to acquire advisory lock: {e}")))?
            .ok_or_else(|| DbInfraError::config("pg_try_advisory_lock returned no row"))?;

        let locked: bool = row
            .try_get("", "locked")
            .map_err(|e| DbInfraError::config(format!("failed to read lock result: {e}")))?;

        if !locked {
            return Ok(None);
        }

        Ok(Some(Guard {
            kind: Some(GuardKind::Postgres {
                admin_pool: self.admin_pool.clone(),
                lock_key: self.lock_key,
            }),
        }))
    }
}

/// Exclusive OS file lock on `<db>.migrate.lock`.
pub struct SqliteFileLock {
    lock_path: PathBuf,
}

impl SqliteFileLock {
    pub fn new(lock_path: &Path) -> Self {
        Self {
            lock_path: lock_path.to_path_buf(),
        }
    }
}

#[async_trait]
impl BootstrapLock for SqliteFileLock {
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError> {
        if let Some(parent) = self.lock_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbInfraError::config(format!("failed to create lock file parent directory: {e}"))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| DbInfraError::config(format!("failed to open lock file: {e}")))?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(true) => {
                debug!(lock_path = %self.lock_path.display(), "SQLite file lock acquired");
                Ok(Some(Guard {
                    kind: Some(GuardKind::SqliteFile {
                        file,
                        lock_path: self.lock_path.clone(),
                    }),
                }))
            }
            Ok(false) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(DbInfraError::config(format!(
                "failed to acquire SQLite file lock: {e}"
            ))),
        }
    }
}

/// In-memory databases live in one process; nothing to lock.
pub struct InMemoryLock;

#[async_trait]
impl BootstrapLock for InMemoryLock {
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError> {
        Ok(Some(Guard {
            kind: Some(GuardKind::InMemory),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_ids_are_stable_per_key() {
        assert_eq!(pg_lock_id("polla:migrate"), pg_lock_id("polla:migrate"));
        assert_ne!(pg_lock_id("polla:migrate:a"), pg_lock_id("polla:migrate:b"));
    }

    #[tokio::test]
    async fn sqlite_file_lock_is_exclusive() {
        let dir = std::env::temp_dir().join(format!("polla-lock-{}", std::process::id()));
        let path = dir.join("db.migrate.lock");

        let mut first = SqliteFileLock::new(&path);
        let guard = first.try_acquire().await.unwrap().expect("first acquire");

        let mut second = SqliteFileLock::new(&path);
        assert!(second.try_acquire().await.unwrap().is_none());

        guard.release().await.unwrap();
        let again = second.try_acquire().await.unwrap().expect("re-acquire");
        again.release().await.unwrap();
        let _ = std::fs::remove_dir_all(dir);
    }
}
