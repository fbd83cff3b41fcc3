use std::future::Future;
use std::time::{Duration, Instant};

use migration::{migrate, MigrationCommand, Migrator, MigratorTrait};
use rand::Rng;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::config::db::{
    make_conn_spec, pool_settings, sqlite_lock_path, validate_db_config, DbKind, DbOwner,
    PoolPurpose, RuntimeEnv,
};
use crate::error::DbInfraError;
use crate::infra::db::locking::{
    BootstrapLock, Guard, InMemoryLock, PgAdvisoryLock, SqliteFileLock,
};

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| DbInfraError::config("no connection attempts were made")))
}

/// Connect a pool for the given purpose, retrying Postgres while it comes up.
pub async fn connect_pool(
    env: RuntimeEnv,
    db_kind: DbKind,
    owner: DbOwner,
    purpose: PoolPurpose,
) -> Result<DatabaseConnection, DbInfraError> {
    let url = make_conn_spec(env, db_kind, owner)?;
    let settings = pool_settings(env, db_kind, purpose);

    let mut opt = ConnectOptions::new(&url);
    opt.min_connections(settings.min_connections)
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .sqlx_logging(false);

    let pool = if db_kind == DbKind::Postgres {
        retry_connection(
            || {
                let opt = opt.clone();
                async move {
                    Database::connect(opt).await.map_err(|e| {
                        DbInfraError::config(format!("failed to connect to Postgres: {e}"))
                    })
                }
            },
            5,
            500,
        )
        .await?
    } else {
        Database::connect(opt)
            .await
            .map_err(|e| DbInfraError::config(format!("failed to connect to SQLite: {e}")))?
    };

    if db_kind != DbKind::Postgres {
        apply_sqlite_pragmas(&pool, db_kind).await?;
    }

    Ok(pool)
}

pub async fn build_admin_pool(
    env: RuntimeEnv,
    db_kind: DbKind,
) -> Result<DatabaseConnection, DbInfraError> {
    connect_pool(env, db_kind, DbOwner::Owner, PoolPurpose::Migration).await
}

/// Mask the password in a connection string.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth, host)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    match auth.rfind(':') {
        Some(colon) if auth[..colon].contains("://") => {
            format!("{}:***@{}", &auth[..colon], host)
        }
        _ => url.to_string(),
    }
}

async fn schema_is_current(conn: &DatabaseConnection) -> Result<bool, DbInfraError> {
    let expected = Migrator::migrations();
    let expected_last = expected.last().map(|m| m.name().to_string());

    match Migrator::get_applied_migrations(conn).await {
        Ok(applied) => {
            let current_last = applied.last().map(|m| m.name().to_string());
            trace!(
                applied = applied.len(),
                expected = expected.len(),
                "schema fast-path check"
            );
            Ok(applied.len() == expected.len() && current_last == expected_last)
        }
        Err(DbErr::Exec(_)) => Ok(false),
        Err(e) => Err(DbInfraError::config(format!(
            "failed to get applied migrations: {e}"
        ))),
    }
}

pub async fn orchestrate_migration(
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    validate_db_config(env, db_kind)?;
    let admin_pool = build_admin_pool(env, db_kind).await?;
    orchestrate_migration_internal(&admin_pool, env, db_kind, command).await
}

/// Run a migration command against an existing pool, serialised by the lock
/// that matches the engine.
pub async fn orchestrate_migration_internal(
    pool: &DatabaseConnection,
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    info!(?env, ?db_kind, ?command, "migrate=start");

    if matches!(command, MigrationCommand::Status) {
        migrate(pool, command)
            .await
            .map_err(|e| DbInfraError::config(format!("migration execution failed: {e}")))?;
        info!("migrate=done");
        return Ok(());
    }

    let token = CancellationToken::new();
    let result = match db_kind {
        DbKind::Postgres => {
            let url = make_conn_spec(env, db_kind, DbOwner::Owner)?;
            let key = format!("polla:migrate:{}", sanitize_db_url(&url));
            migrate_with_lock(pool, PgAdvisoryLock::new(pool.clone(), &key), env, command, token)
                .await
        }
        DbKind::SqliteFile => {
            let lock_path = sqlite_lock_path(db_kind, env)?;
            migrate_with_lock(pool, SqliteFileLock::new(&lock_path), env, command, token).await
        }
        DbKind::SqliteMemory => migrate_with_lock(pool, InMemoryLock, env, command, token).await,
    };

    info!(ok = result.is_ok(), "migrate=done");
    result
}

async fn migrate_with_lock<L: BootstrapLock>(
    pool: &DatabaseConnection,
    mut lock: L,
    env: RuntimeEnv,
    command: MigrationCommand,
    cancellation_token: CancellationToken,
) -> Result<(), DbInfraError> {
    let acquire_ms = std::env::var("POLLA_MIGRATE_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(match env {
            RuntimeEnv::Test => 3000,
            RuntimeEnv::Prod => 900,
        });

    let start = Instant::now();
    let mut attempts: u32 = 0;
    let guard: Guard = loop {
        attempts += 1;

        if matches!(command, MigrationCommand::Up) && schema_is_current(pool).await? {
            info!("migrate=skipped up_to_date=true");
            return Ok(());
        }

        if let Some(guard) = lock.try_acquire().await? {
            trace!(lock = "won", attempts, elapsed_ms = start.elapsed().as_millis());
            break guard;
        }

        let base_delay_ms = (5u64 << attempts.saturating_sub(1).min(4)).min(80);
        let delay_ms = base_delay_ms + rand::rng().random_range(0..4);

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => {
                if start.elapsed() >= Duration::from_millis(acquire_ms) {
                    return Err(DbInfraError::config(format!(
                        "migration lock acquisition timeout after {:?} ({attempts} attempts)",
                        start.elapsed()
                    )));
                }
            }
            _ = cancellation_token.cancelled() => {
                return Err(DbInfraError::config("migration cancelled during lock backoff"));
            }
        }
    };

    let outcome = run_and_verify(pool, command).await;
    if let Err(e) = guard.release().await {
        warn!(error = %e, "Failed to release migration guard");
    }
    outcome
}

async fn run_and_verify(
    pool: &DatabaseConnection,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    migrate(pool, command)
        .await
        .map_err(|e| DbInfraError::config(format!("migration execution failed: {e}")))?;

    let expected = Migrator::migrations().len();
    let applied = Migrator::get_applied_migrations(pool)
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    info!(expected, applied, "migrate=counts");

    match command {
        MigrationCommand::Reset if applied != 0 => Err(DbInfraError::config(format!(
            "reset should leave 0 migrations applied, found {applied}"
        ))),
        MigrationCommand::Up | MigrationCommand::Fresh | MigrationCommand::Refresh
            if applied != expected =>
        {
            Err(DbInfraError::config(format!(
                "expected {expected} migrations applied, found {applied}"
            )))
        }
        _ => Ok(()),
    }
}

async fn apply_sqlite_pragmas(
    pool: &DatabaseConnection,
    db_kind: DbKind,
) -> Result<(), DbInfraError> {
    let mut pragmas = vec!["PRAGMA foreign_keys = ON;", "PRAGMA busy_timeout = 5000;"];
    if db_kind == DbKind::SqliteFile {
        pragmas.push("PRAGMA journal_mode = WAL;");
        pragmas.push("PRAGMA synchronous = NORMAL;");
    }
    for pragma in pragmas {
        pool.execute(Statement::from_string(
            sea_orm::DatabaseBackend::Sqlite,
            pragma.to_string(),
        ))
        .await
        .map_err(|e| DbInfraError::config(format!("failed to apply '{pragma}': {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_masks_password() {
        assert_eq!(
            sanitize_db_url("postgresql://app:s3cret@db:5432/polla"),
            "postgresql://app:***@db:5432/polla"
        );
    }

    #[test]
    fn sanitize_leaves_sqlite_urls_alone() {
        assert_eq!(sanitize_db_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[tokio::test]
    async fn memory_migration_runs_up_and_is_idempotent() {
        let pool = connect_pool(
            RuntimeEnv::Test,
            DbKind::SqliteMemory,
            DbOwner::App,
            PoolPurpose::Runtime,
        )
        .await
        .unwrap();

        orchestrate_migration_internal(&pool, RuntimeEnv::Test, DbKind::SqliteMemory, MigrationCommand::Up)
            .await
            .unwrap();
        assert!(schema_is_current(&pool).await.unwrap());

        orchestrate_migration_internal(&pool, RuntimeEnv::Test, DbKind::SqliteMemory, MigrationCommand::Up)
            .await
            .unwrap();
    }
}
