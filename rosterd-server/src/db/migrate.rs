//! SQL file migration runner
//!
//! Migrations are plain .sql files in a directory, applied in ascending
//! filename order. File naming is the ordering contract: zero-padded
//! sequence numbers or sortable timestamps. Each file runs exactly once,
//! inside its own transaction, and is recorded in `schema_migrations`
//! within that same transaction. The runner executes once at startup,
//! before the server accepts requests; it takes no cross-process lock,
//! so concurrent starts against one database are not supported.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use sqlx::PgPool;
use thiserror::Error;

/// Errors from the migration phase. All are fatal: the first failure
/// halts the run and the process should not start serving.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("migration tracking table unavailable: {source}")]
    StoreUnavailable {
        #[source]
        source: sqlx::Error,
    },

    #[error("cannot read migrations directory '{path}': {source}")]
    DirectoryUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read migration file '{name}': {source}")]
    FileUnreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("migration '{name}' failed to execute: {source}")]
    ExecutionFailed {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration '{name}' could not be recorded: {source}")]
    RecordFailed {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration '{name}' failed to commit: {source}")]
    CommitFailed {
        name: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Create the tracking table if absent. Safe to call on every run.
pub async fn ensure_tracking_store(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::raw_sql(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|source| MigrateError::StoreUnavailable { source })?;

    Ok(())
}

/// Names of migrations already recorded as applied.
pub async fn list_applied(pool: &PgPool) -> Result<HashSet<String>, MigrateError> {
    let names: Vec<(String,)> = sqlx::query_as("SELECT name FROM schema_migrations")
        .fetch_all(pool)
        .await
        .map_err(|source| MigrateError::StoreUnavailable { source })?;

    Ok(names.into_iter().map(|(name,)| name).collect())
}

/// List .sql files in `dir`, sorted lexicographically ascending.
///
/// Subdirectories and files with other extensions are silently ignored.
pub fn discover(dir: &Path) -> Result<Vec<String>, MigrateError> {
    let entries = fs::read_dir(dir).map_err(|source| MigrateError::DirectoryUnreadable {
        path: dir.display().to_string(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| MigrateError::DirectoryUnreadable {
            path: dir.display().to_string(),
            source,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if !path.extension().is_some_and(|ext| ext == "sql") {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

/// Apply every discovered migration not yet recorded, in order.
///
/// Returns the number of migrations applied. Processing stops at the
/// first failure; files committed before it stay applied.
///
/// Known consistency gap: if the commit itself fails after the file's
/// SQL executed, the database may or may not have kept the changes. The
/// file stays unrecorded either way, so the next run retries it and can
/// fail on duplicate effects.
pub async fn apply_all(pool: &PgPool, dir: &Path) -> Result<usize, MigrateError> {
    ensure_tracking_store(pool).await?;
    let applied = list_applied(pool).await?;
    let files = discover(dir)?;

    let mut run = 0usize;
    for name in files {
        if applied.contains(&name) {
            tracing::debug!(%name, "skipping already applied migration");
            continue;
        }

        let sql = fs::read_to_string(dir.join(&name)).map_err(|source| {
            MigrateError::FileUnreadable {
                name: name.clone(),
                source,
            }
        })?;

        // The transaction rolls back on drop when any step below errors.
        let mut tx = pool
            .begin()
            .await
            .map_err(|source| MigrateError::ExecutionFailed {
                name: name.clone(),
                source,
            })?;

        sqlx::raw_sql(&sql)
            .execute(&mut *tx)
            .await
            .map_err(|source| MigrateError::ExecutionFailed {
                name: name.clone(),
                source,
            })?;

        sqlx::query("INSERT INTO schema_migrations (name) VALUES ($1)")
            .bind(&name)
            .execute(&mut *tx)
            .await
            .map_err(|source| MigrateError::RecordFailed {
                name: name.clone(),
                source,
            })?;

        tx.commit()
            .await
            .map_err(|source| MigrateError::CommitFailed {
                name: name.clone(),
                source,
            })?;

        tracing::info!(%name, "applied migration");
        run += 1;
    }

    if run == 0 {
        tracing::info!("no new migrations to apply");
    } else {
        tracing::info!(count = run, "migrations applied");
    }

    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_filters_and_sorts() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("0002_indexes.sql"), "SELECT 1;").unwrap();
        fs::write(dir.path().join("0001_init.sql"), "SELECT 1;").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a migration").unwrap();
        fs::write(dir.path().join("schema.sql.bak"), "stale").unwrap();
        // A directory with a .sql suffix must still be skipped
        fs::create_dir(dir.path().join("archive.sql")).unwrap();

        let names = discover(dir.path()).expect("discover");
        assert_eq!(names, vec!["0001_init.sql", "0002_indexes.sql"]);
    }

    #[test]
    fn discover_sorts_lexicographically() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["0010_z.sql", "0002_a.sql", "0001_b.sql"] {
            fs::write(dir.path().join(name), "SELECT 1;").unwrap();
        }

        let names = discover(dir.path()).expect("discover");
        assert_eq!(names, vec!["0001_b.sql", "0002_a.sql", "0010_z.sql"]);
    }

    #[test]
    fn discover_missing_directory_errors() {
        let err = discover(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, MigrateError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn discover_empty_directory_is_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(discover(dir.path()).expect("discover").is_empty());
    }
}
