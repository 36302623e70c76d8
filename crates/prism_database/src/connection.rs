//! Database connection utilities.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use prism_error::{DatabaseError, DatabaseErrorKind};
use tracing::{debug, info, instrument};

/// Pooled PostgreSQL connections.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Read a database URL from the named environment variable.
///
/// # Errors
///
/// Returns a connection error if the variable is not set.
pub fn database_url_from_env(var: &str) -> DatabaseResult<String> {
    std::env::var(var).map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(format!(
            "{} environment variable not set",
            var
        )))
    })
}

/// Establish a single connection to the PostgreSQL database.
///
/// # Errors
///
/// Returns an error if the connection fails.
#[instrument(skip(database_url))]
pub fn establish_connection(database_url: &str) -> DatabaseResult<PgConnection> {
    PgConnection::establish(database_url)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Create a connection pool and check out one connection to verify it.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or no connection can be
/// obtained.
#[instrument(skip(database_url))]
pub fn create_pool(database_url: &str, pool_size: u32) -> DatabaseResult<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(pool_size.max(1))
        .build(manager)
        .map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Pool(format!(
                "Failed to create connection pool: {}",
                e
            )))
        })?;

    // Warm up the pool
    {
        let _conn = pool.get()?;
    }

    debug!(pool_size, "Created database pool");
    Ok(pool)
}

/// Run pending migrations.
///
/// # Errors
///
/// Returns a migration error if any migration fails.
#[instrument(skip(conn))]
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
    info!(count = applied.len(), "Applied database migrations");
    Ok(())
}
