//! PostgreSQL stage log persistence for Prism.
//!
//! Every model call made by the pipeline can be recorded as one row of the
//! `story_logs` table. Migrations are embedded and applied with
//! [`run_migrations`].
//!
//! # Example
//!
//! ```rust,ignore
//! use prism_database::{create_pool, run_migrations, PostgresLogSink};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("postgres://localhost/prism", 4)?;
//! run_migrations(&mut pool.get()?)?;
//! let sink = PostgresLogSink::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod log_sink;
mod models;

/// Diesel table definitions.
#[allow(missing_docs)]
pub mod schema;

pub use connection::{
    PgPool, create_pool, database_url_from_env, establish_connection, run_migrations,
};
pub use log_sink::PostgresLogSink;
pub use models::{NewStoryLogRow, StoryLogRow};

use prism_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
