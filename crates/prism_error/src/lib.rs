//! Error types for the Prism story pipeline.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use prism_error::{PrismResult, ConfigError};
//!
//! fn load_settings() -> PrismResult<String> {
//!     Err(ConfigError::new("Missing [model] section"))?
//! }
//!
//! match load_settings() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod builder;
mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod json;
mod models;
mod pipeline;
mod storage;

pub use backend::BackendError;
pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{PrismError, PrismErrorKind, PrismResult};
pub use json::JsonError;
pub use models::{ModelsError, ModelsErrorKind, ModelsResult, RetryableError};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use storage::{StorageError, StorageErrorKind};
