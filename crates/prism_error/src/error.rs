//! Top-level error wrapper types.

#[cfg(feature = "database")]
use crate::DatabaseError;
use crate::{
    BackendError, BuilderError, ConfigError, JsonError, ModelsError, PipelineError, StorageError,
};

/// All error kinds produced across the Prism crates.
///
/// # Examples
///
/// ```
/// use prism_error::{PrismError, JsonError};
///
/// let json_err = JsonError::new("Unexpected token");
/// let err: PrismError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PrismErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Generic backend error
    #[from(BackendError)]
    Backend(BackendError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Model provider error
    #[from(ModelsError)]
    Models(ModelsError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Artifact storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Prism error with kind discrimination.
///
/// # Examples
///
/// ```
/// use prism_error::{PrismResult, ConfigError};
///
/// fn might_fail() -> PrismResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Prism Error: {}", _0)]
pub struct PrismError(Box<PrismErrorKind>);

impl PrismError {
    /// Create a new error from a kind.
    pub fn new(kind: PrismErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PrismErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to PrismErrorKind
impl<T> From<T> for PrismError
where
    T: Into<PrismErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Prism operations.
pub type PrismResult<T> = std::result::Result<T, PrismError>;
