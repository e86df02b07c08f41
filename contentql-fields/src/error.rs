//! Error types for the field-kind registry
//!
//! Lookups and value resolution never fail; a missing kind or a missing value
//! is an ordinary `None`. These errors cover building the registry, loading its
//! configuration, and running data migrations.

use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while configuring the registry or migrating data
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Two descriptors registered under the same kind identifier
    #[error("duplicate field kind registration: {identifier}")]
    DuplicateRegistration { identifier: String },

    /// The process-wide registry was already initialized
    #[error("field kind registry is already installed")]
    AlreadyInstalled,

    /// Configuration refers to a kind identifier that is not registered
    #[error("configuration references unknown field kind: {identifier}")]
    UnknownKindInConfig { identifier: String },

    /// Configuration sources failed to load or parse
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// An external recipe execution failed
    #[error("recipe '{recipe}' failed: {message}")]
    RecipeFailed { recipe: String, message: String },

    /// A migration step returned a version that does not advance
    #[error("migration step from version {from} did not advance")]
    MigrationStalled { from: u32 },
}

impl From<figment::Error> for FieldsError {
    fn from(error: figment::Error) -> Self {
        FieldsError::Config(Box::new(error))
    }
}
