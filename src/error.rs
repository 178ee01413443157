//! Error types for form orchestration

use thiserror::Error;

/// Errors raised while building or driving a form.
///
/// Field operations themselves never fail; these cover the layer that
/// assembles fields into a form and addresses them by id.
#[derive(Debug, Error)]
pub enum FormError {
    /// Two fields in one form share an identifier
    #[error("field '{0}' is already defined in this form")]
    DuplicateField(String),

    /// No field with this identifier exists in the form
    #[error("no field with id '{0}' in this form")]
    UnknownField(String),

    /// The form definition is not valid JSON or names an unknown field type
    #[error("invalid form definition: {0}")]
    Definition(#[from] serde_json::Error),

    /// The form definition could not be read
    #[error("failed to read form definition: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for form operations
pub type Result<T> = std::result::Result<T, FormError>;
