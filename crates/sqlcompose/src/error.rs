//! Error types for sqlcompose

use thiserror::Error;

/// Result type alias for sqlcompose operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for statement construction and rendering.
///
/// None of these are environmental: every variant is a contract violation by
/// the calling code, surfaced either when the offending input is handed to a
/// builder or when a statement is rendered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QbError {
    /// A column without a name was used where an identifier is required
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// Operand of the wrong shape for its operator
    #[error("Invalid operand for {op}: {message}")]
    InvalidOperand { op: &'static str, message: String },

    /// Column bound to a table the statement does not target
    #[error("Column '{column}' does not belong to {table}")]
    ForeignColumn { column: String, table: String },

    /// INSERT/UPDATE/DELETE require a base table
    #[error("Not a base table: {0}")]
    NotBaseTable(String),

    /// Builder misuse
    #[error("Usage error: {0}")]
    Usage(String),

    /// Dialect configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl QbError {
    /// Create an invalid column error
    pub fn invalid_column(message: impl Into<String>) -> Self {
        Self::InvalidColumn(message.into())
    }

    /// Create an invalid operand error for operator `op`
    pub fn invalid_operand(op: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOperand {
            op,
            message: message.into(),
        }
    }

    /// Create a foreign column error
    pub fn foreign_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::ForeignColumn {
            column: column.into(),
            table: table.into(),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Check if this is an invalid column error
    pub fn is_invalid_column(&self) -> bool {
        matches!(self, Self::InvalidColumn(_))
    }

    /// Check if this is an invalid operand error
    pub fn is_invalid_operand(&self) -> bool {
        matches!(self, Self::InvalidOperand { .. })
    }

    /// Check if this is a foreign column error
    pub fn is_foreign_column(&self) -> bool {
        matches!(self, Self::ForeignColumn { .. })
    }

    /// Check if this is a usage error
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

impl From<toml::de::Error> for QbError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for QbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
