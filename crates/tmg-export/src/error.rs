//! Error types for the export library.

use thiserror::Error;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Configuration error (unknown table, invalid project file, invariant
    /// violations between the registry and the live source schema).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A source column reported a type outside the six canonical categories
    /// and no override was registered for it.
    #[error("Unsupported column type '{type_name}' for column {table}.{column}")]
    UnsupportedType {
        table: String,
        column: String,
        type_name: String,
    },

    /// A DDL or DML statement failed against a target.
    #[error("Statement failed: {message}\n  Statement: {statement}")]
    Statement { statement: String, message: String },

    /// SQLite target error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// PostgreSQL target error
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML serialization error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl ExportError {
    /// Create a Configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ExportError::Configuration(message.into())
    }

    /// Create a Statement error with the statement text for context.
    pub fn statement(statement: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::Statement {
            statement: statement.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message() {
        let err = ExportError::UnsupportedType {
            table: "sample_g".to_string(),
            column: "gendata".to_string(),
            type_name: "general".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("general"));
        assert!(msg.contains("sample_g.gendata"));
    }

    #[test]
    fn test_statement_error_includes_sql() {
        let err = ExportError::statement("CREATE TABLE x ();", "syntax error");
        assert!(err.to_string().contains("CREATE TABLE x ();"));
        assert!(err.to_string().contains("syntax error"));
    }
}
