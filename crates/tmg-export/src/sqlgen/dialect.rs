//! Dialect configurations for SQL generation.
//!
//! A dialect is data, not behavior: an identifier-escaping function plus the
//! literal type names for date-time, blob, integer, and boolean columns.
//! Adding a target engine means adding a configuration value, not a code
//! path.

/// Escaping and literal-type-name choices that parameterize SQL generation
/// for one target engine.
#[derive(Debug, Clone, Copy)]
pub struct SqlDialect {
    /// Dialect identifier (e.g. "sqlite", "postgres").
    pub name: &'static str,

    escape: fn(&str) -> String,

    /// Literal type name for date/time columns.
    pub datetime_type: &'static str,

    /// Literal type name for binary blob columns.
    pub blob_type: &'static str,

    /// Literal type name for integer columns.
    pub integer_type: &'static str,

    /// Literal type name for boolean columns.
    pub boolean_type: &'static str,
}

fn escape_brackets(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

fn escape_backticks(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

fn escape_double_quotes(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

impl SqlDialect {
    /// SQLite dialect.
    pub fn sqlite() -> Self {
        Self {
            name: "sqlite",
            escape: escape_brackets,
            datetime_type: "DATETIME",
            blob_type: "BLOB",
            integer_type: "INTEGER",
            boolean_type: "BOOLEAN",
        }
    }

    /// MySQL/MariaDB dialect.
    pub fn mysql() -> Self {
        Self {
            name: "mysql",
            escape: escape_backticks,
            datetime_type: "DATETIME",
            blob_type: "BLOB",
            integer_type: "INTEGER",
            boolean_type: "BOOLEAN",
        }
    }

    /// PostgreSQL dialect.
    pub fn postgres() -> Self {
        Self {
            name: "postgres",
            escape: escape_double_quotes,
            datetime_type: "timestamp",
            blob_type: "bytea",
            integer_type: "integer",
            boolean_type: "boolean",
        }
    }

    /// SQL Server dialect.
    pub fn mssql() -> Self {
        Self {
            name: "mssql",
            escape: escape_brackets,
            datetime_type: "Datetime",
            blob_type: "Varbinary(max)",
            integer_type: "Int",
            boolean_type: "bit",
        }
    }

    /// Quote an identifier for this dialect.
    pub fn escape(&self, ident: &str) -> String {
        (self.escape)(ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_sqlite() {
        let dialect = SqlDialect::sqlite();
        assert_eq!(dialect.escape("People"), "[People]");
        assert_eq!(dialect.escape("a]b"), "[a]]b]");
    }

    #[test]
    fn test_escape_mysql() {
        let dialect = SqlDialect::mysql();
        assert_eq!(dialect.escape("People"), "`People`");
        assert_eq!(dialect.escape("a`b"), "`a``b`");
    }

    #[test]
    fn test_escape_postgres() {
        let dialect = SqlDialect::postgres();
        assert_eq!(dialect.escape("People"), "\"People\"");
        assert_eq!(dialect.escape("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_escape_mssql() {
        let dialect = SqlDialect::mssql();
        assert_eq!(dialect.escape("People"), "[People]");
    }

    #[test]
    fn test_dialect_type_names() {
        assert_eq!(SqlDialect::postgres().blob_type, "bytea");
        assert_eq!(SqlDialect::mssql().blob_type, "Varbinary(max)");
        assert_eq!(SqlDialect::sqlite().integer_type, "INTEGER");
        assert_eq!(SqlDialect::mssql().boolean_type, "bit");
    }
}
