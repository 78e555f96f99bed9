//! SQLite target connection (rusqlite).
//!
//! SQLite accepts `@name` parameters natively, so generated inserts bind by
//! name without any rewriting.

use std::path::PathBuf;

use async_trait::async_trait;
use rusqlite::types::{Null, ToSql};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::sqlgen::InsertStatement;
use crate::target::TargetConnection;
use crate::value::Value;

/// A SQLite database target.
pub struct SqliteConnection {
    path: Option<PathBuf>,
    conn: Option<rusqlite::Connection>,
}

impl SqliteConnection {
    /// Target a database file. The file is created on open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            conn: None,
        }
    }

    /// Target an in-memory database.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            conn: None,
        }
    }

    fn conn(&self) -> Result<&rusqlite::Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| ExportError::config("SQLite connection is not open"))
    }
}

fn bind_value(value: &Value) -> Box<dyn ToSql> {
    match value {
        Value::Null => Box::new(Null),
        Value::Text(s) => Box::new(s.clone()),
        Value::Integer(i) => Box::new(*i),
        Value::Boolean(b) => Box::new(*b),
        Value::Date(d) => Box::new(*d),
        Value::Binary(b) => Box::new(b.clone()),
    }
}

#[async_trait]
impl TargetConnection for SqliteConnection {
    async fn open(&mut self) -> Result<()> {
        let conn = match &self.path {
            Some(path) => {
                debug!("Opening SQLite database {}", path.display());
                rusqlite::Connection::open(path)?
            }
            None => rusqlite::Connection::open_in_memory()?,
        };
        self.conn = Some(conn);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| ExportError::Sqlite(e))?;
        }
        Ok(())
    }

    async fn begin(&mut self) -> Result<()> {
        self.conn()?.execute_batch("BEGIN")?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.conn()?.execute_batch("COMMIT")?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.conn()?.execute_batch("ROLLBACK")?;
        Ok(())
    }

    async fn execute(&mut self, sql: &str) -> Result<u64> {
        let affected = self
            .conn()?
            .execute(sql, [])
            .map_err(|e| ExportError::statement(sql, e.to_string()))?;
        Ok(affected as u64)
    }

    async fn execute_insert(&mut self, insert: &InsertStatement, row: &[Value]) -> Result<u64> {
        let values: Vec<Box<dyn ToSql>> = row.iter().map(bind_value).collect();
        let params: Vec<(&str, &dyn ToSql)> = insert
            .params
            .iter()
            .zip(values.iter())
            .map(|(binding, value)| (binding.name.as_str(), value.as_ref()))
            .collect();

        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&insert.sql)?;
        let affected = stmt
            .execute(&params[..])
            .map_err(|e| ExportError::statement(insert.sql.as_str(), e.to_string()))?;
        Ok(affected as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, SemanticType, TableDescription};
    use crate::sqlgen::{SqlDialect, SqlGenerator};

    fn sample_table() -> TableDescription {
        TableDescription::new("g", "Events")
            .add_column(Column {
                name: "recno".to_string(),
                ordinal_position: 1,
                semantic_type: SemanticType::Numeric,
                max_length: None,
                precision: Some(10),
                scale: Some(0),
                is_primary_key: true,
            })
            .add_column(Column {
                name: "etype".to_string(),
                ordinal_position: 2,
                semantic_type: SemanticType::Text,
                max_length: Some(30),
                precision: None,
                scale: None,
                is_primary_key: false,
            })
    }

    #[tokio::test]
    async fn test_insert_binds_named_parameters() {
        let table = sample_table();
        let generator = SqlGenerator::new(SqlDialect::sqlite());

        let mut conn = SqliteConnection::in_memory();
        conn.open().await.unwrap();
        conn.execute(&generator.build_create_table(&table).unwrap())
            .await
            .unwrap();

        let insert = generator.build_insert(&table);
        let affected = conn
            .execute_insert(&insert, &[Value::Integer(7), Value::Text("birth".into())])
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let count: i64 = conn
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM Events WHERE recno = 7", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_rows() {
        let table = sample_table();
        let generator = SqlGenerator::new(SqlDialect::sqlite());

        let mut conn = SqliteConnection::in_memory();
        conn.open().await.unwrap();
        conn.execute(&generator.build_create_table(&table).unwrap())
            .await
            .unwrap();

        let insert = generator.build_insert(&table);
        conn.begin().await.unwrap();
        conn.execute_insert(&insert, &[Value::Integer(1), Value::Null])
            .await
            .unwrap();
        conn.rollback().await.unwrap();

        let count: i64 = conn
            .conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM Events", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_execute_failure_carries_statement() {
        let mut conn = SqliteConnection::in_memory();
        conn.open().await.unwrap();
        let err = conn.execute("CREATE TABLE (").await.unwrap_err();
        assert!(matches!(err, ExportError::Statement { .. }));
        assert!(err.to_string().contains("CREATE TABLE ("));
    }
}
