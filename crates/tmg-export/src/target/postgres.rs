//! PostgreSQL target connection (tokio-postgres).
//!
//! PostgreSQL only supports positional `$n` parameters, so the generated
//! `@name` placeholders are rewritten positionally at prepare time. Values
//! are encoded against the prepared statement's declared parameter types;
//! NUMERIC columns take their whole-number values through `rust_decimal`.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, NoTls, Statement};
use tracing::{debug, error};

use crate::error::{ExportError, Result};
use crate::sqlgen::InsertStatement;
use crate::target::TargetConnection;
use crate::value::Value;

/// A PostgreSQL database target.
pub struct PostgresConnection {
    connection_string: String,
    client: Option<Client>,
    statements: HashMap<String, Statement>,
}

impl PostgresConnection {
    /// Target the database described by a tokio-postgres connection string
    /// (`host=... user=... dbname=...`).
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            client: None,
            statements: HashMap::new(),
        }
    }

    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| ExportError::config("PostgreSQL connection is not open"))
    }

    async fn prepared(&mut self, insert: &InsertStatement) -> Result<Statement> {
        if let Some(stmt) = self.statements.get(&insert.sql) {
            return Ok(stmt.clone());
        }
        let positional = rewrite_placeholders(insert);
        debug!("Preparing: {}", positional);
        let stmt = self.client()?.prepare(&positional).await?;
        self.statements.insert(insert.sql.clone(), stmt.clone());
        Ok(stmt)
    }
}

/// Rewrite `@name` placeholders to positional `$n` markers.
///
/// Longer names are replaced first so `@a` never clips `@ab`.
fn rewrite_placeholders(insert: &InsertStatement) -> String {
    let mut positions: Vec<(usize, &str)> = insert
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, p.name.as_str()))
        .collect();
    positions.sort_by_key(|(_, name)| std::cmp::Reverse(name.len()));

    let mut sql = insert.sql.clone();
    for (position, name) in positions {
        sql = sql.replace(name, &format!("${}", position));
    }
    sql
}

/// Encode one value against the statement's declared parameter type.
///
/// NULLs carry the declared type so the wire format is correct; whole-number
/// values headed for NUMERIC columns are widened to `Decimal`.
fn bind_value(ty: &Type, value: &Value, sql: &str) -> Result<Box<dyn ToSql + Send + Sync>> {
    let numeric_target = *ty == Type::NUMERIC;
    let integral_target =
        numeric_target || *ty == Type::INT2 || *ty == Type::INT4 || *ty == Type::INT8;

    let boxed: Box<dyn ToSql + Send + Sync> = match value {
        Value::Null => {
            if numeric_target {
                Box::new(Option::<Decimal>::None)
            } else if integral_target {
                Box::new(Option::<i32>::None)
            } else if *ty == Type::BOOL {
                Box::new(Option::<bool>::None)
            } else if *ty == Type::TIMESTAMP {
                Box::new(Option::<chrono::NaiveDateTime>::None)
            } else if *ty == Type::BYTEA {
                Box::new(Option::<Vec<u8>>::None)
            } else {
                Box::new(Option::<String>::None)
            }
        }
        Value::Integer(i) if numeric_target => Box::new(Decimal::from(*i)),
        Value::Integer(i) => Box::new(*i),
        Value::Boolean(b) => Box::new(*b),
        Value::Date(d) => Box::new(*d),
        Value::Binary(b) => Box::new(b.clone()),
        Value::Text(_) if integral_target => {
            return Err(ExportError::statement(
                sql,
                format!("cannot bind text value to {} parameter", ty),
            ));
        }
        Value::Text(s) => Box::new(s.clone()),
    };

    Ok(boxed)
}

#[async_trait]
impl TargetConnection for PostgresConnection {
    async fn open(&mut self) -> Result<()> {
        debug!("Connecting to PostgreSQL target");
        let (client, connection) =
            tokio_postgres::connect(&self.connection_string, NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {}", e);
            }
        });
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.statements.clear();
        self.client = None;
        Ok(())
    }

    async fn begin(&mut self) -> Result<()> {
        self.client()?.batch_execute("BEGIN").await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.client()?.batch_execute("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.client()?.batch_execute("ROLLBACK").await?;
        Ok(())
    }

    async fn execute(&mut self, sql: &str) -> Result<u64> {
        self.client()?
            .execute(sql, &[])
            .await
            .map_err(|e| ExportError::statement(sql, e.to_string()))
    }

    async fn execute_insert(&mut self, insert: &InsertStatement, row: &[Value]) -> Result<u64> {
        let stmt = self.prepared(insert).await?;

        let values = stmt
            .params()
            .iter()
            .zip(row.iter())
            .map(|(ty, value)| bind_value(ty, value, &insert.sql))
            .collect::<Result<Vec<_>>>()?;
        let params: Vec<&(dyn ToSql + Sync)> = values
            .iter()
            .map(|v| v.as_ref() as &(dyn ToSql + Sync))
            .collect();

        self.client()?
            .execute(&stmt, &params)
            .await
            .map_err(|e| ExportError::statement(insert.sql.as_str(), e.to_string()))
    }
}
