//! Relational targets: the transactional writer and the connection seam.
//!
//! [`DatabaseTarget`] owns one connection and one generator and applies the
//! generated DDL/DML under transaction discipline. The connection itself is
//! behind [`TargetConnection`], so any engine with a dialect configuration
//! can be a target.

mod postgres;
mod sqlite;

pub use postgres::PostgresConnection;
pub use sqlite::SqliteConnection;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::schema::TableDescription;
use crate::sqlgen::{InsertStatement, SqlDialect, SqlGenerator};
use crate::value::{Rowset, Value};

/// A live connection to one relational target.
#[async_trait]
pub trait TargetConnection: Send {
    /// Open the connection.
    async fn open(&mut self) -> Result<()>;

    /// Close the connection.
    async fn close(&mut self) -> Result<()>;

    /// Begin a transaction.
    async fn begin(&mut self) -> Result<()>;

    /// Commit the current transaction.
    async fn commit(&mut self) -> Result<()>;

    /// Roll back the current transaction.
    async fn rollback(&mut self) -> Result<()>;

    /// Execute one DDL/DML statement, returning the affected row count.
    async fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Execute a parameterized insert with values bound positionally to the
    /// statement's bindings. Returns the affected row count.
    async fn execute_insert(&mut self, insert: &InsertStatement, row: &[Value]) -> Result<u64>;
}

/// One relational output: a connection plus the SQL generator for its
/// dialect.
pub struct DatabaseTarget {
    conn: Box<dyn TargetConnection>,
    generator: SqlGenerator,
}

impl DatabaseTarget {
    /// Create a target over the given connection and dialect.
    pub fn new(conn: impl TargetConnection + 'static, dialect: SqlDialect) -> Self {
        Self {
            conn: Box::new(conn),
            generator: SqlGenerator::new(dialect),
        }
    }

    /// The dialect name of this target.
    pub fn dialect_name(&self) -> &'static str {
        self.generator.dialect().name
    }

    /// Open the underlying connection.
    pub async fn open(&mut self) -> Result<()> {
        self.conn.open().await
    }

    /// Close the underlying connection.
    pub async fn close(&mut self) -> Result<()> {
        self.conn.close().await
    }

    /// Create every table and all of its indexes, in the given order, inside
    /// a single transaction. Any statement failure aborts the whole schema:
    /// no partial schema is ever committed.
    pub async fn create_schema(&mut self, tables: &[TableDescription]) -> Result<()> {
        debug!("Creating schema on {} target", self.dialect_name());
        self.conn.begin().await?;
        match self.create_schema_in_tx(tables).await {
            Ok(()) => self.conn.commit().await,
            Err(e) => {
                if let Err(rollback_err) = self.conn.rollback().await {
                    warn!("Rollback after schema failure also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn create_schema_in_tx(&mut self, tables: &[TableDescription]) -> Result<()> {
        for table in tables {
            info!("Creating {} table...", table.output_table_name);
            let sql = self.generator.build_create_table(table)?;
            self.conn.execute(&sql).await?;

            for index in &table.indexes {
                debug!(
                    "Creating {} index for table {}...",
                    index.name, table.output_table_name
                );
                let sql = self.generator.build_create_index(table, index);
                self.conn.execute(&sql).await?;
            }
        }
        Ok(())
    }

    /// Render the full DDL script without executing anything.
    pub fn schema_script(&self, tables: &[TableDescription]) -> Result<String> {
        let mut script = String::new();
        for table in tables {
            script.push_str(&self.generator.build_create_table(table)?);
            script.push('\n');
            for index in &table.indexes {
                script.push_str(&self.generator.build_create_index(table, index));
                script.push('\n');
            }
        }
        Ok(script)
    }

    /// Insert a table's rows inside one transaction.
    ///
    /// A row whose affected count is not exactly one is logged and skipped;
    /// an execution error propagates immediately and rolls back the whole
    /// table, leaving targets already committed untouched.
    pub async fn write_rows(&mut self, table: &TableDescription, rows: &Rowset) -> Result<()> {
        info!("Inserting the {} data...", table.output_table_name);

        let insert = self.generator.build_insert(table);
        self.conn.begin().await?;
        match self.write_rows_in_tx(table, &insert, rows).await {
            Ok(()) => {
                self.conn.commit().await?;
                info!("Finished inserting the {} data.", table.output_table_name);
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = self.conn.rollback().await {
                    warn!("Rollback after insert failure also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn write_rows_in_tx(
        &mut self,
        table: &TableDescription,
        insert: &InsertStatement,
        rows: &Rowset,
    ) -> Result<()> {
        let total = rows.len();
        for (row_num, row) in rows.rows.iter().enumerate() {
            let row_num = row_num + 1;
            if row_num % 500 == 0 {
                info!(
                    "Processing {}: {} of {}...",
                    table.output_table_name, row_num, total
                );
            } else {
                debug!(
                    "Processing {}: {} of {}...",
                    table.output_table_name, row_num, total
                );
            }

            let affected = self.conn.execute_insert(insert, row).await?;
            if affected != 1 {
                error!(
                    "Failed to insert {} record {}",
                    table.output_table_name, row_num
                );
            }
        }
        Ok(())
    }
}
