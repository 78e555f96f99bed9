//! Interfaces to the legacy source.
//!
//! The connection and session management for the legacy provider live
//! outside this crate; these traits are the seam. `SourceSchema` yields the
//! raw, weakly-typed metadata the introspector reconciles against the
//! registry, and `RowSource` yields table data in resolved column order.

mod settings;

pub use settings::SettingsRowSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::TableDescription;
use crate::value::Rowset;

/// One raw column row as reported by the source catalog.
#[derive(Debug, Clone)]
pub struct RawColumn {
    /// Column name.
    pub name: String,

    /// Raw type name as reported by the provider (e.g. "character",
    /// "numeric", "logical").
    pub data_type: String,

    /// Ordinal position (1-based).
    pub ordinal_position: i64,

    /// Numeric precision, when reported.
    pub numeric_precision: Option<i32>,

    /// Numeric scale, when reported.
    pub numeric_scale: Option<i32>,

    /// Maximum character length, when reported.
    pub max_length: Option<i64>,
}

/// One raw index row as reported by the source catalog. Composite indexes
/// appear as several rows sharing an index name.
#[derive(Debug, Clone)]
pub struct RawIndex {
    /// Source-side table name the index belongs to.
    pub table_name: String,

    /// Index name.
    pub index_name: String,

    /// Raw defining expression (e.g. `category+setting`).
    pub expression: String,

    /// One participating column.
    pub column_name: String,
}

/// Read-only access to the legacy source's schema catalog.
#[async_trait]
pub trait SourceSchema: Send + Sync {
    /// List source table names starting with the given prefix, in name
    /// order.
    async fn list_tables(&self, prefix: &str) -> Result<Vec<String>>;

    /// List the raw columns of one table.
    async fn list_columns(&self, table_name: &str) -> Result<Vec<RawColumn>>;

    /// List every index row of the source. Callers filter per table.
    async fn list_indexes(&self) -> Result<Vec<RawIndex>>;
}

/// Access to a table's data, in resolved column order.
///
/// Implementations vary by table: relational tables read live rows from the
/// source; the project-settings table reads the auxiliary key-value file.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch all rows for the resolved table.
    async fn fetch_rows(&self, table: &TableDescription) -> Result<Rowset>;
}
