//! # tmg-export
//!
//! Export library for The Master Genealogist (TMG) projects: a legacy,
//! metadata-poor tabular source migrated into typed relational targets
//! and/or flat export formats.
//!
//! The core is the schema-mapping and SQL-dialect-generation engine:
//!
//! - a fixed **table registry** carrying the curated knowledge about the
//!   legacy schema (primary keys, ignored columns, type and length
//!   overrides, unique column groupings),
//! - a **schema introspector** reconciling raw source metadata against the
//!   registry into fully-typed table descriptions,
//! - a **SQL generator** parameterized per dialect (SQLite, MySQL,
//!   PostgreSQL, SQL Server) emitting CREATE TABLE, CREATE INDEX, and
//!   parameterized INSERT statements,
//! - a **transactional writer** applying the generated statements over a
//!   pluggable target connection.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tmg_export::{DatabaseTarget, Project, SqlDialect, SqliteConnection};
//!
//! # async fn example(source: &dyn tmg_export::SourceSchema) -> tmg_export::Result<()> {
//! let project = Project::new("sample__.pjc")?;
//! let tables = project.introspect_tables(source).await?;
//!
//! let mut target = DatabaseTarget::new(
//!     SqliteConnection::new("sample.sqlite3"),
//!     SqlDialect::sqlite(),
//! );
//! target.open().await?;
//! target.create_schema(&tables).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod export;
pub mod exporter;
pub mod project;
pub mod schema;
pub mod source;
pub mod sqlgen;
pub mod target;
pub mod value;

// Re-exports for convenient access
pub use error::{ExportError, Result};
pub use export::{CsvExport, JsonExport, TableExport, XmlExport};
pub use exporter::run_export;
pub use project::Project;
pub use schema::{
    Column, Index, SemanticType, TableDescription, TableRegistry, UNBOUNDED_TEXT_LENGTH,
};
pub use source::{RawColumn, RawIndex, RowSource, SettingsRowSource, SourceSchema};
pub use sqlgen::{InsertStatement, ParamBinding, ParamType, SqlDialect, SqlGenerator};
pub use target::{DatabaseTarget, PostgresConnection, SqliteConnection, TargetConnection};
pub use value::{Rowset, Value};
