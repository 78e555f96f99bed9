//! Sequential export run: schema creation on every relational target, then
//! per-table data movement to every configured output.

use tracing::info;

use crate::error::Result;
use crate::export::TableExport;
use crate::schema::{TableDescription, TableRegistry};
use crate::source::RowSource;
use crate::target::DatabaseTarget;

/// Run a full export.
///
/// Schema creation fully completes (and commits) on every relational target
/// before any row insertion begins. Each table's data is fetched exactly
/// once and written to every flat export and every target; the
/// project-settings table reads from `settings_rows`, all others from
/// `table_rows`. Processing is strictly sequential and the first fatal
/// error aborts the run; tables already committed stay committed.
pub async fn run_export(
    registry: &TableRegistry,
    tables: &[TableDescription],
    table_rows: &dyn RowSource,
    settings_rows: &dyn RowSource,
    targets: &mut [DatabaseTarget],
    exports: &[Box<dyn TableExport>],
) -> Result<()> {
    info!("Started export");

    for target in targets.iter_mut() {
        target.open().await?;
        target.create_schema(tables).await?;
    }

    for table in tables {
        let rows = if registry.is_project_settings_table(&table.output_table_name) {
            settings_rows.fetch_rows(table).await?
        } else {
            table_rows.fetch_rows(table).await?
        };

        for export in exports {
            export.write(table, &rows)?;
        }
        for target in targets.iter_mut() {
            target.write_rows(table, &rows).await?;
        }
    }

    for target in targets.iter_mut() {
        target.close().await?;
    }

    info!("Finished export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableRegistry;
    use crate::source::SettingsRowSource;
    use crate::sqlgen::SqlDialect;
    use crate::target::SqliteConnection;
    use crate::value::Rowset;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRowSource {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl RowSource for CountingRowSource {
        async fn fetch_rows(&self, table: &TableDescription) -> Result<Rowset> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Rowset::new(table.column_names()))
        }
    }

    struct CollectingExport {
        seen: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl CollectingExport {
        fn new() -> Self {
            Self {
                seen: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
            }
        }
    }

    impl TableExport for CollectingExport {
        fn write(&self, table: &TableDescription, _rows: &Rowset) -> Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push(table.output_table_name.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_export_settings_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[Advanced]").unwrap();
        writeln!(file, "UseAdvanced=1").unwrap();
        file.flush().unwrap();

        let registry = TableRegistry::new();
        let tables = vec![registry.project_settings()];
        let settings_rows = SettingsRowSource::new(file.path());
        let table_rows = CountingRowSource {
            fetches: AtomicUsize::new(0),
        };

        let mut targets = vec![DatabaseTarget::new(
            SqliteConnection::in_memory(),
            SqlDialect::sqlite(),
        )];
        let exports: Vec<Box<dyn TableExport>> = vec![Box::new(CollectingExport::new())];

        run_export(
            &registry,
            &tables,
            &table_rows,
            &settings_rows,
            &mut targets,
            &exports,
        )
        .await
        .unwrap();

        // The settings table never touches the relational row source.
        assert_eq!(table_rows.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_export_dispatches_by_table_kind() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[A]").unwrap();
        writeln!(file, "k=v").unwrap();
        file.flush().unwrap();

        let registry = TableRegistry::new();
        let settings = registry.project_settings();
        let flags = registry
            .lookup("c")
            .unwrap()
            .add_column(crate::schema::Column {
                name: "flagid".to_string(),
                ordinal_position: 1,
                semantic_type: crate::schema::SemanticType::Numeric,
                max_length: None,
                precision: Some(10),
                scale: Some(0),
                is_primary_key: true,
            });
        let tables = vec![settings, flags];

        let settings_rows = SettingsRowSource::new(file.path());
        let table_rows = CountingRowSource {
            fetches: AtomicUsize::new(0),
        };

        let export = CollectingExport::new();
        let seen_handle = export.seen.clone();
        let exports: Vec<Box<dyn TableExport>> = vec![Box::new(export)];
        let mut targets = Vec::new();

        run_export(
            &registry,
            &tables,
            &table_rows,
            &settings_rows,
            &mut targets,
            &exports,
        )
        .await
        .unwrap();

        assert_eq!(table_rows.fetches.load(Ordering::SeqCst), 1);
        let seen = seen_handle.lock().unwrap();
        assert_eq!(*seen, vec!["ProjectSettings", "Flags"]);
    }

    #[tokio::test]
    async fn test_run_export_into_sqlite_writes_settings_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[Colors]").unwrap();
        writeln!(file, "Background=silver").unwrap();
        writeln!(file, "Foreground=black").unwrap();
        file.flush().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("out.sqlite3");

        let registry = TableRegistry::new();
        let tables = vec![registry.project_settings()];
        let settings_rows = SettingsRowSource::new(file.path());
        let table_rows = CountingRowSource {
            fetches: AtomicUsize::new(0),
        };

        let mut targets = vec![DatabaseTarget::new(
            SqliteConnection::new(&db_path),
            SqlDialect::sqlite(),
        )];

        run_export(
            &registry,
            &tables,
            &table_rows,
            &settings_rows,
            &mut targets,
            &[],
        )
        .await
        .unwrap();

        let conn = rusqlite::Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM ProjectSettings", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);

        // The unique pair index made it into the schema.
        let index_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'ProjectSettings_category_and_setting'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(index_count, 1);
    }
}
