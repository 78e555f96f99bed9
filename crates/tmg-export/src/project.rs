//! The legacy project: file validation, table-name prefix derivation, and
//! the introspection loop that turns raw source metadata into resolved
//! table descriptions.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ExportError, Result};
use crate::schema::{introspect, TableDescription, TableRegistry};
use crate::source::{SettingsRowSource, SourceSchema};

/// A validated project file plus the table registry.
///
/// Project files are named `<prefix>__.pjc`; the stem minus its final
/// underscore, lowercased, is the prefix every source table name carries.
pub struct Project {
    project_file: PathBuf,
    registry: TableRegistry,
}

impl Project {
    /// Validate and wrap a project file path.
    pub fn new(project_file: impl Into<PathBuf>) -> Result<Self> {
        let project_file = project_file.into();
        validate_project_file(&project_file)?;
        Ok(Self {
            project_file,
            registry: TableRegistry::new(),
        })
    }

    /// The project file path.
    pub fn project_file(&self) -> &Path {
        &self.project_file
    }

    /// The table registry.
    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// The source table-name prefix derived from the project file name.
    pub fn table_prefix(&self) -> String {
        let stem = self
            .project_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        stem[..stem.len().saturating_sub(1)].to_lowercase()
    }

    /// Row source for the project-settings table.
    pub fn settings_row_source(&self) -> SettingsRowSource {
        SettingsRowSource::new(&self.project_file)
    }

    /// Resolve every table of the project.
    ///
    /// The project-settings table comes first, pre-populated from the
    /// registry; the remaining tables are introspected from the source in
    /// name order. A source table whose short key has no registry entry is
    /// a fatal configuration error.
    pub async fn introspect_tables(
        &self,
        source: &dyn SourceSchema,
    ) -> Result<Vec<TableDescription>> {
        let prefix = self.table_prefix();
        let mut tables = vec![self.registry.project_settings()];

        let all_indexes = source.list_indexes().await?;

        for table_name in source.list_tables(&prefix).await? {
            if !table_name.starts_with(&prefix) {
                continue;
            }
            info!("Processing {} table...", table_name);

            let key = &table_name[prefix.len()..];
            let template = self.registry.lookup(key)?;

            let raw_columns = source.list_columns(&table_name).await?;
            let raw_indexes: Vec<_> = all_indexes
                .iter()
                .filter(|i| i.table_name == table_name)
                .cloned()
                .collect();

            let resolved = introspect::resolve(template, &prefix, &raw_columns, &raw_indexes)?;
            tables.push(resolved);
        }

        Ok(tables)
    }
}

fn validate_project_file(project_file: &Path) -> Result<()> {
    let stem_ok = project_file
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with("__"));
    let ext_ok = project_file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pjc"));

    if stem_ok && ext_ok && project_file.exists() {
        return Ok(());
    }

    Err(ExportError::config(format!(
        "Not a valid project file: {}",
        project_file.display()
    )))
}
