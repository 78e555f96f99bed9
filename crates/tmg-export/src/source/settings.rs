//! Row source for the project-settings table.
//!
//! The one table whose data does not live in the relational source: rows
//! come from the ini-style project file, one row per section/key/value.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::schema::TableDescription;
use crate::source::RowSource;
use crate::value::{Rowset, Value};

/// Reads `(category, setting, value)` rows from the ini-style project file.
pub struct SettingsRowSource {
    settings_file: PathBuf,
}

impl SettingsRowSource {
    /// Create a reader over the given project file.
    pub fn new(settings_file: impl Into<PathBuf>) -> Self {
        Self {
            settings_file: settings_file.into(),
        }
    }
}

#[async_trait]
impl RowSource for SettingsRowSource {
    async fn fetch_rows(&self, table: &TableDescription) -> Result<Rowset> {
        info!("Getting the {} data...", table.output_table_name);

        let content = std::fs::read_to_string(&self.settings_file)?;
        let mut rows = Rowset::new(table.column_names());

        let mut section = String::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = name.trim().to_string();
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                rows.push_row(vec![
                    Value::Text(section.clone()),
                    Value::Text(key.trim().to_string()),
                    Value::Text(value.trim().to_string()),
                ]);
            }
        }

        info!("Finished getting the {} data.", table.output_table_name);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableRegistry;
    use std::io::Write;

    #[tokio::test]
    async fn test_fetch_rows_one_per_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[Advanced]").unwrap();
        writeln!(file, "UseAdvanced=1").unwrap();
        writeln!(file, "; a comment").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "[Colors]").unwrap();
        writeln!(file, "Background = silver").unwrap();
        writeln!(file, "Foreground=black").unwrap();
        file.flush().unwrap();

        let settings = TableRegistry::new().project_settings();
        let source = SettingsRowSource::new(file.path());
        let rows = source.fetch_rows(&settings).await.unwrap();

        assert_eq!(rows.columns, vec!["category", "setting", "value"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.rows[0],
            vec![
                Value::Text("Advanced".into()),
                Value::Text("UseAdvanced".into()),
                Value::Text("1".into())
            ]
        );
        assert_eq!(
            rows.rows[1],
            vec![
                Value::Text("Colors".into()),
                Value::Text("Background".into()),
                Value::Text("silver".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_rows_missing_file_is_io_error() {
        let settings = TableRegistry::new().project_settings();
        let source = SettingsRowSource::new("/nonexistent/project__.pjc");
        assert!(source.fetch_rows(&settings).await.is_err());
    }
}
