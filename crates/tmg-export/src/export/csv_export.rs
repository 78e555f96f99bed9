//! CSV table dumps.

use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::export::TableExport;
use crate::schema::TableDescription;
use crate::value::Rowset;

/// Writes `<OutputTableName>.csv` with a header row.
pub struct CsvExport {
    output_dir: PathBuf,
}

impl CsvExport {
    /// Create an export writing into the given directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl TableExport for CsvExport {
    fn write(&self, table: &TableDescription, rows: &Rowset) -> Result<()> {
        let path = self
            .output_dir
            .join(format!("{}.csv", table.output_table_name));
        info!("Writing data to {}...", path.display());

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&rows.columns)?;
        for row in &rows.rows {
            writer.write_record(row.iter().map(|v| v.to_field()))?;
        }
        writer.flush()?;

        info!("Done writing data to {}.", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableRegistry;
    use crate::value::Value;

    #[test]
    fn test_csv_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let settings = TableRegistry::new().project_settings();

        let mut rows = Rowset::new(settings.column_names());
        rows.push_row(vec![
            Value::Text("Colors".into()),
            Value::Text("Background".into()),
            Value::Text("silver, light".into()),
        ]);

        CsvExport::new(dir.path()).write(&settings, &rows).unwrap();

        let content =
            std::fs::read_to_string(dir.path().join("ProjectSettings.csv")).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("category,setting,value"));
        assert_eq!(lines.next(), Some("Colors,Background,\"silver, light\""));
    }
}
