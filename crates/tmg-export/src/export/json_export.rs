//! JSON table dumps.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde_json::{Map, Value as JsonValue};
use tracing::info;

use crate::error::Result;
use crate::export::TableExport;
use crate::schema::TableDescription;
use crate::value::Rowset;

/// Writes `<OutputTableName>.json` as a pretty-printed array of row objects.
pub struct JsonExport {
    output_dir: PathBuf,
}

impl JsonExport {
    /// Create an export writing into the given directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl TableExport for JsonExport {
    fn write(&self, table: &TableDescription, rows: &Rowset) -> Result<()> {
        let path = self
            .output_dir
            .join(format!("{}.json", table.output_table_name));
        info!("Writing data to {}...", path.display());

        let records: Vec<JsonValue> = rows
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, JsonValue> = rows
                    .columns
                    .iter()
                    .zip(row.iter())
                    .map(|(column, value)| (column.clone(), value.to_json()))
                    .collect();
                JsonValue::Object(object)
            })
            .collect();

        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, &records)?;

        info!("Done writing data to {}.", path.display());
        Ok(())
    }
}
