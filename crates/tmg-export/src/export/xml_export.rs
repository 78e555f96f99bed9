//! XML table dumps.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::info;

use crate::error::Result;
use crate::export::TableExport;
use crate::schema::TableDescription;
use crate::value::Rowset;

/// Writes `<OutputTableName>.xml`: one row element per row, one child
/// element per non-NULL column.
pub struct XmlExport {
    output_dir: PathBuf,
}

impl XmlExport {
    /// Create an export writing into the given directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl TableExport for XmlExport {
    fn write(&self, table: &TableDescription, rows: &Rowset) -> Result<()> {
        let path = self
            .output_dir
            .join(format!("{}.xml", table.output_table_name));
        info!("Writing data to {}...", path.display());

        let file = BufWriter::new(File::create(&path)?);
        let mut xml = Writer::new_with_indent(file, b' ', 2);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.write_event(Event::Start(BytesStart::new("DocumentElement")))?;

        let row_element = table.output_table_name.as_str();
        for row in &rows.rows {
            xml.write_event(Event::Start(BytesStart::new(row_element)))?;
            for (column, value) in rows.columns.iter().zip(row.iter()) {
                if value.is_null() {
                    continue;
                }
                xml.write_event(Event::Start(BytesStart::new(column.as_str())))?;
                xml.write_event(Event::Text(BytesText::new(&value.to_field())))?;
                xml.write_event(Event::End(BytesEnd::new(column.as_str())))?;
            }
            xml.write_event(Event::End(BytesEnd::new(row_element)))?;
        }

        xml.write_event(Event::End(BytesEnd::new("DocumentElement")))?;

        info!("Done writing data to {}.", path.display());
        Ok(())
    }
}
