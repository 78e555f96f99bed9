//! Reconciles raw source metadata against a registry template, producing a
//! fully-typed, validated table description.
//!
//! Resolution is a pure function over (template, raw metadata): the template
//! carries the curated configuration, the raw rows carry what the live
//! source reports, and the output is the typed description the generator
//! and writer consume. Unknown types and registry/source mismatches are
//! fatal; missing precision/scale/length are legitimately optional.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{ExportError, Result};
use crate::schema::types::{Column, Index, SemanticType, TableDescription};
use crate::source::{RawColumn, RawIndex};

/// Resolve a registry template against the raw metadata of its source table.
///
/// `raw_indexes` must already be filtered to this table; the source reports
/// indexes globally and the caller selects the relevant rows.
pub fn resolve(
    mut template: TableDescription,
    table_prefix: &str,
    raw_columns: &[RawColumn],
    raw_indexes: &[RawIndex],
) -> Result<TableDescription> {
    let input_table_name = format!("{}{}", table_prefix, template.key);
    template.input_table_name = Some(input_table_name.clone());

    for raw in raw_columns {
        if template.is_ignored_column(&raw.name) {
            debug!("{}: skipping ignored column {}", input_table_name, raw.name);
            continue;
        }
        let column = resolve_column(&template, &input_table_name, raw)?;
        template.columns.push(column);
    }

    template.columns.sort_by_key(|c| c.ordinal_position);
    validate_ordinals(&input_table_name, &template.columns)?;

    for index in resolve_indexes(&template, raw_indexes) {
        template.indexes.push(index);
    }

    Ok(template)
}

fn resolve_column(
    table: &TableDescription,
    input_table_name: &str,
    raw: &RawColumn,
) -> Result<Column> {
    let semantic_type = match table.type_override(&raw.name) {
        Some(overridden) => overridden,
        None => SemanticType::parse_raw(&raw.data_type).ok_or_else(|| {
            ExportError::UnsupportedType {
                table: input_table_name.to_string(),
                column: raw.name.clone(),
                type_name: raw.data_type.clone(),
            }
        })?,
    };

    if semantic_type == SemanticType::Integer && raw.numeric_precision != Some(4) {
        return Err(ExportError::config(format!(
            "Column {}.{} is an integer with precision {:?}; only int(4) is supported",
            input_table_name, raw.name, raw.numeric_precision
        )));
    }

    let max_length = table
        .max_length_override(&raw.name)
        .or(raw.max_length);

    let is_primary_key = table
        .primary_key
        .as_deref()
        .is_some_and(|pk| pk == raw.name);

    Ok(Column {
        name: raw.name.clone(),
        ordinal_position: raw.ordinal_position,
        semantic_type,
        max_length,
        precision: raw.numeric_precision,
        scale: raw.numeric_scale,
        is_primary_key,
    })
}

/// Resolved ordinals must form a contiguous run from the table's minimum
/// reported position: a gap or duplicate means the curated ignore list no
/// longer matches the live schema.
fn validate_ordinals(input_table_name: &str, columns: &[Column]) -> Result<()> {
    for pair in columns.windows(2) {
        if pair[1].ordinal_position != pair[0].ordinal_position + 1 {
            return Err(ExportError::config(format!(
                "Table {}: column ordinal positions are not dense ({} at {}, {} at {})",
                input_table_name,
                pair[0].name,
                pair[0].ordinal_position,
                pair[1].name,
                pair[1].ordinal_position
            )));
        }
    }
    Ok(())
}

/// Group raw index rows by index name and build the indexes that survive
/// the ignore rules. An index touching any ignored column is dropped whole,
/// never partially emitted.
fn resolve_indexes(table: &TableDescription, raw_indexes: &[RawIndex]) -> Vec<Index> {
    let mut groups: BTreeMap<&str, Vec<&RawIndex>> = BTreeMap::new();
    for raw in raw_indexes {
        groups.entry(&raw.index_name).or_default().push(raw);
    }

    let mut indexes = Vec::new();
    for (name, rows) in groups {
        let columns: Vec<String> = rows.iter().map(|r| r.column_name.clone()).collect();
        if columns.iter().any(|c| table.is_ignored_column(c)) {
            debug!(
                "{}: dropping index {} over an ignored column",
                table.output_table_name, name
            );
            continue;
        }

        let is_unique = table.is_declared_unique(&columns);
        let expression = rows[0].expression.clone();
        indexes.push(Index::composite(name, expression, columns, is_unique));
    }
    indexes
}
