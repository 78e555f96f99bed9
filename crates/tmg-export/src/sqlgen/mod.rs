//! SQL generation for typed table descriptions.
//!
//! Given a resolved [`TableDescription`] and a [`SqlDialect`], the generator
//! emits CREATE TABLE, CREATE INDEX, and parameterized INSERT statements.
//! All column-ordered output ascends by ordinal position.

mod dialect;

pub use dialect::SqlDialect;

use crate::error::{ExportError, Result};
use crate::schema::{Column, Index, SemanticType, TableDescription};

/// Marker character prefixed to parameter names in generated INSERTs.
pub const PARAM_MARKER: char = '@';

/// Parameter type for one INSERT binding, derived from the column's
/// semantic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Variable-length string (unbounded text).
    VarText,
    /// Fixed-maximum-length string.
    FixedText(i64),
    /// 32-bit integer (Integer and Numeric columns).
    Integer,
    /// Boolean.
    Boolean,
    /// Binary blob.
    Binary,
    /// Date/time.
    DateTime,
}

/// One parameter of a generated INSERT statement.
#[derive(Debug, Clone)]
pub struct ParamBinding {
    /// Parameter name as it appears in the SQL text (e.g. `@per_no`).
    pub name: String,

    /// The unescaped column name this parameter feeds.
    pub column: String,

    /// Binding type.
    pub ty: ParamType,
}

/// A parameterized INSERT: the SQL text plus one binding per column, in the
/// same order as the VALUES list.
#[derive(Debug, Clone)]
pub struct InsertStatement {
    pub sql: String,
    pub params: Vec<ParamBinding>,
}

/// Emits dialect-correct SQL for resolved tables.
#[derive(Debug, Clone)]
pub struct SqlGenerator {
    dialect: SqlDialect,
}

impl SqlGenerator {
    /// Create a generator for the given dialect.
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    /// The dialect this generator targets.
    pub fn dialect(&self) -> &SqlDialect {
        &self.dialect
    }

    /// Build the CREATE TABLE statement for a table.
    pub fn build_create_table(&self, table: &TableDescription) -> Result<String> {
        let defs = self
            .ordered_columns(table)
            .into_iter()
            .map(|c| self.build_column_def(table, c))
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(
            "CREATE TABLE {} ({});",
            self.dialect.escape(&table.output_table_name),
            defs.join(",")
        ))
    }

    fn build_column_def(&self, table: &TableDescription, column: &Column) -> Result<String> {
        let mut def = self.dialect.escape(&column.name);
        let pk_suffix = if column.is_primary_key {
            " PRIMARY KEY NOT NULL"
        } else {
            ""
        };

        match column.semantic_type {
            SemanticType::Text => {
                if column.is_unbounded_text() {
                    def.push_str("TEXT");
                } else {
                    def.push_str(&format!("VARCHAR({})", column.max_length.unwrap()));
                }
            }
            SemanticType::Integer => {
                // Rendering assumes the introspector's int(4) validation;
                // re-checked here because descriptions can be hand-built.
                if column.precision != Some(4) {
                    return Err(ExportError::config(format!(
                        "Column {}.{} is an integer with precision {:?}; only int(4) is supported",
                        table.output_table_name, column.name, column.precision
                    )));
                }
                def.push_str(&format!("{}{}", self.dialect.integer_type, pk_suffix));
            }
            SemanticType::Numeric => match column.precision {
                Some(precision) => match column.scale {
                    Some(scale) if scale > 0 => {
                        def.push_str(&format!("NUMERIC({},{}){}", precision, scale, pk_suffix));
                    }
                    _ => def.push_str(&format!("NUMERIC({}){}", precision, pk_suffix)),
                },
                None => def.push_str(&format!("NUMERIC{}", pk_suffix)),
            },
            SemanticType::Boolean => {
                def.push_str(&format!("{}{}", self.dialect.boolean_type, pk_suffix));
            }
            SemanticType::Date => {
                def.push_str(&format!("{}{}", self.dialect.datetime_type, pk_suffix));
            }
            SemanticType::Binary => {
                def.push_str(self.dialect.blob_type);
            }
        }

        Ok(def)
    }

    /// Build the CREATE INDEX statement for one index of a table.
    pub fn build_create_index(&self, table: &TableDescription, index: &Index) -> String {
        let index_name = format!("{}_{}", table.output_table_name, index.name);
        let unique = if index.is_unique { "UNIQUE " } else { "" };
        let columns = index
            .columns
            .iter()
            .map(|c| self.dialect.escape(c))
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "CREATE {}INDEX {} ON {} ({});",
            unique,
            self.dialect.escape(&index_name),
            self.dialect.escape(&table.output_table_name),
            columns
        )
    }

    /// Build the parameterized INSERT statement for a table.
    pub fn build_insert(&self, table: &TableDescription) -> InsertStatement {
        let columns = self.ordered_columns(table);

        let column_list = columns
            .iter()
            .map(|c| self.dialect.escape(&c.name))
            .collect::<Vec<_>>()
            .join(",");

        let params: Vec<ParamBinding> = columns
            .iter()
            .map(|c| ParamBinding {
                name: format!("{}{}", PARAM_MARKER, c.name),
                column: c.name.clone(),
                ty: param_type(c),
            })
            .collect();

        let value_list = params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.dialect.escape(&table.output_table_name),
            column_list,
            value_list
        );

        InsertStatement { sql, params }
    }

    fn ordered_columns<'a>(&self, table: &'a TableDescription) -> Vec<&'a Column> {
        let mut columns: Vec<&Column> = table.columns.iter().collect();
        columns.sort_by_key(|c| c.ordinal_position);
        columns
    }
}

fn param_type(column: &Column) -> ParamType {
    match column.semantic_type {
        SemanticType::Text => {
            if column.is_unbounded_text() {
                ParamType::VarText
            } else {
                ParamType::FixedText(column.max_length.unwrap())
            }
        }
        SemanticType::Integer | SemanticType::Numeric => ParamType::Integer,
        SemanticType::Boolean => ParamType::Boolean,
        SemanticType::Binary => ParamType::Binary,
        SemanticType::Date => ParamType::DateTime,
    }
}
