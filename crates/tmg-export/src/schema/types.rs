//! Schema types describing a table of the legacy project: semantic column
//! categories, resolved columns and indexes, and the per-table description
//! that carries both the curated configuration and the introspected shape.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Maximum-length sentinel meaning "no practical limit".
///
/// The legacy provider reports memo-style columns with a length at or above
/// this value; such columns render as an unbounded text type instead of
/// `VARCHAR(n)`.
pub const UNBOUNDED_TEXT_LENGTH: i64 = i32::MAX as i64;

/// The six canonical column categories, independent of any dialect's literal
/// type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SemanticType {
    Text,
    Integer,
    Numeric,
    Boolean,
    Date,
    Binary,
}

impl SemanticType {
    /// Parse a raw type name reported by the source into a semantic type.
    ///
    /// Returns `None` for anything outside the six canonical categories;
    /// callers treat that as a fatal mismatch, never a passthrough.
    pub fn parse_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "char" | "character" | "varchar" => Some(SemanticType::Text),
            "int" | "integer" => Some(SemanticType::Integer),
            "number" | "numeric" => Some(SemanticType::Numeric),
            "bool" | "boolean" | "logical" => Some(SemanticType::Boolean),
            "date" | "datetime" => Some(SemanticType::Date),
            "binary" | "blob" | "varbinary" => Some(SemanticType::Binary),
            _ => None,
        }
    }
}

/// A resolved column.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    /// Column name (unique within its table).
    pub name: String,

    /// Ordinal position as reported by the source (1-based); defines the
    /// output column order.
    pub ordinal_position: i64,

    /// Semantic type after override application.
    pub semantic_type: SemanticType,

    /// Maximum character length (Text columns only).
    pub max_length: Option<i64>,

    /// Numeric precision (Integer, Numeric).
    pub precision: Option<i32>,

    /// Numeric scale (Integer, Numeric).
    pub scale: Option<i32>,

    /// Whether this column is the table's primary key.
    pub is_primary_key: bool,
}

impl Column {
    /// Whether the column's character length is unbounded.
    ///
    /// An absent length is treated the same as the sentinel: no practical
    /// limit.
    #[must_use]
    pub fn is_unbounded_text(&self) -> bool {
        match self.max_length {
            Some(len) => len >= UNBOUNDED_TEXT_LENGTH,
            None => true,
        }
    }
}

/// A resolved index.
#[derive(Debug, Clone, Serialize)]
pub struct Index {
    /// Index name as reported by the source.
    pub name: String,

    /// Raw defining expression; differs from the column list for composite
    /// or computed indexes (e.g. `category+setting`).
    pub expression: String,

    /// Ordered list of participating column names (never empty).
    pub columns: Vec<String>,

    /// Whether the index enforces uniqueness.
    pub is_unique: bool,
}

impl Index {
    /// Create an index over a single column.
    pub fn single(
        name: impl Into<String>,
        expression: impl Into<String>,
        column: impl Into<String>,
        is_unique: bool,
    ) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            columns: vec![column.into()],
            is_unique,
        }
    }

    /// Create an index over an ordered list of columns.
    pub fn composite(
        name: impl Into<String>,
        expression: impl Into<String>,
        columns: Vec<String>,
        is_unique: bool,
    ) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            columns,
            is_unique,
        }
    }
}

/// Full description of one table.
///
/// The registry constructs these as templates carrying the curated
/// configuration (primary key, ignore list, overrides, unique groupings).
/// The introspector then assigns the source-side table name and populates
/// `columns`/`indexes` exactly once; from that point on the description is
/// consumed immutably by the generator, the writer, and the exports.
#[derive(Debug, Clone, Serialize)]
pub struct TableDescription {
    /// Short source-table-name suffix used to index the registry.
    pub key: String,

    /// Source-side table name (prefix + key), assigned at introspection.
    pub input_table_name: Option<String>,

    /// Output table name, fixed at registry definition.
    pub output_table_name: String,

    /// Primary-key column name, if any.
    pub primary_key: Option<String>,

    ignored_columns: BTreeSet<String>,
    unique_columns: Vec<BTreeSet<String>>,
    type_overrides: BTreeMap<String, SemanticType>,
    max_length_overrides: BTreeMap<String, i64>,

    /// Resolved columns in ascending ordinal order.
    pub columns: Vec<Column>,

    /// Resolved indexes.
    pub indexes: Vec<Index>,
}

impl TableDescription {
    /// Create a template with the default ignored columns.
    pub fn new(key: impl Into<String>, output_table_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            input_table_name: None,
            output_table_name: output_table_name.into(),
            primary_key: None,
            ignored_columns: ["tt", "ispicked"].iter().map(|s| s.to_string()).collect(),
            unique_columns: Vec::new(),
            type_overrides: BTreeMap::new(),
            max_length_overrides: BTreeMap::new(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Declare the primary-key column.
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(column.into());
        self
    }

    /// Add a column to the ignore list.
    pub fn ignore_column(mut self, column: impl Into<String>) -> Self {
        self.ignored_columns.insert(column.into());
        self
    }

    /// Add several columns to the ignore list.
    pub fn ignore_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Declare a group of columns as jointly unique.
    pub fn with_unique_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_columns
            .push(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Override the semantic type of the named columns.
    pub fn override_type<I, S>(mut self, semantic_type: SemanticType, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            self.type_overrides.insert(column.into(), semantic_type);
        }
        self
    }

    /// Override the maximum character length of one column.
    pub fn override_max_length(mut self, column: impl Into<String>, max_length: i64) -> Self {
        self.max_length_overrides.insert(column.into(), max_length);
        self
    }

    /// Append a pre-resolved column (used for the settings table template).
    pub fn add_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Append a pre-resolved index (used for the settings table template).
    pub fn add_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Whether the named column is on the ignore list.
    #[must_use]
    pub fn is_ignored_column(&self, column: &str) -> bool {
        self.ignored_columns.contains(column)
    }

    /// Registered type override for the named column, if any.
    #[must_use]
    pub fn type_override(&self, column: &str) -> Option<SemanticType> {
        self.type_overrides.get(column).copied()
    }

    /// Registered max-length override for the named column, if any.
    #[must_use]
    pub fn max_length_override(&self, column: &str) -> Option<i64> {
        self.max_length_overrides.get(column).copied()
    }

    /// Whether the given columns exactly match a declared unique grouping.
    ///
    /// Comparison is by set membership: order and duplicates are irrelevant,
    /// so an index over `{B, A}` matches a grouping declared as `{A, B}`.
    #[must_use]
    pub fn is_declared_unique<I, S>(&self, columns: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidate: BTreeSet<String> = columns
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();

        self.unique_columns.iter().any(|group| *group == candidate)
    }

    /// Resolved column names in ascending ordinal order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        let mut ordered: Vec<&Column> = self.columns.iter().collect();
        ordered.sort_by_key(|c| c.ordinal_position);
        ordered.iter().map(|c| c.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_known_types() {
        assert_eq!(SemanticType::parse_raw("Character"), Some(SemanticType::Text));
        assert_eq!(SemanticType::parse_raw("char"), Some(SemanticType::Text));
        assert_eq!(SemanticType::parse_raw("INTEGER"), Some(SemanticType::Integer));
        assert_eq!(SemanticType::parse_raw("numeric"), Some(SemanticType::Numeric));
        assert_eq!(SemanticType::parse_raw("logical"), Some(SemanticType::Boolean));
        assert_eq!(SemanticType::parse_raw("date"), Some(SemanticType::Date));
        assert_eq!(SemanticType::parse_raw("blob"), Some(SemanticType::Binary));
    }

    #[test]
    fn test_parse_raw_unknown_types() {
        assert_eq!(SemanticType::parse_raw("general"), None);
        assert_eq!(SemanticType::parse_raw("currency"), None);
        assert_eq!(SemanticType::parse_raw(""), None);
    }

    #[test]
    fn test_default_ignored_columns() {
        let table = TableDescription::new("g", "Events");
        assert!(table.is_ignored_column("tt"));
        assert!(table.is_ignored_column("ispicked"));
        assert!(!table.is_ignored_column("recno"));
    }

    #[test]
    fn test_ignore_column_extends_defaults() {
        let table = TableDescription::new("$", "People").ignore_column("scbuff");
        assert!(table.is_ignored_column("scbuff"));
        assert!(table.is_ignored_column("tt"));
    }

    #[test]
    fn test_unique_columns_set_semantics() {
        let table = TableDescription::new("$", "People")
            .with_unique_columns(["dsid", "ref_id"])
            .with_unique_columns(["dsid", "per_no"]);

        // Order is irrelevant.
        assert!(table.is_declared_unique(["ref_id", "dsid"]));
        // Duplicates are irrelevant.
        assert!(table.is_declared_unique(["dsid", "ref_id", "dsid"]));
        // Supersets do not match.
        assert!(!table.is_declared_unique(["dsid", "ref_id", "per_no"]));
        // Subsets do not match.
        assert!(!table.is_declared_unique(["dsid"]));
    }

    #[test]
    fn test_type_and_length_overrides() {
        let table = TableDescription::new("i", "Exhibits")
            .override_max_length("caption", 255)
            .override_type(SemanticType::Binary, ["image", "thumb"]);

        assert_eq!(table.max_length_override("caption"), Some(255));
        assert_eq!(table.max_length_override("afilename"), None);
        assert_eq!(table.type_override("image"), Some(SemanticType::Binary));
        assert_eq!(table.type_override("caption"), None);
    }

    #[test]
    fn test_unbounded_text() {
        let mut column = Column {
            name: "memo".to_string(),
            ordinal_position: 1,
            semantic_type: SemanticType::Text,
            max_length: Some(UNBOUNDED_TEXT_LENGTH),
            precision: None,
            scale: None,
            is_primary_key: false,
        };
        assert!(column.is_unbounded_text());

        column.max_length = Some(255);
        assert!(!column.is_unbounded_text());

        column.max_length = None;
        assert!(column.is_unbounded_text());
    }
}
