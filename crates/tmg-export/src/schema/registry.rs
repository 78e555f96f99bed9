//! Fixed catalog of the tables a legacy project contains.
//!
//! The registry is the hand-curated half of the schema: which tables exist,
//! what they are called on the output side, which column is the primary key,
//! which columns are ignored, which column groups are unique, and which
//! columns need a type or length correction the source metadata gets wrong.
//! It is a closed catalog; a source table with no registry entry is a fatal
//! mismatch, never skipped.

use crate::error::{ExportError, Result};
use crate::schema::types::{Column, Index, SemanticType, TableDescription};

/// Output name of the one table whose data comes from the project file
/// rather than the relational source.
pub const PROJECT_SETTINGS_TABLE: &str = "ProjectSettings";

/// Registry of known table templates, looked up by short key.
#[derive(Debug)]
pub struct TableRegistry {
    templates: Vec<TableDescription>,
}

impl TableRegistry {
    /// Create the registry with the built-in catalog.
    pub fn new() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    /// Look up a fresh, pre-configured template by short key.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Configuration` when the key is unknown: the
    /// source exposes a table this catalog has no entry for, which means
    /// registry and live schema no longer agree.
    pub fn lookup(&self, short_key: &str) -> Result<TableDescription> {
        self.templates
            .iter()
            .find(|t| t.key == short_key)
            .cloned()
            .ok_or_else(|| {
                ExportError::config(format!("Unknown source table key: '{}'", short_key))
            })
    }

    /// Whether the named output table is the project-settings table, whose
    /// rows are read from the auxiliary key-value project file.
    pub fn is_project_settings_table(&self, output_table_name: &str) -> bool {
        output_table_name == PROJECT_SETTINGS_TABLE
    }

    /// The pre-populated project-settings description. It never passes
    /// through source introspection.
    pub fn project_settings(&self) -> TableDescription {
        self.templates
            .iter()
            .find(|t| t.output_table_name == PROJECT_SETTINGS_TABLE)
            .cloned()
            .expect("built-in catalog always contains the settings table")
    }

    /// Iterate the catalog in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &TableDescription> {
        self.templates.iter()
    }
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn settings_column(name: &str, ordinal: i64) -> Column {
    Column {
        name: name.to_string(),
        ordinal_position: ordinal,
        semantic_type: SemanticType::Text,
        max_length: Some(255),
        precision: None,
        scale: None,
        is_primary_key: false,
    }
}

fn builtin_templates() -> Vec<TableDescription> {
    vec![
        TableDescription::new("$", "People")
            .with_primary_key("per_no")
            .ignore_column("scbuff")
            .with_unique_columns(["dsid", "ref_id"])
            .with_unique_columns(["dsid", "per_no"]),
        TableDescription::new("a", "SourceTypes"),
        TableDescription::new("b", "FocusGroupMembers"),
        TableDescription::new("c", "Flags").with_primary_key("flagid"),
        TableDescription::new("d", "DataSets")
            .ignore_columns(["dsp", "dsp2", "host"])
            .with_primary_key("dsid"),
        TableDescription::new("dna", "Dna").with_primary_key("id_dna"),
        TableDescription::new("e", "EventWitnesses"),
        TableDescription::new("f", "ParentChildRelationships").with_primary_key("recno"),
        TableDescription::new("g", "Events").with_primary_key("recno"),
        TableDescription::new("i", "Exhibits")
            .with_primary_key("idexhibit")
            .override_max_length("afilename", 512)
            .override_max_length("vfilename", 512)
            .override_max_length("caption", 255)
            .override_max_length("descript", 512)
            .override_type(SemanticType::Binary, ["image", "audio", "video", "thumb"]),
        TableDescription::new("k", "TimelineLocks"),
        TableDescription::new("l", "ResearchLogs")
            .override_max_length("task", 512)
            .override_max_length("keywords", 512),
        TableDescription::new("m", "Sources")
            .with_primary_key("majnum")
            .ignore_columns(["firstcd", "status"])
            .override_max_length("title", 255),
        TableDescription::new("n", "Names").with_primary_key("recno"),
        TableDescription::new("nd", "NameDictionary")
            .with_primary_key("uid")
            .override_max_length("value", 255),
        TableDescription::new("npt", "NamePartTypes").with_primary_key("id"),
        TableDescription::new("npv", "NamePartValues"),
        TableDescription::new("o", "FocusGroups").with_primary_key("groupnum"),
        TableDescription::new("p", "Places").with_primary_key("recno"),
        TableDescription::new("pd", "PlaceDictionary")
            .with_primary_key("uid")
            .override_max_length("value", 255),
        TableDescription::new("ppt", "PlacePartTypes").with_primary_key("id"),
        TableDescription::new("ppv", "PlacePartValues"),
        TableDescription::new("r", "Repositories").with_primary_key("recno"),
        TableDescription::new("s", "SourceCitations").with_primary_key("recno"),
        TableDescription::new("st", "Styles")
            .with_primary_key("styleid")
            .override_max_length("st_display", 512),
        TableDescription::new("t", "TagTypes")
            .with_primary_key("etypenum")
            .ignore_column("isreport"),
        TableDescription::new("u", "SourceElements"),
        TableDescription::new("w", "RepositoryLinks"),
        TableDescription::new("xd", "ExcludedPairs"),
        TableDescription::new("_", PROJECT_SETTINGS_TABLE)
            .add_column(settings_column("category", 1))
            .add_column(settings_column("setting", 2))
            .add_column(settings_column("value", 3))
            .add_index(Index::single("category", "category", "category", false))
            .add_index(Index::single("setting", "setting", "setting", false))
            .add_index(Index::composite(
                "category_and_setting",
                "category+setting",
                vec!["category".to_string(), "setting".to_string()],
                true,
            )),
    ]
}
