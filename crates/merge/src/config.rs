//! Merge configuration: TOML document → validated `MergeConfig`.

use serde::Deserialize;

use crate::error::MergeError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub name: String,
    pub join: JoinConfig,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub reconcile: ReconcilePolicy,
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Field names correlating a main record with a linked record. Supplied by
/// configuration, never inferred from the data.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinConfig {
    pub main_key: String,
    pub linked_key: String,
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub combine: Option<CombineSpec>,
}

impl ColumnSpec {
    /// Header label for display/export: the display name, or the key.
    pub fn label(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.key)
    }
}

fn default_visible() -> bool {
    true
}

/// Declares a derived field: the listed columns joined by the delimiter,
/// recomputed after every merge and never itself reconciled.
#[derive(Debug, Clone, Deserialize)]
pub struct CombineSpec {
    pub columns: Vec<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String {
    " ".into()
}

// ---------------------------------------------------------------------------
// Reconciliation policy
// ---------------------------------------------------------------------------

/// Conflict-resolution knobs. `latest_wins` lists the fields where the side
/// with the later `updated_at` timestamp should win outright; everything
/// else concatenates on disagreement.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconcilePolicy {
    pub latest_wins: Vec<String>,
    pub updated_at: String,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self { latest_wins: Vec::new(), updated_at: "updated_at".into() }
    }
}

impl ReconcilePolicy {
    pub fn is_latest_wins(&self, field: &str) -> bool {
        self.latest_wins.iter().any(|f| f == field)
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// File lists for the collaborator layer. The engine itself never reads
/// files; the CLI resolves these relative to the config document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub main: Vec<String>,
    pub linked: Vec<String>,
    pub headers: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self { main: Vec::new(), linked: Vec::new(), headers: true }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MergeConfig {
    pub fn from_toml(input: &str) -> Result<Self, MergeError> {
        let config: MergeConfig =
            toml::from_str(input).map_err(|e| MergeError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        if self.join.main_key.trim().is_empty() {
            return Err(MergeError::ConfigValidation("join.main_key must not be empty".into()));
        }
        if self.join.linked_key.trim().is_empty() {
            return Err(MergeError::ConfigValidation("join.linked_key must not be empty".into()));
        }

        let mut seen = std::collections::BTreeSet::new();
        for spec in &self.columns {
            if !seen.insert(spec.key.as_str()) {
                return Err(MergeError::ConfigValidation(format!(
                    "duplicate column key '{}'",
                    spec.key
                )));
            }
            if let Some(ref combine) = spec.combine {
                if combine.columns.is_empty() {
                    return Err(MergeError::ConfigValidation(format!(
                        "combine for '{}' lists no source columns",
                        spec.key
                    )));
                }
                // Delimiters are display strings; anything longer is a
                // config mistake, not a separator.
                if combine.delimiter.chars().count() > 8 {
                    return Err(MergeError::ConfigValidation(format!(
                        "combine delimiter for '{}' exceeds 8 characters",
                        spec.key
                    )));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Member roster"

[join]
main_key   = "id"
linked_key = "id"

[[columns]]
key     = "name"
display = "Name"

[[columns]]
key     = "full_name"
display = "Full Name"
combine = { columns = ["last", "first"], delimiter = " " }

[reconcile]
latest_wins = ["status", "role", "department"]
updated_at  = "updated_at"

[sources]
main   = ["roster_a.csv", "roster_b.csv"]
linked = ["departments.csv"]
"#;

    #[test]
    fn parse_valid_config() {
        let config = MergeConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Member roster");
        assert_eq!(config.join.main_key, "id");
        assert_eq!(config.columns.len(), 2);
        assert_eq!(config.columns[0].label(), "Name");
        assert!(config.columns[0].visible);
        assert!(config.reconcile.is_latest_wins("status"));
        assert!(!config.reconcile.is_latest_wins("name"));
        assert_eq!(config.sources.main.len(), 2);
        assert!(config.sources.headers);
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config = MergeConfig::from_toml("[join]\nmain_key = \"id\"\nlinked_key = \"code\"\n")
            .unwrap();
        assert_eq!(config.name, "");
        assert!(config.columns.is_empty());
        assert!(config.reconcile.latest_wins.is_empty());
        assert_eq!(config.reconcile.updated_at, "updated_at");
        assert!(config.sources.main.is_empty());
        assert!(config.sources.headers);
    }

    #[test]
    fn combine_delimiter_defaults_to_space() {
        let config = MergeConfig::from_toml(
            r#"
[join]
main_key = "id"
linked_key = "id"

[[columns]]
key = "full_name"
combine = { columns = ["last", "first"] }
"#,
        )
        .unwrap();
        let combine = config.columns[0].combine.as_ref().unwrap();
        assert_eq!(combine.delimiter, " ");
    }

    #[test]
    fn label_falls_back_to_key() {
        let config = MergeConfig::from_toml(
            "[join]\nmain_key = \"id\"\nlinked_key = \"id\"\n\n[[columns]]\nkey = \"dept\"\n",
        )
        .unwrap();
        assert_eq!(config.columns[0].label(), "dept");
    }

    #[test]
    fn reject_blank_join_key() {
        let err = MergeConfig::from_toml("[join]\nmain_key = \" \"\nlinked_key = \"id\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("main_key"));
    }

    #[test]
    fn reject_duplicate_column_keys() {
        let err = MergeConfig::from_toml(
            r#"
[join]
main_key = "id"
linked_key = "id"

[[columns]]
key = "name"

[[columns]]
key = "name"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column key 'name'"));
    }

    #[test]
    fn reject_empty_combine_columns() {
        let err = MergeConfig::from_toml(
            r#"
[join]
main_key = "id"
linked_key = "id"

[[columns]]
key = "full_name"
combine = { columns = [] }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no source columns"));
    }

    #[test]
    fn reject_oversized_delimiter() {
        let err = MergeConfig::from_toml(
            r#"
[join]
main_key = "id"
linked_key = "id"

[[columns]]
key = "full_name"
combine = { columns = ["a"], delimiter = "----------" }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exceeds 8 characters"));
    }

    #[test]
    fn reject_missing_join_table() {
        let err = MergeConfig::from_toml("name = \"x\"\n").unwrap_err();
        assert!(matches!(err, MergeError::ConfigParse(_)));
    }
}
