use mapsql::{BuilderConfig, Mapping};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "invalid config file {}: {e:#}",
                config_path.display()
            )
        })?;

        tracing::debug!(
            target: "mapsql.cli",
            config = %config_path.display(),
            tables = file.tables.len(),
            "loaded config"
        );

        Ok(Self { config_path, file })
    }

    /// Mapping declared under `[tables.<name>]`.
    pub fn mapping(&self, table: &str) -> anyhow::Result<&Mapping> {
        self.file.tables.get(table).ok_or_else(|| {
            anyhow::anyhow!(
                "table {table} is not defined in {}",
                self.config_path.display()
            )
        })
    }
}

/// `mapsql.toml`:
///
/// ```toml
/// [builder]
/// limit_policy = "lenient"
/// fallback_page = { offset = 0, limit = 50 }
///
/// [tables.users]
/// user_id = "number"
/// name = "string"
/// location = "point"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub builder: BuilderConfig,

    #[serde(default)]
    pub tables: BTreeMap<String, Mapping>,
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(raw)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tables.is_empty() {
            anyhow::bail!("at least one [tables.<name>] section is required");
        }
        for (name, mapping) in &self.tables {
            mapsql::ident::validate_table(name)?;
            if mapping.is_empty() {
                anyhow::bail!("tables.{name} must declare at least one field");
            }
        }
        if let Some(page) = self.builder.fallback_page {
            if page.offset < 0 || page.limit < 0 {
                anyhow::bail!("builder.fallback_page offset and limit must not be negative");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsql::{FieldType, LimitPolicy, Page};

    #[test]
    fn parse_builder_and_tables() {
        let file = ConfigFile::parse(
            r#"
[builder]
limit_policy = "lenient"
fallback_page = { offset = 0, limit = 50 }

[tables.users]
user_id = "number"
name = "string"
location = "point"
"#,
        )
        .unwrap();

        assert_eq!(file.builder.limit_policy, LimitPolicy::Lenient);
        assert_eq!(file.builder.fallback_page, Some(Page::new(0, 50)));
        let users = &file.tables["users"];
        assert_eq!(users.get("location"), Some(FieldType::Point));
        assert_eq!(users.len(), 3);
    }

    #[test]
    fn builder_section_is_optional() {
        let file = ConfigFile::parse("[tables.t]\nid = \"number\"\n").unwrap();
        assert_eq!(file.builder, BuilderConfig::default());
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(ConfigFile::parse("").is_err());
        assert!(ConfigFile::parse("[tables.t]\n").is_err());
        assert!(ConfigFile::parse("[tables.t]\nid = \"uuid\"\n").is_err());
        assert!(ConfigFile::parse("[tables.\"bad name\"]\nid = \"number\"\n").is_err());
    }
}
