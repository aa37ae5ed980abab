use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::compat::Compatibility;
use crate::error::{MatchError, Result};
use crate::matcher::SearchSettings;
use crate::normalize::{AliasTable, Families, Family, Normalizer};

/// Read from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "gift_exchange.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: Columns,
    /// Fraction of a giftee's favorites that must survive the creator's refusals.
    pub mismatch_threshold: f64,
    /// Extra alias entries; an empty value marks filler.
    pub aliases: BTreeMap<String, String>,
    pub families: BTreeMap<String, Family>,
    /// Creator id -> the only giftee that creator may be assigned.
    pub forced_pairings: BTreeMap<String, String>,
    pub search: SearchSettings,
}

/// Survey column headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub id: String,
    pub favorite_entities: String,
    pub refused_entities: String,
    pub favorite_pairings: String,
    pub refused_pairings: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            id: "Email Address".to_string(),
            favorite_entities: "Favorite character(s)".to_string(),
            refused_entities: "Characters I do not want to create for".to_string(),
            favorite_pairings: "Favorite ships".to_string(),
            refused_pairings: "Ships I do not want to create for".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: Columns::default(),
            mismatch_threshold: 1.0,
            aliases: BTreeMap::new(),
            families: BTreeMap::new(),
            forced_pairings: BTreeMap::new(),
            search: SearchSettings::default(),
        }
    }
}

impl Config {
    /// Loads `path`, or `gift_exchange.toml` if present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MatchError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.mismatch_threshold) {
            return Err(MatchError::Config(format!(
                "mismatch_threshold must be between 0.0 and 1.0, got {}",
                self.mismatch_threshold
            )));
        }
        for (name, family) in &self.families {
            if family.members.is_empty() {
                return Err(MatchError::Config(format!(
                    "family '{}' has no members",
                    name
                )));
            }
            if !family.joiner_is_usable() {
                return Err(MatchError::Config(format!(
                    "family '{}' has joiner {:?}, which is rewritten before family lookup",
                    name,
                    family.joiner.as_deref().unwrap_or_default()
                )));
            }
        }
        Ok(())
    }

    /// Built-in alias table plus this config's additions and families.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(
            AliasTable::builtin().with_overrides(&self.aliases),
            Families::new(self.families.clone()),
        )
    }

    pub fn compatibility(&self) -> Compatibility {
        Compatibility::new(self.mismatch_threshold)
            .with_forced_pairings(self.forced_pairings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Strategy;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.mismatch_threshold, 1.0);
        assert_eq!(config.columns.id, "Email Address");
        assert_eq!(config.search.strategy, Strategy::Graph);
        assert_eq!(config.search.max_attempts, 10_000_000);
        assert!(config.forced_pairings.is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
mismatch_threshold = 0.5

[columns]
id = "email"
favorite_entities = "desired_characters"

[aliases]
"strawhat" = "luffy"
"nobody" = ""

[families."monkey d."]
members = ["dragon", "garp", "luffy"]

[forced_pairings]
"a@example.com" = "b@example.com"

[search]
strategy = "brute-force"
max_attempts = 500
seed = 7
"#,
        )
        .unwrap();

        assert_eq!(config.mismatch_threshold, 0.5);
        assert_eq!(config.columns.id, "email");
        assert_eq!(config.columns.refused_pairings, "Ships I do not want to create for");
        assert_eq!(config.search.strategy, Strategy::BruteForce);
        assert_eq!(config.search.max_attempts, 500);
        assert_eq!(config.search.progress_interval, 100);
        assert_eq!(config.search.seed, Some(7));

        let normalizer = config.normalizer();
        assert_eq!(normalizer.normalize("Strawhat, nobody, monkey d."), vec!["luffy", "dragon", "garp", "luffy"]);
    }

    #[test]
    fn test_threshold_out_of_range_is_rejected() {
        let config: Config = toml::from_str("mismatch_threshold = 1.5").unwrap();
        assert!(matches!(config.validate(), Err(MatchError::Config(_))));
    }

    #[test]
    fn test_rewritten_family_joiner_is_rejected() {
        let config: Config = toml::from_str(
            r#"
[families.vinsmoke]
members = ["niji"]
joiner = "-"
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vinsmoke"));

        let config: Config = toml::from_str(
            r#"
[families.vinsmoke]
members = ["niji"]
joiner = "_"
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.normalizer().normalize("Vinsmoke_Niji"), vec!["niji"]);
    }

    #[test]
    fn test_load_reads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mismatch_threshold = 0.75").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.mismatch_threshold, 0.75);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/gift_exchange.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
