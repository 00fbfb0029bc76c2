//! Optional TOML settings for the command-line tools.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bandits_core::{Rules, SearchConfig};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub rules: Rules,
    pub search: SearchConfig,
}

impl ToolConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandits_core::SearchStrategy;
    use tempfile::tempdir;

    #[test]
    fn missing_tables_fall_back_to_defaults() {
        let config: ToolConfig = toml::from_str("[search]\nstrategy = \"bracketed\"\n").unwrap();
        assert_eq!(config.rules, Rules::default());
        assert_eq!(config.search.strategy, SearchStrategy::Bracketed);
        assert_eq!(config.search.max_power, 200);
    }

    #[test]
    fn load_reads_rules_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bandits.toml");
        fs::write(&path, "[rules]\nhit_points = 300\n\n[search]\nmax_power = 40\nbatch_size = 4\n")
            .unwrap();

        let config = ToolConfig::load(&path).unwrap();
        assert_eq!(config.rules, Rules { hit_points: 300, attack_power: 3 });
        assert_eq!(config.search.max_power, 40);
        assert_eq!(config.search.batch_size, 4);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<ToolConfig>("[rulez]\nhit_points = 1\n").is_err());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = ToolConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
        assert_eq!(ToolConfig::load_or_default(None).unwrap(), ToolConfig::default());
    }
}
