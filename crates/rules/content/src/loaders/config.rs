//! Rules configuration loader.

use std::path::Path;

use rules_core::RulesConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for automation settings from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`RulesConfig`] from a TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RulesConfig> {
        let config: RulesConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules config TOML: {}", e))?;
        if config.diagnostic_capacity == 0 {
            anyhow::bail!("diagnostic_capacity must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ConfigLoader::parse("remove_expired_effects = true\n").unwrap();
        assert!(config.remove_expired_effects);
        assert_eq!(config.diagnostic_capacity, RulesConfig::DEFAULT_DIAGNOSTIC_CAPACITY);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(ConfigLoader::parse("diagnostic_capacity = 0").is_err());
    }
}
