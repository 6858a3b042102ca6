//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`BattleConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(config.speed_multiplier.is_finite() && config.speed_multiplier > 0.0) {
            anyhow::bail!(
                "speed_multiplier must be a positive number, got {}",
                config.speed_multiplier
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = ConfigLoader::parse("seed = 7\nattack_delay = 0.25\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.attack_delay, 0.25);
        assert_eq!(config.speed_multiplier, 1.0);
        assert_eq!(config.enemy_head_start, BattleConfig::DEFAULT_ENEMY_HEAD_START);
    }

    #[test]
    fn rejects_non_positive_speed() {
        assert!(ConfigLoader::parse("speed_multiplier = 0.0").is_err());
        assert!(ConfigLoader::parse("speed_multiplier = \"fast\"").is_err());
    }
}
