//! Simulator configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Settings for one headless battle run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Directory holding `config.toml`, the party files, the board and items.
    pub data_dir: PathBuf,
    /// Overrides the seed from `config.toml`.
    pub seed: Option<u64>,
    /// Overrides the speed multiplier from `config.toml`.
    pub speed_multiplier: Option<f32>,
    /// Simulated seconds per tick.
    pub tick_seconds: f32,
    pub max_ticks: u64,
    /// Print the final report as JSON on stdout.
    pub report_json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            seed: None,
            speed_multiplier: None,
            tick_seconds: 1.0 / 30.0,
            max_ticks: 100_000,
            report_json: false,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_DATA_DIR` - Content directory (default: `data`)
    /// - `BATTLE_SEED` - RNG seed override (default: from `config.toml`)
    /// - `BATTLE_SPEED` - Speed multiplier override (default: from `config.toml`)
    /// - `BATTLE_TICK_SECONDS` - Seconds per tick (default: 1/30)
    /// - `BATTLE_MAX_TICKS` - Tick limit before giving up (default: 100000)
    /// - `BATTLE_REPORT_JSON` - Print the report as JSON (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("BATTLE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        config.seed = read_env::<u64>("BATTLE_SEED");
        config.speed_multiplier = read_env::<f32>("BATTLE_SPEED");

        if let Some(seconds) = read_env::<f32>("BATTLE_TICK_SECONDS") {
            if seconds.is_finite() && seconds > 0.0 {
                config.tick_seconds = seconds;
            }
        }

        if let Some(limit) = read_env::<u64>("BATTLE_MAX_TICKS") {
            config.max_ticks = limit.max(1);
        }

        // A bare `BATTLE_REPORT_JSON=` also counts as enabled.
        if let Some(enable) = read_env::<bool>("BATTLE_REPORT_JSON") {
            config.report_json = enable;
        } else if env::var("BATTLE_REPORT_JSON").is_ok() {
            config.report_json = true;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_thirty_ticks_per_second() {
        let config = SimConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!((config.tick_seconds * 30.0 - 1.0).abs() < 1e-6);
        assert_eq!(config.max_ticks, 100_000);
        assert!(config.seed.is_none());
        assert!(!config.report_json);
    }
}
