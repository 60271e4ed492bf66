//! CLI configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use rules_core::UserId;

/// Settings shared by every subcommand.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub rules_config: Option<PathBuf>,
    pub user: Option<UserId>,
    pub world_time: Option<i64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            rules_config: None,
            user: None,
            world_time: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `RULES_DATA_DIR` - Content directory (default: `data`)
    /// - `RULES_CONFIG` - Rules TOML overriding `<data>/rules.toml`
    /// - `RULES_USER` - User to act as (default: sole authority)
    /// - `RULES_WORLD_TIME` - Starting world time in seconds
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("RULES_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.rules_config = env::var("RULES_CONFIG").ok().map(PathBuf::from);
        config.user = env::var("RULES_USER")
            .ok()
            .filter(|user| !user.is_empty())
            .map(UserId::from);
        config.world_time = read_env::<i64>("RULES_WORLD_TIME");

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
