use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::classify::{default_rules, BotRule};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub leaderboard: LeaderboardConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-repository acquisition timeout in seconds.
    pub timeout_secs: u64,
    /// How many repositories are fetched at the same time.
    pub max_concurrent: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            max_concurrent: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub overall_size: usize,
    pub human_size: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            overall_size: 20,
            human_size: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Site-specific rules appended after the built-in table.
    pub extra_rules: Vec<BotRule>,
}

impl Config {
    /// Defaults, overridden by an optional `contribrank.toml` in the working
    /// directory, overridden by `CONTRIBRANK_*` environment variables.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("contribrank").required(false))
            .add_source(config::Environment::with_prefix("CONTRIBRANK").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn classifier_rules(&self) -> Vec<BotRule> {
        let mut rules = default_rules();
        rules.extend(self.classifier.extra_rules.iter().cloned());
        rules
    }
}
