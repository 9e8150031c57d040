//! Scenario files pairing a board layout with the match history the planner needs.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use breach_planner_core::Breach;
use breach_planner_system_turn::StrategyConfig;
use breach_planner_world::Layout;
use serde::Deserialize;

const SUPPORTED_SCENARIO_VERSION: u32 = 1;

/// Board state, breaches, and strategy tunables loaded from TOML.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Scenario {
    version: u32,
    #[serde(default)]
    pub(crate) layout: Layout,
    #[serde(default)]
    pub(crate) breaches: Vec<Breach>,
    #[serde(default)]
    pub(crate) strategy: StrategyConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            version: SUPPORTED_SCENARIO_VERSION,
            layout: Layout::default(),
            breaches: Vec::new(),
            strategy: StrategyConfig::default(),
        }
    }
}

impl Scenario {
    /// Reads and validates a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load scenario at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        if scenario.version != SUPPORTED_SCENARIO_VERSION {
            bail!(
                "unsupported scenario version {}; expected {}",
                scenario.version,
                SUPPORTED_SCENARIO_VERSION
            );
        }
        Ok(scenario)
    }
}

/// Reads a standalone strategy file.
pub(crate) fn load_strategy(path: &Path) -> Result<StrategyConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read strategy config at {}", path.display()))?;
    toml::from_str(&contents).context("failed to parse strategy config toml contents")
}
