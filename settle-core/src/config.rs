//! Configuration for expense splitting

use crate::optimizer::DebtOptimizer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Splitter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Debt optimizer configuration
    pub optimizer: OptimizerConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Graph rendering configuration
    pub graph: GraphConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            optimizer: OptimizerConfig::default(),
            display: DisplayConfig::default(),
            graph: GraphConfig::default(),
        }
    }
}

/// Debt optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Balances within this distance of zero are settled (default: 0.01)
    pub settle_epsilon: Decimal,

    /// Decimal places transfers are rounded to (default: 2)
    pub decimal_places: u32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            settle_epsilon: Decimal::new(1, 2),
            decimal_places: 2,
        }
    }
}

impl OptimizerConfig {
    /// Build the optimizer described by this section
    pub fn build(&self) -> crate::Result<DebtOptimizer> {
        DebtOptimizer::new(self.settle_epsilon, self.decimal_places)
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Symbol printed in front of amounts
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

/// Graph rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Canvas width in pixels
    pub width: f64,

    /// Canvas height in pixels
    pub height: f64,

    /// Radius of the circle participants sit on
    pub radius: f64,

    /// Radius of each participant node
    pub node_radius: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 280.0,
            radius: 90.0,
            node_radius: 22.0,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `SETTLE_*` environment variables
    pub fn apply_env(&mut self) -> crate::Result<()> {
        if let Ok(epsilon) = std::env::var("SETTLE_EPSILON") {
            self.optimizer.settle_epsilon = Decimal::from_str(epsilon.trim()).map_err(|e| {
                crate::Error::Config(format!("SETTLE_EPSILON {:?}: {}", epsilon, e))
            })?;
        }

        if let Ok(places) = std::env::var("SETTLE_DECIMAL_PLACES") {
            self.optimizer.decimal_places = places.trim().parse().map_err(|e| {
                crate::Error::Config(format!("SETTLE_DECIMAL_PLACES {:?}: {}", places, e))
            })?;
        }

        if let Ok(symbol) = std::env::var("SETTLE_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        self.validate()
    }

    /// Reject settings the optimizer or renderer cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        self.optimizer.build()?;

        let graph = &self.graph;
        if graph.width <= 0.0 || graph.height <= 0.0 {
            return Err(crate::Error::Config(format!(
                "graph canvas must have a positive size, got {}x{}",
                graph.width, graph.height
            )));
        }
        if graph.radius <= 0.0 || graph.node_radius <= 0.0 {
            return Err(crate::Error::Config(
                "graph radii must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
