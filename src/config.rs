//! Run configuration.
//!
//! A configuration is validated once, before any simulation state is
//! created. Nothing inside a run can fail afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the number of step boundaries in one run.
pub const MAX_STEPS: u32 = 1000;

/// How the amount of each payment is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PaymentMode {
    /// Every payment transfers exactly 1.
    #[default]
    Fixed,
    /// Uniform over `[0, limit]`, both ends included. Zero-value
    /// payments are possible and still count as payments.
    Uniform { limit: u64 },
}

/// Errors detected while validating or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("agent count must be positive")]
    NoAgents,
    #[error("island count must be positive")]
    NoIslands,
    #[error("pass count must be positive")]
    NoPasses,
    #[error("step count must be positive")]
    NoSteps,
    #[error("step count {steps} exceeds the maximum of {max}")]
    TooManySteps { steps: u32, max: u32 },
    #[error("{islands} islands do not evenly divide {agents} agents")]
    IslandsDoNotDivideAgents { agents: u32, islands: u32 },
    #[error("{steps} steps do not evenly divide {passes} passes")]
    StepsDoNotDividePasses { passes: u64, steps: u32 },
    #[error("payment limit {limit} over {passes} passes could overflow a balance")]
    PaymentLimitTooLarge { limit: u64, passes: u64 },
    #[error("invalid configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters of one simulation run.
///
/// # Examples
///
/// ```
/// use island_currencies::config::{PaymentMode, SimulationConfig};
///
/// let config = SimulationConfig {
///     agent_count: 20,
///     island_count: 2,
///     pass_count: 100,
///     step_count: 10,
///     payment_mode: PaymentMode::Fixed,
///     seed: Some(7),
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.passes_per_step(), 10);
/// assert_eq!(config.island_divisor(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Population size. Agents are numbered `0..agent_count`.
    pub agent_count: u32,
    /// Number of islands, legal tender included.
    pub island_count: u32,
    /// Total passes in the run, self-payments included.
    pub pass_count: u64,
    /// Number of snapshot boundaries the run is split into.
    pub step_count: u32,
    pub payment_mode: PaymentMode,
    /// RNG seed. Drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            agent_count: 100,
            island_count: 2,
            pass_count: 10_000,
            step_count: 1,
            payment_mode: PaymentMode::Fixed,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every validity rule. Runs before any simulation state exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_count == 0 {
            return Err(ConfigError::NoAgents);
        }
        if self.island_count == 0 {
            return Err(ConfigError::NoIslands);
        }
        if self.pass_count == 0 {
            return Err(ConfigError::NoPasses);
        }
        if self.step_count == 0 {
            return Err(ConfigError::NoSteps);
        }
        if self.step_count > MAX_STEPS {
            return Err(ConfigError::TooManySteps {
                steps: self.step_count,
                max: MAX_STEPS,
            });
        }
        if self.agent_count % self.island_count != 0 {
            return Err(ConfigError::IslandsDoNotDivideAgents {
                agents: self.agent_count,
                islands: self.island_count,
            });
        }
        if self.pass_count % u64::from(self.step_count) != 0 {
            return Err(ConfigError::StepsDoNotDividePasses {
                passes: self.pass_count,
                steps: self.step_count,
            });
        }
        if let PaymentMode::Uniform { limit } = self.payment_mode {
            // No balance can move by more than limit * pass_count over a run.
            let worst = limit.checked_mul(self.pass_count);
            if worst.map_or(true, |w| w > i64::MAX as u64) {
                return Err(ConfigError::PaymentLimitTooLarge {
                    limit,
                    passes: self.pass_count,
                });
            }
        }
        Ok(())
    }

    /// Passes run between two step boundaries.
    pub fn passes_per_step(&self) -> u64 {
        self.pass_count / u64::from(self.step_count.max(1))
    }

    /// Size of each island's contiguous agent block.
    pub fn island_divisor(&self) -> u32 {
        self.agent_count / self.island_count.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_steps_must_divide_passes() {
        let config = SimulationConfig {
            pass_count: 100,
            step_count: 3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StepsDoNotDividePasses { passes: 100, steps: 3 })
        ));
    }

    #[test]
    fn test_islands_must_divide_agents() {
        let config = SimulationConfig {
            agent_count: 10,
            island_count: 3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IslandsDoNotDivideAgents { .. })
        ));
    }

    #[test]
    fn test_step_bound() {
        let config = SimulationConfig {
            pass_count: 2000,
            step_count: 2000,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManySteps { steps: 2000, .. })
        ));

        let at_bound = SimulationConfig {
            pass_count: 2000,
            step_count: MAX_STEPS,
            ..Default::default()
        };
        assert!(at_bound.validate().is_ok());
    }

    #[test]
    fn test_zero_counts_rejected() {
        let no_agents = SimulationConfig {
            agent_count: 0,
            ..Default::default()
        };
        assert!(matches!(no_agents.validate(), Err(ConfigError::NoAgents)));

        let no_islands = SimulationConfig {
            island_count: 0,
            ..Default::default()
        };
        assert!(matches!(no_islands.validate(), Err(ConfigError::NoIslands)));

        let no_steps = SimulationConfig {
            step_count: 0,
            ..Default::default()
        };
        assert!(matches!(no_steps.validate(), Err(ConfigError::NoSteps)));
    }

    #[test]
    fn test_payment_limit_bounded_by_balance_range() {
        let huge = SimulationConfig {
            payment_mode: PaymentMode::Uniform { limit: u64::MAX },
            ..Default::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::PaymentLimitTooLarge { limit: u64::MAX, .. })
        ));

        // Two passes at i64::MAX each could push one balance past the range.
        let overflowing = SimulationConfig {
            pass_count: 2,
            payment_mode: PaymentMode::Uniform {
                limit: i64::MAX as u64,
            },
            ..Default::default()
        };
        assert!(matches!(
            overflowing.validate(),
            Err(ConfigError::PaymentLimitTooLarge { passes: 2, .. })
        ));

        let at_bound = SimulationConfig {
            pass_count: 1,
            payment_mode: PaymentMode::Uniform {
                limit: i64::MAX as u64,
            },
            ..Default::default()
        };
        assert!(at_bound.validate().is_ok());
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{"agent_count": 30, "island_count": 3,
                "payment_mode": {"mode": "uniform", "limit": 5}}"#,
        )
        .unwrap();
        assert_eq!(config.agent_count, 30);
        assert_eq!(config.pass_count, 10_000);
        assert_eq!(config.payment_mode, PaymentMode::Uniform { limit: 5 });
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SimulationConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
