//! Scenario configuration, read from the environment.

use crate::error::{Result, ScenarioError};

/// Knobs for the demo scenarios.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Runtime worker threads.
    pub workers: usize,
    /// Counter replicas, and concurrent DAG branches.
    pub replicas: usize,
    /// Random sync rounds between counter replicas.
    pub rounds: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            replicas: 5,
            rounds: 40,
        }
    }
}

impl ScenarioConfig {
    /// Defaults overridden by `VRDS_WORKERS`, `VRDS_REPLICAS` and `VRDS_ROUNDS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.merge_with_env()?;
        Ok(config)
    }

    pub fn merge_with_env(&mut self) -> Result<()> {
        if let Some(workers) = read_var("VRDS_WORKERS")? {
            self.workers = workers;
        }
        if let Some(replicas) = read_var("VRDS_REPLICAS")? {
            self.replicas = replicas;
        }
        if let Some(rounds) = read_var("VRDS_ROUNDS")? {
            self.rounds = rounds;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ScenarioError::Config("VRDS_WORKERS must be at least 1".into()));
        }
        if self.replicas == 0 {
            return Err(ScenarioError::Config("VRDS_REPLICAS must be at least 1".into()));
        }
        Ok(())
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }
}

fn read_var(name: &str) -> Result<Option<usize>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ScenarioError::Config(format!("Invalid number in {name}: {value:?}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ScenarioConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ScenarioConfig::default()
            .with_workers(2)
            .with_replicas(3)
            .with_rounds(7);
        assert_eq!(config.workers, 2);
        assert_eq!(config.replicas, 3);
        assert_eq!(config.rounds, 7);
    }

    #[test]
    fn test_zero_replicas_rejected() {
        let config = ScenarioConfig::default().with_replicas(0);
        assert!(matches!(config.validate(), Err(ScenarioError::Config(_))));
    }
}
