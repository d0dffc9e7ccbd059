//! Errors surfaced by the demo binary.

use thiserror::Error;
use vrds_counter::CounterError;
use vrds_dag::DagError;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("DAG error: {0}")]
    Dag(#[from] DagError),

    #[error("Counter error: {0}")]
    Counter(#[from] CounterError),

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Scenario invariant broken: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
