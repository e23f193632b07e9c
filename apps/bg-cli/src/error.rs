//! Error type for the bg-cli front end.

use bg_compose::ComposeError;
use bg_graph::GraphError;
use bg_spec::SpecError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Spec(#[from] SpecError),

    #[error("Build failed: {0}")]
    Compose(#[from] ComposeError),

    #[error("Flattening failed: {0}")]
    Graph(#[from] GraphError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

pub type CliResult<T> = Result<T, CliError>;
