//! Crate-level error type.

use thiserror::Error;

use crate::client::{ClientError, DecodeError};
use crate::config::SettingsError;
use crate::planner::PlanError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] SettingsError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    /// `hops login` could not list projects with the given credentials.
    #[error("authentication failed: {0}")]
    AuthFailed(#[source] ClientError),

    /// Arguments that parse but cannot be acted on.
    #[error("{0}")]
    Usage(String),

    /// A polled job finished without succeeding.
    #[error("job '{job}' ended in state {state}")]
    JobFailed { job: String, state: String },
}
