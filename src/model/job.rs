// src/model/job.rs
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Execution states after which the backend never changes the execution again.
pub const TERMINAL_STATES: &[&str] = &[
    "FINISHED",
    "FAILED",
    "KILLED",
    "FRAMEWORK_FAILURE",
    "APP_MASTER_START_FAILED",
    "INITIALIZATION_FAILED",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobCreator {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub email: String,
}

/// A job definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub creation_time: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub job_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<JobCreator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl Job {
    /// The `type` recorded in the job configuration, if any.
    pub fn config_type(&self) -> Option<&str> {
        self.config.as_ref()?.get("type")?.as_str()
    }
}

/// One run of a job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub final_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub submission_time: String,
    /// Milliseconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub app_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hdfs_user: String,
}

impl Execution {
    pub fn is_terminal(&self) -> bool {
        TERMINAL_STATES.contains(&self.state.as_str())
    }

    pub fn succeeded(&self) -> bool {
        self.final_status == "SUCCEEDED"
    }
}

/// Which stream of an execution's logs to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogType {
    #[default]
    Out,
    Err,
}

impl LogType {
    /// Path segment of the log endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Out => "OUT",
            LogType::Err => "ERR",
        }
    }
}

/// Aggregated log of one execution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionLog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub log: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "type")]
    pub log_type: String,
}

/// Render a millisecond duration as `"42s"` or `"3m7s"`; zero renders as `"-"`.
pub fn format_duration(ms: i64) -> String {
    if ms <= 0 {
        return "-".to_string();
    }
    let secs = ms / 1000;
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m{}s", secs / 60, secs % 60)
    }
}
