//! Jobs and their executions.

use serde_json::json;
use tracing::info;

use super::error::{ClientError, ClientResult};
use super::http::{ApiPath, HopsworksClient};
use crate::model::{Execution, ExecutionLog, Job, LogType};

impl HopsworksClient {
    fn job_path(&self, job: &str) -> ClientResult<ApiPath> {
        Ok(self.project_path()?.push("jobs").push(job))
    }

    fn execution_path(&self, job: &str, execution: i64) -> ClientResult<ApiPath> {
        Ok(self.job_path(job)?.push("executions").push(execution))
    }

    pub async fn list_jobs(&self) -> ClientResult<Vec<Job>> {
        let path = self.project_path()?.push("jobs");
        self.get_list(&path).await
    }

    /// One job with its configuration.
    pub async fn job(&self, name: &str) -> ClientResult<Job> {
        self.get_object(&self.job_path(name)?, "job").await
    }

    /// Most recent executions first.
    pub async fn list_executions(&self, job: &str, limit: usize) -> ClientResult<Vec<Execution>> {
        let path = self
            .job_path(job)?
            .push("executions")
            .query("sort_by", "submissionTime:desc")
            .query("limit", limit.max(1));
        self.get_list(&path).await
    }

    /// The newest execution, or `None` if the job never ran.
    pub async fn latest_execution(&self, job: &str) -> ClientResult<Option<Execution>> {
        Ok(self.list_executions(job, 1).await?.into_iter().next())
    }

    /// Start an execution; `args` is sent verbatim as the text body.
    pub async fn run_job(&self, job: &str, args: Option<&str>) -> ClientResult<Execution> {
        let path = self.job_path(job)?.push("executions");
        let body = self
            .post_text(&path, args.unwrap_or_default().to_string())
            .await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::parse("execution", e))
    }

    /// Ask the backend to stop a running execution.
    pub async fn stop_execution(&self, job: &str, execution: i64) -> ClientResult<Execution> {
        let path = self.execution_path(job, execution)?.push("status");
        info!(job, execution, "stopping execution");
        let body = self.put_json(&path, &json!({ "state": "stopped" })).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::parse("execution", e))
    }

    pub async fn execution_log(
        &self,
        job: &str,
        execution: i64,
        log_type: LogType,
    ) -> ClientResult<ExecutionLog> {
        let path = self
            .execution_path(job, execution)?
            .push("log")
            .push(log_type.as_str());
        self.get_object(&path, "execution log").await
    }
}
