//! `hops job`

use std::time::Duration;

use clap::{Subcommand, ValueEnum};
use serde_json::Value;
use tracing::debug;

use super::Context;
use crate::client::HopsworksClient;
use crate::error::{Error, Result};
use crate::model::job::format_duration;
use crate::model::{Execution, Job, LogType};
use crate::output;

#[derive(Debug, Subcommand)]
pub enum JobCommand {
    /// List jobs in the project
    List,

    /// Show job details and configuration
    Info { name: String },

    /// Show the latest execution of a job
    Status {
        name: String,

        /// Poll until the execution reaches a terminal state
        #[arg(long)]
        wait: bool,

        /// Poll interval in seconds (defaults to `poll_interval_secs`)
        #[arg(long)]
        poll: Option<u64>,
    },

    /// Start a new execution
    Run {
        name: String,

        /// Arguments passed to the job
        #[arg(long)]
        args: Option<String>,

        /// Wait for the execution to finish
        #[arg(long)]
        wait: bool,

        /// Poll interval in seconds (with --wait)
        #[arg(long)]
        poll: Option<u64>,
    },

    /// Stop a running execution
    Stop {
        name: String,

        /// Execution id (latest if omitted)
        #[arg(long = "exec")]
        execution: Option<i64>,
    },

    /// Print the logs of an execution
    Logs {
        name: String,

        /// Execution id (latest if omitted)
        #[arg(long = "exec")]
        execution: Option<i64>,

        /// Which log stream to print
        #[arg(long = "type", value_enum, ignore_case = true, default_value_t = LogStream::Out)]
        stream: LogStream,
    },

    /// List recent executions
    History {
        name: String,

        /// Maximum number of executions to show
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        limit: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogStream {
    /// Standard output
    Out,
    /// Standard error
    Err,
}

impl From<LogStream> for LogType {
    fn from(stream: LogStream) -> Self {
        match stream {
            LogStream::Out => LogType::Out,
            LogStream::Err => LogType::Err,
        }
    }
}

pub async fn run(ctx: &mut Context, command: JobCommand) -> Result<()> {
    match command {
        JobCommand::List => list(ctx).await,
        JobCommand::Info { name } => info(ctx, &name).await,
        JobCommand::Status { name, wait, poll } => {
            let interval = poll_interval(ctx, poll);
            status(ctx, &name, wait, interval).await
        }
        JobCommand::Run {
            name,
            args,
            wait,
            poll,
        } => {
            let interval = poll_interval(ctx, poll);
            start(ctx, &name, args.as_deref(), wait, interval).await
        }
        JobCommand::Stop { name, execution } => stop(ctx, &name, execution).await,
        JobCommand::Logs {
            name,
            execution,
            stream,
        } => logs(ctx, &name, execution, stream.into()).await,
        JobCommand::History { name, limit } => history(ctx, &name, limit as usize).await,
    }
}

fn poll_interval(ctx: &Context, flag: Option<u64>) -> Duration {
    let secs = flag.unwrap_or(ctx.settings.poll_interval_secs);
    Duration::from_secs(secs.max(1))
}

async fn list(ctx: &Context) -> Result<()> {
    let jobs = ctx.project_client()?.list_jobs().await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&jobs)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = jobs
        .iter()
        .map(|job| {
            vec![job.name.clone(), job_type(job), creator(job)]
        })
        .collect();
    ctx.printer.table(&["NAME", "TYPE", "CREATOR"], &rows)?;
    Ok(())
}

fn job_type(job: &Job) -> String {
    job.config_type()
        .map(str::to_string)
        .unwrap_or_else(|| job.job_type.clone())
}

fn creator(job: &Job) -> String {
    job.creator
        .as_ref()
        .map(|c| c.email.clone())
        .unwrap_or_default()
}

async fn info(ctx: &Context, name: &str) -> Result<()> {
    let job = ctx.project_client()?.job(name).await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&job)?;
        return Ok(());
    }

    ctx.printer.details(&[
        ("Name", job.name.clone()),
        ("ID", job.id.to_string()),
        ("Type", job_type(&job)),
        ("Created", job.creation_time.clone()),
        ("Creator", creator(&job)),
    ]);

    let config = config_pairs(job.config.as_ref());
    if !config.is_empty() {
        println!();
        println!("Config:");
        let pairs: Vec<(&str, String)> = config
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        ctx.printer.details(&pairs);
    }
    Ok(())
}

/// Top-level configuration entries, sorted by key; strings print unquoted.
fn config_pairs(config: Option<&Value>) -> Vec<(String, String)> {
    let Some(Value::Object(map)) = config else {
        return Vec::new();
    };
    let mut pairs: Vec<(String, String)> = map
        .iter()
        .map(|(key, value)| {
            let shown = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), shown)
        })
        .collect();
    pairs.sort();
    pairs
}

/// The newest execution of `name`; a job that never ran is an error here.
async fn latest_execution(client: &HopsworksClient, name: &str) -> Result<Execution> {
    client
        .latest_execution(name)
        .await?
        .ok_or_else(|| Error::Usage(format!("no executions found for '{}'", name)))
}

async fn stop(ctx: &Context, name: &str, execution: Option<i64>) -> Result<()> {
    let client = ctx.project_client()?;
    let id = match execution {
        Some(id) => id,
        None => {
            let latest = latest_execution(&client, name).await?;
            if latest.is_terminal() {
                return Err(Error::Usage(format!(
                    "latest execution #{} is already {}",
                    latest.id, latest.state
                )));
            }
            latest.id
        }
    };

    let stopped = client.stop_execution(name, id).await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&stopped)?;
    } else {
        ctx.printer.success(format!(
            "Stopped execution #{} ({})",
            stopped.id, stopped.state
        ));
    }
    Ok(())
}

async fn logs(ctx: &Context, name: &str, execution: Option<i64>, log_type: LogType) -> Result<()> {
    let client = ctx.project_client()?;
    let id = match execution {
        Some(id) => id,
        None => latest_execution(&client, name).await?.id,
    };

    let log = client.execution_log(name, id, log_type).await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&log)?;
    } else if log.log.is_empty() {
        ctx.printer
            .info(format!("No {} logs for execution #{}", log_type.as_str(), id));
    } else {
        print!("{}", log.log);
    }
    Ok(())
}

async fn history(ctx: &Context, name: &str, limit: usize) -> Result<()> {
    let executions = ctx.project_client()?.list_executions(name, limit).await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&executions)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = executions
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.state.clone(),
                e.final_status.clone(),
                format_duration(e.duration),
                e.submission_time.clone(),
            ]
        })
        .collect();
    ctx.printer
        .table(&["ID", "STATE", "STATUS", "DURATION", "SUBMITTED"], &rows)?;
    Ok(())
}

async fn status(ctx: &Context, name: &str, wait: bool, interval: Duration) -> Result<()> {
    let client = ctx.project_client()?;
    let Some(execution) = client.latest_execution(name).await? else {
        ctx.printer
            .info(format!("No executions found for '{}'", name));
        return Ok(());
    };

    print_status(ctx, name, &execution)?;
    if !wait || execution.is_terminal() {
        return finish(ctx, name, &execution, wait);
    }

    ctx.printer
        .info(format!("Polling every {}s...", interval.as_secs()));
    poll_until_done(ctx, &client, name, interval).await
}

async fn start(
    ctx: &Context,
    name: &str,
    args: Option<&str>,
    wait: bool,
    interval: Duration,
) -> Result<()> {
    let client = ctx.project_client()?;
    let execution = client.run_job(name, args).await?;

    if !wait {
        if ctx.printer.is_json() {
            ctx.printer.print_json(&execution)?;
        } else {
            ctx.printer.success(format!(
                "Started execution #{} for '{}'",
                execution.id, name
            ));
        }
        return Ok(());
    }

    ctx.printer.success(format!(
        "Started execution #{} for '{}'",
        execution.id, name
    ));
    poll_until_done(ctx, &client, name, interval).await
}

/// Poll the latest execution until it reaches a terminal state.
///
/// There is no overall deadline; the user interrupts a job that hangs.
async fn poll_until_done(
    ctx: &Context,
    client: &HopsworksClient,
    name: &str,
    interval: Duration,
) -> Result<()> {
    loop {
        tokio::time::sleep(interval).await;

        let execution = client
            .latest_execution(name)
            .await?
            .ok_or_else(|| Error::Usage(format!("execution of '{}' disappeared", name)))?;
        debug!(id = execution.id, state = %execution.state, "polled execution");

        if ctx.printer.is_json() {
            ctx.printer.print_json(&execution)?;
        } else {
            println!(
                "  #{}  {}  {}  {}",
                execution.id,
                execution.state,
                execution.final_status,
                format_duration(execution.duration)
            );
        }

        if execution.is_terminal() {
            return finish(ctx, name, &execution, true);
        }
    }
}

fn print_status(ctx: &Context, name: &str, execution: &Execution) -> Result<()> {
    if ctx.printer.is_json() {
        ctx.printer.print_json(execution)?;
        return Ok(());
    }
    ctx.printer.details(&[
        ("Job", name.to_string()),
        ("Exec", format!("#{}", execution.id)),
        ("State", execution.state.clone()),
        ("Status", execution.final_status.clone()),
        ("Duration", format_duration(execution.duration)),
        ("Started", execution.submission_time.clone()),
    ]);
    Ok(())
}

/// Report a terminal execution.
///
/// A failure is the command's error when the user waited for it, and only a
/// message otherwise.
fn finish(ctx: &Context, name: &str, execution: &Execution, waited: bool) -> Result<()> {
    if !execution.is_terminal() {
        return Ok(());
    }
    if execution.succeeded() {
        ctx.printer.success(format!(
            "Job finished successfully in {}",
            format_duration(execution.duration)
        ));
        return Ok(());
    }

    let state = format!("{} ({})", execution.state, execution.final_status);
    if waited {
        Err(Error::JobFailed {
            job: name.to_string(),
            state,
        })
    } else {
        if !ctx.printer.is_json() {
            output::error(format!("Job {}", state));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_pairs_sorted_and_unquoted() {
        let config = json!({
            "type": "pythonJobConfiguration",
            "appPath": "Resources/jobs/ingest.py",
            "resourceConfig": {"cores": 1},
            "defaultArgs": null,
        });
        assert_eq!(
            config_pairs(Some(&config)),
            vec![
                ("appPath".to_string(), "Resources/jobs/ingest.py".to_string()),
                ("defaultArgs".to_string(), "null".to_string()),
                ("resourceConfig".to_string(), r#"{"cores":1}"#.to_string()),
                ("type".to_string(), "pythonJobConfiguration".to_string()),
            ]
        );
    }

    #[test]
    fn test_config_pairs_without_object() {
        assert!(config_pairs(None).is_empty());
        assert!(config_pairs(Some(&json!("raw"))).is_empty());
    }

    #[test]
    fn test_log_stream_maps_to_endpoint() {
        assert_eq!(LogType::from(LogStream::Out).as_str(), "OUT");
        assert_eq!(LogType::from(LogStream::Err).as_str(), "ERR");
    }

    #[test]
    fn test_job_type_prefers_config() {
        let job: Job = serde_json::from_value(json!({
            "name": "ingest",
            "jobType": "PYTHON",
            "config": {"type": "pythonJobConfiguration"}
        }))
        .unwrap();
        assert_eq!(job_type(&job), "pythonJobConfiguration");
        assert_eq!(creator(&job), "");
    }
}
