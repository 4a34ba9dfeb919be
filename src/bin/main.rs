//! hops CLI - work with a Hopsworks feature store from the terminal
//!
//! Usage:
//!   hops login
//!   hops project list | use <name> | info [name]
//!   hops fs list
//!   hops fg list | info <name> | features <name> | create <name> ... | delete <name>
//!   hops fv list | info <name> | create <name> ... | delete <name>
//!   hops job list | info | status | run | stop | logs | history <name>
//!
//! Examples:
//!   hops login --host c.app.hopsworks.ai
//!   hops project use fraud
//!   hops fg create users --primary-key user_id --features "user_id:bigint,age:int"
//!   hops fv create enriched --feature-group transactions \
//!     --join "products LEFT product_id=id p_" --dry-run
//!   hops job run backfill --wait --poll 5

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hops::commands::{
    self, fg::FgCommand, fs::FsCommand, fv::FvCommand, job::JobCommand,
    project::ProjectCommand, Context,
};
use hops::config::Settings;
use hops::output::{self, Printer};

#[derive(Parser)]
#[command(name = "hops")]
#[command(about = "hops - Command-line client for the Hopsworks feature store")]
#[command(version)]
struct Cli {
    /// Hopsworks host (overrides config and REST_ENDPOINT)
    #[arg(long, global = true)]
    host: Option<String>,

    /// API key (overrides config and HOPSWORKS_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Project name (overrides config and PROJECT_NAME)
    #[arg(long, global = true)]
    project: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check credentials and save them to the config file
    Login,

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage feature stores
    #[command(subcommand)]
    Fs(FsCommand),

    /// Manage feature groups
    #[command(subcommand)]
    Fg(FgCommand),

    /// Manage feature views
    #[command(subcommand)]
    Fv(FvCommand),

    /// Manage jobs
    #[command(subcommand)]
    Job(JobCommand),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("HOPS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("hops={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> hops::Result<()> {
    let mut settings = Settings::load()?;
    // Login persists whatever it was given, so flags are not one-off there.
    let login = matches!(cli.command, Commands::Login);
    let project_override = cli.project.is_some() && !login;
    settings.apply_overrides(cli.host, cli.api_key, cli.project);
    if project_override {
        // A project given by name must be looked up again.
        settings.project_id = 0;
        settings.feature_store_id = 0;
    }

    // Never persist a selection made through one-off flags.
    let config_path = if project_override {
        None
    } else {
        Settings::default_path().ok()
    };

    let mut ctx = Context::new(settings, Printer::new(cli.json), config_path);
    if project_override {
        select_project(&mut ctx).await?;
    }

    match cli.command {
        Commands::Login => commands::login::run(&mut ctx).await,
        Commands::Fs(command) => commands::fs::run(&mut ctx, command).await,
        Commands::Project(command) => commands::project::run(&mut ctx, command).await,
        Commands::Fg(command) => commands::fg::run(&mut ctx, command).await,
        Commands::Fv(command) => commands::fv::run(&mut ctx, command).await,
        Commands::Job(command) => commands::job::run(&mut ctx, command).await,
    }
}

/// Resolve `--project <name>` to ids for this invocation only.
async fn select_project(ctx: &mut Context) -> hops::Result<()> {
    let project = ctx.client()?.project_by_name(&ctx.settings.project).await?;
    ctx.settings.project_id = project.project_id;
    Ok(())
}
