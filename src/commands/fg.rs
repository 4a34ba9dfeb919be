//! `hops fg`

use clap::{Args, Subcommand, ValueEnum};

use super::Context;
use crate::error::Result;
use crate::model::FeatureGroup;
use crate::output::{truncate, MAX_CELL_WIDTH};
use crate::planner::wire::FeatureGroupRequest;
use crate::planner::{PlanResult, SchemaSpec};

#[derive(Debug, Subcommand)]
pub enum FgCommand {
    /// List feature groups
    List,

    /// Show feature group details
    Info {
        name: String,

        /// Feature group version (latest if omitted)
        #[arg(long)]
        version: Option<u32>,
    },

    /// List features with types
    Features {
        name: String,

        /// Feature group version (latest if omitted)
        #[arg(long)]
        version: Option<u32>,
    },

    /// Create a feature group with a schema
    #[command(after_help = CREATE_HELP)]
    Create(CreateGroupOptions),

    /// Delete one version of a feature group
    Delete {
        name: String,

        /// Version to delete
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        version: u32,
    },
}

const CREATE_HELP: &str = "\
Schema: \"<name>[:<type>],...\"; untyped columns are strings.

Examples:
  hops fg create users --primary-key user_id
  hops fg create transactions --primary-key customer_id \\
    --features \"customer_id:bigint,total_spent:double,event_time:timestamp\" \\
    --event-time event_time --online";

/// Storage format that enables time travel on offline data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeTravelFormat {
    Hudi,
    Delta,
}

impl TimeTravelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeTravelFormat::Hudi => "HUDI",
            TimeTravelFormat::Delta => "DELTA",
        }
    }
}

/// Options of one `fg create` invocation.
#[derive(Debug, Clone, Args)]
pub struct CreateGroupOptions {
    /// Feature group name
    pub name: String,

    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub version: u32,

    /// Primary key columns, comma-separated
    #[arg(long = "primary-key")]
    pub primary_key: String,

    /// Schema as `name[:type],...` (primary keys only if omitted)
    #[arg(long)]
    pub features: Option<String>,

    /// Event time column
    #[arg(long)]
    pub event_time: Option<String>,

    /// Enable online storage
    #[arg(long)]
    pub online: bool,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Time travel format (the backend decides if omitted)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<TimeTravelFormat>,
}

impl CreateGroupOptions {
    pub fn schema(&self) -> PlanResult<SchemaSpec> {
        SchemaSpec::parse(
            self.features.as_deref(),
            &self.primary_key,
            self.event_time.as_deref(),
        )
    }

    /// Request body for a feature store.
    pub fn request(&self, feature_store_id: i64) -> PlanResult<FeatureGroupRequest> {
        Ok(
            FeatureGroupRequest::new(&self.name, self.version, self.schema()?, feature_store_id)
                .online(self.online)
                .with_description(self.description.as_str())
                .with_time_travel_format(self.format.map(|f| f.as_str().to_string())),
        )
    }
}

pub async fn run(ctx: &mut Context, command: FgCommand) -> Result<()> {
    match command {
        FgCommand::List => list(ctx).await,
        FgCommand::Info { name, version } => info(ctx, &name, version).await,
        FgCommand::Features { name, version } => features(ctx, &name, version).await,
        FgCommand::Create(options) => create(ctx, options).await,
        FgCommand::Delete { name, version } => delete(ctx, &name, version).await,
    }
}

async fn list(ctx: &mut Context) -> Result<()> {
    let groups = ctx.store_client().await?.list_feature_groups().await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&groups)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|fg| {
            vec![
                fg.name.clone(),
                fg.version.to_string(),
                fg.type_label().to_string(),
                fg.online_enabled.to_string(),
                fg.features.len().to_string(),
                truncate(&fg.description, MAX_CELL_WIDTH),
            ]
        })
        .collect();
    ctx.printer.table(
        &["NAME", "VERSION", "TYPE", "ONLINE", "FEATURES", "DESCRIPTION"],
        &rows,
    )?;
    Ok(())
}

async fn info(ctx: &mut Context, name: &str, version: Option<u32>) -> Result<()> {
    let fg = ctx.store_client().await?.feature_group(name, version).await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&fg)?;
        return Ok(());
    }

    let mut pairs = vec![
        ("Feature Group", format!("{} (v{})", fg.name, fg.version)),
        ("ID", fg.id.to_string()),
        ("Type", fg.type_label().to_string()),
        ("Online", fg.online_enabled.to_string()),
    ];
    if !fg.description.is_empty() {
        pairs.push(("Description", fg.description.clone()));
    }
    if !fg.event_time.is_empty() {
        pairs.push(("Event Time", fg.event_time.clone()));
    }
    if !fg.time_travel_format.is_empty() {
        pairs.push(("Format", fg.time_travel_format.clone()));
    }
    if let Some(rows) = fg.num_rows {
        pairs.push(("Rows", rows.to_string()));
    }
    ctx.printer.details(&pairs);
    println!();

    feature_table(ctx, &fg)
}

async fn features(ctx: &mut Context, name: &str, version: Option<u32>) -> Result<()> {
    let fg = ctx.store_client().await?.feature_group(name, version).await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&fg.features)?;
        return Ok(());
    }
    feature_table(ctx, &fg)
}

async fn create(ctx: &mut Context, options: CreateGroupOptions) -> Result<()> {
    // A malformed schema fails before any network traffic.
    options.schema()?;

    let client = ctx.store_client().await?;
    let request = options.request(client.feature_store_id())?;
    let fg = client.create_feature_group(&request).await?;

    if ctx.printer.is_json() {
        ctx.printer.print_json(&fg)?;
    } else {
        ctx.printer.success(format!(
            "Created feature group '{}' v{} (ID: {})",
            fg.name, fg.version, fg.id
        ));
    }
    Ok(())
}

async fn delete(ctx: &mut Context, name: &str, version: u32) -> Result<()> {
    let client = ctx.store_client().await?;
    let fg = client.feature_group(name, Some(version)).await?;
    client.delete_feature_group(fg.id).await?;

    ctx.printer
        .success(format!("Deleted feature group '{}' v{}", name, version));
    Ok(())
}

fn feature_table(ctx: &Context, fg: &FeatureGroup) -> Result<()> {
    let rows: Vec<Vec<String>> = fg
        .features
        .iter()
        .map(|f| {
            vec![
                f.name.clone(),
                f.data_type.clone(),
                if f.primary { "yes" } else { "" }.to_string(),
                truncate(&f.description, MAX_CELL_WIDTH),
            ]
        })
        .collect();
    ctx.printer
        .table(&["NAME", "TYPE", "PRIMARY", "DESCRIPTION"], &rows)?;
    Ok(())
}
