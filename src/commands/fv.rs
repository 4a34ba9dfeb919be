//! `hops fv`

use clap::{Args, Subcommand};
use tracing::{debug, info};

use super::{split_list, Context};
use crate::error::{Error, Result};
use crate::model::FeatureGroup;
use crate::output::{truncate, MAX_CELL_WIDTH};
use crate::planner::wire::{FeatureViewRequest, QueryContext};
use crate::planner::{
    parse_join_spec, parse_name_version, resolve_joins, JoinSpec, PlanResult, QueryTreeBuilder,
};

#[derive(Debug, Subcommand)]
pub enum FvCommand {
    /// List feature views
    List,

    /// Show feature view details and its source query
    Info {
        name: String,

        /// Feature view version (latest if omitted)
        #[arg(long)]
        version: Option<u32>,
    },

    /// Create a feature view from a base feature group and optional joins
    #[command(after_help = CREATE_HELP)]
    Create(CreateViewOptions),

    /// Delete a feature view
    Delete {
        name: String,

        /// Version to delete (all versions if omitted)
        #[arg(long)]
        version: Option<u32>,
    },
}

const CREATE_HELP: &str = "\
Join spec: \"<fg>[:<version>] <INNER|LEFT|RIGHT|FULL> <on>[=<right_on>] [prefix]\"

Examples:
  hops fv create enriched --feature-group transactions \\
    --join \"products LEFT product_id=id p_\"
  hops fv create full --feature-group orders \\
    --join \"customers LEFT customer_id\" \\
    --join \"products LEFT product_id=id p_\" \\
    --join \"categories LEFT p_category_id=id\"";

/// Options of one `fv create` invocation.
#[derive(Debug, Clone, Args)]
pub struct CreateViewOptions {
    /// Feature view name
    pub name: String,

    /// Feature view version
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub version: u32,

    /// Base feature group, as `<name>[:<version>]`
    #[arg(long = "feature-group", visible_alias = "base")]
    pub feature_group: String,

    /// Base feature group version (overrides a `:<version>` suffix)
    #[arg(long = "fg-version", value_parser = clap::value_parser!(u32).range(1..))]
    pub fg_version: Option<u32>,

    /// Base features to select, comma-separated (all if omitted)
    #[arg(long)]
    pub features: Option<String>,

    /// Label columns, comma-separated
    #[arg(long)]
    pub labels: Option<String>,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Join spec; repeat for several joins
    #[arg(long = "join")]
    pub joins: Vec<String>,

    /// Reject joins whose left key no feature group in the query owns
    #[arg(long)]
    pub strict_joins: bool,

    /// Print the request instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl CreateViewOptions {
    /// Parse every `--join` flag, failing on the first malformed one.
    pub fn join_specs(&self) -> PlanResult<Vec<JoinSpec>> {
        self.joins.iter().map(|raw| parse_join_spec(raw)).collect()
    }

    pub fn selected_features(&self) -> Option<Vec<String>> {
        self.features.as_deref().map(split_list)
    }

    pub fn label_names(&self) -> Vec<String> {
        self.labels.as_deref().map(split_list).unwrap_or_default()
    }
}

pub async fn run(ctx: &mut Context, command: FvCommand) -> Result<()> {
    match command {
        FvCommand::List => list(ctx).await,
        FvCommand::Info { name, version } => show(ctx, &name, version).await,
        FvCommand::Create(options) => create(ctx, options).await,
        FvCommand::Delete { name, version } => delete(ctx, &name, version).await,
    }
}

async fn list(ctx: &mut Context) -> Result<()> {
    let views = ctx.store_client().await?.list_feature_views().await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&views)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = views
        .iter()
        .map(|fv| {
            vec![
                fv.name.clone(),
                fv.version.to_string(),
                fv.features.len().to_string(),
                truncate(&fv.description, MAX_CELL_WIDTH),
            ]
        })
        .collect();
    ctx.printer
        .table(&["NAME", "VERSION", "FEATURES", "DESCRIPTION"], &rows)?;
    Ok(())
}

async fn show(ctx: &mut Context, name: &str, version: Option<u32>) -> Result<()> {
    let client = ctx.store_client().await?;
    let view = client.feature_view(name, version).await?;

    // Older backends have no query endpoint; the view is still worth showing.
    let query = match client.feature_view_query(&view.name, view.version).await {
        Ok(summary) => Some(summary),
        Err(e) => {
            debug!(error = %e, "feature view query unavailable");
            None
        }
    };

    if ctx.printer.is_json() {
        ctx.printer
            .print_json(&serde_json::json!({ "featureView": view, "query": query }))?;
        return Ok(());
    }

    let mut pairs = vec![
        ("Feature View", format!("{} (v{})", view.name, view.version)),
        ("ID", view.id.to_string()),
    ];
    if !view.description.is_empty() {
        pairs.push(("Description", view.description.clone()));
    }
    if !view.labels.is_empty() {
        pairs.push(("Labels", view.labels.join(", ")));
    }
    if let Some(query) = &query {
        pairs.push(("Source", query.base.clone()));
    }
    ctx.printer.details(&pairs);

    if let Some(query) = &query {
        for join in &query.joins {
            let prefix = if join.prefix.is_empty() {
                String::new()
            } else {
                format!(" (prefix: {})", join.prefix)
            };
            println!("  {} JOIN {} v{}{}", join.join_type, join.group, join.version, prefix);
        }
    }
    println!();

    let rows: Vec<Vec<String>> = view
        .features
        .iter()
        .map(|f| vec![f.name.clone(), f.data_type.clone()])
        .collect();
    ctx.printer.table(&["FEATURE", "TYPE"], &rows)?;
    Ok(())
}

async fn create(ctx: &mut Context, options: CreateViewOptions) -> Result<()> {
    // Malformed input fails before any network traffic.
    let specs = options.join_specs()?;
    let mut base_ref = parse_name_version(&options.feature_group)?;
    if let Some(v) = options.fg_version {
        base_ref.version = v;
    }

    let client = ctx.store_client().await?;
    let base = client
        .feature_group(&base_ref.name, Some(base_ref.version))
        .await?;

    let selected = options.selected_features();
    if let Some(features) = &selected {
        check_selection(&base, features)?;
    }

    let resolved = resolve_joins(&client, &specs).await?;
    let builder = QueryTreeBuilder::new(&base, selected);
    let tree = if options.strict_joins {
        builder.build_strict(&resolved)?
    } else {
        builder.build(&resolved)
    };
    info!(base = %base_ref, joins = tree.join_count(), "query tree built");
    for edge in tree.children.iter().filter(|e| !base.has_feature(&e.left_on)) {
        info!(
            group = %edge.spec.group,
            key = %edge.left_on,
            "no feature group owns the join key; attached at the root"
        );
    }

    let query_ctx = QueryContext::for_project(&ctx.settings.project, client.feature_store_id());
    let request = FeatureViewRequest::new(&options.name, options.version, &tree, &query_ctx)
        .with_description(options.description.as_str())
        .with_labels(&options.label_names());

    if options.dry_run {
        if !ctx.printer.is_json() {
            println!("{}", tree.render());
        }
        ctx.printer.print_json(&request)?;
        return Ok(());
    }

    let view = client.create_feature_view(&request).await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&view)?;
    } else {
        ctx.printer.success(format!(
            "Created feature view '{}' v{} (ID: {})",
            view.name, view.version, view.id
        ));
    }
    Ok(())
}

fn check_selection(base: &FeatureGroup, features: &[String]) -> Result<()> {
    let unknown: Vec<&str> = features
        .iter()
        .filter(|f| !base.has_feature(f))
        .map(String::as_str)
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(Error::Usage(format!(
            "feature group '{}' has no feature(s): {}",
            base.name,
            unknown.join(", ")
        )))
    }
}

async fn delete(ctx: &mut Context, name: &str, version: Option<u32>) -> Result<()> {
    ctx.store_client()
        .await?
        .delete_feature_view(name, version)
        .await?;

    match version {
        Some(v) => ctx
            .printer
            .success(format!("Deleted feature view '{}' v{}", name, v)),
        None => ctx
            .printer
            .success(format!("Deleted all versions of feature view '{}'", name)),
    }
    Ok(())
}
