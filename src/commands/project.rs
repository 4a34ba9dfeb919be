//! `hops project`

use clap::Subcommand;
use serde::Serialize;

use super::Context;
use crate::client::HopsworksClient;
use crate::error::{Error, Result};
use crate::model::Project;
use crate::output::{truncate, MAX_CELL_WIDTH};

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List projects visible to the credential
    List,

    /// Set the active project and resolve its feature store
    Use {
        /// Project name
        name: String,
    },

    /// Show project details (the active project if no name is given)
    Info { name: Option<String> },
}

pub async fn run(ctx: &mut Context, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::List => list(ctx).await,
        ProjectCommand::Use { name } => use_project(ctx, &name).await,
        ProjectCommand::Info { name } => info(ctx, name.as_deref()).await,
    }
}

/// A project as listed, with the active one flagged.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRow<'a> {
    #[serde(flatten)]
    project: &'a Project,
    active: bool,
}

fn project_rows(projects: &[Project], active: i64) -> Vec<ProjectRow<'_>> {
    projects
        .iter()
        .map(|project| ProjectRow {
            project,
            active: project.project_id == active,
        })
        .collect()
}

async fn list(ctx: &Context) -> Result<()> {
    let projects = ctx.client()?.list_projects().await?;
    let rows = project_rows(&projects, ctx.settings.project_id);
    if ctx.printer.is_json() {
        ctx.printer.print_json(&rows)?;
        return Ok(());
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.project.project_name.clone(),
                row.project.project_id.to_string(),
                if row.active { "*" } else { "" }.to_string(),
                truncate(&row.project.description, MAX_CELL_WIDTH),
            ]
        })
        .collect();
    ctx.printer
        .table(&["NAME", "ID", "ACTIVE", "DESCRIPTION"], &cells)?;
    Ok(())
}

async fn use_project(ctx: &mut Context, name: &str) -> Result<()> {
    let project = ctx.client()?.project_by_name(name).await?;
    ctx.settings.project = project.project_name.clone();
    ctx.settings.project_id = project.project_id;

    // Rebuild the client so feature-store lookups are scoped to the new project.
    let store = HopsworksClient::new(&ctx.settings)?
        .default_feature_store()
        .await?;
    ctx.settings.feature_store_id = store.featurestore_id;
    ctx.persist_selection();

    if ctx.printer.is_json() {
        ctx.printer.print_json(&serde_json::json!({
            "project": project.project_name,
            "projectId": project.project_id,
            "featureStoreId": store.featurestore_id,
        }))?;
    } else {
        ctx.printer.success(format!(
            "Active project: {} (ID: {}, FS: {})",
            project.project_name, project.project_id, store.featurestore_id
        ));
    }
    Ok(())
}

async fn info(ctx: &Context, name: Option<&str>) -> Result<()> {
    let client = ctx.client()?;
    let project = match name {
        Some(name) => client.project_by_name(name).await?,
        None if ctx.settings.project_id != 0 => {
            client.project_by_id(ctx.settings.project_id).await?
        }
        None => {
            return Err(Error::Usage(
                "no project given. Pass a name or run 'hops project use <name>' first"
                    .to_string(),
            ))
        }
    };

    if ctx.printer.is_json() {
        ctx.printer.print_json(&project)?;
        return Ok(());
    }

    let auth = if ctx.settings.jwt_token.is_some() {
        "jwt"
    } else {
        "api-key"
    };
    ctx.printer.details(&[
        ("Name", project.project_name.clone()),
        ("ID", project.project_id.to_string()),
        ("Description", project.description.clone()),
        ("Created", project.created.clone()),
        ("Auth", auth.to_string()),
    ]);
    Ok(())
}
