//! `hops fs`

use clap::Subcommand;

use super::Context;
use crate::error::Result;
use crate::model::FeatureStore;

#[derive(Debug, Subcommand)]
pub enum FsCommand {
    /// List feature stores in the project
    List,
}

pub async fn run(ctx: &mut Context, command: FsCommand) -> Result<()> {
    match command {
        FsCommand::List => list(ctx).await,
    }
}

async fn list(ctx: &Context) -> Result<()> {
    let stores = ctx.project_client()?.list_feature_stores().await?;
    if ctx.printer.is_json() {
        ctx.printer.print_json(&stores)?;
        return Ok(());
    }

    let rows = store_rows(&stores, ctx.settings.feature_store_id);
    ctx.printer.table(&["NAME", "ID", "ACTIVE"], &rows)?;
    Ok(())
}

fn store_rows(stores: &[FeatureStore], active: i64) -> Vec<Vec<String>> {
    stores
        .iter()
        .map(|fs| {
            vec![
                fs.featurestore_name.clone(),
                fs.featurestore_id.to_string(),
                if fs.featurestore_id == active { "*" } else { "" }.to_string(),
            ]
        })
        .collect()
}
