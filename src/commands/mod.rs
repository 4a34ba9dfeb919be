//! Subcommand handlers.
//!
//! Each module owns the clap arguments of one command group and an async
//! `run` that executes it against a [`Context`].

pub mod fg;
pub mod fs;
pub mod fv;
pub mod job;
pub mod login;
pub mod project;

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::client::HopsworksClient;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::output::Printer;

/// State shared by every command invocation.
pub struct Context {
    pub settings: Settings,
    pub printer: Printer,
    /// Where project selection is persisted; `None` disables persistence.
    pub config_path: Option<PathBuf>,
}

impl Context {
    pub fn new(settings: Settings, printer: Printer, config_path: Option<PathBuf>) -> Self {
        Self {
            settings,
            printer,
            config_path,
        }
    }

    /// Client for project-independent calls.
    pub fn client(&self) -> Result<HopsworksClient> {
        Ok(HopsworksClient::new(&self.settings)?)
    }

    /// Client for calls scoped to the active project.
    pub fn project_client(&self) -> Result<HopsworksClient> {
        if self.settings.project_id == 0 {
            return Err(no_project());
        }
        self.client()
    }

    /// Client bound to the active project and its feature store.
    ///
    /// A missing feature store id is looked up once and persisted.
    pub async fn store_client(&mut self) -> Result<HopsworksClient> {
        let client = self.project_client()?;
        if self.settings.feature_store_id != 0 {
            return Ok(client);
        }

        let store = client.default_feature_store().await?;
        debug!(
            id = store.featurestore_id,
            name = %store.featurestore_name,
            "resolved feature store"
        );
        self.settings.feature_store_id = store.featurestore_id;
        self.persist_selection();
        Ok(client.with_feature_store(store.featurestore_id))
    }

    /// Best-effort save of project and feature store ids.
    ///
    /// Skipped inside the platform, where the environment is authoritative.
    pub(crate) fn persist_selection(&self) {
        if self.settings.jwt_token.is_some() {
            return;
        }
        if let Some(path) = &self.config_path {
            if let Err(e) = self.settings.save_selection(path) {
                warn!(path = %path.display(), error = %e, "could not save project selection");
            }
        }
    }
}

fn no_project() -> Error {
    Error::Usage("no project selected. Run 'hops project use <name>' first".to_string())
}

/// Split a comma-separated flag value, dropping empty entries.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
