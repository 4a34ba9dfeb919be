//! `hops login`

use std::io::{self, BufRead, Write};

use serde_json::json;
use tracing::warn;

use super::Context;
use crate::client::HopsworksClient;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::model::Project;

/// Check the credentials, pick a project when the choice is obvious, and save
/// everything to the config file.
///
/// A missing host or API key is asked for on the terminal.
pub async fn run(ctx: &mut Context) -> Result<()> {
    if ctx.settings.jwt_token.is_some() {
        if ctx.printer.is_json() {
            ctx.printer.print_json(&json!({
                "host": ctx.settings.host,
                "project": ctx.settings.project,
                "auth": "jwt",
            }))?;
            return Ok(());
        }
        ctx.printer
            .success("Running inside Hopsworks; authenticated through the platform JWT");
        ctx.printer.details(&[
            ("Host", ctx.settings.host.clone()),
            ("Project", ctx.settings.project.clone()),
        ]);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    if ctx.settings.host.trim().is_empty() {
        ctx.settings.host = prompt(&mut input, "Hopsworks host (e.g. c.app.hopsworks.ai): ")?;
    }
    if ctx.settings.api_key.is_empty() {
        ctx.settings.api_key = prompt(&mut input, "API key: ")?;
    }
    drop(input);

    let client = ctx.client()?;
    let projects = client.list_projects().await.map_err(Error::AuthFailed)?;

    select_after_login(&mut ctx.settings, &projects);
    if ctx.settings.project_id != 0 && ctx.settings.feature_store_id == 0 {
        match HopsworksClient::new(&ctx.settings)?.default_feature_store().await {
            Ok(store) => ctx.settings.feature_store_id = store.featurestore_id,
            Err(e) => warn!(error = %e, "could not resolve the feature store"),
        }
    }

    let path = match &ctx.config_path {
        Some(path) => path.clone(),
        None => Settings::default_path()?,
    };
    ctx.settings.save_login(&path)?;

    if ctx.printer.is_json() {
        ctx.printer.print_json(&json!({
            "host": ctx.settings.host,
            "projects": projects.len(),
            "project": ctx.settings.project,
            "projectId": ctx.settings.project_id,
            "featureStoreId": ctx.settings.feature_store_id,
        }))?;
        return Ok(());
    }

    ctx.printer.success(format!(
        "Logged in to {} ({} projects accessible)",
        ctx.settings.host,
        projects.len()
    ));
    if ctx.settings.project_id != 0 {
        ctx.printer
            .success(format!("Active project: {}", ctx.settings.project));
    } else if !projects.is_empty() {
        ctx.printer
            .info("Run 'hops project use <name>' to select a project");
    }
    Ok(())
}

/// Settle the active project after a successful login.
///
/// A configured project name is looked up; with none configured, a credential
/// that sees exactly one project selects it.
fn select_after_login(settings: &mut Settings, projects: &[Project]) {
    let chosen = if settings.project.is_empty() {
        match projects {
            [only] => Some(only),
            _ => None,
        }
    } else {
        projects
            .iter()
            .find(|p| p.project_name == settings.project)
    };

    match chosen {
        Some(project) => {
            if settings.project_id != project.project_id {
                settings.feature_store_id = 0;
            }
            settings.project = project.project_name.clone();
            settings.project_id = project.project_id;
        }
        None if !settings.project.is_empty() => {
            warn!(project = %settings.project, "configured project is not accessible");
            settings.project_id = 0;
            settings.feature_store_id = 0;
        }
        None => {}
    }
}

/// Ask for a value on stderr, keeping stdout clean for `--json`.
fn prompt(input: &mut impl BufRead, label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush().map_err(|e| Error::Usage(e.to_string()))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| Error::Usage(format!("could not read input: {}", e)))?;
    let value = line.trim().to_string();
    if value.is_empty() {
        return Err(Error::Usage(format!(
            "{} is required",
            label.split(" (").next().unwrap_or(label).trim_end_matches(": ")
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: i64, name: &str) -> Project {
        Project {
            project_id: id,
            project_name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_project_is_selected() {
        let mut settings = Settings::default();
        select_after_login(&mut settings, &[project(119, "fraud")]);
        assert_eq!(settings.project, "fraud");
        assert_eq!(settings.project_id, 119);
    }

    #[test]
    fn test_several_projects_leave_the_choice_open() {
        let mut settings = Settings::default();
        select_after_login(&mut settings, &[project(1, "a"), project(2, "b")]);
        assert!(settings.project.is_empty());
        assert_eq!(settings.project_id, 0);
    }

    #[test]
    fn test_configured_project_is_resolved_by_name() {
        let mut settings = Settings {
            project: "b".to_string(),
            project_id: 7,
            feature_store_id: 70,
            ..Default::default()
        };
        select_after_login(&mut settings, &[project(1, "a"), project(2, "b")]);
        assert_eq!(settings.project_id, 2);
        assert_eq!(settings.feature_store_id, 0);

        let mut unknown = Settings {
            project: "gone".to_string(),
            project_id: 9,
            ..Default::default()
        };
        select_after_login(&mut unknown, &[project(1, "a")]);
        assert_eq!(unknown.project_id, 0);
    }

    #[test]
    fn test_prompt_trims_and_requires_a_value() {
        let mut input = io::Cursor::new("  c.app.hopsworks.ai \n");
        assert_eq!(
            prompt(&mut input, "Hopsworks host (e.g. x): ").unwrap(),
            "c.app.hopsworks.ai"
        );

        let mut empty = io::Cursor::new("\n");
        let err = prompt(&mut empty, "API key: ").unwrap_err();
        assert_eq!(err.to_string(), "API key is required");
    }
}
