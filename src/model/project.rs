// src/model/project.rs
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A Hopsworks project.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: i64,
    pub project_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created: String,
}

/// Project listings come either nested (`{"project": {"id", "name"}}`)
/// or flat (`{"projectId", "projectName"}`).
#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectEntry {
    Nested { project: NestedProject },
    Flat(FlatProject),
}

#[derive(Deserialize)]
struct NestedProject {
    id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatProject {
    project_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    project_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created: Option<String>,
}

impl<'de> Deserialize<'de> for Project {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match ProjectEntry::deserialize(deserializer)? {
            ProjectEntry::Nested { project } => Project {
                project_id: project.id,
                project_name: project.name,
                description: project.description.unwrap_or_default(),
                created: project.created.unwrap_or_default(),
            },
            ProjectEntry::Flat(p) => Project {
                project_id: p.project_id,
                project_name: p.project_name,
                description: p.description.unwrap_or_default(),
                created: p.created.unwrap_or_default(),
            },
        })
    }
}
