// src/model/feature_view.rs
use serde::{Deserialize, Serialize};

use super::feature_group::Feature;
use super::null_as_default;

/// A named, versioned query over one or more feature groups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureView {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: u32,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub created: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "label",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub labels: Vec<String>,
}

/// Query definition returned by `featureview/{name}/version/{v}/query`.
///
/// Only the fields needed to describe the view's sources are read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefinition {
    #[serde(default)]
    pub left_feature_group: Option<GroupRefDefinition>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub left_features: Vec<FeatureNameDefinition>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub joins: Vec<JoinDefinition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupRefDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureNameDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinDefinition {
    #[serde(default)]
    pub query: Option<QueryDefinition>,
    #[serde(default, deserialize_with = "null_as_default", rename = "type")]
    pub join_type: String,
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Flattened view of a feature view's sources.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewQuerySummary {
    /// Base group rendered as `"<name> v<version>"`.
    pub base: String,
    pub features: Vec<String>,
    /// Joins in depth-first order; nested joins follow their parent.
    pub joins: Vec<ViewJoinSummary>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewJoinSummary {
    pub group: String,
    pub version: u32,
    pub join_type: String,
    pub prefix: String,
}

impl ViewQuerySummary {
    pub fn from_definition(def: &QueryDefinition) -> Self {
        let base = def
            .left_feature_group
            .as_ref()
            .map(|g| format!("{} v{}", g.name, g.version))
            .unwrap_or_default();

        let features = def
            .left_features
            .iter()
            .map(|f| f.name.clone())
            .filter(|n| !n.is_empty())
            .collect();

        let mut joins = Vec::new();
        flatten_joins(&def.joins, &mut joins);

        Self {
            base,
            features,
            joins,
        }
    }
}

fn flatten_joins(joins: &[JoinDefinition], out: &mut Vec<ViewJoinSummary>) {
    for join in joins {
        let (group, version) = join
            .query
            .as_ref()
            .and_then(|q| q.left_feature_group.as_ref())
            .map(|g| (g.name.clone(), g.version))
            .unwrap_or_default();

        out.push(ViewJoinSummary {
            group,
            version,
            join_type: join.join_type.clone(),
            prefix: join.prefix.clone().unwrap_or_default(),
        });

        if let Some(query) = &join.query {
            flatten_joins(&query.joins, out);
        }
    }
}
