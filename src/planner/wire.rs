//! Serialization of a [`QueryNode`] tree into the backend's query DTO, and
//! of a [`SchemaSpec`] into a feature group creation body.

use serde::Serialize;

use crate::model::feature_group::{CACHED_TYPE, STREAM_TYPE};
use crate::model::{Feature, FeatureGroup};

use super::join_builder::QueryNode;
use super::schema_spec::SchemaSpec;

/// Feature-store identity stamped on every query node.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    pub feature_store_id: i64,
    pub feature_store_name: String,
}

impl QueryContext {
    /// Context for a project's default feature store, `<project>_featurestore`.
    pub fn for_project(project: &str, feature_store_id: i64) -> Self {
        Self {
            feature_store_id,
            feature_store_name: format!("{}_featurestore", project),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRefRequest {
    pub id: i64,
    pub name: String,
    pub version: u32,
    #[serde(rename = "type")]
    pub dto_type: String,
    #[serde(rename = "featurestoreId")]
    pub featurestore_id: i64,
    pub online_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRefRequest {
    pub name: String,
    pub feature_group_id: i64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub left_feature_group: GroupRefRequest,
    pub left_features: Vec<FeatureRefRequest>,
    pub feature_store_id: i64,
    pub feature_store_name: String,
    pub hive_engine: bool,
    pub joins: Vec<JoinRequest>,
}

/// A join entry: `on` when both keys share a name, `leftOn`/`rightOn` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub query: QueryRequest,
    #[serde(rename = "type")]
    pub join_type: String,
    pub on: Vec<String>,
    pub left_on: Vec<String>,
    pub right_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRequest {
    pub name: String,
}

/// Body of `POST featureview`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureViewRequest {
    pub name: String,
    pub version: u32,
    #[serde(rename = "type")]
    pub dto_type: String,
    #[serde(rename = "featurestoreId")]
    pub featurestore_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub query: QueryRequest,
    #[serde(rename = "label", skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelRequest>,
}

impl FeatureViewRequest {
    pub fn new(
        name: impl Into<String>,
        version: u32,
        tree: &QueryNode,
        ctx: &QueryContext,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            dto_type: "featureViewDTO".to_string(),
            featurestore_id: ctx.feature_store_id,
            description: None,
            query: QueryRequest::from_tree(tree, ctx),
            labels: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    pub fn with_labels(mut self, labels: &[String]) -> Self {
        self.labels = labels
            .iter()
            .map(|name| LabelRequest { name: name.clone() })
            .collect();
        self
    }
}

impl GroupRefRequest {
    pub fn from_group(group: &FeatureGroup, ctx: &QueryContext) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
            version: group.version,
            dto_type: group.resolved_dto_type().to_string(),
            featurestore_id: ctx.feature_store_id,
            online_enabled: group.online_enabled,
        }
    }
}

impl QueryRequest {
    pub fn from_tree(node: &QueryNode, ctx: &QueryContext) -> Self {
        let left_features = node
            .selected_features
            .iter()
            .map(|name| {
                let schema = node.group.feature(name);
                FeatureRefRequest {
                    name: name.clone(),
                    feature_group_id: node.group.id,
                    data_type: schema.map(|f| f.data_type.clone()),
                    primary: schema.map(|f| f.primary),
                }
            })
            .collect();

        let joins = node
            .children
            .iter()
            .map(|edge| {
                let (on, left_on, right_on) = if edge.left_on == edge.spec.right_key {
                    (vec![edge.left_on.clone()], Vec::new(), Vec::new())
                } else {
                    (
                        Vec::new(),
                        vec![edge.left_on.clone()],
                        vec![edge.spec.right_key.clone()],
                    )
                };

                JoinRequest {
                    query: QueryRequest::from_tree(&edge.node, ctx),
                    // The backend's JoinType enum only accepts uppercase names.
                    join_type: edge.spec.join_type.as_str().to_string(),
                    on,
                    left_on,
                    right_on,
                    prefix: (!edge.spec.prefix.is_empty()).then(|| edge.spec.prefix.clone()),
                }
            })
            .collect();

        Self {
            left_feature_group: GroupRefRequest::from_group(&node.group, ctx),
            left_features,
            feature_store_id: ctx.feature_store_id,
            feature_store_name: ctx.feature_store_name.clone(),
            hive_engine: true,
            joins,
        }
    }
}

/// Body of `POST featuregroups`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGroupRequest {
    pub name: String,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub online_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    pub features: Vec<Feature>,
    /// `HUDI` or `DELTA`; the backend picks when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_travel_format: Option<String>,
    #[serde(rename = "type")]
    pub dto_type: String,
    #[serde(rename = "featurestoreId")]
    pub featurestore_id: i64,
}

impl FeatureGroupRequest {
    /// Offline group in `feature_store_id`; see [`Self::online`].
    pub fn new(
        name: impl Into<String>,
        version: u32,
        schema: SchemaSpec,
        feature_store_id: i64,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            description: None,
            online_enabled: false,
            event_time: schema.event_time,
            features: schema.features,
            time_travel_format: None,
            dto_type: CACHED_TYPE.to_string(),
            featurestore_id: feature_store_id,
        }
    }

    /// Online groups are stream feature groups on the backend.
    pub fn online(mut self, enabled: bool) -> Self {
        self.online_enabled = enabled;
        self.dto_type = if enabled { STREAM_TYPE } else { CACHED_TYPE }.to_string();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    pub fn with_time_travel_format(mut self, format: Option<String>) -> Self {
        self.time_travel_format = format;
        self
    }
}
