// src/model/feature_group.rs
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// DTO discriminator for offline-only groups.
pub const CACHED_TYPE: &str = "cachedFeaturegroupDTO";
/// DTO discriminator for online-enabled groups.
pub const STREAM_TYPE: &str = "streamFeatureGroupDTO";
/// DTO discriminator for external groups.
pub const ON_DEMAND_TYPE: &str = "onDemandFeaturegroupDTO";

/// A single column of a feature group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "type")]
    pub data_type: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub primary: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub partition: bool,
}

impl Feature {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Default::default()
        }
    }

    /// Mark the feature as part of the primary key.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }
}

/// A named, versioned table of features.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGroup {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "type",
        skip_serializing_if = "String::is_empty"
    )]
    pub dto_type: String,
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
    #[serde(default, deserialize_with = "null_as_default")]
    pub online_enabled: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub time_travel_format: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub event_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rows: Option<i64>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub location: String,
}

impl FeatureGroup {
    pub fn new(name: impl Into<String>, version: u32, features: Vec<Feature>) -> Self {
        Self {
            name: name.into(),
            version,
            features,
            ..Default::default()
        }
    }

    /// Whether one of this group's own columns is called `name`.
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name == name)
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Column names in schema order.
    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.clone()).collect()
    }

    /// DTO type to send back to the backend.
    ///
    /// Some endpoints leave `type` blank; the storage mode decides it then.
    pub fn resolved_dto_type(&self) -> &str {
        if !self.dto_type.is_empty() {
            &self.dto_type
        } else if self.online_enabled {
            STREAM_TYPE
        } else {
            CACHED_TYPE
        }
    }

    /// Human-readable storage label.
    pub fn type_label(&self) -> &str {
        match self.dto_type.as_str() {
            ON_DEMAND_TYPE => "external",
            STREAM_TYPE => "stream",
            CACHED_TYPE => "cached",
            other => other,
        }
    }
}

/// A feature store attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStore {
    pub featurestore_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featurestore_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_id: i64,
}
