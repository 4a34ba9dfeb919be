//! Parsing of `fg create` schema flags.
//!
//! `--features "customer_id:bigint,age:bigint,name"` lists columns in order,
//! each `name[:type]` with `string` as the default type. `--primary-key`
//! names the key columns; without `--features` the schema is just those keys
//! typed as strings.

use std::collections::HashSet;

use crate::model::Feature;

use super::{PlanError, PlanResult};

/// Type given to a column whose spec omits `:<type>`.
pub const DEFAULT_FEATURE_TYPE: &str = "string";

/// Schema of a feature group about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSpec {
    pub features: Vec<Feature>,
    pub event_time: Option<String>,
}

impl SchemaSpec {
    /// Build a schema from the raw flag values.
    ///
    /// Primary keys must be columns of the schema, and so must the event
    /// time column when one is given.
    pub fn parse(
        features: Option<&str>,
        primary_keys: &str,
        event_time: Option<&str>,
    ) -> PlanResult<Self> {
        let keys = split_names(primary_keys);
        if keys.is_empty() {
            return Err(PlanError::MissingPrimaryKey);
        }

        let mut columns = match features {
            Some(raw) => parse_feature_list(raw)?,
            None => keys
                .iter()
                .map(|k| Feature::new(*k, DEFAULT_FEATURE_TYPE))
                .collect(),
        };

        for key in &keys {
            let column = columns
                .iter_mut()
                .find(|f| f.name == *key)
                .ok_or_else(|| PlanError::UnknownSchemaColumn {
                    role: "primary key",
                    column: key.to_string(),
                })?;
            column.primary = true;
        }

        let event_time = event_time.map(str::trim).filter(|c| !c.is_empty());
        if let Some(column) = event_time {
            if !columns.iter().any(|f| f.name == column) {
                return Err(PlanError::UnknownSchemaColumn {
                    role: "event time",
                    column: column.to_string(),
                });
            }
        }

        Ok(Self {
            features: columns,
            event_time: event_time.map(str::to_string),
        })
    }
}

/// Parse `"name[:type],..."` into features, in order.
pub fn parse_feature_list(raw: &str) -> PlanResult<Vec<Feature>> {
    let mut seen = HashSet::new();
    let mut features = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, data_type) = match entry.split_once(':') {
            Some((name, ty)) => (name.trim(), ty.trim()),
            None => (entry, DEFAULT_FEATURE_TYPE),
        };
        if name.is_empty() {
            return Err(PlanError::InvalidFeatureSpec {
                entry: entry.to_string(),
                reason: "missing name",
            });
        }
        if data_type.is_empty() {
            return Err(PlanError::InvalidFeatureSpec {
                entry: entry.to_string(),
                reason: "missing type after ':'",
            });
        }
        if !seen.insert(name) {
            return Err(PlanError::InvalidFeatureSpec {
                entry: entry.to_string(),
                reason: "duplicate name",
            });
        }
        features.push(Feature::new(name, data_type));
    }

    if features.is_empty() {
        return Err(PlanError::InvalidFeatureSpec {
            entry: raw.to_string(),
            reason: "no features listed",
        });
    }
    Ok(features)
}

fn split_names(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}
