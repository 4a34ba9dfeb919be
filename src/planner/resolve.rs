//! Lookup of the feature groups a plan references.

use std::fmt::Display;

use async_trait::async_trait;
use tracing::debug;

use crate::model::FeatureGroup;

use super::join_builder::ResolvedJoin;
use super::join_spec::{GroupRef, JoinSpec};
use super::{PlanError, PlanResult};

/// Anything that can fetch a feature group's schema by name and version.
#[async_trait]
pub trait FeatureGroupSource: Send + Sync {
    type Error: Display + Send;

    async fn feature_group(&self, name: &str, version: u32) -> Result<FeatureGroup, Self::Error>;
}

/// Fetch a single referenced group.
pub async fn resolve_group<S>(source: &S, reference: &GroupRef) -> PlanResult<FeatureGroup>
where
    S: FeatureGroupSource + ?Sized,
{
    debug!(group = %reference, "resolving feature group");
    source
        .feature_group(&reference.name, reference.version)
        .await
        .map_err(|e| PlanError::GroupNotFound {
            reference: reference.to_string(),
            reason: e.to_string(),
        })
}

/// Fetch every joined group, one request at a time, in input order.
///
/// The first lookup failure aborts the whole resolution.
pub async fn resolve_joins<S>(source: &S, specs: &[JoinSpec]) -> PlanResult<Vec<ResolvedJoin>>
where
    S: FeatureGroupSource + ?Sized,
{
    let mut resolved = Vec::with_capacity(specs.len());
    for spec in specs {
        let group = resolve_group(source, &spec.group).await?;
        resolved.push(ResolvedJoin {
            spec: spec.clone(),
            group,
        });
    }
    Ok(resolved)
}
