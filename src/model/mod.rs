//! Feature-store entities as the backend returns them.

pub mod feature_group;
pub mod feature_view;
pub mod job;
pub mod project;

pub use feature_group::{Feature, FeatureGroup, FeatureStore};
pub use feature_view::{FeatureView, ViewJoinSummary, ViewQuerySummary};
pub use job::{Execution, ExecutionLog, Job, LogType};
pub use project::Project;

use serde::{Deserialize, Deserializer};

/// Read an explicit `null` as the type's default.
///
/// `#[serde(default)]` only covers absent keys; the backend also sends
/// `"description": null` and friends.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
