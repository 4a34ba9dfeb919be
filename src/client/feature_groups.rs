//! Feature group lookups, creation and deletion.

use async_trait::async_trait;
use tracing::info;

use super::error::{ClientError, ClientResult};
use super::http::{select_version, HopsworksClient};
use crate::model::FeatureGroup;
use crate::planner::wire::FeatureGroupRequest;
use crate::planner::FeatureGroupSource;

impl HopsworksClient {
    /// All feature groups in the active feature store.
    pub async fn list_feature_groups(&self) -> ClientResult<Vec<FeatureGroup>> {
        let path = self.fs_path()?.push("featuregroups");
        self.get_list(&path).await
    }

    /// One feature group by name; `None` picks the latest version.
    ///
    /// The by-name endpoint answers with every version of the group, a single
    /// object or a wrapped list depending on the backend release.
    pub async fn feature_group(
        &self,
        name: &str,
        version: Option<u32>,
    ) -> ClientResult<FeatureGroup> {
        let mut path = self.fs_path()?.push("featuregroups").push(name);
        if let Some(v) = version {
            path = path.query("version", v);
        }

        let groups: Vec<FeatureGroup> = self.get_list(&path).await?;
        select_version(groups, version, |fg| fg.version).ok_or_else(|| {
            ClientError::NotFound(match version {
                Some(v) => format!("feature group '{}' v{}", name, v),
                None => format!("feature group '{}'", name),
            })
        })
    }

    pub async fn create_feature_group(
        &self,
        request: &FeatureGroupRequest,
    ) -> ClientResult<FeatureGroup> {
        let path = self.fs_path()?.push("featuregroups");
        info!(name = %request.name, version = request.version, "creating feature group");
        let body = self.post_json(&path, request).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::parse("feature group", e))
    }

    /// Delete by id; callers look the id up through [`Self::feature_group`].
    pub async fn delete_feature_group(&self, id: i64) -> ClientResult<()> {
        let path = self.fs_path()?.push("featuregroups").push(id);
        self.delete(&path).await?;
        Ok(())
    }
}

#[async_trait]
impl FeatureGroupSource for HopsworksClient {
    type Error = ClientError;

    async fn feature_group(&self, name: &str, version: u32) -> Result<FeatureGroup, ClientError> {
        HopsworksClient::feature_group(self, name, Some(version)).await
    }
}
