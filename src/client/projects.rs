//! Projects and their feature stores.

use tracing::debug;

use super::error::{ClientError, ClientResult};
use super::http::{ApiPath, HopsworksClient};
use crate::model::{FeatureStore, Project};

impl HopsworksClient {
    /// Every project the credential can see.
    pub async fn list_projects(&self) -> ClientResult<Vec<Project>> {
        self.get_list(&ApiPath::root().push("project")).await
    }

    /// One project by id.
    pub async fn project_by_id(&self, id: i64) -> ClientResult<Project> {
        let path = ApiPath::root().push("project").push(id);
        self.get_object(&path, "project").await
    }

    /// Look a project up by its exact name.
    pub async fn project_by_name(&self, name: &str) -> ClientResult<Project> {
        self.list_projects()
            .await?
            .into_iter()
            .find(|p| p.project_name == name)
            .ok_or_else(|| ClientError::NotFound(format!("project '{}'", name)))
    }

    /// Feature stores of the active project.
    pub async fn list_feature_stores(&self) -> ClientResult<Vec<FeatureStore>> {
        let path = self.project_path()?.push("featurestores");
        self.get_list(&path).await
    }

    /// The project's own feature store.
    ///
    /// Hopsworks names it `<project>_featurestore`; when no store carries
    /// that name the first listed one is used.
    pub async fn default_feature_store(&self) -> ClientResult<FeatureStore> {
        let stores = self.list_feature_stores().await?;
        let own = format!("{}_featurestore", self.project().to_lowercase());
        debug!(count = stores.len(), expected = %own, "feature stores listed");

        let index = stores
            .iter()
            .position(|fs| fs.featurestore_name.eq_ignore_ascii_case(&own))
            .unwrap_or(0);
        stores
            .into_iter()
            .nth(index)
            .ok_or_else(|| ClientError::NotFound(format!("feature store for '{}'", self.project())))
    }
}
