//! Feature view CRUD and query inspection.

use tracing::info;

use super::error::{ClientError, ClientResult};
use super::http::{select_version, ApiPath, HopsworksClient};
use crate::model::feature_view::QueryDefinition;
use crate::model::{FeatureView, ViewQuerySummary};
use crate::planner::wire::FeatureViewRequest;

impl HopsworksClient {
    fn feature_view_path(&self, name: &str, version: Option<u32>) -> ClientResult<ApiPath> {
        let base = self.fs_path()?.push("featureview").push(name);
        Ok(match version {
            Some(v) => base.push("version").push(v),
            None => base,
        })
    }

    pub async fn list_feature_views(&self) -> ClientResult<Vec<FeatureView>> {
        let path = self.fs_path()?.push("featureview");
        self.get_list(&path).await
    }

    /// One feature view; `None` picks the latest version.
    pub async fn feature_view(&self, name: &str, version: Option<u32>) -> ClientResult<FeatureView> {
        let path = self.feature_view_path(name, version)?;
        let views: Vec<FeatureView> = self.get_list(&path).await?;

        // A versioned path returns exactly that version; trust it even if the
        // body omits the version field.
        let picked = match version {
            Some(_) if views.len() == 1 => views.into_iter().next(),
            _ => select_version(views, version, |fv| fv.version),
        };
        picked.ok_or_else(|| ClientError::NotFound(format!("feature view '{}'", name)))
    }

    /// The stored query of a feature view, flattened for display.
    pub async fn feature_view_query(
        &self,
        name: &str,
        version: u32,
    ) -> ClientResult<ViewQuerySummary> {
        let path = self.feature_view_path(name, Some(version))?.push("query");
        let definition: QueryDefinition = self.get_object(&path, "feature view query").await?;
        Ok(ViewQuerySummary::from_definition(&definition))
    }

    pub async fn create_feature_view(
        &self,
        request: &FeatureViewRequest,
    ) -> ClientResult<FeatureView> {
        let path = self.fs_path()?.push("featureview");
        info!(name = %request.name, version = request.version, "creating feature view");
        let body = self.post_json(&path, request).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::parse("feature view", e))
    }

    /// Delete one version, or every version when `version` is `None`.
    pub async fn delete_feature_view(&self, name: &str, version: Option<u32>) -> ClientResult<()> {
        let path = self.feature_view_path(name, version)?;
        self.delete(&path).await?;
        Ok(())
    }
}
