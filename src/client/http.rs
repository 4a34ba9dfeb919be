//! Async HTTP client for the Hopsworks REST API.

use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::decode::decode_list;
use super::error::{ClientError, ClientResult};
use crate::config::Settings;

/// Root of every API path.
pub const API_ROOT: [&str; 2] = ["hopsworks-api", "api"];

/// Path of an API endpoint, kept as raw segments.
///
/// Segments are percent-encoded only when the URL is built, so a name that
/// contains `/` or `?` stays one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ApiPath {
    /// `/hopsworks-api/api`.
    pub fn root() -> Self {
        Self {
            segments: API_ROOT.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
        }
    }

    /// Append one path segment.
    pub fn push(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Resolve against `base`, encoding every segment and query value.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        url
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// Client bound to one host, credential, project and feature store.
///
/// Every request carries `Authorization: Bearer <jwt>` when a platform JWT
/// is available and `Authorization: ApiKey <key>` otherwise.
///
/// # Example
///
/// ```ignore
/// use hops::client::HopsworksClient;
/// use hops::config::Settings;
///
/// let settings = Settings::load()?;
/// let client = HopsworksClient::new(&settings)?;
/// let groups = client.list_feature_groups().await?;
/// ```
#[derive(Debug, Clone)]
pub struct HopsworksClient {
    /// Underlying connection pool.
    http: reqwest::Client,

    /// Scheme and host; API paths are appended as segments.
    base_url: Url,

    /// Value of the `Authorization` header.
    authorization: String,

    /// Active project (0 = none selected).
    project_id: i64,

    /// Active project name.
    project: String,

    /// Feature store of the active project (0 = unresolved).
    feature_store_id: i64,
}

impl HopsworksClient {
    /// Create a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings lack a host or credential, or if the
    /// HTTP client cannot be built.
    pub fn new(settings: &Settings) -> ClientResult<Self> {
        settings
            .validate()
            .map_err(|e| ClientError::NotConfigured(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()
            .map_err(ClientError::Build)?;

        let base_url = Url::parse(&settings.base_url())
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                ClientError::NotConfigured(format!("invalid host '{}'", settings.host))
            })?;

        let authorization = match &settings.jwt_token {
            Some(jwt) => format!("Bearer {}", jwt),
            None => format!("ApiKey {}", settings.api_key),
        };

        Ok(Self {
            http,
            base_url,
            authorization,
            project_id: settings.project_id,
            project: settings.project.clone(),
            feature_store_id: settings.feature_store_id,
        })
    }

    /// Use `feature_store_id` for feature-store requests.
    pub fn with_feature_store(mut self, feature_store_id: i64) -> Self {
        self.feature_store_id = feature_store_id;
        self
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn feature_store_id(&self) -> i64 {
        self.feature_store_id
    }

    /// `/hopsworks-api/api/project/{id}`.
    pub fn project_path(&self) -> ClientResult<ApiPath> {
        if self.project_id == 0 {
            return Err(ClientError::NotConfigured(
                "no project selected. Run 'hops project use <name>' first".to_string(),
            ));
        }
        Ok(ApiPath::root().push("project").push(self.project_id))
    }

    /// `/hopsworks-api/api/project/{id}/featurestores/{fsId}`.
    pub fn fs_path(&self) -> ClientResult<ApiPath> {
        let project = self.project_path()?;
        if self.feature_store_id == 0 {
            return Err(ClientError::NotConfigured(
                "no feature store resolved for the active project".to_string(),
            ));
        }
        Ok(project.push("featurestores").push(self.feature_store_id))
    }

    /// Full URL of `path` on this client's host.
    pub fn url(&self, path: &ApiPath) -> Url {
        path.to_url(&self.base_url)
    }

    fn request(&self, method: Method, path: &ApiPath) -> RequestBuilder {
        debug!(%method, %path, "hopsworks request");
        self.http
            .request(method, self.url(path))
            .header(AUTHORIZATION, &self.authorization)
            .header(ACCEPT, "application/json")
    }

    /// Send a request and return the raw body of a successful response.
    async fn execute(&self, request: RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        debug!(status = status.as_u16(), bytes = body.len(), "hopsworks response");

        if status.is_client_error() || status.is_server_error() {
            return Err(ClientError::api(status.as_u16(), &body));
        }
        Ok(body)
    }

    pub async fn get(&self, path: &ApiPath) -> ClientResult<Vec<u8>> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn delete(&self, path: &ApiPath) -> ClientResult<Vec<u8>> {
        self.execute(self.request(Method::DELETE, path)).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &ApiPath,
        body: &B,
    ) -> ClientResult<Vec<u8>> {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &ApiPath,
        body: &B,
    ) -> ClientResult<Vec<u8>> {
        self.send_json(Method::PUT, path, body).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &ApiPath,
        body: &B,
    ) -> ClientResult<Vec<u8>> {
        let payload = serde_json::to_vec(body).map_err(ClientError::Serialize)?;
        let request = self
            .request(method, path)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.execute(request).await
    }

    /// POST with a `text/plain` body (job execution arguments).
    pub async fn post_text(&self, path: &ApiPath, body: String) -> ClientResult<Vec<u8>> {
        let request = self
            .request(Method::POST, path)
            .header(CONTENT_TYPE, "text/plain")
            .body(body);
        self.execute(request).await
    }

    /// GET a list endpoint, accepting any known response shape.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &ApiPath) -> ClientResult<Vec<T>> {
        let body = self.get(path).await?;
        Ok(decode_list(&body)?.into_vec())
    }

    /// GET an endpoint that returns exactly one object.
    pub async fn get_object<T: DeserializeOwned>(
        &self,
        path: &ApiPath,
        what: &'static str,
    ) -> ClientResult<T> {
        let body = self.get(path).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::parse(what, e))
    }
}

/// Pick `version` from a list of versioned entities, or the highest version
/// when none is requested.
pub(crate) fn select_version<T>(
    items: Vec<T>,
    version: Option<u32>,
    version_of: impl Fn(&T) -> u32,
) -> Option<T> {
    match version {
        Some(wanted) => items.into_iter().find(|item| version_of(item) == wanted),
        None => items.into_iter().max_by_key(|item| version_of(item)),
    }
}
