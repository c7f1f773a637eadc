use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::error::{ApiError, ApiResult};
use super::models::{
    AuthInfo, ClusterStatus, ClusterStatusUpdate, Credentials, ErrorBody, Host, HostInventory,
    HostUpdate, NewHost, OsdCreateRequest, ServiceSummary,
};
use super::{AuthService, ClusterService, HostService, OsdService, ServiceCatalog};

/// Versioned media type required by the dashboard REST API
const API_ACCEPT: &str = "application/vnd.ceph.api.v1.0+json";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub url: String,
    pub verify_tls: bool,
    pub timeout: Duration,
}

/// HTTP client for a single dashboard instance.
///
/// The bearer token obtained by [`AuthService::login`] is kept inside the
/// client and attached to every later request.
pub struct DashboardClient {
    base_url: Url,
    client: ReqwestClient,
    token: RwLock<Option<String>>,
}

impl DashboardClient {
    pub fn new(options: &ClientOptions) -> ApiResult<Self> {
        let mut url = options.url.trim().to_string();
        if !url.ends_with('/') {
            url.push('/');
        }
        let base_url = Url::parse(&url).map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))?;

        let client = ReqwestClient::builder()
            .danger_accept_invalid_certs(!options.verify_tls)
            .timeout(options.timeout)
            .build()?;

        info!("Using dashboard at {}", base_url);
        Ok(Self {
            base_url,
            client,
            token: RwLock::new(None),
        })
    }

    /// Resolve an endpoint below the base url. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> ApiResult<RequestBuilder> {
        let mut request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, API_ACCEPT);

        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> ApiResult<Response> {
        debug!("{} {}", method, path);
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or(body);

        Err(ApiError::Status {
            method: method.to_string(),
            path: path.to_string(),
            status: status.as_u16(),
            detail,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        let request = self.request(Method::GET, url).await?;
        let response = self.send(Method::GET, &path, request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_body<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<Response> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        let request = self.request(method.clone(), url).await?.json(body);
        self.send(method, &path, request).await
    }

    async fn require_token(&self) -> ApiResult<()> {
        if self.token.read().await.is_none() {
            return Err(ApiError::NotAuthenticated);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthService for DashboardClient {
    async fn login(&self, username: &str, password: &str) -> ApiResult<AuthInfo> {
        let credentials = Credentials { username, password };
        let response = match self.send_body(Method::POST, &["api", "auth"], &credentials).await {
            Ok(response) => response,
            Err(ApiError::Status { status: 400..=401, detail, .. }) => {
                return Err(ApiError::AuthFailed(detail));
            }
            Err(e) => return Err(e),
        };

        let bytes = response.bytes().await?;
        let auth: AuthInfo = serde_json::from_slice(&bytes)?;
        *self.token.write().await = Some(auth.token.clone());
        info!("Logged in to dashboard as {}", auth.username);
        Ok(auth)
    }
}

#[async_trait]
impl HostService for DashboardClient {
    async fn list_hosts(&self) -> ApiResult<Vec<Host>> {
        self.require_token().await?;
        self.get_json(&["api", "host"]).await
    }

    async fn update_host(
        &self,
        hostname: &str,
        update_labels: bool,
        labels: &[String],
    ) -> ApiResult<()> {
        self.require_token().await?;
        let body = HostUpdate {
            update_labels,
            labels,
        };
        self.send_body(Method::PUT, &["api", "host", hostname], &body)
            .await?;
        Ok(())
    }

    async fn add_host(&self, host: &NewHost) -> ApiResult<()> {
        self.require_token().await?;
        self.send_body(Method::POST, &["api", "host"], host).await?;
        Ok(())
    }

    async fn host_inventory(&self, hostname: &str) -> ApiResult<HostInventory> {
        self.require_token().await?;
        self.get_json(&["api", "host", hostname, "inventory"]).await
    }
}

#[async_trait]
impl ClusterService for DashboardClient {
    async fn cluster_status(&self) -> ApiResult<ClusterStatus> {
        self.require_token().await?;
        self.get_json(&["api", "cluster"]).await
    }

    async fn update_cluster_status(&self, status: ClusterStatus) -> ApiResult<()> {
        self.require_token().await?;
        self.send_body(Method::PUT, &["api", "cluster"], &ClusterStatusUpdate { status })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OsdService for DashboardClient {
    async fn create_osds(&self, request: &OsdCreateRequest) -> ApiResult<()> {
        self.require_token().await?;
        self.send_body(Method::POST, &["api", "osd"], request).await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceCatalog for DashboardClient {
    async fn list_services(&self) -> ApiResult<Vec<ServiceSummary>> {
        self.require_token().await?;
        self.get_json(&["api", "service"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(url: &str) -> ClientOptions {
        ClientOptions {
            url: url.to_string(),
            verify_tls: true,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_endpoint_below_base_path() {
        let client = DashboardClient::new(&options("https://ceph.local:8443/dash")).unwrap();
        assert_eq!(
            client.endpoint(&["api", "host"]).unwrap().as_str(),
            "https://ceph.local:8443/dash/api/host"
        );
    }

    #[test]
    fn test_endpoint_encodes_hostname() {
        let client = DashboardClient::new(&options("https://ceph.local:8443/")).unwrap();
        let url = client.endpoint(&["api", "host", "node 1/../x?y", "inventory"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://ceph.local:8443/api/host/node%201%2F..%2Fx%3Fy/inventory"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = DashboardClient::new(&options("not a url")).err().unwrap();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_calls_require_login() {
        let client = DashboardClient::new(&options("https://127.0.0.1:1")).unwrap();
        let err = client.list_hosts().await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
    }
}
