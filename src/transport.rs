//! HTTP capability used by the adapter, and its reqwest implementation.

use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{HealthResponse, MessageResponse, QueryRequest, QueryResponse, StatsResponse};
use crate::error::ClientError;

pub const STATS_PATH: &str = "/stats";
pub const UPLOAD_PATH: &str = "/upload";
pub const DELETE_PATH: &str = "/delete";
pub const QUERY_PATH: &str = "/query";
pub const HEALTH_PATH: &str = "/health";

/// Multipart field name the service reads the uploaded document from.
pub const UPLOAD_FIELD: &str = "file";

/// One request/response round trip per method against the RAG service.
///
/// Implementations must not retry. Status codes are not inspected by the
/// caller, so an implementation returns `Ok` for any body that decodes.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn stats(&self) -> Result<StatsResponse, ClientError>;
    async fn upload(&self, file: &UploadFile) -> Result<MessageResponse, ClientError>;
    async fn delete_all(&self) -> Result<MessageResponse, ClientError>;
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

/// A document selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name).map(str::to_string);
        Self {
            file_name,
            bytes,
            mime,
        }
    }

    /// Read a file from disk. The upload name is the path's final component.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        "md" => Some("text/markdown"),
        _ => None,
    }
}

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Origin of the RAG service (e.g. `http://127.0.0.1:8000`), no trailing slash.
    pub base_url: String,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout. Answer generation on a local model is slow.
    pub request_timeout: Duration,
    /// Ignore `HTTP_PROXY` / `HTTPS_PROXY` from the environment.
    pub no_proxy: bool,
}

impl BackendConfig {
    /// Create a config with defaults.
    ///
    /// - connect_timeout: 3 s
    /// - request_timeout: 120 s
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(120),
            no_proxy: false,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// [`Backend`] over HTTP via reqwest. Use [`HttpBackendBuilder`] to construct.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: BackendConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn builder(base_url: impl Into<String>) -> HttpBackendBuilder {
        HttpBackendBuilder::new(base_url)
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let url = self.config.url(endpoint);
        debug!(%url, "sending request");

        let resp = request.send().await.map_err(|e| ClientError::Connect {
            url: url.clone(),
            detail: e.to_string(),
        })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| ClientError::Body {
            url: url.clone(),
            detail: e.to_string(),
        })?;

        if !status.is_success() {
            // Surfaced to the user only through the decoded body.
            let detail = serde_json::from_slice::<MessageResponse>(&bytes)
                .ok()
                .and_then(|m| m.detail);
            warn!(
                %url,
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "service replied with an error status"
            );
        }

        serde_json::from_slice::<T>(&bytes).map_err(|e| ClientError::Decode {
            endpoint: endpoint.to_string(),
            detail: e.to_string(),
        })
    }
}

impl Backend for HttpBackend {
    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        let req = self.client.get(self.config.url(STATS_PATH));
        self.send(STATS_PATH, req).await
    }

    async fn upload(&self, file: &UploadFile) -> Result<MessageResponse, ClientError> {
        let mut part =
            reqwest::multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(ref mime) = file.mime {
            part = part.mime_str(mime).map_err(|e| {
                ClientError::Config(format!("invalid MIME type '{mime}': {e}"))
            })?;
        }
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        debug!(file = %file.file_name, size = file.bytes.len(), "uploading document");
        let req = self.client.post(self.config.url(UPLOAD_PATH)).multipart(form);
        self.send(UPLOAD_PATH, req).await
    }

    async fn delete_all(&self) -> Result<MessageResponse, ClientError> {
        let req = self.client.post(self.config.url(DELETE_PATH));
        self.send(DELETE_PATH, req).await
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        let req = self.client.post(self.config.url(QUERY_PATH)).json(request);
        self.send(QUERY_PATH, req).await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let req = self.client.get(self.config.url(HEALTH_PATH));
        self.send(HEALTH_PATH, req).await
    }
}

/// Builder for [`HttpBackend`].
///
/// # Example
/// ```rust,no_run
/// use std::time::Duration;
/// use rag_console::transport::HttpBackend;
///
/// let backend = HttpBackend::builder("http://127.0.0.1:8000")
///     .request_timeout(Duration::from_secs(30))
///     .build()
///     .expect("client");
/// ```
pub struct HttpBackendBuilder {
    config: BackendConfig,
}

impl HttpBackendBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: BackendConfig::new(base_url),
        }
    }

    /// Override the TCP connect timeout (default 3 s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Override the whole-request timeout (default 120 s).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Connect directly even when a proxy is configured in the environment.
    pub fn no_proxy(mut self) -> Self {
        self.config.no_proxy = true;
        self
    }

    /// Consume the builder and construct an [`HttpBackend`].
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] when the base URL is empty or the
    /// underlying HTTP client cannot be initialised.
    pub fn build(self) -> Result<HttpBackend, ClientError> {
        if self.config.base_url.is_empty() {
            return Err(ClientError::Config("base URL must not be empty".into()));
        }

        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            let mut builder = reqwest::Client::builder()
                .connect_timeout(self.config.connect_timeout)
                .timeout(self.config.request_timeout);
            if self.config.no_proxy {
                builder = builder.no_proxy();
            }
            builder.build()
        };
        // The fetch API owns timeouts in the browser.
        #[cfg(target_arch = "wasm32")]
        let client = reqwest::Client::builder().build();

        let client = client.map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(HttpBackend {
            config: self.config,
            client,
        })
    }
}
