//! Crate-level error type.

use std::path::PathBuf;

/// Failures surfaced by the backend transport and the configuration layer.
///
/// The `Display` text is what the user sees after the per-form prefix
/// (`Upload error: `, `Deletion error: `, `Error: `), so it stays short.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, refused, timeout).
    #[error("connection to {url} failed: {detail}")]
    Connect { url: String, detail: String },

    /// A response arrived but its body could not be read.
    #[error("reading response from {url} failed: {detail}")]
    Body { url: String, detail: String },

    /// The body was not JSON, or not the shape the endpoint promises.
    #[error("unexpected response from {endpoint}: {detail}")]
    Decode { endpoint: String, detail: String },

    /// A local file selected for upload could not be read.
    #[error("cannot read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True for failures that happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Connect { .. } | ClientError::Body { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_display_names_url_and_detail() {
        let err = ClientError::Connect {
            url: "http://127.0.0.1:8000/stats".to_string(),
            detail: "connection refused".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("http://127.0.0.1:8000/stats"), "url in display: {s}");
        assert!(s.contains("connection refused"), "detail in display: {s}");
    }

    #[test]
    fn decode_display_names_endpoint() {
        let err = ClientError::Decode {
            endpoint: "/query".to_string(),
            detail: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("/query"));
    }

    #[test]
    fn file_error_keeps_io_source() {
        let err = ClientError::File {
            path: PathBuf::from("missing.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("missing.pdf"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn is_transport_only_for_pre_response_failures() {
        let connect = ClientError::Connect { url: "u".into(), detail: "d".into() };
        let body = ClientError::Body { url: "u".into(), detail: "d".into() };
        let decode = ClientError::Decode { endpoint: "/stats".into(), detail: "d".into() };
        assert!(connect.is_transport());
        assert!(body.is_transport());
        assert!(!decode.is_transport());
        assert!(!ClientError::Config("x".into()).is_transport());
    }
}
