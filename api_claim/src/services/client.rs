use std::time::Duration;

use actix_web::web::Bytes;
use common::{env_config::WebhooksApiConfig, error::AppError};
use reqwest::{Client, RequestBuilder, StatusCode};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::dtos::claim::PreviewRequest;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Webhooks API did not respond within {}ms", after.as_millis())]
    Timeout { after: Duration },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Webhooks API request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::Timeout { .. } => AppError::GatewayTimeout(err.to_string()),
            ProxyError::Cancelled | ProxyError::Transport(_) => AppError::BadGateway(err.to_string()),
        }
    }
}

/// A completed upstream exchange. Non-2xx statuses are left to the caller.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ProxyResponse {
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// The upstream status in actix-web's `http` version.
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(self.status.as_u16())
            .unwrap_or(actix_web::http::StatusCode::BAD_GATEWAY)
    }
}

/// Client for the external webhooks API that owns previews and claims.
pub struct WebhooksApiClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl WebhooksApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        WebhooksApiClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &WebhooksApiConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeout)
    }

    pub async fn create_preview(
        &self,
        preview: &PreviewRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<ProxyResponse, ProxyError> {
        log::info!("Requesting preview of {} from {}", preview.url, self.base_url);
        let request = self
            .http
            .post(format!("{}/previews", self.base_url))
            .json(preview);
        self.send_with_timeout(request, cancel).await
    }

    /// `preview_id` must already be validated, it is placed in the path as is.
    pub async fn claim_preview(
        &self,
        preview_id: &str,
        bearer_token: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<ProxyResponse, ProxyError> {
        log::info!("Claiming preview {}", preview_id);
        let request = self
            .http
            .post(format!("{}/previews/{}/claim", self.base_url, preview_id))
            .bearer_auth(bearer_token);
        self.send_with_timeout(request, cancel).await
    }

    /// Sends `request` and reads the whole body, bounded by the client timeout.
    ///
    /// The timeout covers headers and body. A `cancel` token, when given, ends the
    /// exchange early as well; either way the in-flight request is dropped.
    pub async fn send_with_timeout(
        &self,
        request: RequestBuilder,
        cancel: Option<&CancellationToken>,
    ) -> Result<ProxyResponse, ProxyError> {
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(ProxyResponse { status, body })
        };

        let cancelled = async {
            match cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            result = exchange => result.map_err(ProxyError::Transport),
            _ = tokio::time::sleep(self.timeout) => {
                log::warn!("Webhooks API timed out after {}ms", self.timeout.as_millis());
                Err(ProxyError::Timeout { after: self.timeout })
            }
            _ = cancelled => Err(ProxyError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = WebhooksApiClient::new("https://hooks.example.com/", Duration::from_secs(1));
        assert_eq!(client.base_url, "https://hooks.example.com");
    }

    #[test]
    fn timeout_is_distinct_from_other_failures() {
        let err: AppError = ProxyError::Timeout {
            after: Duration::from_millis(5),
        }
        .into();
        assert!(matches!(err, AppError::GatewayTimeout(ref msg) if msg.contains("5ms")));

        let err: AppError = ProxyError::Cancelled.into();
        assert!(matches!(err, AppError::BadGateway(_)));
    }
}
