// ABOUTME: Delivers custom resource responses to the pre-signed callback URL.
// ABOUTME: HTTP PUT with a JSON body; any transport error or non-2xx status is a delivery failure.

use async_trait::async_trait;
use tracing::info;

use super::CustomResourceResponse;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to deliver response to {url}: {source}")]
    Delivery {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[async_trait]
pub trait ResponseNotifier: Send + Sync {
    async fn notify(&self, url: &str, response: &CustomResourceResponse)
    -> Result<(), NotifyError>;
}

/// Notifier backed by reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpNotifier {
    client: reqwest::Client,
}

impl HttpNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseNotifier for HttpNotifier {
    async fn notify(
        &self,
        url: &str,
        response: &CustomResourceResponse,
    ) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(response)?;
        let delivery = |source| NotifyError::Delivery {
            url: url.to_string(),
            source,
        };

        info!(status = ?response.status, "Sending response to CloudFormation");
        let reply = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(delivery)?
            .error_for_status()
            .map_err(delivery)?;

        info!(status = %reply.status(), "Response sent successfully");
        Ok(())
    }
}
