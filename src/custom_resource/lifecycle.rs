// ABOUTME: Drives one custom resource event to a terminal SUCCESS or FAILED response.
// ABOUTME: Tagging failures become FAILED responses; only notification delivery can fail the host.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use super::response::{existing_or_fallback_id, tagged_resource_id};
use super::{
    CustomResourceResponse, DeploymentEvent, IncomingEvent, NotifyError, RequestType,
    ResponseNotifier,
};
use crate::registry::{EcrRegistry, Registry};
use crate::stage::{StageTagger, TagError};

/// Errors turned into FAILED responses.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("invalid resource properties: {0}")]
    InvalidProperties(String),

    #[error(transparent)]
    Tagging(#[from] TagError),
}

/// Opens a registry client for the region named in an event.
#[async_trait]
pub trait RegistryConnector: Send + Sync {
    async fn connect(&self, region: Option<&str>) -> Arc<dyn Registry>;
}

/// Connects to ECR in the event's region, or `default_region` when it has none.
pub struct EcrConnector {
    default_region: Option<String>,
}

impl EcrConnector {
    pub fn new(default_region: Option<String>) -> Self {
        Self { default_region }
    }
}

#[async_trait]
impl RegistryConnector for EcrConnector {
    async fn connect(&self, region: Option<&str>) -> Arc<dyn Registry> {
        let region = region.or(self.default_region.as_deref());
        Arc::new(EcrRegistry::connect(region).await)
    }
}

/// A ready-made registry ignores the event's region.
#[async_trait]
impl RegistryConnector for Arc<dyn Registry> {
    async fn connect(&self, _region: Option<&str>) -> Arc<dyn Registry> {
        self.clone()
    }
}

/// Compute the response for an event. Never fails.
pub async fn respond<C: RegistryConnector + ?Sized>(
    event: &DeploymentEvent,
    connector: &C,
) -> CustomResourceResponse {
    let now_millis = Utc::now().timestamp_millis();

    match event.request_type {
        RequestType::Delete => {
            info!("Processing Delete request - no action required");
            CustomResourceResponse::success(
                event,
                existing_or_fallback_id(event.physical_resource_id.as_deref(), now_millis),
                None,
            )
        }
        RequestType::Create | RequestType::Update => {
            info!(
                request_type = ?event.request_type,
                "Processing Create/Update request - performing ECR tagging"
            );
            match tag(event, connector, now_millis).await {
                Ok(response) => response,
                Err(err) => {
                    error!(error = %err, "Error in ECR tagging");
                    CustomResourceResponse::failed(event, err.to_string(), now_millis)
                }
            }
        }
    }
}

async fn tag<C: RegistryConnector + ?Sized>(
    event: &DeploymentEvent,
    connector: &C,
    now_millis: i64,
) -> Result<CustomResourceResponse, LifecycleError> {
    let properties = event.tagging_properties()?;
    let request = properties.to_request()?;

    let registry = connector.connect(properties.region.as_deref()).await;
    let result = StageTagger::new(registry.as_ref())
        .tag_with_stage(&request)
        .await?;

    let physical_resource_id = match (event.request_type, &event.physical_resource_id) {
        (RequestType::Update, Some(id)) if !id.is_empty() => id.clone(),
        _ => tagged_resource_id(&result.repository_name, &result.stage_tag, now_millis),
    };

    info!(
        physical_resource_id = %physical_resource_id,
        digest = %result.image_digest,
        "ECR image tagging completed successfully"
    );
    Ok(CustomResourceResponse::success(
        event,
        physical_resource_id,
        Some(result),
    ))
}

/// Handle an event end to end: respond, then deliver the response.
///
/// Delivery failure is the only error returned; the orchestrator has no other
/// way to learn the outcome, so the host must treat it as fatal.
pub async fn process<C, N>(
    event: &DeploymentEvent,
    connector: &C,
    notifier: &N,
) -> Result<CustomResourceResponse, NotifyError>
where
    C: RegistryConnector + ?Sized,
    N: ResponseNotifier + ?Sized,
{
    info!(
        request_type = ?event.request_type,
        request_id = %event.request_id,
        logical_resource_id = %event.logical_resource_id,
        "Custom resource event received"
    );

    let response = respond(event, connector).await;
    deliver(notifier, &event.response_url, response).await
}

/// Like [`process`], but malformed input is answered with FAILED instead of
/// leaving the orchestrator waiting.
pub async fn process_incoming<C, N>(
    incoming: &IncomingEvent,
    connector: &C,
    notifier: &N,
) -> Result<CustomResourceResponse, NotifyError>
where
    C: RegistryConnector + ?Sized,
    N: ResponseNotifier + ?Sized,
{
    match incoming {
        IncomingEvent::Valid(event) => process(event, connector, notifier).await,
        IncomingEvent::Malformed { envelope, reason } => {
            error!(
                request_id = %envelope.request_id,
                logical_resource_id = %envelope.logical_resource_id,
                reason = %reason,
                "Rejecting malformed custom resource event"
            );
            let now_millis = Utc::now().timestamp_millis();
            let response = CustomResourceResponse::rejected(envelope, reason.as_str(), now_millis);
            deliver(notifier, &envelope.response_url, response).await
        }
    }
}

async fn deliver<N: ResponseNotifier + ?Sized>(
    notifier: &N,
    url: &str,
    response: CustomResourceResponse,
) -> Result<CustomResourceResponse, NotifyError> {
    if let Err(err) = notifier.notify(url, &response).await {
        error!(error = %err, "Failed to send response to CloudFormation");
        return Err(err);
    }
    Ok(response)
}
