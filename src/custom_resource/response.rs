// ABOUTME: Response document PUT to the custom resource callback URL.
// ABOUTME: Builds SUCCESS and FAILED responses and mints physical resource ids.

use serde::{Deserialize, Serialize};

use super::{DeploymentEvent, EventEnvelope};
use crate::stage::StageTaggingResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StageTaggingResult>,
}

impl CustomResourceResponse {
    pub fn success(
        event: &DeploymentEvent,
        physical_resource_id: String,
        data: Option<StageTaggingResult>,
    ) -> Self {
        Self {
            status: ResponseStatus::Success,
            reason: None,
            physical_resource_id,
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            data,
        }
    }

    /// Failure carrying `reason`, keeping the event's resource id if it has one.
    pub fn failed(event: &DeploymentEvent, reason: impl Into<String>, now_millis: i64) -> Self {
        Self {
            status: ResponseStatus::Failed,
            reason: Some(reason.into()),
            physical_resource_id: existing_or_fallback_id(
                event.physical_resource_id.as_deref(),
                now_millis,
            ),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            data: None,
        }
    }

    /// Failure for input that only decoded as far as its envelope.
    pub fn rejected(envelope: &EventEnvelope, reason: impl Into<String>, now_millis: i64) -> Self {
        Self {
            status: ResponseStatus::Failed,
            reason: Some(reason.into()),
            physical_resource_id: existing_or_fallback_id(
                envelope.physical_resource_id.as_deref(),
                now_millis,
            ),
            stack_id: envelope.stack_id.clone(),
            request_id: envelope.request_id.clone(),
            logical_resource_id: envelope.logical_resource_id.clone(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Id for a successfully tagged resource.
pub(crate) fn tagged_resource_id(repository: &str, stage_tag: &str, now_millis: i64) -> String {
    format!("ecr-tagger-{repository}-{stage_tag}-{now_millis}")
}

pub(crate) fn existing_or_fallback_id(existing: Option<&str>, now_millis: i64) -> String {
    existing
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("ecr-tagger-{now_millis}"))
}
