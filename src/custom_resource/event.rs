// ABOUTME: Deployment event as delivered by CloudFormation to a custom resource.
// ABOUTME: RequestType is a closed enum so every lifecycle branch is matched exhaustively.

use serde::{Deserialize, Serialize};

use super::LifecycleError;
use crate::stage::StageTagRequest;
use crate::types::{ImageTag, RepositoryName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// One custom resource event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentEvent {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    /// Absent on Create; set on Update and Delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: serde_json::Value,
}

/// The fields needed to answer an event, read from input that failed the
/// full decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventEnvelope {
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
}

/// Raw input classified by how far it decodes.
#[derive(Debug, Clone)]
pub enum IncomingEvent {
    Valid(DeploymentEvent),
    /// Answerable, but not a well-formed event.
    Malformed {
        envelope: EventEnvelope,
        reason: String,
    },
}

impl IncomingEvent {
    /// Decode `raw`, falling back to the envelope when the full event is
    /// invalid. Errors only when there is no callback to answer.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        match DeploymentEvent::deserialize(&value) {
            Ok(event) => Ok(Self::Valid(event)),
            Err(decode) => match EventEnvelope::deserialize(&value) {
                Ok(envelope) => Ok(Self::Malformed {
                    envelope,
                    reason: format!("invalid deployment event: {decode}"),
                }),
                Err(_) => Err(decode),
            },
        }
    }
}

/// Resource properties for a stage tagging resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggingProperties {
    pub repository_name: String,
    pub image_tag: String,
    pub stage_tag: String,
    #[serde(default)]
    pub region: Option<String>,
}

impl DeploymentEvent {
    /// Parse from the raw JSON the orchestrator sent.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn tagging_properties(&self) -> Result<TaggingProperties, LifecycleError> {
        // CloudFormation adds ServiceToken next to the user properties.
        TaggingProperties::deserialize(&self.resource_properties)
            .map_err(|e| LifecycleError::InvalidProperties(e.to_string()))
    }
}

impl TaggingProperties {
    pub fn to_request(&self) -> Result<StageTagRequest, LifecycleError> {
        Ok(StageTagRequest {
            repository: RepositoryName::new(&self.repository_name).map_err(invalid)?,
            source_tag: ImageTag::new(&self.image_tag).map_err(invalid)?,
            stage_tag: ImageTag::new(&self.stage_tag).map_err(invalid)?,
        })
    }
}

fn invalid(err: impl std::fmt::Display) -> LifecycleError {
    LifecycleError::InvalidProperties(err.to_string())
}
