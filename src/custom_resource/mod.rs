// ABOUTME: CloudFormation custom resource lifecycle for stage tagging.
// ABOUTME: Maps Create/Update/Delete events to tagging and delivers the outcome to the callback URL.

mod event;
mod lifecycle;
mod notify;
mod response;

pub use event::{DeploymentEvent, EventEnvelope, IncomingEvent, RequestType, TaggingProperties};
pub use lifecycle::{
    EcrConnector, LifecycleError, RegistryConnector, process, process_incoming, respond,
};
pub use notify::{HttpNotifier, NotifyError, ResponseNotifier};
pub use response::{CustomResourceResponse, ResponseStatus};
