// ABOUTME: Publish orchestration using the type state pattern.
// ABOUTME: Resolve -> bump -> hooks -> build -> push, fail-fast with no retries.

mod confirm;
mod context;
mod error;
mod publisher;
mod release;
mod state;
mod transitions;

pub use confirm::{AutoConfirm, ConfirmError, Confirmer, TerminalConfirmer};
pub use context::{PublishContext, PublishOptions};
pub use error::{PublishError, PublishErrorKind};
pub use publisher::{PublishOutcome, Publisher};
pub use release::Release;
pub use state::{Built, Initialized, Published, RepositoryReady, VersionBumped, VersionResolved};
