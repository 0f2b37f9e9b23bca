// ABOUTME: Command module aggregator for the ecr-release CLI.
// ABOUTME: Re-exports publish, tag, and custom-resource command handlers.

mod custom_resource;
mod publish;
mod tag;

pub use custom_resource::custom_resource;
pub use publish::publish;
pub use tag::tag;
