// ABOUTME: Library root for ecr-release - exposes the release and tagging core for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod custom_resource;
pub mod error;
pub mod hooks;
pub mod output;
pub mod process;
pub mod publish;
pub mod registry;
pub mod stage;
pub mod types;
pub mod version;
