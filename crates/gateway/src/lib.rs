//! Plugin gateway: the uniform interface to named generator plugins.
//!
//! Generators are registered under string tool ids at process start
//! ([`ToolRegistry`]). The [`PluginGateway`] is the only caller of a
//! generator and never raises: any failure -- unknown tool, missing
//! credentials, missing inputs, network error, malformed response -- is
//! converted into a placeholder error artifact so the rest of the
//! pipeline treats every generation identically.

pub mod artifact;
pub mod error;
pub mod gateway;
pub mod placeholder;
pub mod plugins;
pub mod registry;

pub use artifact::Artifact;
pub use error::GenerateError;
pub use gateway::PluginGateway;
pub use registry::{Generator, ToolRegistry};
