//! Generator trait and the tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use swapbench_core::TestCase;

use crate::artifact::Artifact;
use crate::error::GenerateError;

/// One generator plugin: takes a case descriptor (and whatever filesystem
/// inputs it references) and produces an image artifact or fails.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, case: &TestCase) -> Result<Artifact, GenerateError>;
}

/// Registry mapping tool-id strings to generator capabilities.
///
/// Populated once at process start; unknown tool ids at run-creation time
/// are a configuration error surfaced to the caller, never a late runtime
/// crash. This replaces the source system's dynamic module import by id.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Generator>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `generator` under `tool_id`, replacing any previous entry.
    pub fn register(&mut self, tool_id: impl Into<String>, generator: Arc<dyn Generator>) {
        let tool_id = tool_id.into();
        tracing::info!(tool_id = %tool_id, "Registered generator");
        self.tools.insert(tool_id, generator);
    }

    pub fn contains(&self, tool_id: &str) -> bool {
        self.tools.contains_key(tool_id)
    }

    /// Resolve a tool id to its generator.
    pub fn resolve(&self, tool_id: &str) -> Option<Arc<dyn Generator>> {
        self.tools.get(tool_id).cloned()
    }

    /// All registered tool ids, sorted for deterministic "all tools"
    /// resolution.
    pub fn tool_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tools.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullGenerator;

    #[async_trait]
    impl Generator for NullGenerator {
        async fn generate(&self, _case: &TestCase) -> Result<Artifact, GenerateError> {
            Ok(Artifact::from_png(Vec::new()))
        }
    }

    #[test]
    fn register_and_resolve() {
        let mut registry = ToolRegistry::new();
        registry.register("faceswap", Arc::new(NullGenerator));

        assert!(registry.contains("faceswap"));
        assert!(registry.resolve("faceswap").is_some());
        assert!(registry.resolve("unknown").is_none());
    }

    #[test]
    fn tool_ids_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register("zeta", Arc::new(NullGenerator));
        registry.register("alpha", Arc::new(NullGenerator));

        assert_eq!(registry.tool_ids(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn reregistering_replaces_not_duplicates() {
        let mut registry = ToolRegistry::new();
        registry.register("faceswap", Arc::new(NullGenerator));
        registry.register("faceswap", Arc::new(NullGenerator));

        assert_eq!(registry.len(), 1);
    }
}
