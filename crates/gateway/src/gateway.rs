//! The infallible generation entry point.

use std::sync::Arc;

use swapbench_core::TestCase;

use crate::artifact::Artifact;
use crate::placeholder::placeholder_artifact;
use crate::registry::ToolRegistry;

/// Uniform front door to all registered generators.
///
/// `invoke` never fails: an unresolved tool id or a generator error of
/// any class yields a placeholder error artifact instead. The run
/// coordinator persists and scores whatever comes back, so a generation
/// failure alone never fails an item.
pub struct PluginGateway {
    registry: Arc<ToolRegistry>,
}

impl PluginGateway {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run the generator registered under `tool_id` against `case`.
    ///
    /// Failures are logged and substituted, never propagated. The
    /// substitution is deliberate and visible: the failure class and
    /// message are rendered into the returned artifact.
    pub async fn invoke(&self, tool_id: &str, case: &TestCase) -> Artifact {
        let Some(generator) = self.registry.resolve(tool_id) else {
            tracing::error!(tool_id, case_id = %case.id, "No generator registered for tool");
            return placeholder_artifact(tool_id, "unknown tool", tool_id);
        };

        match generator.generate(case).await {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::error!(
                    tool_id,
                    case_id = %case.id,
                    error = %e,
                    "Generator failed, substituting placeholder artifact",
                );
                placeholder_artifact(tool_id, e.class(), &e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerateError;
    use crate::placeholder::PLACEHOLDER_SIZE;
    use crate::registry::Generator;
    use async_trait::async_trait;

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(&self, _case: &TestCase) -> Result<Artifact, GenerateError> {
            Err(GenerateError::Network("connection refused".into()))
        }
    }

    struct FixedGenerator(Vec<u8>);

    #[async_trait]
    impl Generator for FixedGenerator {
        async fn generate(&self, _case: &TestCase) -> Result<Artifact, GenerateError> {
            Ok(Artifact::from_png(self.0.clone()))
        }
    }

    fn registry_with(tool_id: &str, generator: Arc<dyn Generator>) -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(tool_id, generator);
        Arc::new(registry)
    }

    #[tokio::test]
    async fn successful_generation_passes_through() {
        let gateway =
            PluginGateway::new(registry_with("fixed", Arc::new(FixedGenerator(vec![1, 2, 3]))));

        let artifact = gateway.invoke("fixed", &TestCase::stub("tc_01")).await;
        assert_eq!(artifact.png_bytes(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn generator_failure_yields_placeholder_not_error() {
        let gateway = PluginGateway::new(registry_with("flaky", Arc::new(FailingGenerator)));

        let artifact = gateway.invoke("flaky", &TestCase::stub("tc_01")).await;
        let img = image::load_from_memory(artifact.png_bytes()).unwrap();
        assert_eq!(img.width(), PLACEHOLDER_SIZE);
        assert_eq!(img.height(), PLACEHOLDER_SIZE);
    }

    #[tokio::test]
    async fn unknown_tool_yields_placeholder() {
        let gateway = PluginGateway::new(Arc::new(ToolRegistry::new()));

        let artifact = gateway.invoke("ghost", &TestCase::stub("tc_01")).await;
        let img = image::load_from_memory(artifact.png_bytes()).unwrap();
        assert_eq!(img.width(), PLACEHOLDER_SIZE);
    }
}
