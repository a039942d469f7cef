//! Builder pattern for the recalculation orchestrator.

use std::sync::Arc;

use tender_traits::{CostItemSource, MarkupProfileSource, TotalsSink};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::orchestrator::RecalculationOrchestrator;

/// Builder for constructing a [`RecalculationOrchestrator`].
#[derive(Default)]
pub struct RecalculationOrchestratorBuilder {
    config: Option<EngineConfig>,
    items: Option<Arc<dyn CostItemSource>>,
    profiles: Option<Arc<dyn MarkupProfileSource>>,
    sink: Option<Arc<dyn TotalsSink>>,
}

impl RecalculationOrchestratorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the cost item source.
    pub fn with_items(mut self, source: Arc<dyn CostItemSource>) -> Self {
        self.items = Some(source);
        self
    }

    /// Set the markup profile source.
    pub fn with_profiles(mut self, source: Arc<dyn MarkupProfileSource>) -> Self {
        self.profiles = Some(source);
        self
    }

    /// Set the totals sink.
    pub fn with_sink(mut self, sink: Arc<dyn TotalsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the orchestrator.
    pub fn build(self) -> Result<RecalculationOrchestrator, EngineError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let items = self
            .items
            .ok_or_else(|| EngineError::ConfigError("item source not configured".into()))?;

        let profiles = self
            .profiles
            .ok_or_else(|| EngineError::ConfigError("profile source not configured".into()))?;

        let sink = self
            .sink
            .ok_or_else(|| EngineError::ConfigError("totals sink not configured".into()))?;

        Ok(RecalculationOrchestrator::new(items, profiles, sink, config))
    }
}
