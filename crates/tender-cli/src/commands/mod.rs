//! CLI command implementations.

pub mod recalc;
pub mod trace;

// Re-export submodules for convenience
pub use recalc::RecalcArgs;
pub use trace::TraceArgs;

use std::path::Path;

use anyhow::Context;
use tender_engine::EngineConfig;

/// Loads the engine configuration, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}
