//! Code generation pipeline for hookgen.
//!
//! Locates contract artifacts, runs the configured plugins in order and
//! writes the resulting TypeScript module atomically.

pub mod locator;
pub mod module;
pub mod naming;
pub mod pipeline;
pub mod plugin;
pub mod writer;

pub use locator::ArtifactLocator;
pub use module::{CodeUnit, GeneratedModule, UnitKind};
pub use pipeline::{Pipeline, RunState, RunSummary, Stage};
pub use plugin::{Capabilities, FoundryPlugin, Plugin, PluginContext, PluginOutput, ReactPlugin};
pub use writer::{OutputWriter, StagedOutput};
