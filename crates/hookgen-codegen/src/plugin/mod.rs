//! Generator plugins.
//!
//! Plugins form a closed set. Each kind carries its own typed options and is
//! dispatched by `match`; nothing is probed at runtime.

mod foundry;
mod react;

pub use foundry::FoundryPlugin;
pub use react::ReactPlugin;

use hookgen_core::{Artifact, PluginConfig, Result};

use crate::module::{CodeUnit, GeneratedModule};

/// What a plugin kind contributes to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Adds code units to the generated module.
    pub produces_code: bool,
    /// Declares imports the generated code depends on.
    pub declares_dependencies: bool,
}

/// Inputs to the generating phase of one plugin.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext<'a> {
    /// Every located artifact, sorted by name.
    pub artifacts: &'a [Artifact],
    /// Artifacts this plugin contributed during the locating phase.
    pub contributed: &'a [Artifact],
    /// Output of the plugins that ran before this one.
    pub prior: &'a GeneratedModule,
}

/// Everything one plugin adds during the generating phase.
#[derive(Debug, Default)]
pub struct PluginOutput {
    /// `(module, name)` pairs to import.
    pub imports: Vec<(String, String)>,
    pub units: Vec<CodeUnit>,
}

impl PluginOutput {
    pub fn import(&mut self, module: &str, name: &str) {
        self.imports.push((module.to_string(), name.to_string()));
    }
}

/// A configured plugin.
#[derive(Debug, Clone)]
pub enum Plugin {
    Foundry(FoundryPlugin),
    React(ReactPlugin),
}

impl From<PluginConfig> for Plugin {
    fn from(config: PluginConfig) -> Self {
        match config {
            PluginConfig::Foundry(options) => Plugin::Foundry(FoundryPlugin::new(options)),
            PluginConfig::React(options) => Plugin::React(ReactPlugin::new(options)),
        }
    }
}

impl Plugin {
    /// Stable identity used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Plugin::Foundry(_) => "foundry",
            Plugin::React(_) => "react",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Plugin::Foundry(_) => Capabilities {
                produces_code: true,
                declares_dependencies: false,
            },
            Plugin::React(_) => Capabilities {
                produces_code: true,
                declares_dependencies: true,
            },
        }
    }

    /// Locating phase: artifacts this plugin contributes.
    pub fn contracts(&self) -> Result<Vec<Artifact>> {
        match self {
            Plugin::Foundry(plugin) => plugin.contracts(),
            Plugin::React(_) => Ok(Vec::new()),
        }
    }

    /// Generating phase: code derived from all artifacts and prior output.
    pub fn generate(&self, ctx: &PluginContext<'_>) -> Result<PluginOutput> {
        let output = match self {
            Plugin::Foundry(plugin) => plugin.generate(ctx.contributed)?,
            Plugin::React(plugin) => plugin.generate(ctx.artifacts, ctx.prior)?,
        };

        let capabilities = self.capabilities();
        debug_assert!(capabilities.produces_code || output.units.is_empty());
        debug_assert!(capabilities.declares_dependencies || output.imports.is_empty());

        Ok(output)
    }
}
