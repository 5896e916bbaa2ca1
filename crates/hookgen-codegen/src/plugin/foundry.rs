use hookgen_core::{Artifact, FoundryOptions, Result};

use super::PluginOutput;
use crate::locator::ArtifactLocator;
use crate::module::{CodeUnit, UnitKind};
use crate::naming::{abi_const, address_const, config_const};

/// Locates Foundry artifacts and emits the constants bindings refer to.
#[derive(Debug, Clone)]
pub struct FoundryPlugin {
    options: FoundryOptions,
}

impl FoundryPlugin {
    pub fn new(options: FoundryOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FoundryOptions {
        &self.options
    }

    pub(crate) fn contracts(&self) -> Result<Vec<Artifact>> {
        ArtifactLocator::new(&self.options).locate()
    }

    /// One ABI constant per artifact, plus address and config constants for
    /// deployed contracts.
    pub(crate) fn generate(&self, artifacts: &[Artifact]) -> Result<PluginOutput> {
        let mut output = PluginOutput::default();

        for artifact in artifacts {
            output.units.push(CodeUnit::new(
                &artifact.name,
                UnitKind::Abi,
                render_abi(artifact)?,
            ));

            if !artifact.deployments.is_empty() {
                output.units.push(CodeUnit::new(
                    &artifact.name,
                    UnitKind::Address,
                    render_address(artifact),
                ));
                output.units.push(CodeUnit::new(
                    &artifact.name,
                    UnitKind::Config,
                    render_config(artifact),
                ));
            }
        }

        Ok(output)
    }
}

fn render_abi(artifact: &Artifact) -> Result<String> {
    let abi = serde_json::to_string_pretty(&artifact.abi)?;
    Ok(format!(
        "/**\n * {}\n */\nexport const {} = {} as const\n",
        artifact.source.display(),
        abi_const(&artifact.name),
        abi
    ))
}

fn render_address(artifact: &Artifact) -> String {
    let mut code = format!("export const {} = {{\n", address_const(&artifact.name));
    for (chain_id, address) in &artifact.deployments {
        code.push_str(&format!("  {}: '{}',\n", chain_id, address));
    }
    code.push_str("} as const\n");
    code
}

fn render_config(artifact: &Artifact) -> String {
    format!(
        "export const {} = {{\n  address: {},\n  abi: {},\n}} as const\n",
        config_const(&artifact.name),
        address_const(&artifact.name),
        abi_const(&artifact.name)
    )
}
