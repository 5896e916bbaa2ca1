mod foundry;
mod react;

pub use foundry::{default_exclude, ForgeOptions, FoundryOptions};
pub use react::ReactOptions;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "hookgen.toml";

/// Root configuration for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// File the generated bindings are written to.
    #[serde(alias = "outputPath")]
    pub out: PathBuf,

    /// Plugins, run in declared order.
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

/// A plugin entry, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PluginConfig {
    /// Locates Foundry build artifacts and emits their ABI constants.
    Foundry(FoundryOptions),
    /// Emits React hooks for every located contract.
    React(ReactOptions),
}

impl Config {
    /// Create an empty configuration writing to `out`.
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self {
            out: out.into(),
            plugins: Vec::new(),
        }
    }

    /// Append a plugin to the end of the pipeline.
    pub fn with_plugin(mut self, plugin: PluginConfig) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Build the usual `foundry` then `react` pipeline from flat settings.
    pub fn foundry_react(
        out: impl Into<PathBuf>,
        project: impl Into<PathBuf>,
        include: Vec<String>,
        build_before_run: bool,
        react: ReactOptions,
    ) -> Self {
        let foundry = FoundryOptions {
            project: project.into(),
            include,
            forge: ForgeOptions {
                build: build_before_run,
                ..Default::default()
            },
            ..Default::default()
        };

        Self::new(out)
            .with_plugin(PluginConfig::Foundry(foundry))
            .with_plugin(PluginConfig::React(react))
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content)?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.out.as_os_str().is_empty() {
            return Err(Error::Config("`out` must not be empty".into()));
        }
        if self.plugins.is_empty() {
            return Err(Error::Config("at least one plugin is required".into()));
        }
        for plugin in &self.plugins {
            if let PluginConfig::Foundry(options) = plugin {
                options.validate()?;
            }
        }
        Ok(())
    }

    /// Resolve relative `out` and project paths against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        if self.out.is_relative() {
            self.out = base.join(&self.out);
        }
        for plugin in &mut self.plugins {
            if let PluginConfig::Foundry(options) = plugin {
                if options.project.is_relative() {
                    options.project = base.join(&options.project);
                }
            }
        }
        self
    }
}

impl PluginConfig {
    /// Stable identity of the plugin kind.
    pub fn name(&self) -> &'static str {
        match self {
            PluginConfig::Foundry(_) => "foundry",
            PluginConfig::React(_) => "react",
        }
    }
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> Result<String> {
    let mut result = content.to_string();
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| Error::Config(e.to_string()))?;

    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(value) => result = result.replace(&cap[0], &value),
            Err(_) => tracing::warn!(var = var_name, "Environment variable not set"),
        }
    }

    Ok(result)
}
