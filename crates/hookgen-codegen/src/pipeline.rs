//! The generation run: locate, generate, write.
//!
//! A run moves `Idle → Locating → Generating → Writing → Done`. Any error
//! moves it to `Failed`, which remembers the stage that failed; the error
//! itself stays readable through [`Pipeline::last_error`]. A failed or
//! finished pipeline has to be [`reset`](Pipeline::reset) before it runs again.

use std::collections::BTreeMap;
use std::path::PathBuf;

use hookgen_core::{Artifact, Config, Error, Result};

use crate::module::GeneratedModule;
use crate::plugin::{Plugin, PluginContext};
use crate::writer::OutputWriter;

/// A stage of the run that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Locating,
    Generating,
    Writing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Locating => "locating",
            Stage::Generating => "generating",
            Stage::Writing => "writing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a pipeline is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Locating,
    Generating,
    Writing,
    Done,
    Failed(Stage),
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub contracts: Vec<String>,
    pub bindings: usize,
    pub bytes: usize,
}

/// Runs the configured plugins in declared order and writes the result.
pub struct Pipeline {
    out: PathBuf,
    plugins: Vec<Plugin>,
    state: RunState,
    last_error: Option<String>,
}

impl Pipeline {
    /// Create a pipeline from a configuration, consuming it.
    pub fn new(config: Config) -> Self {
        Self {
            out: config.out,
            plugins: config.plugins.into_iter().map(Plugin::from).collect(),
            state: RunState::Idle,
            last_error: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Message of the error that moved the pipeline to `Failed`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Return a finished or failed pipeline to `Idle`.
    pub fn reset(&mut self) {
        self.state = RunState::Idle;
        self.last_error = None;
    }

    /// Locate, generate and write. Nothing is written unless every plugin succeeds.
    pub fn run(&mut self) -> Result<RunSummary> {
        let module = self.build_module()?;

        self.enter(RunState::Writing);
        let source = module.render();
        let writer = OutputWriter::new(module.output_path());
        if let Err(e) = writer.write(&source) {
            return Err(self.fail(Stage::Writing, e));
        }

        self.enter(RunState::Done);
        let contracts = module
            .units()
            .map(|unit| unit.contract)
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(RunSummary {
            output_path: module.output_path().to_path_buf(),
            contracts,
            bindings: module.binding_count(),
            bytes: source.len(),
        })
    }

    /// Locate and generate without writing. A successful dry run ends in `Done`.
    pub fn generate(&mut self) -> Result<GeneratedModule> {
        let module = self.build_module()?;
        self.enter(RunState::Done);
        Ok(module)
    }

    fn build_module(&mut self) -> Result<GeneratedModule> {
        if self.state != RunState::Idle {
            return Err(Error::Config(format!(
                "pipeline is {:?}; reset it before running again",
                self.state
            )));
        }

        self.enter(RunState::Locating);
        let (artifacts, contributed) = match self.locate() {
            Ok(located) => located,
            Err(e) => return Err(self.fail(Stage::Locating, e)),
        };

        self.enter(RunState::Generating);
        match self.synthesize(&artifacts, &contributed) {
            Ok(module) => Ok(module),
            Err(e) => Err(self.fail(Stage::Generating, e)),
        }
    }

    /// Collect artifacts from every plugin, keeping per-plugin contributions.
    fn locate(&self) -> Result<(Vec<Artifact>, Vec<Vec<Artifact>>)> {
        let mut all: BTreeMap<String, Artifact> = BTreeMap::new();
        let mut contributed = Vec::with_capacity(self.plugins.len());

        for plugin in &self.plugins {
            let artifacts = plugin
                .contracts()
                .map_err(|e| Error::plugin(plugin.name(), e))?;

            for artifact in &artifacts {
                if all.contains_key(&artifact.name) {
                    return Err(Error::plugin(
                        plugin.name(),
                        Error::Config(format!(
                            "contract `{}` is provided by more than one plugin",
                            artifact.name
                        )),
                    ));
                }
                all.insert(artifact.name.clone(), artifact.clone());
            }
            contributed.push(artifacts);
        }

        if all.is_empty() {
            return Err(Error::NotFound(
                "no plugin provided any contract artifacts".into(),
            ));
        }

        Ok((all.into_values().collect(), contributed))
    }

    /// Run every plugin's generating phase in order, threading the module through.
    fn synthesize(
        &self,
        artifacts: &[Artifact],
        contributed: &[Vec<Artifact>],
    ) -> Result<GeneratedModule> {
        let mut module = GeneratedModule::new(&self.out);

        for (plugin, own) in self.plugins.iter().zip(contributed) {
            let ctx = PluginContext {
                artifacts,
                contributed: own,
                prior: &module,
            };
            let output = plugin
                .generate(&ctx)
                .map_err(|e| Error::plugin(plugin.name(), e))?;

            tracing::debug!(
                plugin = plugin.name(),
                units = output.units.len(),
                imports = output.imports.len(),
                "Plugin finished"
            );

            for (from, name) in output.imports {
                module.add_import(from, name);
            }
            for unit in output.units {
                module
                    .add_unit(unit)
                    .map_err(|e| Error::plugin(plugin.name(), e))?;
            }
        }

        Ok(module)
    }

    fn enter(&mut self, state: RunState) {
        tracing::info!(from = ?self.state, to = ?state, "Pipeline stage");
        self.state = state;
    }

    fn fail(&mut self, stage: Stage, error: Error) -> Error {
        tracing::error!(stage = %stage, plugin = error.plugin_name(), error = %error, "Pipeline failed");
        self.state = RunState::Failed(stage);
        self.last_error = Some(error.to_string());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::UnitKind;
    use hookgen_core::{FoundryOptions, PluginConfig, ReactOptions};
    use std::path::Path;
    use tempfile::tempdir;

    const PARTNERSHIP: &str = r#"{ "abi": [
        { "type": "function", "name": "join",
          "inputs": [{ "name": "member", "type": "address" }],
          "outputs": [], "stateMutability": "nonpayable" },
        { "type": "function", "name": "leave",
          "inputs": [], "outputs": [], "stateMutability": "nonpayable" },
        { "type": "event", "name": "Joined",
          "inputs": [{ "name": "member", "type": "address", "indexed": true }],
          "anonymous": false }
    ] }"#;

    const VAULT: &str = r#"{ "abi": [
        { "type": "function", "name": "deposit",
          "inputs": [], "outputs": [], "stateMutability": "payable" },
        { "type": "event", "name": "Deposited",
          "inputs": [{ "name": "amount", "type": "uint256" }],
          "anonymous": false }
    ] }"#;

    fn project(dir: &Path) {
        for (rel, content) in [
            ("out/Partnership.sol/Partnership.json", PARTNERSHIP),
            ("out/Vault.sol/Vault.json", VAULT),
        ] {
            let path = dir.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
    }

    fn config(dir: &Path, include: &[&str], react: ReactOptions) -> Config {
        Config::foundry_react(
            dir.join("app/lib/wagmi.hooks.ts"),
            dir,
            include.iter().map(|s| s.to_string()).collect(),
            false,
            react,
        )
    }

    #[test]
    fn test_run_writes_output_and_reaches_done() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let mut pipeline = Pipeline::new(config(dir.path(), &["*.json"], ReactOptions::default()));
        assert_eq!(pipeline.state(), RunState::Idle);

        let summary = pipeline.run().unwrap();
        assert_eq!(pipeline.state(), RunState::Done);
        assert_eq!(summary.contracts, vec!["Partnership", "Vault"]);
        assert_eq!(summary.bindings, 2 * 3);

        let source = std::fs::read_to_string(&summary.output_path).unwrap();
        assert_eq!(source.len(), summary.bytes);
        assert!(source.contains("export const partnershipABI = ["));
        assert!(source.contains("export function usePartnershipJoinedEvent("));
        assert!(source.contains("export function useVaultDepositedEvent("));
    }

    #[test]
    fn test_binding_count_tracks_enabled_toggles() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let toggles = [
            ReactOptions::default(),
            ReactOptions {
                use_contract: false,
                ..Default::default()
            },
            ReactOptions {
                use_contract_event: false,
                use_contract_item_event: false,
                ..Default::default()
            },
            ReactOptions::none(),
        ];

        for react in toggles {
            let mut pipeline = Pipeline::new(config(dir.path(), &["*.json"], react));
            let module = pipeline.generate().unwrap();
            assert_eq!(module.binding_count(), 2 * react.enabled_count());
        }
    }

    #[test]
    fn test_disabling_one_toggle_removes_only_its_units() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let all = Pipeline::new(config(dir.path(), &["*.json"], ReactOptions::default()))
            .generate()
            .unwrap();

        let cases = [
            (
                UnitKind::ContractEvent,
                ReactOptions {
                    use_contract_event: false,
                    ..Default::default()
                },
            ),
            (
                UnitKind::Contract,
                ReactOptions {
                    use_contract: false,
                    ..Default::default()
                },
            ),
            (
                UnitKind::ContractItemEvent,
                ReactOptions {
                    use_contract_item_event: false,
                    ..Default::default()
                },
            ),
        ];

        for (disabled, react) in cases {
            let without = Pipeline::new(config(dir.path(), &["*.json"], react))
                .generate()
                .unwrap();

            let expected: Vec<_> = all.bindings().filter(|u| u.kind != disabled).collect();
            let actual: Vec<_> = without.bindings().collect();
            assert_eq!(actual, expected, "disabling {}", disabled);
        }
    }

    #[test]
    fn test_dry_run_ends_done_without_writing() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let config = config(dir.path(), &["*.json"], ReactOptions::default());
        let out = config.out.clone();
        let mut pipeline = Pipeline::new(config);

        let module = pipeline.generate().unwrap();
        assert_eq!(pipeline.state(), RunState::Done);
        assert_eq!(module.binding_count(), 2 * 3);
        assert!(!out.exists());

        assert!(pipeline.run().is_err());
        pipeline.reset();
        pipeline.run().unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_output_is_deterministic() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let first = Pipeline::new(config(dir.path(), &["*.json"], ReactOptions::default()))
            .run()
            .unwrap();
        let first_bytes = std::fs::read(&first.output_path).unwrap();

        let second = Pipeline::new(config(dir.path(), &["*.json"], ReactOptions::default()))
            .run()
            .unwrap();
        let second_bytes = std::fs::read(&second.output_path).unwrap();

        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn test_no_match_fails_without_writing() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let config = config(dir.path(), &["Missing.sol/**"], ReactOptions::default());
        let out = config.out.clone();
        let mut pipeline = Pipeline::new(config);

        let err = pipeline.run().unwrap_err();
        assert_eq!(pipeline.state(), RunState::Failed(Stage::Locating));
        assert_eq!(err.plugin_name(), Some("foundry"));
        assert!(matches!(err.root_cause(), Error::NotFound(_)));
        assert_eq!(pipeline.last_error(), Some(err.to_string().as_str()));
        assert!(!out.exists());
        assert!(!out.parent().unwrap().exists());
    }

    #[test]
    fn test_react_before_foundry_fails_generating() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let foundry = FoundryOptions {
            project: dir.path().to_path_buf(),
            forge: hookgen_core::ForgeOptions {
                build: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let config = Config::new(dir.path().join("hooks.ts"))
            .with_plugin(PluginConfig::React(ReactOptions::default()))
            .with_plugin(PluginConfig::Foundry(foundry));

        let mut pipeline = Pipeline::new(config);
        let err = pipeline.run().unwrap_err();
        assert_eq!(pipeline.state(), RunState::Failed(Stage::Generating));
        assert_eq!(err.plugin_name(), Some("react"));
        assert!(!dir.path().join("hooks.ts").exists());
    }

    #[test]
    fn test_rerun_requires_reset() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let mut pipeline = Pipeline::new(config(dir.path(), &["*.json"], ReactOptions::default()));
        pipeline.run().unwrap();
        assert!(pipeline.run().is_err());

        pipeline.reset();
        assert_eq!(pipeline.state(), RunState::Idle);
        assert!(pipeline.last_error().is_none());
        pipeline.run().unwrap();
        assert_eq!(pipeline.state(), RunState::Done);
    }

    #[test]
    fn test_write_failure_keeps_prior_output() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let config = config(dir.path(), &["*.json"], ReactOptions::default());
        let out = config.out.clone();
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("occupied"), "x").unwrap();

        let mut pipeline = Pipeline::new(config);
        let err = pipeline.run().unwrap_err();
        assert_eq!(pipeline.state(), RunState::Failed(Stage::Writing));
        assert!(matches!(err, Error::Write { .. }));
        assert!(out.join("occupied").exists());
    }
}
