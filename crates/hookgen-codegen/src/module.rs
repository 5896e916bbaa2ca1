//! The generated module: imports, support declarations and binding units.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use hookgen_core::{Error, Result};

const HEADER: &str = "// Generated by hookgen - DO NOT EDIT\n";

/// Kind of a generated code unit.
///
/// Variant order is the order units are emitted in for each contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitKind {
    /// `export const <name>ABI = [...] as const`
    Abi,
    /// `export const <name>Address = { ... } as const`
    Address,
    /// `export const <name>Config = { address, abi } as const`
    Config,
    /// `use<Name>Event`
    ContractEvent,
    /// `use<Name>`
    Contract,
    /// `use<Name><Event>Event` for every event
    ContractItemEvent,
}

impl UnitKind {
    /// Whether this unit is a client binding rather than shared support code.
    pub fn is_binding(&self) -> bool {
        matches!(
            self,
            UnitKind::ContractEvent | UnitKind::Contract | UnitKind::ContractItemEvent
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Abi => "abi",
            UnitKind::Address => "address",
            UnitKind::Config => "config",
            UnitKind::ContractEvent => "contract-event",
            UnitKind::Contract => "contract",
            UnitKind::ContractItemEvent => "contract-item-event",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One synthesized piece of code tied to a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUnit {
    pub contract: String,
    pub kind: UnitKind,
    pub code: String,
}

impl CodeUnit {
    pub fn new(contract: impl Into<String>, kind: UnitKind, code: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            kind,
            code: code.into(),
        }
    }
}

/// Accumulated output of the plugin pipeline, bound to one output path.
///
/// Units are keyed by contract then kind, so rendering order does not depend
/// on the order plugins added them in.
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    output_path: PathBuf,
    imports: BTreeMap<String, BTreeSet<String>>,
    units: BTreeMap<(String, UnitKind), String>,
}

impl GeneratedModule {
    /// Create an empty module for `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            imports: BTreeMap::new(),
            units: BTreeMap::new(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Declare an import of `name` from `module`. Duplicates collapse.
    pub fn add_import(&mut self, module: impl Into<String>, name: impl Into<String>) {
        self.imports
            .entry(module.into())
            .or_default()
            .insert(name.into());
    }

    /// Add a unit. Two units with the same contract and kind conflict.
    pub fn add_unit(&mut self, unit: CodeUnit) -> Result<()> {
        let key = (unit.contract, unit.kind);
        if self.units.contains_key(&key) {
            return Err(Error::Config(format!(
                "duplicate `{}` unit for contract `{}`",
                key.1, key.0
            )));
        }
        self.units.insert(key, unit.code);
        Ok(())
    }

    /// Whether a unit of `kind` exists for `contract`.
    pub fn has_unit(&self, contract: &str, kind: UnitKind) -> bool {
        self.units.contains_key(&(contract.to_string(), kind))
    }

    /// All units in emission order.
    pub fn units(&self) -> impl Iterator<Item = CodeUnit> + '_ {
        self.units
            .iter()
            .map(|((contract, kind), code)| CodeUnit::new(contract.clone(), *kind, code.clone()))
    }

    /// Binding units only, in emission order.
    pub fn bindings(&self) -> impl Iterator<Item = CodeUnit> + '_ {
        self.units().filter(|unit| unit.kind.is_binding())
    }

    /// Number of binding units.
    pub fn binding_count(&self) -> usize {
        self.units.keys().filter(|(_, kind)| kind.is_binding()).count()
    }

    /// Render the full module source.
    pub fn render(&self) -> String {
        let mut output = String::from(HEADER);

        if !self.imports.is_empty() {
            output.push('\n');
            for (module, names) in &self.imports {
                let names = names.iter().cloned().collect::<Vec<_>>().join(", ");
                output.push_str(&format!("import {{ {} }} from '{}'\n", names, module));
            }
        }

        let mut current: Option<&str> = None;
        for ((contract, _), code) in &self.units {
            if current != Some(contract.as_str()) {
                output.push('\n');
                output.push_str(&section_banner(contract));
                current = Some(contract.as_str());
            }
            output.push('\n');
            output.push_str(code.trim_end());
            output.push('\n');
        }

        output
    }
}

fn section_banner(contract: &str) -> String {
    let rule = "/".repeat(66);
    format!("{}\n// {}\n{}\n", rule, contract, rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_sorted_by_contract_then_kind() {
        let mut module = GeneratedModule::new("out.ts");
        module
            .add_unit(CodeUnit::new("Vault", UnitKind::Contract, "// vault"))
            .unwrap();
        module
            .add_unit(CodeUnit::new("Partnership", UnitKind::ContractItemEvent, "// items"))
            .unwrap();
        module
            .add_unit(CodeUnit::new("Partnership", UnitKind::Abi, "// abi"))
            .unwrap();
        module
            .add_unit(CodeUnit::new("Partnership", UnitKind::ContractEvent, "// events"))
            .unwrap();

        let order: Vec<_> = module
            .units()
            .map(|u| (u.contract, u.kind))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Partnership".to_string(), UnitKind::Abi),
                ("Partnership".to_string(), UnitKind::ContractEvent),
                ("Partnership".to_string(), UnitKind::ContractItemEvent),
                ("Vault".to_string(), UnitKind::Contract),
            ]
        );
        assert_eq!(module.binding_count(), 3);
    }

    #[test]
    fn test_duplicate_unit_rejected() {
        let mut module = GeneratedModule::new("out.ts");
        module
            .add_unit(CodeUnit::new("A", UnitKind::Abi, "1"))
            .unwrap();
        let err = module
            .add_unit(CodeUnit::new("A", UnitKind::Abi, "2"))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate `abi` unit"));
    }

    #[test]
    fn test_render_imports_deduplicated() {
        let mut module = GeneratedModule::new("out.ts");
        module.add_import("wagmi", "useContractEvent");
        module.add_import("wagmi", "useContract");
        module.add_import("wagmi", "useContractEvent");
        module
            .add_unit(CodeUnit::new("A", UnitKind::Abi, "export const aABI = [] as const\n\n"))
            .unwrap();

        let source = module.render();
        assert!(source.starts_with(HEADER));
        assert!(source.contains("import { useContract, useContractEvent } from 'wagmi'\n"));
        assert!(source.contains("// A\n"));
        assert!(source.ends_with("export const aABI = [] as const\n"));
    }

    #[test]
    fn test_render_empty_module() {
        let module = GeneratedModule::new("out.ts");
        assert_eq!(module.render(), HEADER);
    }
}
