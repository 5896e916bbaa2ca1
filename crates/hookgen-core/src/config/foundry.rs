use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for the `foundry` plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoundryOptions {
    /// Foundry project root.
    #[serde(default = "default_project", alias = "projectRoot")]
    pub project: PathBuf,

    /// Glob patterns selecting artifacts, relative to the build directory.
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Glob patterns removing artifacts even when included.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Build directory. Read from `foundry.toml` when unset.
    #[serde(default)]
    pub artifacts: Option<PathBuf>,

    /// Prefix prepended to every contract name.
    #[serde(default, alias = "namePrefix")]
    pub name_prefix: Option<String>,

    /// Deployed addresses: contract name, then chain id, then address.
    #[serde(default)]
    pub deployments: BTreeMap<String, BTreeMap<String, String>>,

    /// Build toolchain settings.
    #[serde(default)]
    pub forge: ForgeOptions,
}

impl Default for FoundryOptions {
    fn default() -> Self {
        Self {
            project: default_project(),
            include: default_include(),
            exclude: default_exclude(),
            artifacts: None,
            name_prefix: None,
            deployments: BTreeMap::new(),
            forge: ForgeOptions::default(),
        }
    }
}

impl FoundryOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.include.is_empty() {
            return Err(Error::Config(
                "foundry: `include` must contain at least one pattern".into(),
            ));
        }

        for (contract, chains) in &self.deployments {
            for (chain_id, address) in chains {
                if chain_id.parse::<u64>().is_err() {
                    return Err(Error::Config(format!(
                        "foundry: deployment of `{}` has non-numeric chain id `{}`",
                        contract, chain_id
                    )));
                }
                if !is_address(address) {
                    return Err(Error::Config(format!(
                        "foundry: deployment of `{}` on chain {} is not an address: `{}`",
                        contract, chain_id, address
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Settings for the `forge` executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForgeOptions {
    /// Run `forge build` before locating artifacts.
    #[serde(default = "default_true", alias = "buildBeforeRun")]
    pub build: bool,

    /// Run `forge clean` before building.
    #[serde(default)]
    pub clean: bool,

    /// Executable name or path.
    #[serde(default = "default_forge_path")]
    pub path: String,
}

impl Default for ForgeOptions {
    fn default() -> Self {
        Self {
            build: true,
            clean: false,
            path: default_forge_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_project() -> PathBuf {
    PathBuf::from(".")
}

fn default_include() -> Vec<String> {
    vec!["*.json".to_string()]
}

fn default_forge_path() -> String {
    "forge".to_string()
}

/// forge-std helpers plus test and script outputs.
pub fn default_exclude() -> Vec<String> {
    [
        "Common.sol/**",
        "Components.sol/**",
        "Script.sol/**",
        "StdAssertions.sol/**",
        "StdChains.sol/**",
        "StdCheats.sol/**",
        "StdError.sol/**",
        "StdInvariant.sol/**",
        "StdJson.sol/**",
        "StdMath.sol/**",
        "StdStorage.sol/**",
        "StdStyle.sol/**",
        "StdUtils.sol/**",
        "Test.sol/**",
        "Vm.sol/**",
        "console.sol/**",
        "console2.sol/**",
        "safeconsole.sol/**",
        "*.s.sol/**",
        "*.t.sol/**",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn is_address(s: &str) -> bool {
    s.strip_prefix("0x")
        .map(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FoundryOptions::default();
        assert_eq!(options.include, vec!["*.json".to_string()]);
        assert!(options.exclude.iter().any(|p| p == "*.t.sol/**"));
        assert!(options.forge.build);
        assert!(!options.forge.clean);
    }

    #[test]
    fn test_is_address() {
        assert!(is_address("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
        assert!(!is_address("5FbDB2315678afecb367f032d93F642f64180aa3"));
        assert!(!is_address("0x1234"));
        assert!(!is_address("0xZZbDB2315678afecb367f032d93F642f64180aa3"));
    }

    #[test]
    fn test_validate_rejects_bad_deployment() {
        let mut options = FoundryOptions::default();
        options.deployments.insert(
            "Partnership".into(),
            BTreeMap::from([("mainnet".to_string(), "0x00".to_string())]),
        );
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("chain id"));
    }

    #[test]
    fn test_validate_rejects_empty_include() {
        let options = FoundryOptions {
            include: vec![],
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}
