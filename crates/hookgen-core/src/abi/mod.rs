//! Contract artifact model.
//!
//! An [`Artifact`] is one compiled contract: its name, where it was loaded
//! from, and its ABI. ABI entries keep the order the compiler emitted them in.

mod types;

pub use types::SolType;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A compiled contract interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Contract name, including any configured prefix.
    pub name: String,
    /// Path relative to the build directory.
    pub source: PathBuf,
    /// ABI entries in compiler order.
    pub abi: Vec<AbiItem>,
    /// Deployed addresses by chain id.
    pub deployments: BTreeMap<u64, String>,
}

/// Shape of a Foundry build output file. Only the ABI is read.
#[derive(Deserialize)]
struct BuildOutput {
    abi: Vec<AbiItem>,
}

impl Artifact {
    /// Create an artifact from already-parsed ABI entries.
    pub fn new(name: impl Into<String>, abi: Vec<AbiItem>) -> Self {
        let name = name.into();
        Self {
            source: PathBuf::from(format!("{}.json", name)),
            name,
            abi,
            deployments: BTreeMap::new(),
        }
    }

    /// Parse a Foundry build output file.
    ///
    /// Every parameter type is checked here so later stages can rely on
    /// [`SolType::parse`] succeeding.
    pub fn from_json(name: impl Into<String>, source: &Path, json: &str) -> Result<Self> {
        let parse_error = |message: String| Error::Parse {
            path: source.to_path_buf(),
            message,
        };

        let output: BuildOutput =
            serde_json::from_str(json).map_err(|e| parse_error(e.to_string()))?;

        for item in &output.abi {
            for param in item.inputs().iter().chain(item.outputs()) {
                SolType::parse(param).map_err(|e| {
                    parse_error(format!("`{}`: {}", item.name().unwrap_or("<anonymous>"), e))
                })?;
            }
        }

        Ok(Self {
            name: name.into(),
            source: source.to_path_buf(),
            abi: output.abi,
            deployments: BTreeMap::new(),
        })
    }

    /// Event entries in ABI order.
    pub fn events(&self) -> impl Iterator<Item = &AbiItem> {
        self.abi
            .iter()
            .filter(|item| matches!(item, AbiItem::Event { .. }))
    }
}

/// One ABI entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiItem {
    Function {
        name: String,
        #[serde(default)]
        inputs: Vec<AbiParam>,
        #[serde(default)]
        outputs: Vec<AbiParam>,
        #[serde(rename = "stateMutability", default)]
        state_mutability: StateMutability,
    },
    Event {
        name: String,
        #[serde(default)]
        inputs: Vec<AbiParam>,
        #[serde(default)]
        anonymous: bool,
    },
    Error {
        name: String,
        #[serde(default)]
        inputs: Vec<AbiParam>,
    },
    Constructor {
        #[serde(default)]
        inputs: Vec<AbiParam>,
        #[serde(rename = "stateMutability", default)]
        state_mutability: StateMutability,
    },
    Fallback {
        #[serde(rename = "stateMutability", default)]
        state_mutability: StateMutability,
    },
    Receive {
        #[serde(rename = "stateMutability", default)]
        state_mutability: StateMutability,
    },
}

impl AbiItem {
    pub fn name(&self) -> Option<&str> {
        match self {
            AbiItem::Function { name, .. }
            | AbiItem::Event { name, .. }
            | AbiItem::Error { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn inputs(&self) -> &[AbiParam] {
        match self {
            AbiItem::Function { inputs, .. }
            | AbiItem::Event { inputs, .. }
            | AbiItem::Error { inputs, .. }
            | AbiItem::Constructor { inputs, .. } => inputs,
            AbiItem::Fallback { .. } | AbiItem::Receive { .. } => &[],
        }
    }

    pub fn outputs(&self) -> &[AbiParam] {
        match self {
            AbiItem::Function { outputs, .. } => outputs,
            _ => &[],
        }
    }
}

/// Function state mutability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    NonPayable,
    Payable,
}

/// A typed ABI parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(
        rename = "internalType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub internal_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
}

impl AbiParam {
    /// Create a parameter with no components.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            internal_type: None,
            components: Vec::new(),
            indexed: None,
        }
    }

    /// Mark the parameter as an indexed event topic.
    pub fn indexed(mut self) -> Self {
        self.indexed = Some(true);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARTNERSHIP: &str = r#"{
        "abi": [
            {
                "type": "function",
                "name": "join",
                "inputs": [{ "name": "member", "type": "address", "internalType": "address" }],
                "outputs": [],
                "stateMutability": "nonpayable"
            },
            {
                "type": "function",
                "name": "leave",
                "inputs": [],
                "outputs": [],
                "stateMutability": "nonpayable"
            },
            {
                "type": "event",
                "name": "Joined",
                "inputs": [{ "name": "member", "type": "address", "indexed": true }],
                "anonymous": false
            }
        ],
        "bytecode": { "object": "0x6080" }
    }"#;

    #[test]
    fn test_parse_foundry_output() {
        let artifact = Artifact::from_json(
            "Partnership",
            Path::new("Partnership.sol/Partnership.json"),
            PARTNERSHIP,
        )
        .unwrap();

        assert_eq!(artifact.name, "Partnership");
        assert_eq!(artifact.abi.len(), 3);
        assert_eq!(artifact.events().count(), 1);

        match &artifact.abi[0] {
            AbiItem::Function {
                name,
                inputs,
                state_mutability,
                ..
            } => {
                assert_eq!(name, "join");
                assert_eq!(inputs[0].ty, "address");
                assert_eq!(inputs[0].internal_type.as_deref(), Some("address"));
                assert_eq!(*state_mutability, StateMutability::NonPayable);
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_abi_is_parse_error() {
        let err = Artifact::from_json("Broken", Path::new("Broken.sol/Broken.json"), "{}")
            .unwrap_err();
        match err {
            Error::Parse { path, message } => {
                assert_eq!(path, PathBuf::from("Broken.sol/Broken.json"));
                assert!(message.contains("abi"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err =
            Artifact::from_json("Broken", Path::new("Broken.json"), "{ not json").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_unknown_param_type_is_parse_error() {
        let json = r#"{ "abi": [
            { "type": "function", "name": "f",
              "inputs": [{ "name": "x", "type": "uint7x" }],
              "outputs": [], "stateMutability": "view" }
        ] }"#;
        let err = Artifact::from_json("Weird", Path::new("Weird.json"), json).unwrap_err();
        assert!(err.to_string().contains("`f`"));
    }

    #[test]
    fn test_legacy_entries_default_mutability() {
        let json = r#"{ "abi": [ { "type": "fallback" }, { "type": "constructor", "inputs": [] } ] }"#;
        let artifact = Artifact::from_json("Old", Path::new("Old.json"), json).unwrap();
        assert_eq!(
            artifact.abi[0],
            AbiItem::Fallback {
                state_mutability: StateMutability::NonPayable
            }
        );
        assert_eq!(artifact.events().count(), 0);
    }

    #[test]
    fn test_serialize_keeps_field_order() {
        let item = AbiItem::Event {
            name: "Joined".into(),
            inputs: vec![AbiParam::new("member", "address").indexed()],
            anonymous: false,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"type":"event","name":"Joined","inputs":[{"name":"member","type":"address","indexed":true}],"anonymous":false}"#
        );
    }
}
