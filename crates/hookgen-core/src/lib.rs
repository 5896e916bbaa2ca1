//! Core types for hookgen: configuration, the contract artifact model and
//! the error taxonomy shared by every stage of a generation run.

pub mod abi;
pub mod config;
pub mod error;

pub use abi::{AbiItem, AbiParam, Artifact, SolType, StateMutability};
pub use config::{Config, ForgeOptions, FoundryOptions, PluginConfig, ReactOptions};
pub use error::{Error, Result};
