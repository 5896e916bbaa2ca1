use serde::{Deserialize, Serialize};

/// Options for the `react` plugin. Every toggle defaults to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReactOptions {
    /// Emit `use<Contract>Event` wrapping `useContractEvent`.
    #[serde(default = "default_true", alias = "useContractEvent")]
    pub use_contract_event: bool,

    /// Emit `use<Contract>` wrapping `useContract`.
    #[serde(default = "default_true", alias = "useContract")]
    pub use_contract: bool,

    /// Emit `use<Contract><Event>Event` for every ABI event.
    #[serde(default = "default_true", alias = "useContractItemEvent")]
    pub use_contract_item_event: bool,
}

impl Default for ReactOptions {
    fn default() -> Self {
        Self {
            use_contract_event: true,
            use_contract: true,
            use_contract_item_event: true,
        }
    }
}

impl ReactOptions {
    /// Options with every toggle disabled.
    pub fn none() -> Self {
        Self {
            use_contract_event: false,
            use_contract: false,
            use_contract_item_event: false,
        }
    }

    /// Number of enabled toggles.
    pub fn enabled_count(&self) -> usize {
        [
            self.use_contract_event,
            self.use_contract,
            self.use_contract_item_event,
        ]
        .iter()
        .filter(|enabled| **enabled)
        .count()
    }
}

fn default_true() -> bool {
    true
}
