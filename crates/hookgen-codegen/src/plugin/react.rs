//! React hook synthesis.
//!
//! Emits one unit per contract for every enabled toggle. Toggles are
//! independent: turning one off removes exactly its units.

use std::collections::{BTreeMap, BTreeSet};

use hookgen_core::{AbiItem, Artifact, Error, ReactOptions, Result, SolType};

use super::PluginOutput;
use crate::module::{CodeUnit, GeneratedModule, UnitKind};
use crate::naming::{abi_const, address_const, to_pascal_case};

const WAGMI: &str = "wagmi";

/// Generates wagmi React hooks bound to each contract's ABI.
#[derive(Debug, Clone)]
pub struct ReactPlugin {
    options: ReactOptions,
}

impl ReactPlugin {
    pub fn new(options: ReactOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReactOptions {
        &self.options
    }

    /// Enabled binding kinds in emission order.
    pub fn enabled_kinds(&self) -> Vec<UnitKind> {
        let mut kinds = Vec::new();
        if self.options.use_contract_event {
            kinds.push(UnitKind::ContractEvent);
        }
        if self.options.use_contract {
            kinds.push(UnitKind::Contract);
        }
        if self.options.use_contract_item_event {
            kinds.push(UnitKind::ContractItemEvent);
        }
        kinds
    }

    pub(crate) fn generate(
        &self,
        artifacts: &[Artifact],
        prior: &GeneratedModule,
    ) -> Result<PluginOutput> {
        let mut output = PluginOutput::default();
        let mut exports = Exports::default();
        let kinds = self.enabled_kinds();
        if kinds.is_empty() {
            tracing::debug!("All react toggles disabled");
            return Ok(output);
        }

        for artifact in artifacts {
            if !prior.has_unit(&artifact.name, UnitKind::Abi) {
                return Err(Error::Config(format!(
                    "no ABI constant for `{}`; declare a `foundry` plugin before `react`",
                    artifact.name
                )));
            }

            let target = Target {
                contract: to_pascal_case(&artifact.name),
                abi: abi_const(&artifact.name),
                address: prior
                    .has_unit(&artifact.name, UnitKind::Address)
                    .then(|| address_const(&artifact.name)),
            };

            for kind in &kinds {
                let code = match kind {
                    UnitKind::ContractEvent => {
                        let hook = contract_event_hook(&target);
                        exports.claim(&hook.name, format!("contract `{}`", artifact.name))?;
                        hook.render(&target)
                    }
                    UnitKind::Contract => {
                        let hook = contract_hook(&target);
                        exports.claim(&hook.name, format!("contract `{}`", artifact.name))?;
                        hook.render(&target)
                    }
                    UnitKind::ContractItemEvent => item_event_hooks(artifact, &target, &mut exports)?,
                    _ => unreachable!("react emits binding kinds only"),
                };
                output
                    .units
                    .push(CodeUnit::new(&artifact.name, *kind, code));

                for name in imports_for(*kind, target.address.is_some()) {
                    output.import(WAGMI, name);
                }
            }
        }

        Ok(output)
    }
}

/// Names one binding kind needs from wagmi.
fn imports_for(kind: UnitKind, deployed: bool) -> Vec<&'static str> {
    let mut names = match kind {
        UnitKind::Contract => vec!["useContract", "type UseContractConfig"],
        UnitKind::ContractEvent | UnitKind::ContractItemEvent => {
            vec!["useContractEvent", "type UseContractEventConfig"]
        }
        _ => vec![],
    };
    if deployed {
        names.push("useChainId");
    }
    names
}

/// Exported TypeScript names, each mapped to what generated it.
#[derive(Default)]
struct Exports(BTreeMap<String, String>);

impl Exports {
    /// Reserve `name`. Two sources generating the same export is an error.
    fn claim(&mut self, name: &str, origin: String) -> Result<()> {
        if let Some(existing) = self.0.get(name) {
            return Err(Error::Config(format!(
                "`{}` is generated for both {} and {}",
                name, existing, origin
            )));
        }
        self.0.insert(name.to_string(), origin);
        Ok(())
    }
}

/// Identifiers the hooks for one contract refer to.
struct Target {
    contract: String,
    abi: String,
    address: Option<String>,
}

/// A wrapper around a wagmi hook with some config fields bound.
struct Hook {
    name: String,
    doc: String,
    generics: &'static str,
    config_type: String,
    omit: Vec<&'static str>,
    wrapped: &'static str,
    bound: Vec<String>,
    cast: bool,
}

impl Hook {
    fn render(&self, target: &Target) -> String {
        let mut omit = self.omit.clone();
        let mut bound = self.bound.clone();
        let mut param_type = self.config_type.clone();
        let mut prelude = String::new();

        if let Some(address) = &target.address {
            omit.push("address");
            param_type = format!(
                "{}> & {{ chainId?: keyof typeof {} }}",
                omit_type(&param_type, &omit),
                address
            );
            prelude = format!(
                "  const defaultChainId = useChainId()\n  const chainId = (config.chainId ?? defaultChainId) as keyof typeof {}\n",
                address
            );
            bound.push(format!("address: {}[chainId]", address));
        } else {
            param_type = format!("{}>", omit_type(&param_type, &omit));
        }

        let mut args = format!("{{ {}, ...config }}", bound.join(", "));
        if self.cast {
            args = format!("{} as {}", args, self.config_type);
        }

        format!(
            "/**\n * {}\n */\nexport function {}{}(\n  config: {} = {{}} as any,\n) {{\n{}  return {}({})\n}}\n",
            self.doc, self.name, self.generics, param_type, prelude, self.wrapped, args
        )
    }
}

fn omit_type(config_type: &str, omit: &[&str]) -> String {
    let keys = omit
        .iter()
        .map(|k| format!("'{}'", k))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("Omit<{}, {}", config_type, keys)
}

fn contract_event_hook(target: &Target) -> Hook {
    Hook {
        name: format!("use{}Event", target.contract),
        doc: format!(
            "Wraps __{{@link useContractEvent}}__ with `abi` set to __{{@link {}}}__.",
            target.abi
        ),
        generics: "<TEventName extends string>",
        config_type: format!("UseContractEventConfig<typeof {}, TEventName>", target.abi),
        omit: vec!["abi"],
        wrapped: "useContractEvent",
        bound: vec![format!("abi: {}", target.abi)],
        cast: true,
    }
}

fn contract_hook(target: &Target) -> Hook {
    Hook {
        name: format!("use{}", target.contract),
        doc: format!(
            "Wraps __{{@link useContract}}__ with `abi` set to __{{@link {}}}__.",
            target.abi
        ),
        generics: "",
        config_type: "UseContractConfig".to_string(),
        omit: vec!["abi"],
        wrapped: "useContract",
        bound: vec![format!("abi: {}", target.abi)],
        cast: false,
    }
}

/// One args type and one hook per distinct event name, in ABI order.
fn item_event_hooks(
    artifact: &Artifact,
    target: &Target,
    exports: &mut Exports,
) -> Result<String> {
    let mut seen = BTreeSet::new();
    let mut sections = Vec::new();

    for item in artifact.events() {
        let AbiItem::Event { name, inputs, .. } = item else {
            continue;
        };
        if !seen.insert(name.as_str()) {
            tracing::debug!(contract = %artifact.name, event = %name, "Skipping overloaded event");
            continue;
        }

        let event = to_pascal_case(name);
        let mut fields = String::new();
        for (i, param) in inputs.iter().enumerate() {
            let ty = SolType::parse(param).map_err(|message| Error::Parse {
                path: artifact.source.clone(),
                message,
            })?;
            let field = if param.name.is_empty() {
                format!("arg{}", i)
            } else {
                param.name.clone()
            };
            fields.push_str(&format!("  {}: {}\n", field, ty.to_typescript()));
        }
        let origin = format!("event `{}` of `{}`", name, artifact.name);
        let args_name = format!("{}{}EventArgs", target.contract, event);
        exports.claim(&args_name, origin.clone())?;
        let args_type = format!("export type {} = {{\n{}}}\n", args_name, fields);

        let hook = Hook {
            name: format!("use{}{}Event", target.contract, event),
            doc: format!(
                "Wraps __{{@link useContractEvent}}__ with `abi` set to __{{@link {}}}__ and `eventName` set to `\"{}\"`.",
                target.abi, name
            ),
            generics: "",
            config_type: format!("UseContractEventConfig<typeof {}, '{}'>", target.abi, name),
            omit: vec!["abi", "eventName"],
            wrapped: "useContractEvent",
            bound: vec![format!("abi: {}", target.abi), format!("eventName: '{}'", name)],
            cast: true,
        };
        exports.claim(&hook.name, origin)?;

        sections.push(format!("{}\n{}", args_type, hook.render(target)));
    }

    if sections.is_empty() {
        return Ok(format!("// {} declares no events\n", artifact.name));
    }
    Ok(sections.join("\n"))
}
