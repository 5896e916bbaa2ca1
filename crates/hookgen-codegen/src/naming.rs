//! Identifier casing for generated TypeScript.

/// Keep only characters valid in a TypeScript identifier.
fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect()
}

/// Convert a contract or event name to PascalCase.
pub fn to_pascal_case(s: &str) -> String {
    let s = sanitize(s);
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Convert a contract name to camelCase.
///
/// A leading acronym is lowercased as a whole (`ERC20` becomes `erc20`,
/// `USDCoin` becomes `usdCoin`).
pub fn to_camel_case(s: &str) -> String {
    let chars: Vec<char> = sanitize(s).chars().collect();
    let run = chars.iter().take_while(|c| c.is_ascii_uppercase()).count();

    // Keep the last capital when it starts the next word.
    let lower_until = if run > 1 && chars.get(run).is_some_and(|c| c.is_ascii_lowercase()) {
        run - 1
    } else {
        run
    };

    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < lower_until { c.to_ascii_lowercase() } else { *c })
        .collect()
}

/// Name of the exported ABI constant for a contract.
pub fn abi_const(contract: &str) -> String {
    format!("{}ABI", to_camel_case(contract))
}

/// Name of the exported address map for a contract.
pub fn address_const(contract: &str) -> String {
    format!("{}Address", to_camel_case(contract))
}

/// Name of the exported `{ address, abi }` config for a contract.
pub fn config_const(contract: &str) -> String {
    format!("{}Config", to_camel_case(contract))
}
