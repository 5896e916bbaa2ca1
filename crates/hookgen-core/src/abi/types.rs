use super::AbiParam;

/// Solidity ABI type information for code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolType {
    /// 20-byte account address
    Address,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
    /// Dynamic byte array
    Bytes,
    /// bytes1 ..= bytes32
    FixedBytes(u16),
    /// uint8 ..= uint256
    Uint(u16),
    /// int8 ..= int256
    Int(u16),
    /// External function pointer
    Function,
    /// Array with an optional fixed length
    Array(Box<SolType>, Option<usize>),
    /// Tuple with component names (possibly empty)
    Tuple(Vec<(String, SolType)>),
}

impl SolType {
    /// Parse the type of an ABI parameter, using its components for tuples.
    pub fn parse(param: &AbiParam) -> Result<Self, String> {
        Self::from_type_string(&param.ty, &param.components)
    }

    /// Parse a canonical ABI type string.
    pub fn from_type_string(type_str: &str, components: &[AbiParam]) -> Result<Self, String> {
        let type_str = type_str.trim();

        if let Some(rest) = type_str.strip_suffix(']') {
            let open = rest
                .rfind('[')
                .ok_or_else(|| format!("unbalanced array type `{}`", type_str))?;
            let size = &rest[open + 1..];
            let size = if size.is_empty() {
                None
            } else {
                Some(
                    size.parse::<usize>()
                        .map_err(|_| format!("invalid array length in `{}`", type_str))?,
                )
            };
            let inner = Self::from_type_string(&rest[..open], components)?;
            return Ok(SolType::Array(Box::new(inner), size));
        }

        match type_str {
            "address" => Ok(SolType::Address),
            "bool" => Ok(SolType::Bool),
            "string" => Ok(SolType::String),
            "bytes" => Ok(SolType::Bytes),
            "function" => Ok(SolType::Function),
            "uint" => Ok(SolType::Uint(256)),
            "int" => Ok(SolType::Int(256)),
            "tuple" => components
                .iter()
                .map(|c| Ok((c.name.clone(), SolType::parse(c)?)))
                .collect::<Result<Vec<_>, String>>()
                .map(SolType::Tuple),
            s => {
                if let Some(bits) = s.strip_prefix("uint") {
                    parse_int_width(bits, s).map(SolType::Uint)
                } else if let Some(bits) = s.strip_prefix("int") {
                    parse_int_width(bits, s).map(SolType::Int)
                } else if let Some(len) = s.strip_prefix("bytes") {
                    match len.parse::<u16>() {
                        Ok(n) if (1..=32).contains(&n) => Ok(SolType::FixedBytes(n)),
                        _ => Err(format!("unsupported type `{}`", s)),
                    }
                } else {
                    Err(format!("unsupported type `{}`", s))
                }
            }
        }
    }

    /// Generate TypeScript type.
    pub fn to_typescript(&self) -> String {
        match self {
            SolType::Address | SolType::Bytes | SolType::FixedBytes(_) | SolType::Function => {
                "`0x${string}`".to_string()
            }
            SolType::Bool => "boolean".to_string(),
            SolType::String => "string".to_string(),
            SolType::Uint(bits) | SolType::Int(bits) => {
                // Values wider than 48 bits do not fit a JS number.
                if *bits <= 48 {
                    "number".to_string()
                } else {
                    "bigint".to_string()
                }
            }
            SolType::Array(inner, _) => {
                let inner = inner.to_typescript();
                if inner.starts_with("readonly") || inner.contains(" | ") {
                    format!("readonly ({})[]", inner)
                } else {
                    format!("readonly {}[]", inner)
                }
            }
            SolType::Tuple(fields) => {
                if !fields.is_empty() && fields.iter().all(|(name, _)| !name.is_empty()) {
                    let body = fields
                        .iter()
                        .map(|(name, ty)| format!("{}: {}", name, ty.to_typescript()))
                        .collect::<Vec<_>>()
                        .join("; ");
                    format!("{{ {} }}", body)
                } else {
                    let body = fields
                        .iter()
                        .map(|(_, ty)| ty.to_typescript())
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("readonly [{}]", body)
                }
            }
        }
    }
}

fn parse_int_width(bits: &str, full: &str) -> Result<u16, String> {
    match bits.parse::<u16>() {
        Ok(n) if n % 8 == 0 && (8..=256).contains(&n) => Ok(n),
        _ => Err(format!("unsupported type `{}`", full)),
    }
}
