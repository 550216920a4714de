//! Calldata for the "contract call" transfer: a human-readable function
//! signature plus one argument per line.

use std::str::FromStr;

use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::Function;
use alloy::primitives::{Address, Bytes, B256, I256, U256};
use serde_json::Value;

use treasury_core::PortError;

/// Encodes `signature` (e.g. `transfer(address,uint256)`) applied to `args`.
/// Arguments starting with `[` or `"` are read as JSON (lists, tuples, quoted
/// strings); anything else is taken literally, so large integers keep full
/// precision.
pub fn encode_call(signature: &str, args: &[String]) -> Result<Bytes, PortError> {
    let function = Function::parse(signature.trim())
        .map_err(|e| PortError::Validation(format!("invalid function signature: {e}")))?;
    if function.inputs.len() != args.len() {
        return Err(PortError::Validation(format!(
            "argument count mismatch: expected {}, got {}",
            function.inputs.len(),
            args.len()
        )));
    }

    let mut values = Vec::with_capacity(args.len());
    for (idx, (input, arg)) in function.inputs.iter().zip(args).enumerate() {
        let ty: DynSolType = input.resolve().map_err(|e| {
            PortError::Validation(format!("unsupported type '{}': {e}", input.ty))
        })?;
        let trimmed = arg.trim();
        let parsed = if trimmed.starts_with(['[', '"']) {
            serde_json::from_str::<Value>(trimmed)
                .map_err(|e| PortError::Validation(format!("argument {}: invalid JSON: {e}", idx + 1)))?
        } else {
            Value::String(trimmed.to_owned())
        };
        let value = coerce(&parsed, &ty)
            .map_err(|e| PortError::Validation(format!("argument {} ({ty}): {e}", idx + 1)))?;
        values.push(value);
    }

    function
        .abi_encode_input(&values)
        .map(Bytes::from)
        .map_err(|e| PortError::Validation(format!("abi encoding failed: {e}")))
}

/// Raw `0x…` calldata; empty input means no calldata.
pub fn parse_hex_data(input: &str) -> Result<Bytes, PortError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "0x" {
        return Ok(Bytes::new());
    }
    Bytes::from_str(trimmed).map_err(|e| PortError::Validation(format!("invalid calldata hex: {e}")))
}

/// One argument per non-empty line.
pub fn split_args(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Scalar argument as typed text. JSON numbers and booleans are taken as
/// their literal spelling.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn list_of<'v>(value: &'v Value, ty: &DynSolType, len: Option<usize>) -> Result<&'v [Value], String> {
    let list = value
        .as_array()
        .ok_or_else(|| format!("expected a JSON list for {ty}"))?;
    match len {
        Some(len) if list.len() != len => Err(format!("{ty} needs {len} items, got {}", list.len())),
        _ => Ok(list),
    }
}

fn coerce(value: &Value, ty: &DynSolType) -> Result<DynSolValue, String> {
    match ty {
        DynSolType::Array(inner) => list_of(value, ty, None)?
            .iter()
            .map(|item| coerce(item, inner))
            .collect::<Result<_, _>>()
            .map(DynSolValue::Array),
        DynSolType::FixedArray(inner, len) => list_of(value, ty, Some(*len))?
            .iter()
            .map(|item| coerce(item, inner))
            .collect::<Result<_, _>>()
            .map(DynSolValue::FixedArray),
        DynSolType::Tuple(members) => list_of(value, ty, Some(members.len()))?
            .iter()
            .zip(members)
            .map(|(item, member)| coerce(item, member))
            .collect::<Result<_, _>>()
            .map(DynSolValue::Tuple),
        scalar => {
            let text = scalar_text(value).ok_or_else(|| format!("expected a {scalar} value"))?;
            coerce_scalar(&text, scalar)
        }
    }
}

fn coerce_scalar(text: &str, ty: &DynSolType) -> Result<DynSolValue, String> {
    let bad = |e: &dyn std::fmt::Display| format!("'{text}' is not a valid {ty}: {e}");
    Ok(match ty {
        DynSolType::Bool => match text {
            "true" | "1" => DynSolValue::Bool(true),
            "false" | "0" => DynSolValue::Bool(false),
            _ => return Err(format!("'{text}' is not a bool")),
        },
        DynSolType::Uint(bits) => {
            let parsed = match text.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| bad(&e))?,
                None => U256::from_str(text).map_err(|e| bad(&e))?,
            };
            DynSolValue::Uint(parsed, *bits)
        }
        DynSolType::Int(bits) => DynSolValue::Int(I256::from_str(text).map_err(|e| bad(&e))?, *bits),
        DynSolType::Address => DynSolValue::Address(Address::from_str(text).map_err(|e| bad(&e))?),
        DynSolType::FixedBytes(size) => {
            let raw = Bytes::from_str(text).map_err(|e| bad(&e))?;
            if raw.len() != *size {
                return Err(format!("'{text}' is {} bytes, {ty} needs {size}", raw.len()));
            }
            let mut word = B256::ZERO;
            word[..raw.len()].copy_from_slice(&raw);
            DynSolValue::FixedBytes(word, *size)
        }
        DynSolType::Bytes => DynSolValue::Bytes(Bytes::from_str(text).map_err(|e| bad(&e))?.to_vec()),
        DynSolType::String => DynSolValue::String(text.to_owned()),
        other => return Err(format!("{other} arguments are not supported")),
    })
}
