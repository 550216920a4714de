//! Display formatting shared by the views.

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, U256};

use crate::ports::PortError;

/// Ether amount rounded to `decimals` places, e.g. `"1.5000"`.
pub fn format_eth(amount: U256, decimals: usize) -> String {
    let full = format_ether(amount);
    match full.parse::<f64>() {
        Ok(value) => format!("{value:.decimals$}"),
        Err(_) => full,
    }
}

/// Parses a user-entered ether amount (18 decimals) into wei.
pub fn parse_eth(input: &str) -> Result<U256, PortError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PortError::Validation("amount is required".to_owned()));
    }
    parse_ether(trimmed).map_err(|e| PortError::Validation(format!("invalid amount '{trimmed}': {e}")))
}

pub fn parse_address(input: &str, field: &str) -> Result<Address, PortError> {
    input
        .trim()
        .parse()
        .map_err(|e| PortError::Validation(format!("invalid {field} address: {e}")))
}

/// Comma or newline separated address list.
pub fn parse_address_list(input: &str, field: &str) -> Result<Vec<Address>, PortError> {
    let list: Vec<Address> = input
        .split(|c: char| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_address(s, field))
        .collect::<Result<_, _>>()?;
    if list.is_empty() {
        return Err(PortError::Validation(format!("at least one {field} is required")));
    }
    Ok(list)
}

pub fn parse_eth_list(input: &str) -> Result<Vec<U256>, PortError> {
    input
        .split(|c: char| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_eth)
        .collect()
}

pub fn parse_u64(input: &str, field: &str) -> Result<u64, PortError> {
    input
        .trim()
        .parse()
        .map_err(|e| PortError::Validation(format!("invalid {field}: {e}")))
}

/// `"12.0 Hours"` below one day, `"1.5 Days"` from there on.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds as f64 / 3600.0;
    if hours >= 24.0 {
        format!("{:.1} Days", hours / 24.0)
    } else {
        format!("{hours:.1} Hours")
    }
}

/// `0x1234…abcd` with `chars` hex digits kept on each side.
pub fn short_address(address: &Address, chars: usize) -> String {
    let full = address.to_string();
    let hex = &full[2..];
    if chars * 2 >= hex.len() {
        return full;
    }
    format!("0x{}…{}", &hex[..chars], &hex[hex.len() - chars..])
}
