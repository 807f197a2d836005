use chrono::{DateTime, Utc};
use ethers::utils::{parse_units, ParseUnits};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::CommonError;

// Core identifier types
pub type BountyId = u64;

// Blockchain related types
pub use ethers::types::{Address, U256};
pub type TokenAmount = U256; // Smallest asset units

/// Decimal places of the fixed-point emission rate (10^18 == one investment
/// unit per whole transaction unit).
pub const EMISSION_RATE_DECIMALS: u32 = 18;

/// Number of whitelist slots held by the ledger.
pub const MANAGER_SLOTS: usize = 10;

/// `10^decimals` as a token amount.
pub fn scale_factor(decimals: u32) -> TokenAmount {
    U256::exp10(decimals as usize)
}

/// Parse a human decimal string ("17.0328288") into smallest units.
pub fn parse_token_amount(value: &str, decimals: u32) -> Result<TokenAmount, CommonError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CommonError::InvalidInput("empty token amount".to_string()));
    }

    match parse_units(trimmed, decimals) {
        Ok(ParseUnits::U256(amount)) => Ok(amount),
        Ok(ParseUnits::I256(_)) => Err(CommonError::InvalidInput(format!(
            "negative token amount: {}",
            trimmed
        ))),
        Err(e) => Err(CommonError::ParseError(format!(
            "invalid token amount {:?}: {}",
            trimmed, e
        ))),
    }
}

/// Parse a hex account address, rejecting malformed input.
pub fn parse_address(value: &str) -> Result<Address, CommonError> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|_| CommonError::InvalidInput(format!("invalid address: {}", value)))
}

// API response structures
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<HashMap<String, String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
                details: None,
            }),
            timestamp: Utc::now(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        if let Some(error) = self.error.as_mut() {
            error
                .details
                .get_or_insert_with(HashMap::new)
                .insert(key.to_string(), value.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional_amounts() {
        assert_eq!(
            parse_token_amount("50", 9).unwrap(),
            U256::from(50u64) * scale_factor(9)
        );
        assert_eq!(
            parse_token_amount("0.1283917", 18).unwrap(),
            U256::from(128_391_700_000_000_000u64)
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_token_amount("", 9).is_err());
        assert!(parse_token_amount("abc", 9).is_err());
        assert!(parse_token_amount("-1", 9).is_err());
    }

    #[test]
    fn test_parse_address() {
        let address = parse_address("0x00000000000000000000000000000000000000aa").unwrap();
        assert_eq!(address, Address::from_low_u64_be(0xaa));
        assert!(parse_address("0x1234").is_err());
    }

    #[test]
    fn test_failure_response_carries_details() {
        let response: ApiResponse<()> =
            ApiResponse::failure("NOT_OWNER", "caller is not the owner").with_detail("category", "authorization");
        assert!(!response.success);
        let error = response.error.unwrap();
        assert_eq!(error.code, "NOT_OWNER");
        assert_eq!(error.details.unwrap().get("category").map(String::as_str), Some("authorization"));
    }
}
