use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

static MOBILE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^01[3-9][0-9]{8}$").expect("valid mobile number regex"));
static WALLET_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{26,64}$").expect("valid wallet address regex"));
static CURRENCY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency code regex"));

pub fn trim_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

/// bKash and Nagad accounts are Bangladeshi mobile numbers.
pub fn validate_mobile_number(u: &String) -> Result<(), ValidationError> {
    if MOBILE_NUMBER.is_match(u) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_mobile_number")
            .with_message("Must be a mobile number like 01XXXXXXXXX".into()))
    }
}

pub fn validate_wallet_address(u: &String) -> Result<(), ValidationError> {
    if WALLET_ADDRESS.is_match(u) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_wallet_address")
            .with_message("Wallet address must be 26-64 letters or digits".into()))
    }
}

pub fn validate_currency_code(u: &String) -> Result<(), ValidationError> {
    if CURRENCY_CODE.is_match(u) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_currency_code")
            .with_message("Currency code must be 3 uppercase letters".into()))
    }
}
