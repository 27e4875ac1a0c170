//! Phone number normalization
//!
//! The channel expects digits only, country code first, no leading `+`.

use crate::error::{ChannelError, ChannelResult};

/// Numbers at or below this many digits are treated as national numbers
const NATIONAL_MAX_DIGITS: usize = 10;

/// Converts loosely formatted phone numbers into the channel's canonical form.
///
/// Rules, applied to the digits of the input:
/// 1. A leading trunk prefix (e.g. `0`) is replaced by the default country code.
/// 2. Otherwise a short number (≤ 10 digits) that does not already start with a
///    recognized country code gets the default country code prepended.
///
/// `normalize` never fails and is idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneNormalizer {
    default_country_code: String,
    trunk_prefix: String,
    recognized_codes: Vec<String>,
}

impl PhoneNormalizer {
    /// Create a normalizer for `default_country_code` with trunk prefix `0`
    pub fn new(default_country_code: &str) -> ChannelResult<Self> {
        let code = default_country_code.trim().trim_start_matches('+').to_string();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ChannelError::InvalidConfig(format!(
                "Invalid default country code: {default_country_code:?}"
            )));
        }

        let normalizer = Self {
            recognized_codes: vec![code.clone()],
            default_country_code: code,
            trunk_prefix: "0".to_string(),
        };
        normalizer.validate()?;
        Ok(normalizer)
    }

    /// Set the national trunk prefix (empty disables trunk handling)
    pub fn with_trunk_prefix(mut self, prefix: &str) -> ChannelResult<Self> {
        self.trunk_prefix = prefix.trim().to_string();
        self.validate()?;
        Ok(self)
    }

    /// Add country codes considered already international.
    ///
    /// The default country code is always recognized.
    pub fn with_recognized_codes<I, S>(mut self, codes: I) -> ChannelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for code in codes {
            let code = code.as_ref().trim().trim_start_matches('+');
            if code.is_empty() {
                continue;
            }
            if !code.chars().all(|c| c.is_ascii_digit()) {
                return Err(ChannelError::InvalidConfig(format!(
                    "Invalid recognized country code: {code:?}"
                )));
            }
            if !self.recognized_codes.iter().any(|c| c == code) {
                self.recognized_codes.push(code.to_string());
            }
        }
        self.validate()?;
        Ok(self)
    }

    pub fn default_country_code(&self) -> &str {
        &self.default_country_code
    }

    // A country code starting with the trunk prefix would be stripped again on
    // a second pass and break idempotency.
    fn validate(&self) -> ChannelResult<()> {
        if !self.trunk_prefix.chars().all(|c| c.is_ascii_digit()) {
            return Err(ChannelError::InvalidConfig(format!(
                "Invalid trunk prefix: {:?}",
                self.trunk_prefix
            )));
        }
        if !self.trunk_prefix.is_empty() {
            if let Some(code) = self
                .recognized_codes
                .iter()
                .find(|c| c.starts_with(&self.trunk_prefix))
            {
                return Err(ChannelError::InvalidConfig(format!(
                    "Country code {code} starts with trunk prefix {}",
                    self.trunk_prefix
                )));
            }
        }
        Ok(())
    }

    /// Normalize a raw phone number (best effort, never fails)
    pub fn normalize(&self, raw: &str) -> String {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return digits;
        }

        if !self.trunk_prefix.is_empty() {
            if let Some(national) = digits.strip_prefix(self.trunk_prefix.as_str()) {
                return format!("{}{}", self.default_country_code, national);
            }
        }

        if digits.len() <= NATIONAL_MAX_DIGITS
            && !self
                .recognized_codes
                .iter()
                .any(|code| digits.starts_with(code.as_str()))
        {
            return format!("{}{}", self.default_country_code, digits);
        }

        digits
    }
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self {
            default_country_code: "241".to_string(),
            trunk_prefix: "0".to_string(),
            recognized_codes: vec!["241".to_string(), "33".to_string()],
        }
    }
}
