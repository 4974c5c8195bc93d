use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-4217 style currency code attached to an account.
///
/// The ledger never converts between currencies; the code is only validated
/// (three ASCII letters) and stored upper-case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(EngineError::Validation(format!(
                "invalid currency code: {value}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_upper_case() {
        assert_eq!(CurrencyCode::try_from(" eur ").unwrap().code(), "EUR");
    }

    #[test]
    fn rejects_non_iso_shapes() {
        for input in ["", "EU", "EURO", "E1R", "€"] {
            assert!(CurrencyCode::try_from(input).is_err(), "{input:?}");
        }
    }
}
