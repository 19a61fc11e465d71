//! Customer fields collected at checkout.
//!
//! The same rules guard the checkout form on the client and the order payload
//! on the server:
//!
//! - name: letters and whitespace only (`^[A-Za-z\s]+$`)
//! - phone: ASCII digits only (`^[0-9]+$`)

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("Invalid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Invalid regex"));

/// Errors that can occur when parsing a [`CustomerName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CustomerNameError {
    /// The input string is empty.
    #[error("name cannot be empty")]
    Empty,
    /// The input contains something other than letters and whitespace.
    #[error("name may only contain letters and spaces")]
    InvalidCharacters,
}

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input contains something other than digits.
    #[error("phone may only contain digits")]
    InvalidCharacters,
}

/// A customer name consisting of ASCII letters and whitespace.
///
/// ## Examples
///
/// ```
/// use lesson_shop_core::CustomerName;
///
/// assert!(CustomerName::parse("Ada Lovelace").is_ok());
/// assert!(CustomerName::parse("R2D2").is_err());
/// assert!(CustomerName::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerName(String);

impl CustomerName {
    /// Parse a `CustomerName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains anything other than
    /// ASCII letters and whitespace.
    pub fn parse(s: &str) -> Result<Self, CustomerNameError> {
        if s.is_empty() {
            return Err(CustomerNameError::Empty);
        }
        if !NAME_RE.is_match(s) {
            return Err(CustomerNameError::InvalidCharacters);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CustomerName {
    type Error = CustomerNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerName> for String {
    fn from(name: CustomerName) -> Self {
        name.0
    }
}

impl fmt::Display for CustomerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A phone number consisting of ASCII digits.
///
/// ## Examples
///
/// ```
/// use lesson_shop_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("07700900123").is_ok());
/// assert!(PhoneNumber::parse("+44 7700").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains non-digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !PHONE_RE.is_match(s) {
            return Err(PhoneError::InvalidCharacters);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(CustomerName::parse("Ada").is_ok());
        assert!(CustomerName::parse("Ada Lovelace").is_ok());
        assert!(CustomerName::parse("Mary\tAnne").is_ok());
    }

    #[test]
    fn test_name_with_digit_rejected() {
        assert_eq!(
            CustomerName::parse("Ada 2"),
            Err(CustomerNameError::InvalidCharacters)
        );
        assert_eq!(
            CustomerName::parse("4da"),
            Err(CustomerNameError::InvalidCharacters)
        );
    }

    #[test]
    fn test_name_punctuation_rejected() {
        assert!(CustomerName::parse("O'Brien").is_err());
        assert!(CustomerName::parse("Jean-Luc").is_err());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(CustomerName::parse(""), Err(CustomerNameError::Empty));
    }

    #[test]
    fn test_valid_phone() {
        assert_eq!(PhoneNumber::parse("0123456789").unwrap().as_str(), "0123456789");
    }

    #[test]
    fn test_phone_with_letter_rejected() {
        assert_eq!(
            PhoneNumber::parse("0123abc"),
            Err(PhoneError::InvalidCharacters)
        );
        assert_eq!(PhoneNumber::parse("x"), Err(PhoneError::InvalidCharacters));
    }

    #[test]
    fn test_phone_rejects_separators_and_non_ascii_digits() {
        assert!(PhoneNumber::parse("0123 456").is_err());
        assert!(PhoneNumber::parse("+44123").is_err());
        assert!(PhoneNumber::parse("١٢٣").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let name: CustomerName = serde_json::from_str("\"Grace Hopper\"").unwrap();
        assert_eq!(name.as_str(), "Grace Hopper");
        assert!(serde_json::from_str::<CustomerName>("\"Grace 9\"").is_err());
        assert!(serde_json::from_str::<PhoneNumber>("\"12ab\"").is_err());
        assert_eq!(
            serde_json::to_string(&PhoneNumber::parse("555").unwrap()).unwrap(),
            "\"555\""
        );
    }
}
