//! Mobile phone number used on synthetic shipping addresses.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input has the wrong number of digits.
    #[error("phone number must be {expected} digits (got {actual})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digit count of the input.
        actual: usize,
    },
    /// The input contains something other than ASCII digits.
    #[error("phone number must contain only digits")]
    NotNumeric,
}

/// An 11-digit mobile number.
///
/// Every synthetic order gets a fresh random number with the `138` prefix
/// to keep the backend's duplicate-order rejections rare.
///
/// ## Examples
///
/// ```
/// use storeload_core::Phone;
///
/// assert!(Phone::parse("13812345678").is_ok());
/// assert!(Phone::parse("1381234567").is_err()); // too short
/// assert!(Phone::parse("138-1234567").is_err()); // not numeric
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Number of digits in a mobile number.
    pub const LENGTH: usize = 11;

    /// Carrier prefix used for generated numbers.
    pub const PREFIX: &'static str = "138";

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not exactly 11 characters,
    /// or contains non-digit characters.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NotNumeric);
        }

        if s.len() != Self::LENGTH {
            return Err(PhoneError::WrongLength {
                expected: Self::LENGTH,
                actual: s.len(),
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Generate a random `138XXXXXXXX` number.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let suffix: u32 = rng.random_range(10_000_000..=99_999_999);
        Self(format!("{}{suffix}", Self::PREFIX))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
