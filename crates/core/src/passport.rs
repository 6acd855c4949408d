//! Codec for the public passport identifier.
//!
//! Callers address users by a single `"SERIES NUMBER"` string; the store
//! keeps the two halves in separate columns. [`PassportId::decode`] and
//! [`encode`] convert between the two shapes.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Separator between series and number in the public identifier.
pub const SEPARATOR: char = ' ';

/// A decoded composite passport key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PassportId {
    pub series: String,
    pub number: String,
}

impl PassportId {
    /// Split `"SERIES NUMBER"` at the first space.
    ///
    /// Both halves must be non-empty and free of whitespace, so exactly
    /// one separator is accepted and the result re-encodes to the input.
    pub fn decode(identifier: &str) -> Result<Self, CoreError> {
        let invalid = || {
            CoreError::InvalidIdentifierFormat(format!(
                "expected \"SERIES NUMBER\", got {identifier:?}"
            ))
        };

        let (series, number) = identifier.split_once(SEPARATOR).ok_or_else(invalid)?;
        if !is_token(series) || !is_token(number) {
            return Err(invalid());
        }

        Ok(Self {
            series: series.to_string(),
            number: number.to_string(),
        })
    }

    /// Render back to the public `"SERIES NUMBER"` form.
    pub fn encode(&self) -> String {
        encode(&self.series, &self.number)
    }
}

/// Join series and number into the public identifier.
pub fn encode(series: &str, number: &str) -> String {
    format!("{series}{SEPARATOR}{number}")
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

impl FromStr for PassportId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for PassportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.series, self.number)
    }
}
