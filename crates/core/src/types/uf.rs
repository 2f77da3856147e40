//! UF (Brazilian state abbreviation) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Uf`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UfError {
    /// The input string is empty.
    #[error("state cannot be empty")]
    Empty,
    /// The input is not exactly two letters.
    #[error("state must be exactly 2 uppercase letters")]
    Invalid,
}

/// A two-letter state abbreviation, normalized to uppercase (e.g. `SP`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Uf(String);

impl Uf {
    /// Parse a `Uf` from a string, uppercasing ASCII letters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not exactly two ASCII
    /// letters.
    pub fn parse(s: &str) -> Result<Self, UfError> {
        if s.is_empty() {
            return Err(UfError::Empty);
        }

        if s.len() != 2 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(UfError::Invalid);
        }

        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the uppercase abbreviation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Uf {
    type Err = UfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Uf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Uf {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Uf {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Uf {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        assert_eq!(Uf::parse("sp").unwrap().as_str(), "SP");
        assert_eq!(Uf::parse("RJ").unwrap().as_str(), "RJ");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(Uf::parse(""), Err(UfError::Empty)));
        assert!(matches!(Uf::parse("S"), Err(UfError::Invalid)));
        assert!(matches!(Uf::parse("SPX"), Err(UfError::Invalid)));
        assert!(matches!(Uf::parse("S1"), Err(UfError::Invalid)));
    }
}
