//! CEP (Brazilian postal code) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ZipCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ZipCodeError {
    /// The input string is empty.
    #[error("zip code cannot be empty")]
    Empty,
    /// The input is not exactly 8 digits long.
    #[error("zip code must be exactly {expected} digits, got {got}")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
        /// Number of characters received.
        got: usize,
    },
    /// The input contains a non-digit character.
    #[error("zip code must contain only digits")]
    NonDigit,
}

/// A CEP stored as its 8 bare digits, e.g. `01310100`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ZipCode(String);

impl ZipCode {
    /// Number of digits in a CEP.
    pub const LENGTH: usize = 8;

    /// Parse a `ZipCode` from a string, stripping the `-` separator.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits and `-`, or does not have exactly 8 digits.
    pub fn parse(s: &str) -> Result<Self, ZipCodeError> {
        if s.is_empty() {
            return Err(ZipCodeError::Empty);
        }

        let digits: String = s.chars().filter(|c| *c != '-').collect();

        if digits.chars().any(|c| !c.is_ascii_digit()) {
            return Err(ZipCodeError::NonDigit);
        }

        if digits.len() != Self::LENGTH {
            return Err(ZipCodeError::WrongLength {
                expected: Self::LENGTH,
                got: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the bare digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the display form `01310-100`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("{}-{}", &d[..5], &d[5..])
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for ZipCode {
    type Err = ZipCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ZipCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ZipCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ZipCode {
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
    fn test_parse_and_format() {
        let cep = ZipCode::parse("01310-100").unwrap();
        assert_eq!(cep.as_str(), "01310100");
        assert_eq!(cep.formatted(), "01310-100");
    }

    #[test]
    fn test_parse_bare() {
        assert_eq!(ZipCode::parse("01310100").unwrap().as_str(), "01310100");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(ZipCode::parse(""), Err(ZipCodeError::Empty)));
        assert!(matches!(
            ZipCode::parse("0131010"),
            Err(ZipCodeError::WrongLength { .. })
        ));
        assert!(matches!(
            ZipCode::parse("01310abc"),
            Err(ZipCodeError::NonDigit)
        ));
    }
}
