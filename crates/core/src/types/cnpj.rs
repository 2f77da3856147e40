//! CNPJ (Brazilian company registration number) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cnpj`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CnpjError {
    /// The input string is empty.
    #[error("CNPJ cannot be empty")]
    Empty,
    /// The input is not exactly 14 digits long.
    #[error("CNPJ must be exactly {expected} digits, got {got}")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
        /// Number of characters received.
        got: usize,
    },
    /// The input contains a non-digit character.
    #[error("CNPJ must contain only digits")]
    NonDigit,
}

/// A CNPJ stored as its 14 bare digits.
///
/// Accepts both the formatted form `12.345.678/0001-90` and the bare
/// digits; separators are stripped on parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cnpj(String);

impl Cnpj {
    /// Number of digits in a CNPJ.
    pub const LENGTH: usize = 14;

    /// Parse a `Cnpj` from a string, stripping `.`, `/` and `-` separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits and separators, or does not have exactly 14 digits.
    pub fn parse(s: &str) -> Result<Self, CnpjError> {
        if s.is_empty() {
            return Err(CnpjError::Empty);
        }

        let digits: String = s.chars().filter(|c| !matches!(c, '.' | '/' | '-')).collect();

        if digits.chars().any(|c| !c.is_ascii_digit()) {
            return Err(CnpjError::NonDigit);
        }

        if digits.len() != Self::LENGTH {
            return Err(CnpjError::WrongLength {
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

    /// Returns the display form `12.345.678/0001-90`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!(
            "{}.{}.{}/{}-{}",
            &d[..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..]
        )
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Cnpj {
    type Err = CnpjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cnpj {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Cnpj {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Cnpj {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Cnpj {
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
        let cnpj = Cnpj::parse("12.345.678/0001-90").unwrap();
        assert_eq!(cnpj.as_str(), "12345678000190");
        assert_eq!(cnpj.formatted(), "12.345.678/0001-90");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(Cnpj::parse(""), Err(CnpjError::Empty)));
        assert!(matches!(
            Cnpj::parse("12345678"),
            Err(CnpjError::WrongLength { .. })
        ));
        assert!(matches!(
            Cnpj::parse("1234567800019x"),
            Err(CnpjError::NonDigit)
        ));
    }
}
