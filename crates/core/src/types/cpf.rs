//! CPF (Brazilian individual taxpayer ID) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cpf`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CpfError {
    /// The input string is empty.
    #[error("CPF cannot be empty")]
    Empty,
    /// The input is not exactly 11 characters long.
    #[error("CPF must be exactly {expected} digits, got {got}")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
        /// Number of characters received.
        got: usize,
    },
    /// The input contains a non-digit character.
    #[error("CPF must contain only digits")]
    NonDigit,
}

/// A CPF stored as its 11 bare digits.
///
/// Formatting characters (`.` and `-`) are stripped on parse, so both
/// `"123.456.789-01"` and `"12345678901"` are accepted and normalize to the
/// same value.
///
/// ## Examples
///
/// ```
/// use prato_core::Cpf;
///
/// let cpf = Cpf::parse("123.456.789-01").unwrap();
/// assert_eq!(cpf.as_str(), "12345678901");
/// assert_eq!(cpf.formatted(), "123.456.789-01");
///
/// assert!(Cpf::parse("123").is_err());
/// assert!(Cpf::parse("1234567890a").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Number of digits in a CPF.
    pub const LENGTH: usize = 11;

    /// Parse a `Cpf` from a string, stripping `.` and `-` separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits and separators, or does not have exactly 11 digits.
    pub fn parse(s: &str) -> Result<Self, CpfError> {
        if s.is_empty() {
            return Err(CpfError::Empty);
        }

        let digits: String = s.chars().filter(|c| !matches!(c, '.' | '-')).collect();

        if digits.chars().any(|c| !c.is_ascii_digit()) {
            return Err(CpfError::NonDigit);
        }

        if digits.len() != Self::LENGTH {
            return Err(CpfError::WrongLength {
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

    /// Consumes the `Cpf` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the display form `123.456.789-01`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..])
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Cpf {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Cpf {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are constrained by a CHECK and assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Cpf {
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
    fn test_parse_bare_digits() {
        let cpf = Cpf::parse("12345678901").unwrap();
        assert_eq!(cpf.as_str(), "12345678901");
    }

    #[test]
    fn test_parse_formatted() {
        let cpf = Cpf::parse("123.456.789-01").unwrap();
        assert_eq!(cpf.as_str(), "12345678901");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Cpf::parse(""), Err(CpfError::Empty)));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            Cpf::parse("123456789"),
            Err(CpfError::WrongLength {
                expected: 11,
                got: 9
            })
        ));
    }

    #[test]
    fn test_parse_non_digit() {
        assert!(matches!(Cpf::parse("1234567890a"), Err(CpfError::NonDigit)));
    }

    #[test]
    fn test_formatted() {
        let cpf = Cpf::parse("12345678901").unwrap();
        assert_eq!(cpf.formatted(), "123.456.789-01");
        assert_eq!(cpf.to_string(), "123.456.789-01");
    }

    #[test]
    fn test_serde_roundtrip() {
        let cpf = Cpf::parse("12345678901").unwrap();
        let json = serde_json::to_string(&cpf).unwrap();
        assert_eq!(json, "\"12345678901\"");
        let back: Cpf = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cpf);
    }
}
