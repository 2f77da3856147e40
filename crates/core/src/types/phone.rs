//! Phone number type (Brazilian mobile format with country code).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input is not exactly 13 digits long.
    #[error("phone must be exactly {expected} digits, got {got}")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
        /// Number of characters received.
        got: usize,
    },
    /// The input contains a non-digit character.
    #[error("phone must contain only digits")]
    NonDigit,
}

/// A phone number stored as 13 bare digits: country code (2), area code (2)
/// and subscriber number (9), e.g. `5511987654321`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Number of digits in a phone number.
    pub const LENGTH: usize = 13;

    /// Parse a `Phone` from a string, stripping `+`, spaces, `(`, `)` and
    /// `-` separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits and separators, or does not have exactly 13 digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits: String = s
            .chars()
            .filter(|c| !matches!(c, '+' | ' ' | '(' | ')' | '-'))
            .collect();

        if digits.chars().any(|c| !c.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        if digits.len() != Self::LENGTH {
            return Err(PhoneError::WrongLength {
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

    /// Returns the display form `+55 (11) 98765-4321`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("+{} ({}) {}-{}", &d[..2], &d[2..4], &d[4..9], &d[9..])
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
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
        let phone = Phone::parse("+55 (11) 98765-4321").unwrap();
        assert_eq!(phone.as_str(), "5511987654321");
        assert_eq!(phone.formatted(), "+55 (11) 98765-4321");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(
            Phone::parse("11987654321"),
            Err(PhoneError::WrongLength { .. })
        ));
        assert!(matches!(
            Phone::parse("551198765432x"),
            Err(PhoneError::NonDigit)
        ));
    }
}
