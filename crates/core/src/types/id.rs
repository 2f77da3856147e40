//! Newtype IDs for type-safe entity references.
//!
//! Entities are addressed externally by UUID; the `i32` surrogate keys used
//! for joins never leave the database layer unwrapped. The `define_id!`
//! macro creates a distinct wrapper per entity so a `StoreId` can never be
//! passed where an `AccountId` is expected.

/// Define a type-safe wrapper around an `i32` surrogate key.
///
/// The generated type derives the usual comparison/hash traits, serializes
/// transparently, and (with the `postgres` feature) encodes/decodes as a
/// plain `INTEGER` column.
///
/// # Example
///
/// ```rust
/// # use prato_core::define_id;
/// define_id!(AccountId);
/// define_id!(StoreId);
///
/// let account = AccountId::new(7);
/// assert_eq!(account.get(), 7);
/// // let _: StoreId = account; // does not compile
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw surrogate key.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Unwrap to the raw surrogate key.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(UserId);
define_id!(AccountId);
define_id!(AddressId);
define_id!(StoreId);
define_id!(SectionId);
define_id!(ProductId);
define_id!(OrderId);
define_id!(OrderItemId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let id = OrderId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(OrderId::from(42), id);
    }

    #[test]
    fn test_display() {
        assert_eq!(AccountId::new(7).to_string(), "7");
    }

    #[test]
    fn test_serde_transparent() {
        let id = StoreId::new(3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
        let back: StoreId = serde_json::from_str("3").unwrap();
        assert_eq!(back, id);
    }
}
