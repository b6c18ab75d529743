//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around a BSON `ObjectId` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `generate()`, `as_object_id()`, `parse()`
/// - `From<ObjectId>` and `Into<ObjectId>` implementations
///
/// # Example
///
/// ```rust
/// # use tarini_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::generate();
/// let order_id = OrderId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
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
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::bson::oid::ObjectId);

        impl $name {
            /// Wrap an existing `ObjectId`.
            #[must_use]
            pub const fn new(id: ::bson::oid::ObjectId) -> Self {
                Self(id)
            }

            /// Generate a fresh ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::bson::oid::ObjectId::new())
            }

            /// Get the underlying `ObjectId`.
            #[must_use]
            pub const fn as_object_id(&self) -> ::bson::oid::ObjectId {
                self.0
            }

            /// Parse an ID from its 24-character hex form.
            ///
            /// # Errors
            ///
            /// Returns `bson::oid::Error` if the input is not a valid hex
            /// `ObjectId`.
            pub fn parse(hex: &str) -> ::core::result::Result<Self, ::bson::oid::Error> {
                Ok(Self(::bson::oid::ObjectId::parse_str(hex)?))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl From<::bson::oid::ObjectId> for $name {
            fn from(id: ::bson::oid::ObjectId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::bson::oid::ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(CartId);
define_id!(WishlistId);
define_id!(OrderId);
define_id!(ReviewId);
define_id!(BannerId);
define_id!(AddressId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let id = ProductId::generate();
        let parsed = ProductId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(UserId::parse("not-an-object-id").is_err());
        assert!(UserId::parse("").is_err());
    }

    #[test]
    fn test_display_is_hex() {
        let id = OrderId::parse("0123456789abcdef01234567").unwrap();
        assert_eq!(id.to_string(), "0123456789abcdef01234567");
    }

    #[test]
    fn test_serde_transparent() {
        let id = BannerId::parse("0123456789abcdef01234567").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let back: BannerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
