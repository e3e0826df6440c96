//! Newtype wrappers for backend identifiers.
//!
//! The backend hands out opaque string identifiers (Mongo object ids).
//! Wrapping them keeps a product id from being passed where an order id is
//! expected.

use serde::{Deserialize, Serialize};

/// Defines a newtype identifier wrapping a `String`.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from the given string.
            #[inline]
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner string.
            #[inline]
            #[must_use]
            pub fn as_inner(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id! {
    /// Identifier of a catalog product.
    ProductId
}

define_string_id! {
    /// Identifier of a purchasable voucher definition.
    VoucherId
}

define_string_id! {
    /// Identifier of a voucher instance owned by a user.
    UserVoucherId
}

define_string_id! {
    /// Identifier of a placed order.
    OrderId
}

define_string_id! {
    /// Identifier of a customer account.
    UserId
}
