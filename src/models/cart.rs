//! Cart line and cart request/response models.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::ProductId;

/// One product + size entry in a user's cart.
///
/// `name`, `image` and `price` are copies taken when the line was added;
/// they do not follow later catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog product.
    pub product_id: ProductId,
    /// Display name.
    pub name: String,
    /// Image URL or path.
    #[serde(default)]
    pub image: String,
    /// Unit price.
    pub price: f64,
    /// Size variant, e.g. `"M"` or `"XL"`.
    pub size: String,
    /// Number of units (at least one).
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// Returns the `(product, size)` pair identifying this line.
    #[inline]
    #[must_use]
    pub fn key(&self) -> (&ProductId, &str) {
        (&self.product_id, &self.size)
    }

    /// Returns `true` if this line holds the given product and size.
    #[inline]
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: &str) -> bool {
        self.product_id == *product_id && self.size == size
    }

    /// Unit price multiplied by quantity.
    #[inline]
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity.get())
    }
}

/// Cart as returned by every cart endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartResponse {
    /// Lines in server order. Absent for a user who never added anything.
    #[serde(default)]
    pub items: Vec<CartLine>,
}

/// Body of `PUT /api/cart/quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    /// Product of the line to change.
    pub product_id: ProductId,
    /// Size of the line to change.
    pub size: String,
    /// New quantity.
    pub quantity: NonZeroU32,
}
