//! Loyalty voucher models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{UserVoucherId, VoucherId};

/// Placeholder character shown instead of a hidden voucher code.
const MASK_CHAR: char = '*';

/// A purchasable discount definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: VoucherId,
    /// Flat amount taken off an order.
    pub discount_amount: f64,
    /// Loyalty points required to buy one.
    pub points_cost: u64,
    /// Whether the voucher can currently be bought.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Vouchers listed by the backend are active unless it says otherwise.
const fn default_active() -> bool {
    true
}

/// A voucher owned by the user, redeemable once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserVoucher {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: UserVoucherId,
    /// Redemption secret.
    pub code: String,
    /// Whether the code has been used.
    #[serde(default)]
    pub is_redeemed: bool,
    /// When the code was used.
    #[serde(default)]
    pub redeemed_at: Option<DateTime<Utc>>,
    /// When the voucher was bought.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// The definition this instance was bought from.
    #[serde(default)]
    pub voucher: Option<Voucher>,
}

impl UserVoucher {
    /// Returns the code with every character hidden.
    #[must_use]
    pub fn masked_code(&self) -> String {
        self.code.chars().map(|_| MASK_CHAR).collect()
    }

    /// Discount granted by this voucher, if the definition is known.
    #[inline]
    #[must_use]
    pub fn discount_amount(&self) -> Option<f64> {
        self.voucher.as_ref().map(|voucher| voucher.discount_amount)
    }
}

/// Response of `GET /api/vouchers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoucherListResponse {
    /// Vouchers on offer.
    #[serde(default)]
    pub vouchers: Vec<Voucher>,
}

/// Response of `GET /api/vouchers/my-vouchers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyVoucherListResponse {
    /// Vouchers owned by the current user.
    #[serde(default)]
    pub my_vouchers: Vec<UserVoucher>,
}

/// Body of `POST /api/vouchers/purchase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseVoucherRequest {
    /// Voucher definition to buy.
    pub voucher_id: VoucherId,
}

/// Body of `POST /api/vouchers/redeem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemVoucherRequest {
    /// Code to redeem.
    pub code: String,
}

/// Response of `POST /api/vouchers/redeem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemVoucherResponse {
    /// Discount to apply to the order.
    pub discount_amount: f64,
    /// Optional confirmation text.
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Confirmation text, if any.
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of a successful voucher purchase.
///
/// The purchase itself has been committed. The refetched lists are `None`
/// when their refresh failed.
#[derive(Debug, Clone, PartialEq)]
pub struct VoucherPurchase {
    /// Server confirmation text.
    pub message: Option<String>,
    /// Vouchers on offer after the purchase.
    pub available: Option<Vec<Voucher>>,
    /// Vouchers owned after the purchase.
    pub owned: Option<Vec<UserVoucher>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_voucher_list() {
        let json = r#"{"vouchers":[{"_id":"v1","discountAmount":50,"pointsCost":500}]}"#;
        let list: VoucherListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(list.vouchers.len(), 1);
        assert_eq!(list.vouchers[0].points_cost, 500);
        assert!(list.vouchers[0].is_active);
    }

    #[test]
    fn deserialize_my_vouchers() {
        let json = r#"{"myVouchers":[{
            "_id":"uv1",
            "code":"SUN-8F2K",
            "isRedeemed":true,
            "redeemedAt":"2024-05-01T10:00:00.000Z",
            "createdAt":"2024-04-01T09:30:00.000Z",
            "voucher":{"_id":"v1","discountAmount":50,"pointsCost":500,"isActive":false}
        }]}"#;
        let list: MyVoucherListResponse = serde_json::from_str(json).unwrap();
        let owned = &list.my_vouchers[0];
        assert!(owned.is_redeemed);
        assert!(owned.redeemed_at.is_some());
        assert_eq!(owned.discount_amount(), Some(50.0));
        assert!(!owned.voucher.as_ref().unwrap().is_active);
    }

    #[test]
    fn masked_code_hides_every_character() {
        let voucher = UserVoucher {
            id: UserVoucherId::from("uv1"),
            code: "SUN-8F2K".to_owned(),
            is_redeemed: false,
            redeemed_at: None,
            created_at: None,
            voucher: None,
        };
        assert_eq!(voucher.masked_code(), "********");
        assert_eq!(voucher.discount_amount(), None);
    }

    #[test]
    fn purchase_request_wire_shape() {
        let request = PurchaseVoucherRequest {
            voucher_id: VoucherId::from("v1"),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"voucherId": "v1"})
        );
    }
}
