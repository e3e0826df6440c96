//! Shipping details and order models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{CartLine, OrderId, PaymentMethod, UserId};

/// Delivery contact and address captured at checkout.
///
/// Every field is required; `email` must be well formed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    /// Given name.
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    /// Contact email.
    #[validate(email(message = "email address is not valid"))]
    pub email: String,
    /// Contact phone number.
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    /// House or building.
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    /// Street.
    #[validate(length(min = 1, message = "street is required"))]
    pub street: String,
    /// City; decides the delivery tier.
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    /// District.
    #[validate(length(min = 1, message = "district is required"))]
    pub district: String,
    /// Postal code.
    #[validate(length(min = 1, message = "postal code is required"))]
    pub postal_code: String,
}

impl ShippingInfo {
    /// Single-line address sent to the backend:
    /// `"address, street, city, district, postal_code"`.
    #[must_use]
    pub fn concatenated_address(&self) -> String {
        [
            self.address.as_str(),
            &self.street,
            &self.city,
            &self.district,
            &self.postal_code,
        ]
        .join(", ")
    }

    /// First and last name separated by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Body of `POST /api/orders`.
///
/// Items are not sent; the backend builds the order from the stored cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Output of [`ShippingInfo::concatenated_address`].
    pub shipping_address: String,
    /// Chosen payment method.
    pub payment_method: PaymentMethod,
    /// Voucher discount, zero when none applied.
    pub discount_amount: f64,
    /// Applied voucher code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_code: Option<String>,
}

/// Identifier part of a freshly created order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    /// New order identifier.
    #[serde(rename = "_id")]
    pub id: OrderId,
}

/// Response of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    /// The created order (only its id is relied upon).
    pub order: CreatedOrder,
}

/// Response of `GET /api/orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Full order.
    pub order: Order,
}

/// Customer profile embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
}

/// The `user` reference of an order, populated or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderCustomer {
    /// Populated profile.
    Profile(Customer),
    /// Bare user reference.
    Id(UserId),
}

/// A placed order, read back from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier.
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// Ordering user.
    #[serde(default, rename = "user")]
    pub customer: Option<OrderCustomer>,
    /// Snapshot of the cart lines at creation.
    #[serde(default)]
    pub items: Vec<CartLine>,
    /// Concatenated shipping address.
    #[serde(default)]
    pub shipping_address: String,
    /// Delivery charge.
    #[serde(default)]
    pub shipping_price: f64,
    /// Voucher discount.
    #[serde(default)]
    pub discount_amount: f64,
    /// Amount charged.
    pub total_amount: f64,
    /// Chosen payment method.
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the populated customer profile, if any.
    #[inline]
    #[must_use]
    pub const fn customer_profile(&self) -> Option<&Customer> {
        match self.customer {
            Some(OrderCustomer::Profile(ref profile)) => Some(profile),
            Some(OrderCustomer::Id(_)) | None => None,
        }
    }

    /// Sum of the item line totals.
    #[must_use]
    pub fn items_subtotal(&self) -> f64 {
        self.items.iter().map(CartLine::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            first_name: "Rahim".to_owned(),
            last_name: "Uddin".to_owned(),
            email: "rahim@example.com".to_owned(),
            phone: "01700000000".to_owned(),
            address: "House 12".to_owned(),
            street: "Road 5".to_owned(),
            city: "Dhaka".to_owned(),
            district: "Dhaka".to_owned(),
            postal_code: "1207".to_owned(),
        }
    }

    #[test]
    fn concatenated_address_order() {
        assert_eq!(
            shipping().concatenated_address(),
            "House 12, Road 5, Dhaka, Dhaka, 1207"
        );
        assert_eq!(shipping().full_name(), "Rahim Uddin");
    }

    #[test]
    fn complete_shipping_validates() {
        assert!(shipping().validate().is_ok());
    }

    #[test]
    fn missing_fields_fail_validation() {
        let mut info = shipping();
        info.city = String::new();
        info.email = "not-an-email".to_owned();
        let errors = info.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("city"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("street"));
    }

    #[test]
    fn create_request_skips_missing_voucher() {
        let request = CreateOrderRequest {
            shipping_address: "a, b, c, d, e".to_owned(),
            payment_method: PaymentMethod::MobileBanking,
            discount_amount: 0.0,
            voucher_code: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "shippingAddress": "a, b, c, d, e",
                "paymentMethod": "mobileBanking",
                "discountAmount": 0.0
            })
        );
    }

    #[test]
    fn deserialize_order_with_populated_user() {
        let json = r#"{"order":{
            "_id":"o-1",
            "user":{"_id":"u-1","name":"Rahim Uddin","email":"rahim@example.com"},
            "items":[{"productId":"p1","name":"Shirt","price":50,"size":"M","quantity":3}],
            "shippingAddress":"House 12, Road 5, Dhaka, Dhaka, 1207",
            "shippingPrice":100,
            "discountAmount":0,
            "totalAmount":250,
            "paymentMethod":"cash on delivery",
            "createdAt":"2024-05-01T10:00:00.000Z"
        }}"#;
        let response: OrderResponse = serde_json::from_str(json).unwrap();
        let order = response.order;
        assert_eq!(order.id.as_inner(), "o-1");
        assert_eq!(order.customer_profile().unwrap().name, "Rahim Uddin");
        assert!((order.items_subtotal() - 150.0).abs() < f64::EPSILON);
        assert_eq!(order.payment_method, Some(PaymentMethod::CashOnDelivery));
    }

    #[test]
    fn deserialize_order_with_bare_user_id() {
        let json = r#"{"_id":"o-2","user":"u-9","totalAmount":0}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.customer, Some(OrderCustomer::Id(UserId::from("u-9"))));
        assert!(order.customer_profile().is_none());
        assert!(order.items.is_empty());
    }

    #[test]
    fn deserialize_create_response() {
        let json = r#"{"message":"Order created","order":{"_id":"o-3","totalAmount":10}}"#;
        let response: CreateOrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.order.id, OrderId::from("o-3"));
    }
}
