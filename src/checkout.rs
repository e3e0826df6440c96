//! Checkout form state and its submission lifecycle.
//!
//! A [`Checkout`] collects shipping details, a payment method and an
//! optional voucher discount, then moves through [`CheckoutState`]:
//!
//! ```text
//! Editing ──submit──▶ Submitting ──ok──▶ Succeeded(order id)
//!    ▲                    │
//!    └──── edit ◀── Failed(message) ◀── error
//! ```
//!
//! Only one submission can be in flight and a succeeded checkout cannot
//! be submitted again. A failed one keeps every field so the user can
//! correct and retry.

use validator::Validate as _;

use crate::error::{Result, ShopError};
use crate::models::{CartLine, CreateOrderRequest, Order, OrderId, PaymentMethod, ShippingInfo};
use crate::pricing::{self, DeliveryTiers, PricingSnapshot};

/// Where a checkout is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// Fields can be edited and the order submitted.
    #[default]
    Editing,
    /// The order request is in flight.
    Submitting,
    /// The backend created the order.
    Succeeded(OrderId),
    /// The last submission failed with the given message.
    Failed(String),
}

impl CheckoutState {
    /// Returns `true` if a submission may start from this state.
    #[inline]
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        matches!(*self, Self::Editing | Self::Failed(_))
    }
}

/// A voucher code redeemed for this checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedVoucher {
    /// Redeemed code.
    pub code: String,
    /// Discount granted by the backend.
    pub discount: f64,
}

/// One checkout session.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    /// Delivery details.
    shipping: ShippingInfo,
    /// Selected payment method.
    payment_method: PaymentMethod,
    /// Redeemed voucher, if any.
    voucher: Option<AppliedVoucher>,
    /// Lifecycle state.
    state: CheckoutState,
    /// Order read back after success.
    placed: Option<Order>,
}

impl Checkout {
    /// Starts a checkout in the editing state.
    #[must_use]
    pub fn new(shipping: ShippingInfo, payment_method: PaymentMethod) -> Self {
        Self {
            shipping,
            payment_method,
            ..Self::default()
        }
    }

    /// Shipping details.
    #[inline]
    #[must_use]
    pub const fn shipping(&self) -> &ShippingInfo {
        &self.shipping
    }

    /// Mutable shipping details; pricing follows edits immediately.
    #[inline]
    pub const fn shipping_mut(&mut self) -> &mut ShippingInfo {
        &mut self.shipping
    }

    /// Selected payment method.
    #[inline]
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Changes the payment method.
    #[inline]
    pub const fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Redeemed voucher, if any.
    #[inline]
    #[must_use]
    pub const fn voucher(&self) -> Option<&AppliedVoucher> {
        self.voucher.as_ref()
    }

    /// Current discount, zero without a voucher.
    #[inline]
    #[must_use]
    pub fn discount_amount(&self) -> f64 {
        self.voucher.as_ref().map_or(0.0, |voucher| voucher.discount)
    }

    /// Lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Order read back after a successful submission.
    #[inline]
    #[must_use]
    pub const fn placed_order(&self) -> Option<&Order> {
        self.placed.as_ref()
    }

    /// Fails unless the checkout is editing or failed.
    ///
    /// # Errors
    ///
    /// - [`ShopError::CheckoutInProgress`] while a submission is in flight.
    /// - [`ShopError::OrderAlreadyPlaced`] after success.
    pub(crate) fn ensure_editable(&self) -> Result<()> {
        match self.state.clone() {
            CheckoutState::Submitting => Err(ShopError::CheckoutInProgress),
            CheckoutState::Succeeded(id) => Err(ShopError::OrderAlreadyPlaced(id.into_inner())),
            CheckoutState::Editing | CheckoutState::Failed(_) => Ok(()),
        }
    }

    /// Records a redeemed voucher.
    pub(crate) fn apply_discount(&mut self, code: String, discount: f64) {
        self.voucher = Some(AppliedVoucher {
            code,
            discount: discount.max(0.0),
        });
    }

    /// Drops any voucher discount.
    pub(crate) fn reset_discount(&mut self) {
        self.voucher = None;
    }

    /// Pricing for `lines` with this checkout's city and discount.
    #[must_use]
    pub fn pricing(&self, lines: &[CartLine], tiers: &DeliveryTiers) -> PricingSnapshot {
        pricing::compute_pricing(lines, &self.shipping.city, self.discount_amount(), tiers)
    }

    /// Checks the shipping form without touching the state.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::InvalidShipping`] if a field is missing or
    /// malformed.
    pub fn validate(&self) -> Result<()> {
        Ok(self.shipping.validate()?)
    }

    /// Validates the form and enters [`CheckoutState::Submitting`].
    ///
    /// # Errors
    ///
    /// - [`ShopError::CheckoutInProgress`] while a submission is in flight.
    /// - [`ShopError::OrderAlreadyPlaced`] after success.
    /// - [`ShopError::InvalidShipping`] if a field is missing or malformed.
    /// - [`ShopError::EmptyCart`] if `lines` is empty.
    ///
    /// The state is unchanged on error.
    pub(crate) fn begin_submit(&mut self, lines: &[CartLine]) -> Result<CreateOrderRequest> {
        self.ensure_editable()?;
        self.validate()?;
        if lines.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        self.state = CheckoutState::Submitting;
        Ok(CreateOrderRequest {
            shipping_address: self.shipping.concatenated_address(),
            payment_method: self.payment_method,
            discount_amount: self.discount_amount(),
            voucher_code: self.voucher.as_ref().map(|voucher| voucher.code.clone()),
        })
    }

    /// Enters [`CheckoutState::Succeeded`].
    ///
    /// `order` is the read-back detail; it is `None` when the follow-up
    /// fetch failed after the order was created.
    pub(crate) fn succeed(&mut self, id: OrderId, order: Option<Order>) {
        self.state = CheckoutState::Succeeded(id);
        self.placed = order;
    }

    /// Enters [`CheckoutState::Failed`], keeping every field.
    pub(crate) fn fail(&mut self, message: String) {
        self.state = CheckoutState::Failed(message);
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU32;

    use super::*;
    use crate::models::ProductId;

    fn shipping(city: &str) -> ShippingInfo {
        ShippingInfo {
            first_name: "Rahim".to_owned(),
            last_name: "Uddin".to_owned(),
            email: "rahim@example.com".to_owned(),
            phone: "01700000000".to_owned(),
            address: "House 12".to_owned(),
            street: "Road 5".to_owned(),
            city: city.to_owned(),
            district: "Dhaka".to_owned(),
            postal_code: "1207".to_owned(),
        }
    }

    fn lines() -> Vec<CartLine> {
        vec![CartLine {
            product_id: ProductId::from("p1"),
            name: "Shirt".to_owned(),
            image: String::new(),
            price: 40.0,
            size: "M".to_owned(),
            quantity: NonZeroU32::new(2).unwrap(),
        }]
    }

    fn order(id: &str) -> Order {
        serde_json::from_value(serde_json::json!({"_id": id, "totalAmount": 180})).unwrap()
    }

    #[test]
    fn submit_builds_request() {
        let mut checkout = Checkout::new(shipping("Dhaka"), PaymentMethod::MobileBanking);
        checkout.apply_discount("SUN-1".to_owned(), 50.0);
        let request = checkout.begin_submit(&lines()).unwrap();
        assert_eq!(checkout.state(), &CheckoutState::Submitting);
        assert_eq!(request.shipping_address, "House 12, Road 5, Dhaka, Dhaka, 1207");
        assert_eq!(request.payment_method, PaymentMethod::MobileBanking);
        assert!((request.discount_amount - 50.0).abs() < f64::EPSILON);
        assert_eq!(request.voucher_code.as_deref(), Some("SUN-1"));
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut checkout = Checkout::new(shipping("Dhaka"), PaymentMethod::default());
        let _request = checkout.begin_submit(&lines()).unwrap();
        let err = checkout.begin_submit(&lines()).unwrap_err();
        assert!(matches!(err, ShopError::CheckoutInProgress));
    }

    #[test]
    fn invalid_shipping_keeps_editing() {
        let mut checkout = Checkout::new(shipping(""), PaymentMethod::default());
        let err = checkout.begin_submit(&lines()).unwrap_err();
        assert!(matches!(err, ShopError::InvalidShipping(_)));
        assert_eq!(checkout.state(), &CheckoutState::Editing);
    }

    #[test]
    fn validate_reports_bad_form_without_state_change() {
        let mut form = shipping("Dhaka");
        form.email = "not-an-email".to_owned();
        let checkout = Checkout::new(form, PaymentMethod::default());
        assert!(matches!(checkout.validate().unwrap_err(), ShopError::InvalidShipping(_)));
        assert_eq!(checkout.state(), &CheckoutState::Editing);
        assert!(Checkout::new(shipping("Dhaka"), PaymentMethod::default()).validate().is_ok());
    }

    #[test]
    fn empty_cart_is_rejected() {
        let mut checkout = Checkout::new(shipping("Dhaka"), PaymentMethod::default());
        let err = checkout.begin_submit(&[]).unwrap_err();
        assert!(matches!(err, ShopError::EmptyCart));
        assert!(checkout.state().can_submit());
    }

    #[test]
    fn failure_keeps_fields_and_allows_retry() {
        let mut checkout = Checkout::new(shipping("Dhaka"), PaymentMethod::InternetBanking);
        checkout.apply_discount("SUN-1".to_owned(), 20.0);
        let _request = checkout.begin_submit(&lines()).unwrap();
        checkout.fail("Failed to place order.".to_owned());
        assert_eq!(
            checkout.state(),
            &CheckoutState::Failed("Failed to place order.".to_owned())
        );
        assert_eq!(checkout.shipping().city, "Dhaka");
        assert_eq!(checkout.payment_method(), PaymentMethod::InternetBanking);
        assert!((checkout.discount_amount() - 20.0).abs() < f64::EPSILON);
        assert!(checkout.begin_submit(&lines()).is_ok());
    }

    #[test]
    fn success_is_terminal() {
        let mut checkout = Checkout::new(shipping("Dhaka"), PaymentMethod::default());
        let _request = checkout.begin_submit(&lines()).unwrap();
        checkout.succeed(OrderId::from("o-1"), Some(order("o-1")));
        assert_eq!(checkout.state(), &CheckoutState::Succeeded(OrderId::from("o-1")));
        assert_eq!(checkout.placed_order().unwrap().id.as_inner(), "o-1");
        let err = checkout.begin_submit(&lines()).unwrap_err();
        assert!(matches!(err, ShopError::OrderAlreadyPlaced(ref id) if id == "o-1"));
    }

    #[test]
    fn pricing_follows_city_edits() {
        let mut checkout = Checkout::new(shipping("Dhaka"), PaymentMethod::default());
        let tiers = DeliveryTiers::default();
        assert!((checkout.pricing(&lines(), &tiers).total - 180.0).abs() < f64::EPSILON);
        checkout.shipping_mut().city = "Barishal".to_owned();
        checkout.apply_discount("SUN-2".to_owned(), 50.0);
        assert!((checkout.pricing(&lines(), &tiers).total - 230.0).abs() < f64::EPSILON);
        checkout.reset_discount();
        assert!(checkout.voucher().is_none());
        assert!((checkout.pricing(&lines(), &tiers).total - 280.0).abs() < f64::EPSILON);
    }
}
