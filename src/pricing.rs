//! Order pricing: subtotal, delivery tier, discount and total.
//!
//! Pricing is a pure function of the cart lines, the shipping city and
//! the applied discount. It is recomputed on demand and never cached, so
//! a changed city or cart is reflected on the next call.

use crate::models::CartLine;

/// City that gets the reduced delivery charge. Matched exactly.
pub const HOME_CITY: &str = "Dhaka";

/// Delivery charge inside [`HOME_CITY`].
pub const HOME_DELIVERY_CHARGE: f64 = 100.0;

/// Delivery charge everywhere else, including an empty city.
pub const AWAY_DELIVERY_CHARGE: f64 = 200.0;

/// Bangladeshi taka sign used for on-screen amounts.
pub const CURRENCY_SYMBOL: char = '\u{09F3}';

/// Two-tier delivery charge table.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryTiers {
    /// City receiving `home_charge`; compared case-sensitively.
    pub home_city: String,
    /// Charge inside the home city.
    pub home_charge: f64,
    /// Charge for any other city.
    pub away_charge: f64,
}

impl Default for DeliveryTiers {
    #[inline]
    fn default() -> Self {
        Self {
            home_city: HOME_CITY.to_owned(),
            home_charge: HOME_DELIVERY_CHARGE,
            away_charge: AWAY_DELIVERY_CHARGE,
        }
    }
}

impl DeliveryTiers {
    /// Returns the delivery charge for `city`.
    #[inline]
    #[must_use]
    pub fn charge_for(&self, city: &str) -> f64 {
        if city == self.home_city {
            self.home_charge
        } else {
            self.away_charge
        }
    }
}

/// Derived amounts shown at checkout and printed on the receipt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingSnapshot {
    /// Sum of `price × quantity` over all lines.
    pub subtotal: f64,
    /// Delivery tier charge.
    pub delivery_charge: f64,
    /// Applied voucher discount (never negative).
    pub discount_amount: f64,
    /// `subtotal + delivery_charge - discount_amount`, floored at zero.
    pub total: f64,
}

/// Sum of line totals.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> f64 {
    lines.iter().map(CartLine::line_total).sum()
}

/// Computes the pricing snapshot for a checkout.
///
/// The delivery charge applies even to an empty cart. A negative discount
/// is treated as zero, and a discount larger than the order brings the
/// total to zero rather than below it.
#[must_use]
pub fn compute_pricing(
    lines: &[CartLine],
    city: &str,
    discount_amount: f64,
    tiers: &DeliveryTiers,
) -> PricingSnapshot {
    let items = subtotal(lines);
    let delivery_charge = tiers.charge_for(city);
    let discount_amount = discount_amount.max(0.0);
    let total = (items + delivery_charge - discount_amount).max(0.0);
    PricingSnapshot {
        subtotal: items,
        delivery_charge,
        discount_amount,
        total,
    }
}

/// Formats an amount with the taka sign and two decimals, e.g. `৳150.00`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU32;

    use super::*;
    use crate::models::ProductId;

    fn line(product: &str, size: &str, price: f64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::from(product),
            name: format!("Product {product}"),
            image: String::new(),
            price,
            size: size.to_owned(),
            quantity: NonZeroU32::new(quantity).unwrap(),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn home_city_with_discount() {
        let lines = [line("p1", "M", 50.0, 2), line("p2", "L", 30.0, 1)];
        let pricing = compute_pricing(&lines, "Dhaka", 50.0, &DeliveryTiers::default());
        assert_close(pricing.subtotal, 130.0);
        assert_close(pricing.delivery_charge, 100.0);
        assert_close(pricing.total, 180.0);
    }

    #[test]
    fn subtotal_eighty_across_tiers() {
        let lines = [line("p1", "M", 40.0, 2)];
        let tiers = DeliveryTiers::default();
        assert_close(compute_pricing(&lines, "Dhaka", 0.0, &tiers).total, 180.0);
        assert_close(compute_pricing(&lines, "Rajshahi", 50.0, &tiers).total, 230.0);
        let small = [line("p2", "S", 10.0, 1)];
        assert_close(compute_pricing(&small, "Rajshahi", 500.0, &tiers).total, 0.0);
    }

    #[test]
    fn other_city_without_discount() {
        let lines = [line("p1", "M", 50.0, 2), line("p2", "L", 30.0, 1)];
        let pricing = compute_pricing(&lines, "Chittagong", 0.0, &DeliveryTiers::default());
        assert_close(pricing.delivery_charge, 200.0);
        assert_close(pricing.total, 330.0);
    }

    #[test]
    fn empty_cart_pays_delivery() {
        let pricing = compute_pricing(&[], "Sylhet", 0.0, &DeliveryTiers::default());
        assert_close(pricing.subtotal, 0.0);
        assert_close(pricing.total, 200.0);
    }

    #[test]
    fn oversized_discount_floors_at_zero() {
        let lines = [line("p1", "M", 20.0, 1)];
        let pricing = compute_pricing(&lines, "Dhaka", 500.0, &DeliveryTiers::default());
        assert_close(pricing.total, 0.0);
    }

    #[test]
    fn negative_discount_is_ignored() {
        let lines = [line("p1", "M", 20.0, 1)];
        let pricing = compute_pricing(&lines, "Dhaka", -40.0, &DeliveryTiers::default());
        assert_close(pricing.discount_amount, 0.0);
        assert_close(pricing.total, 120.0);
    }

    #[test]
    fn city_match_is_exact() {
        let tiers = DeliveryTiers::default();
        assert_close(tiers.charge_for("Dhaka"), HOME_DELIVERY_CHARGE);
        assert_close(tiers.charge_for("dhaka"), AWAY_DELIVERY_CHARGE);
        assert_close(tiers.charge_for(" Dhaka"), AWAY_DELIVERY_CHARGE);
        assert_close(tiers.charge_for(""), AWAY_DELIVERY_CHARGE);
    }

    #[test]
    fn custom_tiers() {
        let tiers = DeliveryTiers {
            home_city: "Khulna".to_owned(),
            home_charge: 60.0,
            away_charge: 120.0,
        };
        let pricing = compute_pricing(&[line("p1", "S", 10.0, 3)], "Khulna", 0.0, &tiers);
        assert_close(pricing.total, 90.0);
    }

    #[test]
    fn amount_formatting() {
        assert_eq!(format_amount(150.0), "\u{09F3}150.00");
        assert_eq!(format_amount(0.5), "\u{09F3}0.50");
    }
}
