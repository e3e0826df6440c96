//! Enumeration types for constrained API values.

use serde::{Deserialize, Serialize};

/// How the customer pays for an order.
///
/// Payment itself is simulated; the backend only records the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash handed over on delivery.
    #[default]
    #[serde(rename = "cash on delivery")]
    CashOnDelivery,
    /// bKash, Nagad or Rocket.
    #[serde(rename = "mobileBanking")]
    MobileBanking,
    /// Internet banking or card.
    #[serde(rename = "internetBanking")]
    InternetBanking,
}

impl PaymentMethod {
    /// All payment methods, in display order.
    pub const ALL: [Self; 3] = [
        Self::CashOnDelivery,
        Self::MobileBanking,
        Self::InternetBanking,
    ];

    /// Human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::MobileBanking => "Mobile Banking",
            Self::InternetBanking => "Internet Banking / Card",
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress of a loyalty membership application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MembershipState {
    /// The user never applied.
    #[serde(rename = "not applied")]
    NotApplied,
    /// The application awaits review.
    Pending,
    /// The user is a member and collects points.
    Approved,
    /// The application was rejected.
    Declined,
}

impl MembershipState {
    /// Human-readable label.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotApplied => "Not applied",
            Self::Pending => "Pending review",
            Self::Approved => "Member",
            Self::Declined => "Declined",
        }
    }
}

impl core::fmt::Display for MembershipState {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_wire_values() {
        let cases = [
            (PaymentMethod::CashOnDelivery, r#""cash on delivery""#),
            (PaymentMethod::MobileBanking, r#""mobileBanking""#),
            (PaymentMethod::InternetBanking, r#""internetBanking""#),
        ];
        for (method, wire) in cases {
            assert_eq!(serde_json::to_string(&method).unwrap(), wire);
            let back: PaymentMethod = serde_json::from_str(wire).unwrap();
            assert_eq!(back, method);
        }
    }

    #[test]
    fn payment_method_default_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::CashOnDelivery);
        assert_eq!(PaymentMethod::CashOnDelivery.to_string(), "Cash on Delivery");
    }

    #[test]
    fn unknown_payment_method_rejected() {
        assert!(serde_json::from_str::<PaymentMethod>(r#""bitcoin""#).is_err());
    }

    #[test]
    fn membership_state_serde() {
        let state: MembershipState = serde_json::from_str(r#""not applied""#).unwrap();
        assert_eq!(state, MembershipState::NotApplied);
        let state: MembershipState = serde_json::from_str(r#""approved""#).unwrap();
        assert_eq!(state, MembershipState::Approved);
        assert_eq!(
            serde_json::to_string(&MembershipState::Pending).unwrap(),
            r#""pending""#
        );
    }
}
