//! Loyalty membership status.

use serde::{Deserialize, Serialize};

use super::MembershipState;

/// Response of `GET /api/membership/status`.
///
/// Profile fields and the points balance are only present once the
/// application is approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipStatus {
    /// Application progress.
    pub status: MembershipState,
    /// Loyalty points available for voucher purchases.
    #[serde(default)]
    pub points: Option<u64>,
    /// Member name.
    #[serde(default)]
    pub name: Option<String>,
    /// Member email.
    #[serde(default)]
    pub email: Option<String>,
    /// Member phone.
    #[serde(default)]
    pub phone: Option<String>,
}

impl MembershipStatus {
    /// Returns `true` if the user is an approved member.
    #[inline]
    #[must_use]
    pub fn is_member(&self) -> bool {
        self.status == MembershipState::Approved
    }

    /// Returns `true` if the balance covers `cost` points.
    ///
    /// A missing balance counts as zero.
    #[inline]
    #[must_use]
    pub fn can_afford(&self, cost: u64) -> bool {
        self.is_member() && self.points.unwrap_or_default() >= cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_member_with_points() {
        let json = r#"{"_id":"m-1","status":"approved","points":750,"name":"Rahim","email":"r@x.com","phone":"017"}"#;
        let status: MembershipStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_member());
        assert!(status.can_afford(500));
        assert!(!status.can_afford(1000));
    }

    #[test]
    fn not_applied_has_no_balance() {
        let status: MembershipStatus = serde_json::from_str(r#"{"status":"not applied"}"#).unwrap();
        assert_eq!(status.status, MembershipState::NotApplied);
        assert_eq!(status.points, None);
        assert!(!status.can_afford(0));
    }
}
