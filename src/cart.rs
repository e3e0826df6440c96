//! Process-wide cart container.
//!
//! The backend owns the cart; [`CartState`] holds the last copy it returned.
//! Callers can read it freely but only the shop façade replaces it, and
//! only through a ticket taken when the request was dispatched. A response
//! is applied when its ticket is newer than the last applied one, so a
//! slow reply to an older request never overwrites a newer cart.

use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{CartLine, ProductId};
use crate::pricing;

/// Identifies one dispatched cart round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ticket(u64);

/// Lines plus the ticket they came from.
#[derive(Debug, Default)]
struct Inner {
    /// Current lines, in server order.
    lines: Vec<CartLine>,
    /// Highest ticket applied or invalidated so far.
    applied: u64,
}

/// Locally cached copy of the authoritative server cart.
#[derive(Debug, Default)]
pub struct CartState {
    /// Guarded cart contents.
    inner: Mutex<Inner>,
    /// Last ticket handed out.
    issued: AtomicU64,
}

impl CartState {
    /// Creates an empty cart.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the state lock, recovering from poisoning.
    fn with_lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current lines.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.with_lock().lines.clone()
    }

    /// Returns the line for `product_id` and `size`, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId, size: &str) -> Option<CartLine> {
        self.with_lock()
            .lines
            .iter()
            .find(|line| line.matches(product_id, size))
            .cloned()
    }

    /// Sum of `price × quantity` over all lines; zero for an empty cart.
    #[must_use]
    pub fn total(&self) -> f64 {
        pricing::subtotal(&self.with_lock().lines)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_lock().lines.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.with_lock()
            .lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.with_lock().lines.is_empty()
    }

    /// Takes a ticket for a request about to be dispatched.
    pub(crate) fn ticket(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replaces the lines with a server response.
    ///
    /// Returns `false` and leaves the cart untouched when a newer ticket was
    /// already applied or the cart was cleared after `ticket` was taken.
    pub(crate) fn apply(&self, ticket: Ticket, lines: Vec<CartLine>) -> bool {
        let mut inner = self.with_lock();
        if ticket.0 <= inner.applied {
            tracing::debug!(ticket = ticket.0, applied = inner.applied, "discarding stale cart response");
            return false;
        }
        inner.applied = ticket.0;
        inner.lines = lines;
        true
    }

    /// Empties the cart and invalidates every in-flight ticket.
    pub(crate) fn clear(&self) {
        let latest = self.issued.load(Ordering::SeqCst);
        let mut inner = self.with_lock();
        inner.lines.clear();
        inner.applied = inner.applied.max(latest);
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU32;

    use super::*;

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

    #[test]
    fn new_cart_is_empty() {
        let cart = CartState::new();
        assert!(cart.is_empty());
        assert_eq!(cart.len(), 0);
        assert!(cart.total().abs() < f64::EPSILON);
    }

    #[test]
    fn apply_replaces_lines() {
        let cart = CartState::new();
        let ticket = cart.ticket();
        assert!(cart.apply(ticket, vec![line("p1", "M", 50.0, 3)]));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert!((cart.total() - 150.0).abs() < f64::EPSILON);
        let found = cart.line(&ProductId::from("p1"), "M").unwrap();
        assert_eq!(found.quantity.get(), 3);
        assert!(cart.line(&ProductId::from("p1"), "L").is_none());
    }

    #[test]
    fn stale_response_is_discarded() {
        let cart = CartState::new();
        let older = cart.ticket();
        let newer = cart.ticket();
        assert!(cart.apply(newer, vec![line("p1", "M", 50.0, 2)]));
        assert!(!cart.apply(older, vec![line("p1", "M", 50.0, 1)]));
        assert_eq!(cart.lines()[0].quantity.get(), 2);
    }

    #[test]
    fn responses_in_order_all_apply() {
        let cart = CartState::new();
        let first = cart.ticket();
        let second = cart.ticket();
        assert!(cart.apply(first, vec![line("p1", "M", 50.0, 1)]));
        assert!(cart.apply(second, vec![line("p1", "M", 50.0, 2)]));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn clear_invalidates_in_flight_tickets() {
        let cart = CartState::new();
        let before = cart.ticket();
        cart.clear();
        assert!(!cart.apply(before, vec![line("p1", "M", 50.0, 1)]));
        assert!(cart.is_empty());

        let after = cart.ticket();
        assert!(cart.apply(after, vec![line("p2", "S", 10.0, 1)]));
        assert_eq!(cart.len(), 1);
    }
}
