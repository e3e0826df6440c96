//! Rust client library for the Sunshine storefront API.
//!
//! This crate provides a typed client for the Sunshine clothing store
//! backend: a server-authoritative cart, delivery pricing, loyalty
//! vouchers, checkout and PDF payslips.
//!
//! The [`shop::Shop`] façade (or [`shop::ShopBlocking`] with the
//! `blocking` feature) is the usual entry point:
//!
//! ```rust,no_run
//! # async fn demo() -> sunshine_shop::error::Result<()> {
//! use sunshine_shop::checkout::Checkout;
//! use sunshine_shop::models::{PaymentMethod, ShippingInfo};
//! use sunshine_shop::session::InMemoryTokenStore;
//! use sunshine_shop::shop::Shop;
//!
//! let shop = Shop::builder()
//!     .base_url("http://localhost:5000")
//!     .token_store(InMemoryTokenStore::new())
//!     .build()?;
//! shop.login("rahim@example.com", "secret").await?;
//!
//! let mut checkout = Checkout::new(ShippingInfo::default(), PaymentMethod::CashOnDelivery);
//! let _discount = shop.apply_voucher(&mut checkout, "SUN-50").await?;
//! println!("total: {}", shop.pricing(&checkout).total);
//! let _order_id = shop.place_order(&mut checkout).await?;
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod checkout;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod error;
pub mod models;
pub mod notification;
pub mod pricing;
pub mod receipt;
pub mod session;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod shop;
