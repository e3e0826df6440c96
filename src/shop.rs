//! High-level storefront façade combining the HTTP client, the token store
//! and the local cart.
//!
//! [`Shop`] (async) and [`ShopBlocking`] (blocking) expose every cart,
//! voucher, checkout and session operation. Each operation reads the
//! bearer token fresh from the [`TokenStore`], talks to the backend, and
//! only then updates local state. A failure is logged, leaves local state
//! as it was, and is returned as a [`ShopError`](crate::error::ShopError).

/// Fallback shown when an order submission fails for an unexpected reason.
const ORDER_FAILED_MESSAGE: &str = "Failed to place order.";

/// Generates a high-level shop client (async or blocking).
macro_rules! define_shop {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_client: $http_client:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<T: TokenStore> {
            /// Base URL override.
            base_url: Option<String>,
            /// Per-request timeout.
            timeout: Option<Duration>,
            /// Session token storage.
            token_store: Option<T>,
            /// Delivery charge table.
            delivery_tiers: Option<DeliveryTiers>,
        }

        impl<T: TokenStore> $builder<T> {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<U: Into<String>>(mut self, url: U) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Sets a timeout applied to every request.
            #[inline]
            #[must_use]
            pub const fn timeout(mut self, timeout: Duration) -> Self {
                self.timeout = Some(timeout);
                self
            }

            /// Sets the token store.
            #[inline]
            #[must_use]
            pub fn token_store(mut self, token_store: T) -> Self {
                self.token_store = Some(token_store);
                self
            }

            /// Overrides the delivery charge table.
            #[inline]
            #[must_use]
            pub fn delivery_tiers(mut self, tiers: DeliveryTiers) -> Self {
                self.delivery_tiers = Some(tiers);
                self
            }

            /// Builds the shop.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::TokenStorage`] if no token store was provided.
            /// Returns [`ShopError::InvalidBaseUrl`] or [`ShopError::Http`] if the
            /// HTTP client fails to build.
            #[inline]
            pub fn build(self) -> Result<$client<T>> {
                let token_store = self.token_store.ok_or_else(|| {
                    ShopError::TokenStorage("token store is required".into())
                })?;

                let mut http_builder = <$http_client>::builder();
                if let Some(url) = self.base_url {
                    http_builder = http_builder.base_url(url);
                }
                if let Some(timeout) = self.timeout {
                    http_builder = http_builder.timeout(timeout);
                }
                let client = http_builder.build()?;

                Ok($client {
                    client,
                    token_store,
                    cart: CartState::new(),
                    tiers: self.delivery_tiers.unwrap_or_default(),
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client<T: TokenStore> {
            /// Low-level HTTP client.
            client: $http_client,
            /// Session token storage.
            token_store: T,
            /// Local copy of the server cart.
            cart: CartState,
            /// Delivery charge table.
            tiers: DeliveryTiers,
        }

        impl<T: TokenStore> $client<T> {
            /// Creates a new builder for configuring the shop.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder<T> {
                $builder {
                    base_url: None,
                    timeout: None,
                    token_store: None,
                    delivery_tiers: None,
                }
            }

            // ── Session ─────────────────────────────────────────────────

            /// Logs in, stores the bearer token and loads the cart.
            ///
            /// A failed cart load after a successful login is logged and
            /// does not fail the login.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Api`] with the server's message for bad
            /// credentials, or an error if the token cannot be stored.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn login(&self, email: &str, password: &str) -> Result<()> {
                let response = self
                    .client
                    .login(email, password)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::warn!(error = %err, "login failed"))?;
                self.token_store.save(&response.token)?;
                tracing::info!("logged in");
                if let Err(err) = self.fetch_cart() $( .$await_ext )? {
                    tracing::warn!(error = %err, "cart fetch after login failed");
                }
                Ok(())
            }

            /// Forgets the stored token and empties the local cart.
            ///
            /// # Errors
            ///
            /// Returns an error if the token store fails to write.
            #[tracing::instrument(skip_all)]
            pub fn logout(&self) -> Result<()> {
                self.token_store.clear()?;
                self.cart.clear();
                tracing::info!("logged out");
                Ok(())
            }

            /// Returns `true` if a bearer token is stored.
            ///
            /// # Errors
            ///
            /// Returns an error if the token store fails to read.
            #[inline]
            pub fn is_authenticated(&self) -> Result<bool> {
                Ok(self.token_store.load()?.is_some())
            }

            /// Fetches loyalty membership status and points balance.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Unauthenticated`] without a token, or an
            /// error if the request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn membership_status(&self) -> Result<MembershipStatus> {
                let token = self.token()?;
                self.client
                    .membership_status(&token)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::error!(error = %err, "membership status fetch failed"))
            }

            // ── Cart ────────────────────────────────────────────────────

            /// Replaces the local cart with the server's.
            ///
            /// Without a token the local cart is emptied and the call
            /// succeeds.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails; the local cart keeps
            /// its previous contents.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn fetch_cart(&self) -> Result<()> {
                let Some(token) = self.token_store.load()? else {
                    tracing::debug!("no token, emptying cart");
                    self.cart.clear();
                    return Ok(());
                };
                let ticket = self.cart.ticket();
                let response = self
                    .client
                    .cart(&token)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::error!(error = %err, "cart fetch failed"))?;
                let _applied = self.cart.apply(ticket, response.items);
                Ok(())
            }

            /// Sends `line` to the backend, which merges it into an existing
            /// line with the same product and size.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Unauthenticated`] without a token, or an
            /// error if the request fails; the local cart is unchanged.
            #[tracing::instrument(skip_all, fields(product_id = %line.product_id, size = %line.size))]
            pub $($async_kw)? fn add_to_cart(&self, line: &CartLine) -> Result<()> {
                let token = self.token()?;
                let ticket = self.cart.ticket();
                let response = self
                    .client
                    .add_to_cart(&token, line)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::error!(error = %err, "add to cart failed"))?;
                let _applied = self.cart.apply(ticket, response.items);
                Ok(())
            }

            /// Sets the quantity of the line for `product_id` and `size`.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Unauthenticated`] without a token, or an
            /// error if the request fails; the local cart is unchanged.
            #[tracing::instrument(skip_all, fields(product_id = %product_id, size = %size, quantity = quantity.get()))]
            pub $($async_kw)? fn update_quantity(
                &self,
                product_id: &ProductId,
                size: &str,
                quantity: NonZeroU32,
            ) -> Result<()> {
                let token = self.token()?;
                let update = UpdateQuantityRequest {
                    product_id: product_id.clone(),
                    size: size.to_owned(),
                    quantity,
                };
                let ticket = self.cart.ticket();
                let response = self
                    .client
                    .update_quantity(&token, &update)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::error!(error = %err, "quantity update failed"))?;
                let _applied = self.cart.apply(ticket, response.items);
                Ok(())
            }

            /// Removes the line for `product_id` and `size`.
            ///
            /// Removing a line the backend does not know is a no-op.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Unauthenticated`] without a token, or an
            /// error if the request fails; the local cart is unchanged.
            #[tracing::instrument(skip_all, fields(product_id = %product_id, size = %size))]
            pub $($async_kw)? fn remove_from_cart(&self, product_id: &ProductId, size: &str) -> Result<()> {
                let token = self.token()?;
                let ticket = self.cart.ticket();
                match self
                    .client
                    .remove_from_cart(&token, product_id, size)
                    $( .$await_ext )?
                {
                    Ok(response) => {
                        let _applied = self.cart.apply(ticket, response.items);
                        Ok(())
                    }
                    Err(ShopError::Api { status: 404, .. }) => {
                        tracing::debug!("line not in cart, nothing to remove");
                        Ok(())
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "remove from cart failed");
                        Err(err)
                    }
                }
            }

            /// Empties the local cart without contacting the backend.
            #[inline]
            pub fn clear_cart(&self) {
                self.cart.clear();
            }

            /// Returns a copy of the current cart lines.
            #[inline]
            #[must_use]
            pub fn cart_lines(&self) -> Vec<CartLine> {
                self.cart.lines()
            }

            /// Sum of `price × quantity` over the current cart.
            #[inline]
            #[must_use]
            pub fn cart_total(&self) -> f64 {
                self.cart.total()
            }

            /// Read access to the local cart.
            #[inline]
            #[must_use]
            pub const fn cart(&self) -> &CartState {
                &self.cart
            }

            // ── Vouchers ────────────────────────────────────────────────

            /// Lists vouchers that can be bought with points.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Unauthenticated`] without a token, or an
            /// error if the request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn available_vouchers(&self) -> Result<Vec<Voucher>> {
                let token = self.token()?;
                self.client
                    .vouchers(&token)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::error!(error = %err, "voucher list fetch failed"))
            }

            /// Lists vouchers the user owns, redeemed or not.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Unauthenticated`] without a token, or an
            /// error if the request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn my_vouchers(&self) -> Result<Vec<UserVoucher>> {
                let token = self.token()?;
                self.client
                    .my_vouchers(&token)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::error!(error = %err, "owned voucher fetch failed"))
            }

            /// Buys a voucher with loyalty points, then refetches both
            /// voucher lists.
            ///
            /// A list whose refresh fails is left as `None`; the purchase is
            /// still reported as done.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Api`] carrying the server's message when the
            /// purchase is refused (for example, insufficient points); nothing
            /// is refetched in that case.
            #[tracing::instrument(skip_all, fields(voucher_id = %voucher_id))]
            pub $($async_kw)? fn purchase_voucher(&self, voucher_id: &VoucherId) -> Result<VoucherPurchase> {
                let token = self.token()?;
                let response = self
                    .client
                    .purchase_voucher(&token, voucher_id)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::warn!(error = %err, "voucher purchase refused"))?;
                tracing::info!("voucher purchased");
                let available = self
                    .client
                    .vouchers(&token)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::warn!(error = %err, "voucher list refresh failed"))
                    .ok();
                let owned = self
                    .client
                    .my_vouchers(&token)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::warn!(error = %err, "owned voucher refresh failed"))
                    .ok();
                Ok(VoucherPurchase {
                    message: response.message,
                    available,
                    owned,
                })
            }

            /// Redeems `code` and applies its discount to `checkout`.
            ///
            /// On failure the checkout's discount is reset to zero. Applying
            /// the code already applied to this checkout is rejected locally
            /// and leaves the discount as it is.
            ///
            /// # Errors
            ///
            /// - [`ShopError::VoucherAlreadyApplied`] for a repeated code.
            /// - [`ShopError::CheckoutInProgress`] or
            ///   [`ShopError::OrderAlreadyPlaced`] once the checkout left editing.
            /// - [`ShopError::Unauthenticated`] without a token.
            /// - [`ShopError::Api`] with the server's message for an unknown or
            ///   already redeemed code.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn apply_voucher(&self, checkout: &mut Checkout, code: &str) -> Result<f64> {
                checkout.ensure_editable()?;
                if checkout.voucher().is_some_and(|applied| applied.code == code) {
                    tracing::debug!("voucher already applied to this checkout");
                    return Err(ShopError::VoucherAlreadyApplied(code.to_owned()));
                }

                let redeemed = match self.token() {
                    Ok(token) => self.client.redeem_voucher(&token, code) $( .$await_ext )?,
                    Err(err) => Err(err),
                };
                match redeemed {
                    Ok(response) => {
                        tracing::info!(discount = response.discount_amount, "voucher applied");
                        checkout.apply_discount(code.to_owned(), response.discount_amount);
                        Ok(checkout.discount_amount())
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "voucher redemption failed");
                        checkout.reset_discount();
                        Err(err)
                    }
                }
            }

            // ── Checkout ────────────────────────────────────────────────

            /// Pricing for the current cart with `checkout`'s city and
            /// discount.
            #[inline]
            #[must_use]
            pub fn pricing(&self, checkout: &Checkout) -> PricingSnapshot {
                checkout.pricing(&self.cart.lines(), &self.tiers)
            }

            /// Delivery charge table in use.
            #[inline]
            #[must_use]
            pub const fn delivery_tiers(&self) -> &DeliveryTiers {
                &self.tiers
            }

            /// Submits the order for the current cart.
            ///
            /// On success the full order is fetched for the receipt, the
            /// local cart is emptied and `checkout` ends in
            /// [`Succeeded`](crate::checkout::CheckoutState::Succeeded). On a
            /// backend failure `checkout` ends in
            /// [`Failed`](crate::checkout::CheckoutState::Failed) with every
            /// field kept.
            ///
            /// # Errors
            ///
            /// - [`ShopError::Unauthenticated`] without a token.
            /// - Local validation errors from [`Checkout`] (invalid shipping,
            ///   empty cart, repeated submission); the state is unchanged.
            /// - The backend error that made the submission fail.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn place_order(&self, checkout: &mut Checkout) -> Result<OrderId> {
                let token = self.token()?;
                let request = checkout.begin_submit(&self.cart.lines())?;
                tracing::debug!(payment_method = %request.payment_method, "submitting order");

                let created = match self.client.create_order(&token, &request) $( .$await_ext )? {
                    Ok(created) => created,
                    Err(err) => {
                        tracing::error!(error = %err, "order submission failed");
                        checkout.fail(err.user_message(ORDER_FAILED_MESSAGE));
                        return Err(err);
                    }
                };
                let id = created.order.id;
                tracing::info!(order_id = %id, "order placed");

                let detail = self
                    .client
                    .order(&token, &id)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::warn!(error = %err, "order detail fetch failed"))
                    .ok();
                self.cart.clear();
                checkout.succeed(id.clone(), detail);
                Ok(id)
            }

            /// Fetches a placed order.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Unauthenticated`] without a token, or an
            /// error if the request fails.
            #[tracing::instrument(skip_all, fields(order_id = %id))]
            pub $($async_kw)? fn order(&self, id: &OrderId) -> Result<Order> {
                let token = self.token()?;
                self.client
                    .order(&token, id)
                    $( .$await_ext )?
                    .inspect_err(|err| tracing::error!(error = %err, "order fetch failed"))
            }

            // ── Accessors ───────────────────────────────────────────────

            /// Returns a reference to the underlying HTTP client.
            #[inline]
            #[must_use]
            pub const fn inner_client(&self) -> &$http_client {
                &self.client
            }

            /// Returns a reference to the token store.
            #[inline]
            #[must_use]
            pub const fn token_store(&self) -> &T {
                &self.token_store
            }

            /// Reads the stored token, failing when logged out.
            fn token(&self) -> Result<SecretString> {
                self.token_store.load()?.ok_or(ShopError::Unauthenticated)
            }
        }

    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_shop {
    //! Async high-level client.

    use core::num::NonZeroU32;
    use core::time::Duration;

    use secrecy::SecretString;

    use super::ORDER_FAILED_MESSAGE;
    use crate::cart::CartState;
    use crate::checkout::Checkout;
    use crate::client::StoreClient;
    use crate::error::{Result, ShopError};
    use crate::models::{
        CartLine, MembershipStatus, Order, OrderId, ProductId, UpdateQuantityRequest, UserVoucher,
        Voucher, VoucherId, VoucherPurchase,
    };
    use crate::pricing::{DeliveryTiers, PricingSnapshot};
    use crate::session::TokenStore;

    define_shop! {
        client_name: Shop,
        builder_name: ShopBuilder,
        http_client: StoreClient,
        client_doc: "High-level async storefront client with a local cart.\n\nUse [`Shop::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`Shop`].",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_shop {
    //! Blocking high-level client.

    use core::num::NonZeroU32;
    use core::time::Duration;

    use secrecy::SecretString;

    use super::ORDER_FAILED_MESSAGE;
    use crate::cart::CartState;
    use crate::checkout::Checkout;
    use crate::client::StoreBlockingClient;
    use crate::error::{Result, ShopError};
    use crate::models::{
        CartLine, MembershipStatus, Order, OrderId, ProductId, UpdateQuantityRequest, UserVoucher,
        Voucher, VoucherId, VoucherPurchase,
    };
    use crate::pricing::{DeliveryTiers, PricingSnapshot};
    use crate::session::TokenStore;

    define_shop! {
        client_name: ShopBlocking,
        builder_name: ShopBlockingBuilder,
        http_client: StoreBlockingClient,
        client_doc: "High-level blocking storefront client with a local cart.\n\nUse [`ShopBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`ShopBlocking`].",
    }
}

#[cfg(feature = "async")]
pub use async_shop::{Shop, ShopBuilder};
#[cfg(feature = "blocking")]
pub use blocking_shop::{ShopBlocking, ShopBlockingBuilder};
