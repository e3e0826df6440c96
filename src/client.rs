//! HTTP client for the Sunshine storefront API.
//!
//! Provides both async and blocking client variants behind feature flags.
//! The clients are stateless apart from connection pooling: every
//! authenticated call takes the bearer token explicitly.

/// Base URL of a locally running storefront backend.
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Path segments of `/api/auth/login`.
const LOGIN_PATH: &[&str] = &["api", "auth", "login"];

/// Path segments of `/api/cart`.
const CART_PATH: &[&str] = &["api", "cart"];

/// Path segments of `/api/cart/quantity`.
const CART_QUANTITY_PATH: &[&str] = &["api", "cart", "quantity"];

/// Path segments of `/api/vouchers`.
const VOUCHERS_PATH: &[&str] = &["api", "vouchers"];

/// Path segments of `/api/vouchers/my-vouchers`.
const MY_VOUCHERS_PATH: &[&str] = &["api", "vouchers", "my-vouchers"];

/// Path segments of `/api/vouchers/purchase`.
const PURCHASE_VOUCHER_PATH: &[&str] = &["api", "vouchers", "purchase"];

/// Path segments of `/api/vouchers/redeem`.
const REDEEM_VOUCHER_PATH: &[&str] = &["api", "vouchers", "redeem"];

/// Path segments of `/api/orders`.
const ORDERS_PATH: &[&str] = &["api", "orders"];

/// Path segments of `/api/membership/status`.
const MEMBERSHIP_STATUS_PATH: &[&str] = &["api", "membership", "status"];

/// Parses and checks a base URL.
fn parse_base_url(raw: &str) -> crate::error::Result<url::Url> {
    let url = url::Url::parse(raw)
        .map_err(|err| crate::error::ShopError::InvalidBaseUrl(format!("{raw}: {err}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(crate::error::ShopError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(url)
}

/// Appends percent-encoded `segments` to the path of `base`.
fn join_segments(base: &url::Url, segments: &[&str]) -> crate::error::Result<url::Url> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| crate::error::ShopError::InvalidBaseUrl(base.to_string()))?;
        _ = path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// Generates a storefront client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        request_type: $req_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URL override.
            base_url: Option<String>,
            /// Per-request timeout; none by default.
            timeout: Option<Duration>,
        }

        impl $builder {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
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

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::InvalidBaseUrl`] if the base URL does not
            /// parse or is not an `http(s)` URL.
            /// Returns [`ShopError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let raw = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
                let base_url = parse_base_url(&raw)?;
                tracing::debug!(base_url = %base_url, "building client");
                let mut http = <$http_type>::builder();
                if let Some(timeout) = self.timeout {
                    http = http.timeout(timeout);
                }

                Ok($client {
                    http: http.build()?,
                    base_url,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug, Clone)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// API base URL.
            base_url: Url,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    base_url: None,
                    timeout: None,
                }
            }

            /// Returns the API base URL.
            #[inline]
            #[must_use]
            pub const fn base_url(&self) -> &Url {
                &self.base_url
            }

            /// Exchanges credentials for a bearer token via
            /// `POST /api/auth/login`.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Api`] with the server's message for bad
            /// credentials, or a transport/deserialization error.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
                let url = join_segments(&self.base_url, LOGIN_PATH)?;
                tracing::trace!(url = %url, "sending POST request");
                let request = self
                    .http
                    .post(url)
                    .json(&LoginRequest { email, password });
                self.send(request) $( .$await_ext )?
            }

            /// Fetches the user's cart via `GET /api/cart`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn cart(&self, token: &SecretString) -> Result<CartResponse> {
                let request = self.authorized(Method::GET, CART_PATH, token)?;
                self.send(request) $( .$await_ext )?
            }

            /// Adds a line via `POST /api/cart`. The backend merges it into an
            /// existing line with the same product and size.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(product_id = %line.product_id, size = %line.size))]
            pub $($async_kw)? fn add_to_cart(
                &self,
                token: &SecretString,
                line: &CartLine,
            ) -> Result<CartResponse> {
                let request = self.authorized(Method::POST, CART_PATH, token)?.json(line);
                self.send(request) $( .$await_ext )?
            }

            /// Sets a line's quantity via `PUT /api/cart/quantity`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(product_id = %update.product_id, size = %update.size))]
            pub $($async_kw)? fn update_quantity(
                &self,
                token: &SecretString,
                update: &UpdateQuantityRequest,
            ) -> Result<CartResponse> {
                let request = self
                    .authorized(Method::PUT, CART_QUANTITY_PATH, token)?
                    .json(update);
                self.send(request) $( .$await_ext )?
            }

            /// Removes a line via `DELETE /api/cart/{productId}/{size}`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(product_id = %product_id, size = %size))]
            pub $($async_kw)? fn remove_from_cart(
                &self,
                token: &SecretString,
                product_id: &ProductId,
                size: &str,
            ) -> Result<CartResponse> {
                let segments = ["api", "cart", product_id.as_inner(), size];
                let request = self.authorized(Method::DELETE, &segments, token)?;
                self.send(request) $( .$await_ext )?
            }

            /// Lists vouchers on offer via `GET /api/vouchers`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn vouchers(&self, token: &SecretString) -> Result<Vec<Voucher>> {
                let request = self.authorized(Method::GET, VOUCHERS_PATH, token)?;
                let response: VoucherListResponse = self.send(request) $( .$await_ext )? ?;
                Ok(response.vouchers)
            }

            /// Lists the user's own vouchers via `GET /api/vouchers/my-vouchers`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn my_vouchers(&self, token: &SecretString) -> Result<Vec<UserVoucher>> {
                let request = self.authorized(Method::GET, MY_VOUCHERS_PATH, token)?;
                let response: MyVoucherListResponse = self.send(request) $( .$await_ext )? ?;
                Ok(response.my_vouchers)
            }

            /// Buys a voucher with loyalty points via
            /// `POST /api/vouchers/purchase`.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Api`] carrying the server's message when the
            /// purchase is refused (for example, insufficient points).
            #[inline]
            #[tracing::instrument(skip_all, fields(voucher_id = %voucher_id))]
            pub $($async_kw)? fn purchase_voucher(
                &self,
                token: &SecretString,
                voucher_id: &VoucherId,
            ) -> Result<MessageResponse> {
                let body = PurchaseVoucherRequest {
                    voucher_id: voucher_id.clone(),
                };
                let request = self
                    .authorized(Method::POST, PURCHASE_VOUCHER_PATH, token)?
                    .json(&body);
                self.send(request) $( .$await_ext )?
            }

            /// Redeems a voucher code via `POST /api/vouchers/redeem`.
            ///
            /// # Errors
            ///
            /// Returns [`ShopError::Api`] carrying the server's message when the
            /// code is unknown or already redeemed.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn redeem_voucher(
                &self,
                token: &SecretString,
                code: &str,
            ) -> Result<RedeemVoucherResponse> {
                let body = RedeemVoucherRequest {
                    code: code.to_owned(),
                };
                let request = self
                    .authorized(Method::POST, REDEEM_VOUCHER_PATH, token)?
                    .json(&body);
                self.send(request) $( .$await_ext )?
            }

            /// Creates an order from the stored cart via `POST /api/orders`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_order(
                &self,
                token: &SecretString,
                order: &CreateOrderRequest,
            ) -> Result<CreateOrderResponse> {
                let request = self.authorized(Method::POST, ORDERS_PATH, token)?.json(order);
                self.send(request) $( .$await_ext )?
            }

            /// Fetches an order via `GET /api/orders/{id}`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(order_id = %id))]
            pub $($async_kw)? fn order(&self, token: &SecretString, id: &OrderId) -> Result<Order> {
                let segments = ["api", "orders", id.as_inner()];
                let request = self.authorized(Method::GET, &segments, token)?;
                let response: OrderResponse = self.send(request) $( .$await_ext )? ?;
                Ok(response.order)
            }

            /// Fetches loyalty membership status via
            /// `GET /api/membership/status`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn membership_status(
                &self,
                token: &SecretString,
            ) -> Result<MembershipStatus> {
                let request = self.authorized(Method::GET, MEMBERSHIP_STATUS_PATH, token)?;
                self.send(request) $( .$await_ext )?
            }

            /// Starts a request to `segments` carrying the bearer token.
            fn authorized(
                &self,
                method: Method,
                segments: &[&str],
                token: &SecretString,
            ) -> Result<$req_type> {
                let url = join_segments(&self.base_url, segments)?;
                tracing::trace!(method = %method, url = %url, "sending request");
                Ok(self
                    .http
                    .request(method, url)
                    .bearer_auth(token.expose_secret()))
            }

            /// Sends a request and deserializes a success body, or maps the
            /// failure body to [`ShopError::Api`].
            $($async_kw)? fn send<Resp: serde::de::DeserializeOwned>(
                &self,
                request: $req_type,
            ) -> Result<Resp> {
                let response: $resp_type = request.send() $( .$await_ext )? ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    let body = response.text() $( .$await_ext )? ?;
                    tracing::trace!(body_len = body.len(), "parsing response body");
                    serde_json::from_str(&body).map_err(ShopError::from)
                } else {
                    let body = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_default();
                    let err = ShopError::from_response(status.as_u16(), &body);
                    tracing::debug!(status = status.as_u16(), error = %err, "API error");
                    Err(err)
                }
            }
        }

        #[cfg(test)]
        mod tests {
            use super::*;

            #[test]
            fn builder_defaults_to_local_backend() {
                let client = $client::builder().build().unwrap();
                assert_eq!(client.base_url().as_str(), "http://localhost:5000/");
            }

            #[test]
            fn builder_custom_base_url() {
                let client = $client::builder()
                    .base_url("http://127.0.0.1:8080")
                    .timeout(Duration::from_secs(3))
                    .build()
                    .unwrap();
                assert_eq!(client.base_url().port(), Some(8080));
            }

            #[test]
            fn builder_rejects_unusable_base_url() {
                for raw in ["not a url", "mailto:shop@example.com", "ftp://example.com"] {
                    let err = $client::builder().base_url(raw).build().unwrap_err();
                    assert!(matches!(err, ShopError::InvalidBaseUrl(_)), "{raw}");
                }
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the storefront API.

    use core::time::Duration;

    use reqwest::Method;
    use secrecy::{ExposeSecret as _, SecretString};
    use url::Url;

    use super::{
        CART_PATH, CART_QUANTITY_PATH, DEFAULT_BASE_URL, LOGIN_PATH, MEMBERSHIP_STATUS_PATH,
        MY_VOUCHERS_PATH, ORDERS_PATH, PURCHASE_VOUCHER_PATH, REDEEM_VOUCHER_PATH, VOUCHERS_PATH,
        join_segments, parse_base_url,
    };
    use crate::error::{Result, ShopError};
    use crate::models::{
        CartLine, CartResponse, CreateOrderRequest, CreateOrderResponse, LoginRequest,
        LoginResponse, MembershipStatus, MessageResponse, MyVoucherListResponse, Order, OrderId,
        OrderResponse, ProductId, PurchaseVoucherRequest, RedeemVoucherRequest,
        RedeemVoucherResponse, UpdateQuantityRequest, UserVoucher, Voucher, VoucherId,
        VoucherListResponse,
    };

    define_client! {
        client_name: StoreClient,
        builder_name: StoreClientBuilder,
        http_type: reqwest::Client,
        request_type: reqwest::RequestBuilder,
        response_type: reqwest::Response,
        client_doc: "Async client for the storefront API.\n\nUse [`StoreClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`StoreClient`].",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the storefront API.

    use core::time::Duration;

    use reqwest::Method;
    use secrecy::{ExposeSecret as _, SecretString};
    use url::Url;

    use super::{
        CART_PATH, CART_QUANTITY_PATH, DEFAULT_BASE_URL, LOGIN_PATH, MEMBERSHIP_STATUS_PATH,
        MY_VOUCHERS_PATH, ORDERS_PATH, PURCHASE_VOUCHER_PATH, REDEEM_VOUCHER_PATH, VOUCHERS_PATH,
        join_segments, parse_base_url,
    };
    use crate::error::{Result, ShopError};
    use crate::models::{
        CartLine, CartResponse, CreateOrderRequest, CreateOrderResponse, LoginRequest,
        LoginResponse, MembershipStatus, MessageResponse, MyVoucherListResponse, Order, OrderId,
        OrderResponse, ProductId, PurchaseVoucherRequest, RedeemVoucherRequest,
        RedeemVoucherResponse, UpdateQuantityRequest, UserVoucher, Voucher, VoucherId,
        VoucherListResponse,
    };

    define_client! {
        client_name: StoreBlockingClient,
        builder_name: StoreBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        request_type: reqwest::blocking::RequestBuilder,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the storefront API.\n\nUse [`StoreBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`StoreBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{StoreClient, StoreClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{StoreBlockingClient, StoreBlockingClientBuilder};

#[cfg(all(test, feature = "async"))]
mod wire_tests {
    use secrecy::SecretString;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::ShopError;
    use crate::models::{OrderId, ProductId, VoucherId};

    fn token() -> SecretString {
        SecretString::from("test-token".to_owned())
    }

    async fn client(server: &MockServer) -> StoreClient {
        StoreClient::builder().base_url(server.uri()).build().unwrap()
    }

    #[test]
    fn segments_join_onto_base_path() {
        let base = parse_base_url("http://example.com/shop/").unwrap();
        let url = join_segments(&base, &["api", "cart", "p 1", "XL"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/shop/api/cart/p%201/XL");

        let root = parse_base_url(DEFAULT_BASE_URL).unwrap();
        let url = join_segments(&root, MY_VOUCHERS_PATH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/vouchers/my-vouchers");
    }

    #[tokio::test]
    async fn cart_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"productId": "p1", "name": "Shirt", "price": 50, "size": "M", "quantity": 1}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cart = client(&server).await.cart(&token()).await.unwrap();
        assert_eq!(cart.items.len(), 1);
    }

    #[tokio::test]
    async fn login_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({"email": "a@b.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "jwt"})))
            .mount(&server)
            .await;

        let response = client(&server).await.login("a@b.com", "pw").await.unwrap();
        assert_eq!(secrecy::ExposeSecret::expose_secret(&response.token), "jwt");
    }

    #[tokio::test]
    async fn remove_encodes_product_and_size() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/cart/p1/XL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let cart = client(&server)
            .await
            .remove_from_cart(&token(), &ProductId::from("p1"), "XL")
            .await
            .unwrap();
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn rejected_purchase_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/vouchers/purchase"))
            .and(body_json(serde_json::json!({"voucherId": "v1"})))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"message": "Insufficient points"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .purchase_voucher(&token(), &VoucherId::from("v1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShopError::Api { status: 400, ref message, .. } if message == "Insufficient points"
        ));
    }

    #[tokio::test]
    async fn order_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/o-7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "order": {"_id": "o-7", "totalAmount": 250, "shippingPrice": 100}
            })))
            .mount(&server)
            .await;

        let order = client(&server)
            .await
            .order(&token(), &OrderId::from("o-7"))
            .await
            .unwrap();
        assert_eq!(order.id.as_inner(), "o-7");
        assert!((order.shipping_price - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn malformed_success_body_is_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/membership/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .membership_status(&token())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Serialization(_)));
    }
}
