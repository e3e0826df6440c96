//! Error types for the Sunshine storefront client.

/// Fallback text used when a failed response carries no usable message.
const UNKNOWN_ERROR: &str = "unknown error";

/// All errors that can occur when using the storefront client.
#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    /// HTTP transport failed (connection, TLS, body read).
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message (the `message` field when present).
        message: String,
        /// `true` when `message` came from the body's `message` field.
        reported: bool,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token storage backend failed.
    #[error("token storage error: {0}")]
    TokenStorage(Box<dyn core::error::Error + Send + Sync>),

    /// Local file I/O failed (e.g. writing a payslip).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No bearer token is available; the user must log in first.
    #[error("not logged in: no access token is available")]
    Unauthenticated,

    /// The configured API base URL is not usable.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// Shipping information failed validation.
    #[error("invalid shipping information: {0}")]
    InvalidShipping(#[from] validator::ValidationErrors),

    /// An order cannot be placed for an empty cart.
    #[error("the cart is empty")]
    EmptyCart,

    /// An order submission is already in flight for this checkout.
    #[error("an order submission is already in progress")]
    CheckoutInProgress,

    /// This checkout already produced an order.
    #[error("this checkout has already been placed as order {0}")]
    OrderAlreadyPlaced(String),

    /// The voucher code is already applied to this checkout.
    #[error("voucher code {0} is already applied")]
    VoucherAlreadyApplied(String),

    /// Payslip rendering failed.
    #[error("receipt rendering error: {0}")]
    Receipt(String),
}

impl ShopError {
    /// Builds an [`ShopError::Api`] from a status code and raw response body.
    ///
    /// The backend reports failures as `{"message": "..."}`; that message is
    /// kept verbatim. Any other body is used as-is, and an empty body falls
    /// back to a generic text.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        /// Error envelope returned by the backend.
        #[derive(serde::Deserialize)]
        struct Envelope {
            /// Human-readable failure reason.
            message: Option<String>,
        }

        let reported = serde_json::from_str::<Envelope>(body)
            .ok()
            .and_then(|envelope| envelope.message)
            .filter(|message| !message.trim().is_empty());
        match reported {
            Some(message) => Self::Api {
                status,
                message,
                reported: true,
            },
            None => {
                let trimmed = body.trim();
                let message = if trimmed.is_empty() {
                    UNKNOWN_ERROR.to_owned()
                } else {
                    trimmed.to_owned()
                };
                Self::Api {
                    status,
                    message,
                    reported: false,
                }
            }
        }
    }

    /// Returns `true` if the error means the user has to log in again.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        match *self {
            Self::Unauthenticated => true,
            Self::Api { status, .. } => status == 401 || status == 403,
            _ => false,
        }
    }

    /// Returns `true` for validation failures whose message is meant for
    /// the user (insufficient points, used voucher, bad input).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        match *self {
            Self::Api { status, .. } => matches!(status, 400 | 404 | 409 | 422),
            Self::InvalidShipping(_)
            | Self::EmptyCart
            | Self::CheckoutInProgress
            | Self::OrderAlreadyPlaced(_)
            | Self::VoucherAlreadyApplied(_) => true,
            _ => false,
        }
    }

    /// Returns the text to show the user.
    ///
    /// A message the backend reported in its `message` field is surfaced
    /// verbatim whatever the status. Local validation failures show their
    /// own text. Everything else (transport errors, raw or empty bodies,
    /// unparsable responses) is replaced by `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match *self {
            Self::Api {
                ref message,
                reported: true,
                ..
            } => message.clone(),
            Self::Api { .. } => fallback.to_owned(),
            Self::Unauthenticated => "Please log in to continue.".to_owned(),
            _ if self.is_validation() => self.to_string(),
            _ => fallback.to_owned(),
        }
    }
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = core::result::Result<T, ShopError>;
