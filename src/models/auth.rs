//! Login request and response.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`.
#[derive(Serialize)]
pub struct LoginRequest<'creds> {
    /// Account email.
    pub email: &'creds str,
    /// Account password, sent once and never stored.
    pub password: &'creds str,
}

impl core::fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: SecretString,
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret as _;

    use super::*;

    #[test]
    fn login_request_wire_shape_and_redacted_debug() {
        let request = LoginRequest {
            email: "rahim@example.com",
            password: "hunter2",
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"email": "rahim@example.com", "password": "hunter2"})
        );
        let debug = format!("{request:?}");
        assert!(debug.contains("rahim@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn login_response_keeps_token_secret() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token":"eyJhbGciOi.abc.def","message":"ok"}"#).unwrap();
        assert_eq!(response.token.expose_secret(), "eyJhbGciOi.abc.def");
        assert!(!format!("{response:?}").contains("eyJhbGciOi"));
    }
}
