//! Request and response bodies for the commerce API.
//!
//! Catalog and cart records live in `cartlane_core`; these are the envelopes
//! around them.

use cartlane_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUpsertRequest {
    /// Product to add or update.
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    /// New quantity; zero removes the product.
    pub qty: u32,
}

/// Body of `POST /auth/login` and `POST /auth/register`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful `POST /auth/login` response.
///
/// ```json
/// {
///     "success": true,
///     "token": "testtoken",
///     "username": "criodo",
///     "balance": 5000
/// }
/// ```
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub token: String,
    pub username: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("success", &self.success)
            .field("token", &"[REDACTED]")
            .field("username", &self.username)
            .field("balance", &self.balance)
            .finish()
    }
}

/// Successful `POST /auth/register` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: bool,
}

/// Error body returned with 4xx/5xx responses.
///
/// ```json
/// { "success": false, "message": "Password is incorrect" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_request_wire_format() {
        let body = CartUpsertRequest {
            product_id: ProductId::new("p1"),
            qty: 3,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"productId":"p1","qty":3}"#
        );
    }

    #[test]
    fn test_login_response_parses_numeric_balance() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"success":true,"token":"testtoken","username":"criodo","balance":5000}"#,
        )
        .unwrap();
        assert_eq!(response.username, "criodo");
        assert_eq!(response.balance, Decimal::from(5000));

        let debug_output = format!("{response:?}");
        assert!(!debug_output.contains("testtoken"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            username: "criodo".to_string(),
            password: "hunter22".to_string(),
        };
        let debug_output = format!("{credentials:?}");
        assert!(debug_output.contains("criodo"));
        assert!(!debug_output.contains("hunter22"));
    }

    #[test]
    fn test_error_body_parses() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"success":false,"message":"Out of stock"}"#).unwrap();
        assert!(!body.success);
        assert_eq!(body.message, "Out of stock");
    }
}
