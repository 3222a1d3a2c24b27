//! HS256 token validation binding an operation to a devbox identity.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

/// JWT signing and verification keys
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Claims carried by a devbox operation token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Name of the target devbox
    pub devbox_name: String,
    /// Namespace the devbox lives in
    pub namespace: String,
    /// Expiration time (unix timestamp)
    pub exp: i64,
    /// Issuer (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Token validation errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("unsupported signing algorithm")]
    BadAlgorithm,
    #[error("signature verification failed")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("token creation failed")]
    TokenCreation,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            AuthError::BadAlgorithm => (
                StatusCode::UNAUTHORIZED,
                "bad_algorithm",
                "Token signed with an unsupported algorithm",
            ),
            AuthError::BadSignature => (
                StatusCode::UNAUTHORIZED,
                "bad_signature",
                "Token signature verification failed",
            ),
            AuthError::Expired => (StatusCode::UNAUTHORIZED, "token_expired", "Token has expired"),
            AuthError::Malformed => (
                StatusCode::UNAUTHORIZED,
                "malformed_token",
                "Invalid or malformed token",
            ),
            AuthError::TokenCreation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_creation_failed",
                "Failed to create token",
            ),
        };

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Validates operation tokens against a shared HS256 secret.
///
/// The secret is injected at construction; there is no process-global key
/// state, so tests and rotation can substitute their own.
pub struct TokenAuthenticator {
    keys: Keys,
    validation: Validation,
}

impl TokenAuthenticator {
    pub fn new(secret: &[u8]) -> Self {
        // HS256 only; a header naming any other algorithm is rejected before
        // the signature is even considered.
        let validation = Validation::new(Algorithm::HS256);
        Self {
            keys: Keys::new(secret),
            validation,
        }
    }

    /// Verify a compact token and hand back its claims.
    ///
    /// Pure verification, no I/O. A claim set is only returned once the
    /// algorithm, signature, and expiry have all checked out.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    AuthError::BadAlgorithm
                }
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            },
        )?;

        let claims = data.claims;

        // decode applies leeway to exp; the domain does not
        if claims.is_expired() {
            return Err(AuthError::Expired);
        }

        // a claim without a resource identity authorizes nothing
        if claims.devbox_name.is_empty() || claims.namespace.is_empty() {
            return Err(AuthError::Malformed);
        }

        Ok(claims)
    }

    /// Mint a token for the given devbox.
    ///
    /// Used by tests and the dev-mode token endpoint; production issuance is
    /// a separate actor.
    pub fn issue(
        &self,
        devbox_name: &str,
        namespace: &str,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            devbox_name: devbox_name.to_string(),
            namespace: namespace.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            iss: Some("devbox-gate".to_string()),
        };

        encode(&Header::default(), &claims, &self.keys.encoding).map_err(|e| {
            warn!("Failed to encode token: {}", e);
            AuthError::TokenCreation
        })
    }
}
