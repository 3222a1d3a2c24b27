//! Tests for token validation

use super::*;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

const SECRET: &[u8] = b"test-secret";

fn authenticator() -> TokenAuthenticator {
    TokenAuthenticator::new(SECRET)
}

fn claims_expiring_in(seconds: i64) -> Claims {
    Claims {
        devbox_name: "devbox01".to_string(),
        namespace: "default".to_string(),
        exp: (Utc::now() + Duration::seconds(seconds)).timestamp(),
        iss: Some("tests".to_string()),
    }
}

#[test]
fn valid_token_round_trips_claims() {
    let auth = authenticator();
    let token = auth.issue("devbox01", "default", Duration::minutes(5)).unwrap();

    let claims = auth.validate(&token).unwrap();
    assert_eq!(claims.devbox_name, "devbox01");
    assert_eq!(claims.namespace, "default");
    assert!(!claims.is_expired());
}

#[test]
fn token_signed_with_wrong_secret_is_rejected() {
    let other = TokenAuthenticator::new(b"a-different-secret");
    let token = other.issue("devbox01", "default", Duration::minutes(5)).unwrap();

    let result = authenticator().validate(&token);
    assert!(matches!(result, Err(AuthError::BadSignature)));
}

#[test]
fn algorithm_substitution_is_rejected() {
    // well-formed claims, correct secret, but an HS384 header
    let token = encode(
        &Header::new(Algorithm::HS384),
        &claims_expiring_in(300),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    let result = authenticator().validate(&token);
    assert!(matches!(result, Err(AuthError::BadAlgorithm)));
}

#[test]
fn unsigned_none_token_is_rejected() {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload =
        URL_SAFE_NO_PAD.encode(serde_json::to_string(&claims_expiring_in(300)).unwrap());
    let token = format!("{}.{}.", header, payload);

    assert!(authenticator().validate(&token).is_err());
}

#[test]
fn expired_token_is_rejected_even_with_valid_signature() {
    let auth = authenticator();
    // well past any decoding leeway
    let token = encode(
        &Header::default(),
        &claims_expiring_in(-300),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    let result = auth.validate(&token);
    assert!(matches!(result, Err(AuthError::Expired)));
}

#[test]
fn freshly_elapsed_expiry_is_rejected_despite_leeway() {
    // one second past expiry falls inside the decoder's default leeway, so the
    // explicit domain check has to catch it
    let token = encode(
        &Header::default(),
        &claims_expiring_in(-1),
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    let result = authenticator().validate(&token);
    assert!(matches!(result, Err(AuthError::Expired)));
}

#[test]
fn empty_identity_claims_are_rejected() {
    let auth = authenticator();

    for (devbox_name, namespace) in [("", "default"), ("devbox01", ""), ("", "")] {
        // correctly signed and unexpired, but naming no usable resource
        let claims = Claims {
            devbox_name: devbox_name.to_string(),
            namespace: namespace.to_string(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            iss: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = auth.validate(&token);
        assert!(
            matches!(result, Err(AuthError::Malformed)),
            "identity {:?}/{:?} should be rejected",
            devbox_name,
            namespace
        );
    }
}

#[test]
fn garbage_token_is_malformed() {
    let result = authenticator().validate("not-a-token");
    assert!(matches!(result, Err(AuthError::Malformed)));
}

#[test]
fn missing_exp_claim_is_rejected() {
    #[derive(serde::Serialize)]
    struct NoExpiry<'a> {
        devbox_name: &'a str,
        namespace: &'a str,
    }

    let token = encode(
        &Header::default(),
        &NoExpiry {
            devbox_name: "devbox01",
            namespace: "default",
        },
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    assert!(authenticator().validate(&token).is_err());
}
