//! Permission gate for the API
//!
//! Requests carry an `Authorization: Bearer <token>` header. The token is
//! decoded and verified by [`JwtVerifier`] (signature, expiry, optional
//! issuer/audience), producing a [`Claims`] set. Handlers then assert the
//! specific permission string their endpoint requires:
//!
//! - absent/malformed/expired credential → 401
//! - valid credential without the required permission → 403
//! - otherwise the decoded claims are available to the handler
//!
//! Roles ("assistant", "agent", "executive") are not modeled here: the
//! identity provider issues each role a fixed permission list out-of-band,
//! and this gate only checks set membership.

use crate::config::JwtConfig;
use crate::core::error::ApiError;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Verified claim set extracted from a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token was issued to
    pub sub: String,

    /// Permission strings granted to the caller, e.g. `post:players`
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Expiry as seconds since the Unix epoch
    pub exp: u64,
}

impl Claims {
    /// Check whether the claim set contains a permission
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Decodes and verifies bearer tokens against the configured parameters
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(config.algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Decode a token, verifying signature, expiry and configured claims
    pub fn decode(&self, token: &str) -> Result<Claims, ApiError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                let message = match err.kind() {
                    ErrorKind::ExpiredSignature => "token is expired".to_string(),
                    ErrorKind::InvalidIssuer => "token has an invalid issuer".to_string(),
                    ErrorKind::InvalidAudience => "token has an invalid audience".to_string(),
                    _ => "unable to verify token".to_string(),
                };
                ApiError::Unauthorized { message }
            })
    }
}

/// Extractor gating a handler behind a verified credential
///
/// Extraction alone enforces authentication (401). The handler enforces
/// authorization by calling [`Authenticated::require`] with its permission
/// string (403 on failure).
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl Authenticated {
    /// Assert that the caller holds a permission
    pub fn require(&self, permission: &str) -> Result<(), ApiError> {
        if self.0.can(permission) {
            Ok(())
        } else {
            Err(ApiError::Forbidden {
                permission: permission.to_string(),
            })
        }
    }

    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    Arc<JwtVerifier>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<JwtVerifier>::from_ref(state);

        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized {
                message: "authorization header is expected".to_string(),
            })?;

        let value = header.to_str().map_err(|_| ApiError::Unauthorized {
            message: "authorization header is not valid UTF-8".to_string(),
        })?;

        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized {
                message: "authorization header must start with 'Bearer '".to_string(),
            })?;

        let claims = verifier.decode(token)?;
        Ok(Authenticated(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-secret";

    fn config() -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            algorithm: Algorithm::HS256,
            issuer: None,
            audience: None,
        }
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_secs()
    }

    fn token(permissions: &[&str], exp: u64) -> String {
        let claims = Claims {
            sub: "tester".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode should succeed")
    }

    // === Claims ===

    #[test]
    fn test_can_with_held_permission() {
        let claims = Claims {
            sub: "tester".to_string(),
            permissions: vec!["get:agents".to_string(), "post:players".to_string()],
            exp: now() + 3600,
        };
        assert!(claims.can("post:players"));
        assert!(!claims.can("delete:agents"));
    }

    // === JwtVerifier ===

    #[test]
    fn test_decode_valid_token() {
        let verifier = JwtVerifier::new(&config());
        let claims = verifier
            .decode(&token(&["delete:teams"], now() + 3600))
            .expect("decode should succeed");
        assert_eq!(claims.sub, "tester");
        assert!(claims.can("delete:teams"));
    }

    #[test]
    fn test_decode_expired_token() {
        let verifier = JwtVerifier::new(&config());
        let err = verifier
            .decode(&token(&[], now() - 3600))
            .expect_err("expired token should fail");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_decode_garbage_token() {
        let verifier = JwtVerifier::new(&config());
        let err = verifier
            .decode("not-a-jwt")
            .expect_err("garbage should fail");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_decode_wrong_secret() {
        let verifier = JwtVerifier::new(&JwtConfig {
            secret: "a-different-secret".to_string(),
            ..config()
        });
        let err = verifier
            .decode(&token(&[], now() + 3600))
            .expect_err("wrong secret should fail");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_decode_rejects_wrong_issuer() {
        let verifier = JwtVerifier::new(&JwtConfig {
            issuer: Some("https://issuer.example".to_string()),
            ..config()
        });
        // Token minted without an iss claim must be rejected
        let err = verifier
            .decode(&token(&[], now() + 3600))
            .expect_err("missing issuer should fail");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    // === Authenticated ===

    #[test]
    fn test_require_held_permission() {
        let auth = Authenticated(Claims {
            sub: "tester".to_string(),
            permissions: vec!["delete:agents".to_string()],
            exp: now() + 3600,
        });
        assert!(auth.require("delete:agents").is_ok());
    }

    #[test]
    fn test_require_missing_permission_is_403() {
        let auth = Authenticated(Claims {
            sub: "tester".to_string(),
            permissions: vec!["get:agents".to_string()],
            exp: now() + 3600,
        });
        let err = auth
            .require("delete:agents")
            .expect_err("missing permission should fail");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert!(err.to_string().contains("delete:agents"));
    }
}
