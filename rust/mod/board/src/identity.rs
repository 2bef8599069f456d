//! Bearer token resolution.
//!
//! The board never issues sessions for real users; sign-up and sign-in
//! belong to the identity provider. All the board needs is
//! `get_user(token)`: turn an access token into a user id.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::service::BoardError;

/// A caller whose bearer token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// User id (the token subject).
    pub id: String,
    /// Email claim, when the token carries one.
    pub email: Option<String>,
}

/// Resolves bearer tokens to identities.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Verify `token` and return who it belongs to.
    fn get_user(&self, token: &str) -> Result<Identity, BoardError>;
}

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// HS256 access tokens signed with a shared project secret.
pub struct JwtIdentity {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    audience: Option<String>,
}

impl JwtIdentity {
    /// Build a verifier. With `audience`, tokens must carry a matching `aud`.
    pub fn new(secret: &str, audience: Option<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        match &audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            audience,
        }
    }

    /// Mint an access token for `user_id`, valid for `ttl_secs`.
    ///
    /// Used by the development CLI and by tests.
    pub fn issue(&self, user_id: &str, email: Option<&str>, ttl_secs: i64) -> Result<String, BoardError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            aud: self.audience.clone(),
            iat: now,
            exp: now + ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| BoardError::Internal(format!("JWT encode failed: {}", e)))
    }
}

impl IdentityProvider for JwtIdentity {
    fn get_user(&self, token: &str) -> Result<Identity, BoardError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| BoardError::Unauthorized(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(BoardError::Unauthorized("token has no subject".into()));
        }

        Ok(Identity {
            id: data.claims.sub,
            email: data.claims.email,
        })
    }
}
