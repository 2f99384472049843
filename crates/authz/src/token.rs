//! Signed, expiring claims bundles.

use bookshelf_kernel::settings::AuthSettings;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Role granted on successful login and required by the access guard.
pub const ADMIN_ROLE: &str = "admin";

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub role: String,
    /// Expiration as a unix timestamp in seconds.
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    pub fn new(email: impl Into<String>, role: impl Into<String>, expires_at: i64) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
            expires_at,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// A token is valid only while `expires_at` is strictly in the future.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// HS256 codec bound to one shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> anyhow::Result<Self> {
        if settings.jwt_secret.is_empty() {
            anyhow::bail!("auth.jwt_secret must not be empty");
        }
        if settings.token_ttl_hours <= 0 {
            anyhow::bail!(
                "auth.token_ttl_hours must be positive, got {}",
                settings.token_ttl_hours
            );
        }

        let ttl = Duration::try_hours(settings.token_ttl_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "auth.token_ttl_hours is out of range, got {}",
                    settings.token_ttl_hours
                )
            })?;

        Ok(Self::new(settings.jwt_secret.as_bytes(), ttl))
    }

    /// Claims expiring one ttl from now. Every call starts a fresh horizon.
    pub fn claims_for(&self, email: impl Into<String>, role: impl Into<String>) -> Claims {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .timestamp();
        Claims::new(email, role, expires_at)
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// Expiry is checked before the signature, so an expired token reports
    /// [`AuthError::Expired`] whether or not its signature is intact.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.split('.').count() != 3 {
            return Err(AuthError::Malformed);
        }

        let claims = Self::peek(token)?;
        if claims.is_expired_at(Utc::now().timestamp()) {
            return Err(AuthError::Expired);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                _ => AuthError::Malformed,
            })
    }

    /// Decode the payload without checking the signature.
    fn peek(token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::Malformed)
    }
}
