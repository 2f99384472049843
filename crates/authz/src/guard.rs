use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::{AuthError, Claims, TokenCodec};

/// Gate in front of every protected route.
#[derive(Clone)]
pub struct AccessGuard {
    codec: Arc<TokenCodec>,
}

impl AccessGuard {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Verify `token` and admit it only for the admin role.
    ///
    /// Tokens that verify are logged as an access record before the role
    /// check, so rejected non-admin requests still leave a trace.
    pub fn authorize(&self, token: &str, method: &str, url: &str) -> Result<Claims, AuthError> {
        let claims = self.codec.verify(token)?;

        tracing::info!(
            target: "bookshelf::access",
            url,
            method,
            timestamp = %Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "access"
        );

        if !claims.is_admin() {
            tracing::warn!(email = %claims.email, role = %claims.role, "access denied");
            return Err(AuthError::Forbidden);
        }

        Ok(claims)
    }
}
