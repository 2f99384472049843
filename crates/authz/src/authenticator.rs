use std::sync::Arc;

use bookshelf_kernel::settings::AuthSettings;
use serde::Deserialize;

use crate::{AuthError, TokenCodec, ADMIN_ROLE};

/// Email/password pair submitted to `POST /login`. Missing fields are empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

/// The one identity allowed to log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub password: String,
}

impl Identity {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self {
            email: settings.identity_email.clone(),
            password: settings.identity_password.clone(),
        }
    }

    fn matches(&self, credential: &Credential) -> bool {
        self.email == credential.email && self.password == credential.password
    }
}

/// Exchanges a matching credential for a signed admin token.
#[derive(Clone)]
pub struct Authenticator {
    identity: Identity,
    codec: Arc<TokenCodec>,
}

impl Authenticator {
    pub fn new(identity: Identity, codec: Arc<TokenCodec>) -> Self {
        Self { identity, codec }
    }

    pub fn login(&self, credential: &Credential) -> Result<String, AuthError> {
        if !self.identity.matches(credential) {
            tracing::warn!(email = %credential.email, "login rejected");
            return Err(AuthError::InvalidCredential);
        }

        let claims = self.codec.claims_for(&credential.email, ADMIN_ROLE);
        let token = self.codec.issue(&claims)?;

        tracing::info!(
            email = %claims.email,
            expires_at = claims.expires_at,
            "login succeeded"
        );
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn authenticator() -> (Authenticator, Arc<TokenCodec>) {
        let codec = Arc::new(TokenCodec::new(b"test-secret", Duration::hours(72)));
        let identity = Identity::from_settings(&AuthSettings::default());
        (Authenticator::new(identity, codec.clone()), codec)
    }

    fn credential(email: &str, password: &str) -> Credential {
        Credential {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_issues_admin_token() {
        let (authenticator, codec) = authenticator();

        let token = authenticator
            .login(&credential("user@example.com", "password123"))
            .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, ADMIN_ROLE);
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let (authenticator, _) = authenticator();
        let result = authenticator.login(&credential("user@example.com", "password1234"));
        assert_eq!(result, Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_login_rejects_unknown_email() {
        let (authenticator, _) = authenticator();
        let result = authenticator.login(&credential("other@example.com", "password123"));
        assert_eq!(result, Err(AuthError::InvalidCredential));
    }

    #[test]
    fn test_partial_credential_is_rejected() {
        let (authenticator, _) = authenticator();
        let partial: Credential =
            serde_json::from_str(r#"{"email":"user@example.com"}"#).unwrap();
        assert_eq!(partial.password, "");
        assert_eq!(
            authenticator.login(&partial),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn test_login_is_case_sensitive() {
        let (authenticator, _) = authenticator();
        let result = authenticator.login(&credential("User@example.com", "password123"));
        assert_eq!(result, Err(AuthError::InvalidCredential));
    }
}
