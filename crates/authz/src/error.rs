/// Failures of the login and token verification chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredential,
    #[error("missing or malformed token")]
    Malformed,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("insufficient role for this resource")]
    Forbidden,
    #[error("failed to sign token: {0}")]
    Encoding(String),
}
