/// Failures of the password hasher.
///
/// `InvalidRecordFormat` means the stored string could not be decoded;
/// a decodable record that simply does not match is `Ok(false)`, not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("secure randomness unavailable")]
    RandomnessUnavailable,
    #[error("invalid password hash record: {reason}")]
    InvalidRecordFormat { reason: &'static str },
    #[error("invalid hashing parameters: {reason}")]
    InvalidParams { reason: String },
}

/// Failures of the token service.
///
/// The variants exist for diagnostics. Callers at the HTTP boundary
/// answer all of them with the same 401.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::BadSignature,
            _ => Self::Malformed,
        }
    }
}

/// Failures of a credential store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Duplicate,
    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[cfg(feature = "database")]
impl From<tokio_postgres::Error> for StoreError {
    fn from(e: tokio_postgres::Error) -> Self {
        match e.code() {
            Some(code) if *code == tokio_postgres::error::SqlState::UNIQUE_VIOLATION => {
                Self::Duplicate
            }
            _ => Self::Backend(e.to_string()),
        }
    }
}

/// Failures of the account use case (registration and login).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("hashing worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
