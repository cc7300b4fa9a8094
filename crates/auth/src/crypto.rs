use super::*;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use tsk_core::Timestamp;

/// HS256 session token issuer and validator.
///
/// Holds key material and ttl fixed at construction. Share one instance by
/// reference; nothing here is mutated after `new`.
pub struct Crypto {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: std::time::Duration,
}

impl Crypto {
    pub fn new(secret: &[u8], ttl: std::time::Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is enforced by validate_at against the caller's clock
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }
    pub fn ttl(&self) -> std::time::Duration {
        self.ttl
    }

    pub fn issue(&self, member: &Member) -> Result<String, TokenError> {
        self.issue_at(member, tsk_core::now())
    }
    pub fn issue_at(&self, member: &Member, now: Timestamp) -> Result<String, TokenError> {
        let ref claims = Claims::new(member, now, self.ttl)?;
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, tsk_core::now())
    }
    /// Shape, then signature, then payload, then expiry.
    pub fn validate_at(&self, token: &str, now: Timestamp) -> Result<Claims, TokenError> {
        let segments = token.split('.').collect::<Vec<&str>>();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(TokenError::Malformed);
        }
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)?;
        match claims.expired(now) {
            true => Err(TokenError::Expired),
            false => Ok(claims),
        }
    }
}

impl std::fmt::Debug for Crypto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crypto")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
