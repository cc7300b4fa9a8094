use super::*;
use tsk_core::ID;
use tsk_core::Timestamp;
use tsk_core::Unique;

/// Identity facts carried by a session token.
///
/// Only [`Crypto`] constructs these; consumers get read-only access.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    sub: i64,
    email: String,
    iat: Timestamp,
    exp: Timestamp,
}

impl Claims {
    pub(crate) fn new(
        member: &Member,
        now: Timestamp,
        ttl: std::time::Duration,
    ) -> Result<Self, TokenError> {
        let exp = Timestamp::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| now.checked_add(secs))
            .ok_or_else(|| TokenError::Signing(format!("ttl {:?} overflows expiry", ttl)))?;
        Ok(Self {
            sub: member.id().inner(),
            email: member.email().to_string(),
            iat: now,
            exp,
        })
    }
    pub fn expired(&self, now: Timestamp) -> bool {
        now > self.exp
    }
    pub fn user(&self) -> ID<Member> {
        ID::from(self.sub)
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn issued_at(&self) -> Timestamp {
        self.iat
    }
    pub fn expires_at(&self) -> Timestamp {
        self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn expiry_is_strict() {
        let member = Member::new(ID::from(42), "a".into(), "a@b.com".into());
        let claims = Claims::new(&member, 1_000, std::time::Duration::from_secs(60)).unwrap();
        assert_eq!(claims.issued_at(), 1_000);
        assert_eq!(claims.expires_at(), 1_060);
        assert!(!claims.expired(1_060));
        assert!(claims.expired(1_061));
    }
    #[test]
    fn wire_names_are_compact() {
        let member = Member::new(ID::from(7), "a".into(), "a@b.com".into());
        let claims = Claims::new(&member, 10, std::time::Duration::from_secs(5)).unwrap();
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "sub": 7, "email": "a@b.com", "iat": 10, "exp": 15 })
        );
    }
    #[test]
    fn oversized_ttl_refused() {
        let member = Member::new(ID::from(7), "a".into(), "a@b.com".into());
        let ttl = std::time::Duration::from_secs(u64::MAX);
        assert!(matches!(
            Claims::new(&member, 10, ttl),
            Err(TokenError::Signing(_))
        ));
        let ttl = std::time::Duration::from_secs(i64::MAX as u64);
        assert!(matches!(
            Claims::new(&member, 10, ttl),
            Err(TokenError::Signing(_))
        ));
    }
}
