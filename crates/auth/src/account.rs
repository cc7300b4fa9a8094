//! Registration and login on top of the password hasher and token service.
//!
//! Argon2 work runs on tokio's blocking pool so request executors stay free.
use super::*;
use tsk_core::Unique;

/// Creates an account, storing only the Argon2id record of the password.
pub async fn register<R: AuthRepository>(
    repo: &R,
    params: &Params,
    req: RegisterRequest,
) -> Result<Member, AuthError> {
    if repo.exists(&req.username, &req.email).await? {
        return Err(AuthError::UserAlreadyExists);
    }
    let hashword = tokio::task::spawn_blocking({
        let params = params.clone();
        let password = req.password;
        move || password::hash(&password, &params)
    })
    .await??;
    match repo.create(&req.username, &req.email, &hashword).await {
        Err(StoreError::Duplicate) => Err(AuthError::UserAlreadyExists),
        result => result.map_err(AuthError::from),
    }
}

/// Verifies credentials and issues a session token.
///
/// Records hashed under older costs are upgraded to `params` on success.
pub async fn login<R: AuthRepository>(
    repo: &R,
    crypto: &Crypto,
    params: &Params,
    req: LoginRequest,
) -> Result<String, AuthError> {
    let Some((member, hashword)) = repo.lookup(&req.email).await? else {
        // unknown emails pay for one derivation too
        let decoy = Record::decoy(params);
        let password = req.password;
        tokio::task::spawn_blocking(move || decoy.matches(password.as_bytes())).await??;
        return Err(AuthError::UserNotFound);
    };
    let verified = tokio::task::spawn_blocking({
        let password = req.password.clone();
        let hashword = hashword.clone();
        move || password::verify(&password, &hashword)
    })
    .await??;
    if !verified {
        return Err(AuthError::InvalidCredentials);
    }
    if password::stale(&hashword, params) {
        upgrade(repo, &member, params, req.password).await;
    }
    Ok(crypto.issue(&member)?)
}

async fn upgrade<R: AuthRepository>(repo: &R, member: &Member, params: &Params, password: String) {
    let params = params.clone();
    match tokio::task::spawn_blocking(move || password::hash(&password, &params)).await {
        Ok(Ok(ref hashword)) => match repo.rehash(member.id(), hashword).await {
            Ok(()) => log::info!("upgraded password hash for user {}", member.id()),
            Err(e) => log::warn!("failed to store upgraded hash for user {}: {}", member.id(), e),
        },
        Ok(Err(e)) => log::warn!("failed to upgrade hash for user {}: {}", member.id(), e),
        Err(e) => log::warn!("hash upgrade task failed for user {}: {}", member.id(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tsk_core::ID;

    #[derive(Default)]
    struct Memory(Mutex<Vec<(Member, String)>>);

    impl AuthRepository for Memory {
        async fn exists(&self, username: &str, email: &str) -> Result<bool, StoreError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .any(|(m, _)| m.username() == username || m.email() == email))
        }
        async fn create(&self, username: &str, email: &str, hashword: &str) -> Result<Member, StoreError> {
            let mut rows = self.0.lock().unwrap();
            let id = ID::from(rows.len() as i64 + 1);
            let member = Member::new(id, username.to_string(), email.to_string());
            rows.push((member.clone(), hashword.to_string()));
            Ok(member)
        }
        async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, StoreError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .find(|(m, _)| m.email() == email)
                .cloned())
        }
        async fn member(&self, id: ID<Member>) -> Result<Option<Member>, StoreError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .find(|(m, _)| m.id() == id)
                .map(|(m, _)| m.clone()))
        }
        async fn rehash(&self, id: ID<Member>, hashword: &str) -> Result<(), StoreError> {
            self.0
                .lock()
                .unwrap()
                .iter_mut()
                .filter(|(m, _)| m.id() == id)
                .for_each(|(_, h)| *h = hashword.to_string());
            Ok(())
        }
    }

    impl Memory {
        fn hashword(&self, email: &str) -> String {
            self.0
                .lock()
                .unwrap()
                .iter()
                .find(|(m, _)| m.email() == email)
                .map(|(_, h)| h.clone())
                .unwrap()
        }
        fn corrupt(&self, email: &str) {
            self.0
                .lock()
                .unwrap()
                .iter_mut()
                .filter(|(m, _)| m.email() == email)
                .for_each(|(_, h)| *h = String::from("$argon2id$v=19$garbage"));
        }
    }

    fn params() -> Params {
        Params::new(1024, 1, 1, 16, 32).unwrap()
    }
    fn crypto() -> Crypto {
        Crypto::new(b"account-tests", std::time::Duration::from_secs(3600))
    }
    fn alice() -> RegisterRequest {
        RegisterRequest {
            username: "alice".into(),
            email: "a@b.com".into(),
            password: "correct-horse".into(),
        }
    }
    fn credentials(password: &str) -> LoginRequest {
        LoginRequest {
            email: "a@b.com".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let ref repo = Memory::default();
        let member = register(repo, &params(), alice()).await.unwrap();
        assert_eq!(member.username(), "alice");
        assert!(repo.hashword("a@b.com").starts_with("$argon2id$"));
        assert_ne!(repo.hashword("a@b.com"), "correct-horse");
        let token = login(repo, &crypto(), &params(), credentials("correct-horse"))
            .await
            .unwrap();
        let claims = crypto().validate(&token).unwrap();
        assert_eq!(claims.user(), member.id());
        assert_eq!(claims.email(), "a@b.com");
    }
    #[tokio::test]
    async fn duplicate_accounts_rejected() {
        let ref repo = Memory::default();
        register(repo, &params(), alice()).await.unwrap();
        let same_email = RegisterRequest {
            username: "bob".into(),
            ..alice()
        };
        assert!(matches!(
            register(repo, &params(), same_email).await,
            Err(AuthError::UserAlreadyExists)
        ));
        let same_name = RegisterRequest {
            email: "c@d.com".into(),
            ..alice()
        };
        assert!(matches!(
            register(repo, &params(), same_name).await,
            Err(AuthError::UserAlreadyExists)
        ));
    }
    #[tokio::test]
    async fn wrong_password_rejected() {
        let ref repo = Memory::default();
        register(repo, &params(), alice()).await.unwrap();
        assert!(matches!(
            login(repo, &crypto(), &params(), credentials("wrong-pass")).await,
            Err(AuthError::InvalidCredentials)
        ));
    }
    #[tokio::test]
    async fn unknown_email_rejected() {
        let ref repo = Memory::default();
        assert!(matches!(
            login(repo, &crypto(), &params(), credentials("correct-horse")).await,
            Err(AuthError::UserNotFound)
        ));
    }
    #[tokio::test]
    async fn unknown_email_costs_a_derivation() {
        let heavy = Params::new(8 * 1024, 3, 1, 16, 32).unwrap();
        let ref repo = Memory::default();
        register(repo, &heavy, alice()).await.unwrap();
        let started = std::time::Instant::now();
        let known = login(repo, &crypto(), &heavy, credentials("wrong-pass")).await;
        let known_cost = started.elapsed();
        let started = std::time::Instant::now();
        let unknown = login(
            repo,
            &crypto(),
            &heavy,
            LoginRequest {
                email: "nobody@b.com".into(),
                password: "wrong-pass".into(),
            },
        )
        .await;
        let unknown_cost = started.elapsed();
        assert!(matches!(known, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AuthError::UserNotFound)));
        assert!(unknown_cost * 4 > known_cost);
    }
    #[tokio::test]
    async fn corrupt_record_surfaces_as_format_error() {
        let ref repo = Memory::default();
        register(repo, &params(), alice()).await.unwrap();
        repo.corrupt("a@b.com");
        assert!(matches!(
            login(repo, &crypto(), &params(), credentials("correct-horse")).await,
            Err(AuthError::Password(PasswordError::InvalidRecordFormat { .. }))
        ));
    }
    #[tokio::test]
    async fn stale_records_upgraded_on_login() {
        let ref repo = Memory::default();
        let old = Params::new(512, 1, 1, 16, 32).unwrap();
        register(repo, &old, alice()).await.unwrap();
        let before = repo.hashword("a@b.com");
        assert!(before.contains("m=512,"));
        login(repo, &crypto(), &params(), credentials("correct-horse"))
            .await
            .unwrap();
        let after = repo.hashword("a@b.com");
        assert!(after.contains("m=1024,"));
        assert_eq!(password::verify("correct-horse", &after), Ok(true));
    }
    #[tokio::test]
    async fn current_records_left_alone() {
        let ref repo = Memory::default();
        register(repo, &params(), alice()).await.unwrap();
        let before = repo.hashword("a@b.com");
        login(repo, &crypto(), &params(), credentials("correct-horse"))
            .await
            .unwrap();
        assert_eq!(repo.hashword("a@b.com"), before);
    }
}
