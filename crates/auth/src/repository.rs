use super::*;
use tsk_core::ID;

/// Repository trait for credential storage.
/// Abstracts SQL from the account use case.
#[allow(async_fn_in_trait)]
pub trait AuthRepository {
    async fn exists(&self, username: &str, email: &str) -> Result<bool, StoreError>;
    async fn create(&self, username: &str, email: &str, hashword: &str) -> Result<Member, StoreError>;
    async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, StoreError>;
    async fn member(&self, id: ID<Member>) -> Result<Option<Member>, StoreError>;
    async fn rehash(&self, id: ID<Member>, hashword: &str) -> Result<(), StoreError>;
}

#[cfg(feature = "database")]
mod postgres {
    use super::*;
    use std::sync::Arc;
    use tokio_postgres::Client;
    use tokio_postgres::Row;
    use tsk_pg::*;

    fn member(row: &Row) -> Member {
        Member::new(
            ID::from(row.get::<_, i64>(0)),
            row.get::<_, String>(1),
            row.get::<_, String>(2),
        )
    }

    impl AuthRepository for Arc<Client> {
        async fn exists(&self, username: &str, email: &str) -> Result<bool, StoreError> {
            self.query_opt(
                const_format::concatcp!(
                    "SELECT 1 FROM ",
                    USERS,
                    " WHERE username = $1 OR email = $2 LIMIT 1"
                ),
                &[&username, &email],
            )
            .await
            .map(|opt| opt.is_some())
            .map_err(StoreError::from)
        }

        async fn create(
            &self,
            username: &str,
            email: &str,
            hashword: &str,
        ) -> Result<Member, StoreError> {
            self.query_one(
                const_format::concatcp!(
                    "INSERT INTO ",
                    USERS,
                    " (username, email, hashword) VALUES ($1, $2, $3) RETURNING id, username, email"
                ),
                &[&username, &email, &hashword],
            )
            .await
            .map(|ref row| member(row))
            .map_err(StoreError::from)
        }

        async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, StoreError> {
            self.query_opt(
                const_format::concatcp!(
                    "SELECT id, username, email, hashword FROM ",
                    USERS,
                    " WHERE email = $1"
                ),
                &[&email],
            )
            .await
            .map(|opt| opt.map(|ref row| (member(row), row.get::<_, String>(3))))
            .map_err(StoreError::from)
        }

        async fn member(&self, id: ID<Member>) -> Result<Option<Member>, StoreError> {
            self.query_opt(
                const_format::concatcp!(
                    "SELECT id, username, email FROM ",
                    USERS,
                    " WHERE id = $1"
                ),
                &[&id.inner()],
            )
            .await
            .map(|opt| opt.map(|ref row| member(row)))
            .map_err(StoreError::from)
        }

        async fn rehash(&self, id: ID<Member>, hashword: &str) -> Result<(), StoreError> {
            self.execute(
                const_format::concatcp!("UPDATE ", USERS, " SET hashword = $2 WHERE id = $1"),
                &[&id.inner(), &hashword],
            )
            .await
            .map(|_| ())
            .map_err(StoreError::from)
        }
    }
}
