use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::accounts::repo_types::{Profile, UserRecord};

/// Persistence seam for user records.
///
/// Update methods return the number of affected records so callers can tell
/// "no such token" apart from success without a separate lookup.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn username_taken(&self, username: &str) -> anyhow::Result<bool>;
    async fn insert(&self, record: &UserRecord) -> anyhow::Result<()>;
    async fn profile_by_token(&self, token: &str) -> anyhow::Result<Option<Profile>>;
    async fn update_profile(&self, token: &str, name: &str, age: i32) -> anyhow::Result<u64>;
    async fn update_name(&self, token: &str, name: &str) -> anyhow::Result<u64>;
}

// ---- Postgres ----

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn username_taken(&self, username: &str) -> anyhow::Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)"#,
        )
        .bind(username)
        .fetch_one(&self.db)
        .await
        .context("check username")?;
        Ok(taken)
    }

    async fn insert(&self, record: &UserRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (username, password, token, name, age)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&record.username)
        .bind(&record.password)
        .bind(&record.token)
        .bind(&record.name)
        .bind(record.age)
        .execute(&self.db)
        .await
        .context("insert user")?;
        Ok(())
    }

    async fn profile_by_token(&self, token: &str) -> anyhow::Result<Option<Profile>> {
        // Profile columns may be nullable in older tables.
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT COALESCE(name, '') AS name, COALESCE(age, 0) AS age
              FROM users
             WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .context("select profile by token")?;
        Ok(profile)
    }

    async fn update_profile(&self, token: &str, name: &str, age: i32) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"UPDATE users SET name = $1, age = $2 WHERE token = $3"#)
            .bind(name)
            .bind(age)
            .bind(token)
            .execute(&self.db)
            .await
            .context("update profile")?;
        Ok(res.rows_affected())
    }

    async fn update_name(&self, token: &str, name: &str) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"UPDATE users SET name = $1 WHERE token = $2"#)
            .bind(name)
            .bind(token)
            .execute(&self.db)
            .await
            .context("update name")?;
        Ok(res.rows_affected())
    }
}

// ---- In-memory ----

#[derive(Default)]
struct Tables {
    users: HashMap<String, UserRecord>,
    // token -> username
    tokens: HashMap<String, String>,
}

impl Tables {
    fn by_token_mut(&mut self, token: &str) -> Option<&mut UserRecord> {
        let username = self.tokens.get(token)?;
        self.users.get_mut(username)
    }
}

/// Process-local store with the same uniqueness rules as the `users` table.
#[derive(Default)]
pub struct MemoryUserStore {
    tables: RwLock<Tables>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn username_taken(&self, username: &str) -> anyhow::Result<bool> {
        Ok(self.tables.read().await.users.contains_key(username))
    }

    async fn insert(&self, record: &UserRecord) -> anyhow::Result<()> {
        let mut tables = self.tables.write().await;
        anyhow::ensure!(
            !tables.users.contains_key(&record.username),
            "duplicate username {:?}",
            record.username
        );
        anyhow::ensure!(
            !tables.tokens.contains_key(&record.token),
            "duplicate token"
        );
        tables
            .tokens
            .insert(record.token.clone(), record.username.clone());
        tables
            .users
            .insert(record.username.clone(), record.clone());
        Ok(())
    }

    async fn profile_by_token(&self, token: &str) -> anyhow::Result<Option<Profile>> {
        let tables = self.tables.read().await;
        let profile = tables
            .tokens
            .get(token)
            .and_then(|username| tables.users.get(username))
            .map(UserRecord::profile);
        Ok(profile)
    }

    async fn update_profile(&self, token: &str, name: &str, age: i32) -> anyhow::Result<u64> {
        let mut tables = self.tables.write().await;
        match tables.by_token_mut(token) {
            Some(user) => {
                user.name = name.to_owned();
                user.age = age;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_name(&self, token: &str, name: &str) -> anyhow::Result<u64> {
        let mut tables = self.tables.write().await;
        match tables.by_token_mut(token) {
            Some(user) => {
                user.name = name.to_owned();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod memory_store_tests {
    use super::*;

    fn record(username: &str, token: &str) -> UserRecord {
        UserRecord::new(username, "pw", token.to_string())
    }

    #[tokio::test]
    async fn insert_then_lookup_by_token() {
        let store = MemoryUserStore::new();
        store.insert(&record("alice", "t1")).await.expect("insert");

        assert!(store.username_taken("alice").await.unwrap());
        assert!(!store.username_taken("bob").await.unwrap());

        let profile = store.profile_by_token("t1").await.unwrap();
        assert_eq!(profile, Some(Profile::default()));
        assert_eq!(store.profile_by_token("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rejects_duplicate_username_and_token() {
        let store = MemoryUserStore::new();
        store.insert(&record("alice", "t1")).await.expect("insert");

        assert!(store.insert(&record("alice", "t2")).await.is_err());
        assert!(store.insert(&record("bob", "t1")).await.is_err());
        // the failed inserts leave no trace
        assert!(!store.username_taken("bob").await.unwrap());
        assert_eq!(store.profile_by_token("t2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn updates_report_affected_rows() {
        let store = MemoryUserStore::new();
        store.insert(&record("alice", "t1")).await.expect("insert");

        assert_eq!(store.update_profile("t1", "Alice", 30).await.unwrap(), 1);
        assert_eq!(store.update_name("t1", "Alicia").await.unwrap(), 1);
        assert_eq!(store.update_profile("t9", "X", 1).await.unwrap(), 0);
        assert_eq!(store.update_name("t9", "X").await.unwrap(), 0);

        let profile = store.profile_by_token("t1").await.unwrap().unwrap();
        assert_eq!(profile.name, "Alicia");
        assert_eq!(profile.age, 30);
    }
}

#[cfg(test)]
mod pg_store_tests {
    use super::*;
    use crate::accounts::services::generate_token;
    use sqlx::postgres::PgPoolOptions;

    async fn store() -> PgUserStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
        let db = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect");
        sqlx::query(include_str!("../../schema/users.sql"))
            .execute(&db)
            .await
            .expect("create users table");
        PgUserStore::new(db)
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL"]
    async fn alice_walkthrough_against_postgres() {
        let store = store().await;
        // unique per run so the test can be repeated against one database
        let username = format!("alice-{}", generate_token());
        let token = generate_token();

        assert!(!store.username_taken(&username).await.unwrap());
        store
            .insert(&UserRecord::new(&username, "pw1", token.clone()))
            .await
            .expect("insert");
        assert!(store.username_taken(&username).await.unwrap());

        let profile = store.profile_by_token(&token).await.unwrap();
        assert_eq!(profile, Some(Profile::default()));

        assert_eq!(store.update_profile(&token, "Alice", 30).await.unwrap(), 1);
        assert_eq!(store.update_name(&token, "Alicia").await.unwrap(), 1);
        let profile = store.profile_by_token(&token).await.unwrap().unwrap();
        assert_eq!(profile.name, "Alicia");
        assert_eq!(profile.age, 30);

        let missing = generate_token();
        assert_eq!(store.profile_by_token(&missing).await.unwrap(), None);
        assert_eq!(store.update_profile(&missing, "X", 1).await.unwrap(), 0);
        assert_eq!(store.update_name(&missing, "X").await.unwrap(), 0);

        let dup = UserRecord::new(&username, "pw2", generate_token());
        assert!(store.insert(&dup).await.is_err());
    }
}
