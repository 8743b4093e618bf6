use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::accounts::{
    errors::AccountError,
    repo::UserStore,
    repo_types::{Profile, UserRecord},
};

/// Opaque bearer token: a v4 UUID string.
pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

/// The four account operations over an injected [`UserStore`].
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create a record for `username` and return its token.
    ///
    /// A concurrent registration of the same name that slips past the
    /// existence check hits the store's unique constraint and comes back as
    /// [`AccountError::Store`].
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<String, AccountError> {
        if self.store.username_taken(username).await? {
            warn!(%username, "username already registered");
            return Err(AccountError::AlreadyExists);
        }

        let record = UserRecord::new(username, password, generate_token());
        self.store.insert(&record).await?;

        info!(%username, "user registered");
        Ok(record.token)
    }

    #[instrument(skip_all)]
    pub async fn get_profile(&self, token: &str) -> Result<Profile, AccountError> {
        match self.store.profile_by_token(token).await? {
            Some(profile) => {
                debug!("profile loaded");
                Ok(profile)
            }
            None => {
                warn!("profile lookup with unknown token");
                Err(AccountError::UserNotFound)
            }
        }
    }

    /// Overwrite both `name` and `age`.
    #[instrument(skip(self, token, name))]
    pub async fn save_profile(&self, token: &str, name: &str, age: i32) -> Result<(), AccountError> {
        let affected = self.store.update_profile(token, name, age).await?;
        if affected == 0 {
            warn!("profile save with unknown token");
            return Err(AccountError::TokenNotFound);
        }
        info!("profile saved");
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn update_name(&self, token: &str, new_name: &str) -> Result<(), AccountError> {
        let affected = self.store.update_name(token, new_name).await?;
        if affected == 0 {
            warn!("name update with unknown token");
            return Err(AccountError::TokenNotFound);
        }
        info!("name updated");
        Ok(())
    }
}
