use sqlx::FromRow;

/// User record in the `users` table.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub password: String, // stored as given
    pub token: String,
    pub name: String,
    pub age: i32,
}

impl UserRecord {
    /// Fresh record with default profile fields.
    pub fn new(username: &str, password: &str, token: String) -> Self {
        Self {
            username: username.to_owned(),
            password: password.to_owned(),
            token,
            name: String::new(),
            age: 0,
        }
    }

    pub fn profile(&self) -> Profile {
        Profile {
            name: self.name.clone(),
            age: self.age,
        }
    }
}

/// Mutable profile part of a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct Profile {
    pub name: String,
    pub age: i32,
}
