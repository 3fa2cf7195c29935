//! In-memory [`UserStore`] used by the service and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::errors::StoreError;
use crate::auth::repo::UserStore;
use crate::auth::repo_types::{NewUser, Profile, User};

#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    profiles: Vec<Profile>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    pub fn profile_count(&self) -> usize {
        self.inner.lock().unwrap().profiles.len()
    }

    pub fn user(&self, email: &str) -> Option<User> {
        let tables = self.inner.lock().unwrap();
        tables.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn profile_of(&self, user_id: Uuid) -> Option<Profile> {
        let tables = self.inner.lock().unwrap();
        tables.profiles.iter().find(|p| p.user_id == user_id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_with_profile(&self, user: NewUser) -> Result<(User, Profile), StoreError> {
        let mut tables = self.inner.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        let now = OffsetDateTime::now_utc();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            refresh_token: None,
            created_at: now,
        };
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: created.id,
            created_at: now,
        };
        tables.users.push(created.clone());
        tables.profiles.push(profile.clone());
        Ok((created, profile))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.user(email))
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn update_refresh_token(
        &self,
        user_id: Uuid,
        token: Option<String>,
    ) -> Result<(), StoreError> {
        let mut tables = self.inner.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.refresh_token = token;
        }
        Ok(())
    }
}
