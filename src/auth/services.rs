use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::auth::claims::TokenPayload;
use crate::auth::dto::TokenPair;
use crate::auth::errors::AuthError;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::repo::UserStore;
use crate::auth::repo_types::{NewUser, User};
use crate::config::JwtConfig;

/// Registration, login, logout and access-token refresh over a [`UserStore`].
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, jwt: &JwtConfig) -> Self {
        Self {
            store,
            keys: JwtKeys::from_config(jwt),
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Creates a user and its profile. The plaintext password is never stored.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<User, AuthError> {
        let password_hash = hash_password_blocking(password.to_owned())
            .await
            .map_err(AuthError::Internal)?;

        let new_user = NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash,
            role: role.to_owned(),
        };

        let (user, profile) = match self.store.create_with_profile(new_user).await {
            Ok(created) => created,
            Err(e) => {
                let err = AuthError::from(e);
                if matches!(err, AuthError::EmailAlreadyUsed) {
                    warn!(%email, "email already registered");
                }
                return Err(err);
            }
        };

        info!(user_id = %user.id, profile_id = %profile.id, "user registered");
        Ok(user)
    }

    /// Verifies credentials and issues an access/refresh pair. The refresh token
    /// replaces whatever was stored for the user before.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                warn!(%email, "login unknown email");
                AuthError::UserNotFound
            })?;

        let matches = verify_password_blocking(password.to_owned(), user.password_hash.clone())
            .await
            .map_err(AuthError::Internal)?;
        if !matches {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AuthError::WrongPassword);
        }

        let payload = TokenPayload::from(&user);
        let access_token = self.keys.sign_access(&payload).map_err(AuthError::Internal)?;
        let refresh_token = self.keys.sign_refresh(&payload).map_err(AuthError::Internal)?;

        self.store
            .update_refresh_token(user.id, Some(refresh_token.clone()))
            .await?;

        info!(user_id = %user.id, "user logged in");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Clears the session holding `refresh_token`. `Ok(false)` when no user holds it.
    #[instrument(skip_all)]
    pub async fn logout(&self, refresh_token: &str) -> Result<bool, AuthError> {
        let Some(user) = self.store.find_by_refresh_token(refresh_token).await? else {
            info!("logout with unknown refresh token");
            return Ok(false);
        };

        self.store.update_refresh_token(user.id, None).await?;
        info!(user_id = %user.id, "user logged out");
        Ok(true)
    }

    /// Issues a new access token for a stored, valid refresh token. `Ok(None)` when
    /// the token is unknown, expired or fails verification. The stored refresh token
    /// is left as is.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<Option<String>, AuthError> {
        let Some(user) = self.store.find_by_refresh_token(refresh_token).await? else {
            info!("refresh with unknown refresh token");
            return Ok(None);
        };

        let claims = match self.keys.verify_refresh(refresh_token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "stored refresh token failed verification");
                return Ok(None);
            }
        };

        let access_token = self
            .keys
            .sign_access(&claims.payload())
            .map_err(AuthError::Internal)?;
        info!(user_id = %user.id, "access token refreshed");
        Ok(Some(access_token))
    }
}
