use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, User,
    password::{burn_verify, hash_password, verify_password},
    sessions, users,
};

use super::{Engine, with_tx};

fn invalid_credentials() -> EngineError {
    EngineError::Unauthorized("invalid credentials".to_string())
}

/// A freshly opened login session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginSession {
    pub user: User,
    pub token: String,
    pub expires_at: DateTimeUtc,
}

impl Engine {
    /// Check `username`/`password` and open a session.
    ///
    /// On success `last_signed_in` is bumped, the user's expired sessions are
    /// dropped and a session row is stored in the same transaction. A failed
    /// check writes nothing.
    pub async fn login(&self, username: &str, password: &str) -> ResultEngine<LoginSession> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(invalid_credentials());
        }

        let now = Utc::now();
        let Some(expires_at) = now.checked_add_signed(self.session_ttl) else {
            return Err(EngineError::InvalidInput("session expiry is out of range".to_string()));
        };
        with_tx!(self, |db_tx| {
            let Some(model) = users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .one(&db_tx)
                .await?
            else {
                burn_verify(password);
                tracing::warn!("login rejected: unknown user {username}");
                return Err(invalid_credentials());
            };

            if !verify_password(password, &model.password_hash) {
                tracing::warn!("login rejected: wrong password for {username}");
                return Err(invalid_credentials());
            }

            let mut active: users::ActiveModel = model.into();
            active.last_signed_in = ActiveValue::Set(Some(now));
            let model = active.update(&db_tx).await?;

            sessions::Entity::delete_many()
                .filter(sessions::Column::UserId.eq(model.id))
                .filter(sessions::Column::ExpiresAt.lte(now))
                .exec(&db_tx)
                .await?;

            let token = sessions::new_token();
            sessions::ActiveModel {
                token: ActiveValue::Set(token.clone()),
                user_id: ActiveValue::Set(model.id),
                created_at: ActiveValue::Set(now),
                expires_at: ActiveValue::Set(expires_at),
            }
            .insert(&db_tx)
            .await?;

            let user = User::try_from(model)?;
            tracing::info!("{} logged in", user.username);
            Ok(LoginSession {
                user,
                token,
                expires_at,
            })
        })
    }

    /// Resolve a session token to its user.
    ///
    /// Expired sessions are deleted on sight.
    pub async fn authenticate(&self, token: &str) -> ResultEngine<User> {
        let row = sessions::Entity::find_by_id(token.to_string())
            .find_also_related(users::Entity)
            .one(&self.database)
            .await?;

        let Some((session, Some(model))) = row else {
            return Err(EngineError::Unauthorized("session not found".to_string()));
        };

        if session.expires_at <= Utc::now() {
            sessions::Entity::delete_by_id(session.token)
                .exec(&self.database)
                .await?;
            return Err(EngineError::Unauthorized("session expired".to_string()));
        }

        User::try_from(model)
    }

    /// Drop a session. Returns whether a session was actually removed.
    pub async fn logout(&self, token: &str) -> ResultEngine<bool> {
        let result = sessions::Entity::delete_by_id(token.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected > 0 {
            tracing::info!("session closed");
        }
        Ok(result.rows_affected > 0)
    }

    /// Replace the caller's password after re-proving the current one.
    ///
    /// Every other session of the caller is closed; `keep_token` (the session
    /// making the request) survives.
    pub async fn change_password(
        &self,
        caller: &User,
        current_password: &str,
        new_password: &str,
        keep_token: Option<&str>,
    ) -> ResultEngine<()> {
        if new_password.is_empty() {
            return Err(EngineError::InvalidInput("new password must not be empty".to_string()));
        }

        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(caller.id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::Unauthorized("user not found".to_string()))?;

            if !verify_password(current_password, &model.password_hash) {
                tracing::warn!("password change rejected for {}", caller.username);
                return Err(EngineError::Unauthorized("current password is incorrect".to_string()));
            }

            let mut active: users::ActiveModel = model.into();
            active.password_hash = ActiveValue::Set(hash_password(new_password)?);
            active.update(&db_tx).await?;

            let mut others =
                sessions::Entity::delete_many().filter(sessions::Column::UserId.eq(caller.id));
            if let Some(token) = keep_token {
                others = others.filter(sessions::Column::Token.ne(token));
            }
            others.exec(&db_tx).await?;

            tracing::info!("{} changed password", caller.username);
            Ok(())
        })
    }

    /// Remove every expired session. Returns how many were removed.
    pub async fn purge_expired_sessions(&self) -> ResultEngine<u64> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(Utc::now()))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }
}
