use api_types::Role;
use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{
    EngineError, ResultEngine, User, password::hash_password, sessions, users,
    util::normalize_required,
};

use super::{Engine, access::require_admin, with_tx};

impl Engine {
    /// Create an account. Operator action, not exposed over HTTP.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> ResultEngine<User> {
        let username = normalize_required(username, "username")?;
        let name = normalize_required(name, "name")?;
        let password_hash = hash_password(password)?;

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(username));
            }

            let model = users::ActiveModel {
                id: ActiveValue::NotSet,
                username: ActiveValue::Set(username),
                password_hash: ActiveValue::Set(password_hash),
                name: ActiveValue::Set(name),
                role: ActiveValue::Set(role.as_str().to_string()),
                last_signed_in: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            let user = User::try_from(model)?;
            tracing::info!("created {} user {}", user.role, user.username);
            Ok(user)
        })
    }

    /// Change a user's role. Operator action, not exposed over HTTP.
    pub async fn set_role(&self, username: &str, role: Role) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = find_by_username(&db_tx, username).await?;
            let mut active: users::ActiveModel = model.into();
            active.role = ActiveValue::Set(role.as_str().to_string());
            let user = User::try_from(active.update(&db_tx).await?)?;
            tracing::info!("{} is now {}", user.username, user.role);
            Ok(user)
        })
    }

    /// Overwrite a user's password and close all of their sessions.
    pub async fn reset_password(&self, username: &str, password: &str) -> ResultEngine<()> {
        let password_hash = hash_password(password)?;
        with_tx!(self, |db_tx| {
            let model = find_by_username(&db_tx, username).await?;
            let user_id = model.id;
            let mut active: users::ActiveModel = model.into();
            active.password_hash = ActiveValue::Set(password_hash);
            active.update(&db_tx).await?;

            sessions::Entity::delete_many()
                .filter(sessions::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Every user ordered by name. Unscoped; for operator tooling.
    pub async fn users(&self) -> ResultEngine<Vec<User>> {
        users::Entity::find()
            .order_by_asc(users::Column::Name)
            .order_by_asc(users::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Every user ordered by name (admin only).
    pub async fn list_users(&self, caller: &User) -> ResultEngine<Vec<User>> {
        require_admin(caller)?;
        self.users().await
    }

    /// Number of accounts with the staff role (admin only).
    pub async fn count_staff(&self, caller: &User) -> ResultEngine<u64> {
        require_admin(caller)?;
        let count = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Staff.as_str()))
            .count(&self.database)
            .await?;
        Ok(count)
    }

    /// Look up a user. Staff may only look themselves up.
    pub async fn user(&self, caller: &User, id: i32) -> ResultEngine<User> {
        if !caller.is_admin() && caller.id != id {
            return Err(EngineError::Forbidden("not authorized".to_string()));
        }
        let model = users::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("user {id}")))?;
        User::try_from(model)
    }
}

async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> ResultEngine<users::Model> {
    users::Entity::find()
        .filter(users::Column::Username.eq(username.trim()))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(username.to_string()))
}
