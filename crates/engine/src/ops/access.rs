use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, User, income, tickets, users};

use super::Engine;

/// Error for a scoped lookup that matched nothing.
///
/// Staff get `Forbidden` whether the row is missing or belongs to someone
/// else, so ids of other users' entries are not disclosed.
fn missing(caller: &User, label: &str, id: i32) -> EngineError {
    if caller.is_admin() {
        EngineError::KeyNotFound(format!("{label} {id}"))
    } else {
        tracing::warn!("user {} denied access to {label} {id}", caller.username);
        EngineError::Forbidden("not authorized".to_string())
    }
}

/// Generates a `(id, owner)`-scoped lookup and delete for an entry entity.
///
/// Admins are matched on `id` alone; everybody else also on `user_id`.
macro_rules! impl_scoped_entry {
    ($find_fn:ident, $delete_fn:ident, $module:ident, $label:literal) => {
        pub(super) async fn $find_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            caller: &User,
            id: i32,
        ) -> ResultEngine<$module::Model> {
            let mut query = $module::Entity::find_by_id(id);
            if !caller.is_admin() {
                query = query.filter($module::Column::UserId.eq(caller.id));
            }
            query
                .one(db)
                .await?
                .ok_or_else(|| missing(caller, $label, id))
        }

        pub(super) async fn $delete_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            caller: &User,
            id: i32,
        ) -> ResultEngine<()> {
            let mut delete = $module::Entity::delete_many().filter($module::Column::Id.eq(id));
            if !caller.is_admin() {
                delete = delete.filter($module::Column::UserId.eq(caller.id));
            }
            let result = delete.exec(db).await?;
            if result.rows_affected == 0 {
                return Err(missing(caller, $label, id));
            }
            Ok(())
        }
    };
}

impl Engine {
    impl_scoped_entry!(scoped_income, delete_scoped_income, income, "income entry");

    impl_scoped_entry!(scoped_ticket, delete_scoped_ticket, tickets, "ticket entry");

    /// Owner id a list query should be restricted to.
    ///
    /// Admins get what they asked for (`None` meaning every user); staff always
    /// get their own id.
    pub(super) fn owner_scope(caller: &User, requested: Option<i32>) -> Option<i32> {
        if caller.is_admin() {
            requested
        } else {
            Some(caller.id)
        }
    }

    /// Resolve the owner of a new entry as `(user_id, user_name)`.
    pub(super) async fn resolve_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        caller: &User,
        requested: Option<i32>,
    ) -> ResultEngine<(i32, String)> {
        match requested {
            None => Ok((caller.id, caller.display_name().to_string())),
            Some(id) if id == caller.id => Ok((caller.id, caller.display_name().to_string())),
            Some(_) if !caller.is_admin() => {
                Err(EngineError::Forbidden("not authorized".to_string()))
            }
            Some(id) => {
                let model = users::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound(format!("user {id}")))?;
                let owner = User::try_from(model)?;
                Ok((owner.id, owner.display_name().to_string()))
            }
        }
    }
}

pub(super) fn require_admin(caller: &User) -> ResultEngine<()> {
    if !caller.is_admin() {
        tracing::warn!("user {} denied admin operation", caller.username);
        return Err(EngineError::Forbidden("admin access required".to_string()));
    }
    Ok(())
}
