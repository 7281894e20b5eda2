//! Users table and the `User` the rest of the engine authorizes against.

use api_types::Role;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub last_signed_in: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::income::Entity")]
    IncomeEntries,
    #[sea_orm(has_many = "super::tickets::Entity")]
    TicketEntries,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::income::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomeEntries.def()
    }
}

impl Related<super::tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An authenticated account. Never carries the password hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub last_signed_in: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name stamped on entries created by this user.
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() { "Unknown" } else { trimmed }
    }
}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            username: model.username,
            name: model.name,
            role: parse_role(&model.role)?,
            last_signed_in: model.last_signed_in,
        })
    }
}

pub(crate) fn parse_role(value: &str) -> ResultEngine<Role> {
    Role::try_from(value).map_err(EngineError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, role: Role) -> User {
        User {
            id: 1,
            username: "jane".to_string(),
            name: name.to_string(),
            role,
            last_signed_in: None,
        }
    }

    #[test]
    fn blank_name_displays_as_unknown() {
        assert_eq!(user("  ", Role::Staff).display_name(), "Unknown");
        assert_eq!(user(" Jane ", Role::Staff).display_name(), "Jane");
    }

    #[test]
    fn only_admin_role_is_admin() {
        assert!(user("Jane", Role::Admin).is_admin());
        assert!(!user("Jane", Role::Staff).is_admin());
    }

    #[test]
    fn stored_role_must_be_known() {
        assert_eq!(
            parse_role("owner"),
            Err(EngineError::InvalidInput("invalid Role: owner".to_string()))
        );
    }
}
