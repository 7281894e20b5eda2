//! Income/OTP cash movements.

use api_types::IncomeCategory;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "income_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub date: String,
    pub time: String,
    pub category: String,
    pub amount: i64,
    pub description: String,
    pub recipient: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomeEntry {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub category: IncomeCategory,
    pub amount: i64,
    pub description: String,
    pub recipient: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Model> for IncomeEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            category: IncomeCategory::try_from(model.category.as_str())
                .map_err(EngineError::InvalidInput)?,
            id: model.id,
            user_id: model.user_id,
            user_name: model.user_name,
            date: model.date,
            time: model.time,
            amount: model.amount,
            description: model.description,
            recipient: model.recipient,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
