//! Flight-ticket sales.
//!
//! `from`/`to` are stored as `origin`/`destination`.

use api_types::{TicketStatus, TripType};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ticket_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub issue_date: String,
    pub passenger_name: String,
    pub pnr: String,
    pub trip_type: String,
    pub flight_name: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub arrival_date: String,
    pub return_date: Option<String>,
    pub from_issuer: String,
    pub bd_number: Option<String>,
    pub qr_number: Option<String>,
    pub ticket_copy_url: Option<String>,
    pub ticket_copy_file_name: Option<String>,
    pub status: String,
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
pub struct TicketEntry {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub issue_date: String,
    pub passenger_name: String,
    pub pnr: String,
    pub trip_type: TripType,
    pub flight_name: String,
    pub from: String,
    pub to: String,
    pub departure_date: String,
    pub arrival_date: String,
    pub return_date: Option<String>,
    pub from_issuer: String,
    pub bd_number: Option<String>,
    pub qr_number: Option<String>,
    pub ticket_copy_url: Option<String>,
    pub ticket_copy_file_name: Option<String>,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Model> for TicketEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            trip_type: TripType::try_from(model.trip_type.as_str())
                .map_err(EngineError::InvalidInput)?,
            status: TicketStatus::try_from(model.status.as_str())
                .map_err(EngineError::InvalidInput)?,
            id: model.id,
            user_id: model.user_id,
            user_name: model.user_name,
            issue_date: model.issue_date,
            passenger_name: model.passenger_name,
            pnr: model.pnr,
            flight_name: model.flight_name,
            from: model.origin,
            to: model.destination,
            departure_date: model.departure_date,
            arrival_date: model.arrival_date,
            return_date: model.return_date,
            from_issuer: model.from_issuer,
            bd_number: model.bd_number,
            qr_number: model.qr_number,
            ticket_copy_url: model.ticket_copy_url,
            ticket_copy_file_name: model.ticket_copy_file_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
