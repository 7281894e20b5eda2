use api_types::{
    TicketStatus,
    ticket::{TicketNew, TicketUpdate},
};
use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    ResultEngine, TicketEntry, User, tickets,
    util::{normalize_optional_text, normalize_required, validate_date, validate_optional_date},
};

use super::{Engine, EntryFilter, access::require_admin, with_tx};

/// Set a required text column from a patch field.
macro_rules! patch_required {
    ($active:ident . $column:ident, $value:expr, $label:literal) => {
        if let Some(value) = $value.as_deref() {
            $active.$column = ActiveValue::Set(normalize_required(value, $label)?);
        }
    };
}

/// Set an optional text column from a patch field; an empty string clears it.
macro_rules! patch_optional {
    ($active:ident . $column:ident, $value:expr) => {
        if $value.is_some() {
            $active.$column = ActiveValue::Set(normalize_optional_text($value.as_deref()));
        }
    };
}

impl Engine {
    /// Record a ticket sale. `status` defaults to `Pending`.
    pub async fn create_ticket(
        &self,
        caller: &User,
        input: &TicketNew,
    ) -> ResultEngine<TicketEntry> {
        let issue_date = validate_date(&input.issue_date, "issueDate")?;
        let departure_date = validate_date(&input.departure_date, "departureDate")?;
        let arrival_date = validate_date(&input.arrival_date, "arrivalDate")?;
        let return_date = validate_optional_date(input.return_date.as_deref(), "returnDate")?;
        let passenger_name = normalize_required(&input.passenger_name, "passengerName")?;
        let pnr = normalize_required(&input.pnr, "pnr")?;
        let flight_name = normalize_required(&input.flight_name, "flightName")?;
        let origin = normalize_required(&input.from, "from")?;
        let destination = normalize_required(&input.to, "to")?;
        let from_issuer = normalize_required(&input.from_issuer, "fromIssuer")?;
        let status = input.status.unwrap_or_default();
        let now = Utc::now();

        let (user_id, user_name) = self
            .resolve_owner(&self.database, caller, input.user_id)
            .await?;

        let model = tickets::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            user_name: ActiveValue::Set(user_name),
            issue_date: ActiveValue::Set(issue_date),
            passenger_name: ActiveValue::Set(passenger_name),
            pnr: ActiveValue::Set(pnr),
            trip_type: ActiveValue::Set(input.trip_type.as_str().to_string()),
            flight_name: ActiveValue::Set(flight_name),
            origin: ActiveValue::Set(origin),
            destination: ActiveValue::Set(destination),
            departure_date: ActiveValue::Set(departure_date),
            arrival_date: ActiveValue::Set(arrival_date),
            return_date: ActiveValue::Set(return_date),
            from_issuer: ActiveValue::Set(from_issuer),
            bd_number: ActiveValue::Set(normalize_optional_text(input.bd_number.as_deref())),
            qr_number: ActiveValue::Set(normalize_optional_text(input.qr_number.as_deref())),
            ticket_copy_url: ActiveValue::Set(normalize_optional_text(
                input.ticket_copy_url.as_deref(),
            )),
            ticket_copy_file_name: ActiveValue::Set(normalize_optional_text(
                input.ticket_copy_file_name.as_deref(),
            )),
            status: ActiveValue::Set(status.as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(&self.database)
        .await?;

        TicketEntry::try_from(model)
    }

    /// List tickets by issue date, newest first. Staff only ever see their own.
    pub async fn list_tickets(
        &self,
        caller: &User,
        filter: &EntryFilter,
    ) -> ResultEngine<Vec<TicketEntry>> {
        let owner = Self::owner_scope(caller, filter.user_id);
        self.query_tickets(owner, filter).await
    }

    /// The caller's own tickets, whatever their role.
    pub async fn my_tickets(
        &self,
        caller: &User,
        filter: &EntryFilter,
    ) -> ResultEngine<Vec<TicketEntry>> {
        self.query_tickets(Some(caller.id), filter).await
    }

    /// Tickets across every user (admin only).
    pub async fn all_tickets(
        &self,
        caller: &User,
        filter: &EntryFilter,
    ) -> ResultEngine<Vec<TicketEntry>> {
        require_admin(caller)?;
        self.query_tickets(filter.user_id, filter).await
    }

    async fn query_tickets(
        &self,
        owner: Option<i32>,
        filter: &EntryFilter,
    ) -> ResultEngine<Vec<TicketEntry>> {
        let (start, end) = filter.date_range()?;

        let mut query = tickets::Entity::find();
        if let Some(owner) = owner {
            query = query.filter(tickets::Column::UserId.eq(owner));
        }
        if let Some(start) = start {
            query = query.filter(tickets::Column::IssueDate.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(tickets::Column::IssueDate.lte(end));
        }

        query
            .order_by_desc(tickets::Column::IssueDate)
            .order_by_desc(tickets::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(TicketEntry::try_from)
            .collect()
    }

    /// Apply the fields present in `patch`.
    ///
    /// Empty strings clear the optional fields.
    pub async fn update_ticket(
        &self,
        caller: &User,
        id: i32,
        patch: &TicketUpdate,
    ) -> ResultEngine<TicketEntry> {
        with_tx!(self, |db_tx| {
            let model = self.scoped_ticket(&db_tx, caller, id).await?;
            let mut active: tickets::ActiveModel = model.into();

            if let Some(date) = patch.issue_date.as_deref() {
                active.issue_date = ActiveValue::Set(validate_date(date, "issueDate")?);
            }
            if let Some(date) = patch.departure_date.as_deref() {
                active.departure_date = ActiveValue::Set(validate_date(date, "departureDate")?);
            }
            if let Some(date) = patch.arrival_date.as_deref() {
                active.arrival_date = ActiveValue::Set(validate_date(date, "arrivalDate")?);
            }
            if patch.return_date.is_some() {
                active.return_date = ActiveValue::Set(validate_optional_date(
                    patch.return_date.as_deref(),
                    "returnDate",
                )?);
            }
            if let Some(trip_type) = patch.trip_type {
                active.trip_type = ActiveValue::Set(trip_type.as_str().to_string());
            }
            if let Some(status) = patch.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }

            patch_required!(active.passenger_name, patch.passenger_name, "passengerName");
            patch_required!(active.pnr, patch.pnr, "pnr");
            patch_required!(active.flight_name, patch.flight_name, "flightName");
            patch_required!(active.origin, patch.from, "from");
            patch_required!(active.destination, patch.to, "to");
            patch_required!(active.from_issuer, patch.from_issuer, "fromIssuer");
            patch_optional!(active.bd_number, patch.bd_number);
            patch_optional!(active.qr_number, patch.qr_number);
            patch_optional!(active.ticket_copy_url, patch.ticket_copy_url);
            patch_optional!(active.ticket_copy_file_name, patch.ticket_copy_file_name);
            active.updated_at = ActiveValue::Set(Utc::now());

            TicketEntry::try_from(active.update(&db_tx).await?)
        })
    }

    /// Shorthand for a status-only update.
    pub async fn set_ticket_status(
        &self,
        caller: &User,
        id: i32,
        status: TicketStatus,
    ) -> ResultEngine<TicketEntry> {
        let patch = TicketUpdate {
            status: Some(status),
            ..Default::default()
        };
        self.update_ticket(caller, id, &patch).await
    }

    pub async fn delete_ticket(&self, caller: &User, id: i32) -> ResultEngine<()> {
        self.delete_scoped_ticket(&self.database, caller, id).await?;
        tracing::info!("{} deleted ticket entry {id}", caller.username);
        Ok(())
    }
}
