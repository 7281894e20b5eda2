//! Ticket sale endpoints

use api_types::{
    EntryListQuery, Success,
    ticket::{TicketNew, TicketUpdate, TicketView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{EntryFilter, TicketEntry};

use crate::{
    ServerError,
    server::{Caller, ServerState},
};

pub(crate) fn ticket_view(entry: TicketEntry) -> TicketView {
    TicketView {
        id: entry.id,
        user_id: entry.user_id,
        user_name: entry.user_name,
        issue_date: entry.issue_date,
        passenger_name: entry.passenger_name,
        pnr: entry.pnr,
        trip_type: entry.trip_type,
        flight_name: entry.flight_name,
        from: entry.from,
        to: entry.to,
        departure_date: entry.departure_date,
        arrival_date: entry.arrival_date,
        return_date: entry.return_date,
        from_issuer: entry.from_issuer,
        bd_number: entry.bd_number,
        qr_number: entry.qr_number,
        ticket_copy_url: entry.ticket_copy_url,
        ticket_copy_file_name: entry.ticket_copy_file_name,
        status: entry.status,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    }
}

fn views(entries: Vec<TicketEntry>) -> Json<Vec<TicketView>> {
    Json(entries.into_iter().map(ticket_view).collect())
}

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<TicketNew>,
) -> Result<(StatusCode, Json<TicketView>), ServerError> {
    let entry = state.engine.create_ticket(&caller.user, &payload).await?;
    Ok((StatusCode::CREATED, Json(ticket_view(entry))))
}

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<TicketView>>, ServerError> {
    let entries = state
        .engine
        .list_tickets(&caller.user, &EntryFilter::from(query))
        .await?;
    Ok(views(entries))
}

pub async fn my(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<TicketView>>, ServerError> {
    let entries = state
        .engine
        .my_tickets(&caller.user, &EntryFilter::from(query))
        .await?;
    Ok(views(entries))
}

pub async fn all(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<TicketView>>, ServerError> {
    let entries = state
        .engine
        .all_tickets(&caller.user, &EntryFilter::from(query))
        .await?;
    Ok(views(entries))
}

pub async fn update(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<TicketUpdate>,
) -> Result<Json<TicketView>, ServerError> {
    let entry = state
        .engine
        .update_ticket(&caller.user, id, &payload)
        .await?;
    Ok(Json(ticket_view(entry)))
}

pub async fn delete(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Success>, ServerError> {
    state.engine.delete_ticket(&caller.user, id).await?;
    Ok(Json(Success::ok()))
}
