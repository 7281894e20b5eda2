//! Income/OTP entry endpoints

use api_types::{
    EntryListQuery, Success,
    income::{IncomeNew, IncomeUpdate, IncomeView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{EntryFilter, IncomeEntry};

use crate::{
    ServerError,
    server::{Caller, ServerState},
};

pub(crate) fn income_view(entry: IncomeEntry) -> IncomeView {
    IncomeView {
        id: entry.id,
        user_id: entry.user_id,
        user_name: entry.user_name,
        date: entry.date,
        time: entry.time,
        category: entry.category,
        amount: entry.amount,
        description: entry.description,
        recipient: entry.recipient,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    }
}

fn views(entries: Vec<IncomeEntry>) -> Json<Vec<IncomeView>> {
    Json(entries.into_iter().map(income_view).collect())
}

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<IncomeView>), ServerError> {
    let entry = state.engine.create_income(&caller.user, &payload).await?;
    Ok((StatusCode::CREATED, Json(income_view(entry))))
}

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<IncomeView>>, ServerError> {
    let entries = state
        .engine
        .list_income(&caller.user, &EntryFilter::from(query))
        .await?;
    Ok(views(entries))
}

pub async fn my(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<IncomeView>>, ServerError> {
    let entries = state
        .engine
        .my_income(&caller.user, &EntryFilter::from(query))
        .await?;
    Ok(views(entries))
}

pub async fn all(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<IncomeView>>, ServerError> {
    let entries = state
        .engine
        .all_income(&caller.user, &EntryFilter::from(query))
        .await?;
    Ok(views(entries))
}

pub async fn update(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<IncomeUpdate>,
) -> Result<Json<IncomeView>, ServerError> {
    let entry = state
        .engine
        .update_income(&caller.user, id, &payload)
        .await?;
    Ok(Json(income_view(entry)))
}

pub async fn delete(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Success>, ServerError> {
    state.engine.delete_income(&caller.user, id).await?;
    Ok(Json(Success::ok()))
}
