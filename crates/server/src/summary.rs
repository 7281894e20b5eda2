//! Dashboard totals endpoint

use api_types::stats::{Summary, SummaryQuery};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::{EntryFilter, SummaryFilter, summarize};

use crate::{
    ServerError,
    server::{Caller, ServerState},
};

/// Split a dashboard query into the storage filter and the in-memory one.
pub(crate) fn split_query(
    query: &SummaryQuery,
) -> Result<(EntryFilter, SummaryFilter), ServerError> {
    if let Some(month) = query.month
        && !(1..=12).contains(&month)
    {
        return Err(ServerError::Generic(format!("invalid month {month}")));
    }
    let entries = EntryFilter {
        user_id: query.user_id,
        start_date: query.start_date.clone(),
        end_date: query.end_date.clone(),
    };
    let narrow = SummaryFilter {
        year: query.year,
        month: query.month,
        search: query.search.clone(),
    };
    Ok((entries, narrow))
}

/// Totals over the entries the caller may see.
pub async fn get(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Summary>, ServerError> {
    let (filter, narrow) = split_query(&query)?;
    let income = narrow.apply_income(state.engine.list_income(&caller.user, &filter).await?);
    let tickets = narrow.apply_tickets(state.engine.list_tickets(&caller.user, &filter).await?);

    let mut summary = summarize(&income, &tickets);
    if caller.user.is_admin() {
        summary.total_staff = Some(state.engine.count_staff(&caller.user).await?);
    }
    Ok(Json(summary))
}
