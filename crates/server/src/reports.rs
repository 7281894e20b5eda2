//! Report exports (admin only).

use api_types::stats::SummaryQuery;
use axum::{
    Extension,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::{Month, Utc};
use engine::{IncomeEntry, TicketEntry, category_totals, net_income, net_otp};
use report::{IncomeRow, ReportData, TicketRow};

use crate::{
    ServerError,
    income::income_view,
    server::{Caller, ServerState},
    summary::split_query,
    tickets::ticket_view,
    uploads::sanitize_file_name,
};

/// Label printed as the report period when the caller did not send one.
fn period_label(query: &SummaryQuery) -> String {
    if let Some(period) = query.period.as_deref().map(str::trim)
        && !period.is_empty()
    {
        return period.to_string();
    }

    let month = query
        .month
        .and_then(|m| u8::try_from(m).ok())
        .and_then(|m| Month::try_from(m).ok());
    match (query.year, month) {
        (Some(year), Some(month)) => format!("{} {year}", month.name()),
        (Some(year), None) => year.to_string(),
        (None, Some(month)) => month.name().to_string(),
        (None, None) => match (query.start_date.as_deref(), query.end_date.as_deref()) {
            (Some(start), Some(end)) => format!("{start} to {end}"),
            (Some(start), None) => format!("From {start}"),
            (None, Some(end)) => format!("Until {end}"),
            (None, None) => "All time".to_string(),
        },
    }
}

async fn filtered_entries(
    state: &ServerState,
    caller: &Caller,
    query: &SummaryQuery,
) -> Result<(Vec<IncomeEntry>, Vec<TicketEntry>), ServerError> {
    let (filter, narrow) = split_query(query)?;
    let income = narrow.apply_income(state.engine.all_income(&caller.user, &filter).await?);
    let tickets = narrow.apply_tickets(state.engine.all_tickets(&caller.user, &filter).await?);
    Ok((income, tickets))
}

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", sanitize_file_name(file_name))
}

pub async fn pdf(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let (income, tickets) = filtered_entries(&state, &caller, &query).await?;

    let staff_name = match query.user_id {
        Some(id) => state
            .engine
            .user(&caller.user, id)
            .await?
            .display_name()
            .to_string(),
        None => "All Staff".to_string(),
    };

    let totals = category_totals(&income);
    let views: Vec<_> = income.into_iter().map(income_view).collect();
    let ticket_views: Vec<_> = tickets.into_iter().map(ticket_view).collect();
    let data = ReportData {
        staff_name,
        period: period_label(&query),
        generated: Utc::now().date_naive(),
        income: views.iter().map(IncomeRow::from).collect(),
        tickets: ticket_views.iter().map(TicketRow::from).collect(),
        total_income: net_income(&totals),
        total_otp: net_otp(&totals),
        total_tickets: ticket_views.len() as u64,
    };

    let pages = report::layout(&data, &state.branding);
    let bytes = report::render("Staff Report", &pages)?;
    let file_name = data.file_name();
    tracing::info!("{} exported {file_name}", caller.user.username);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&file_name)),
        ],
        bytes,
    ))
}

pub async fn income_csv(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let (income, _) = filtered_entries(&state, &caller, &query).await?;
    let views: Vec<_> = income.into_iter().map(income_view).collect();
    let bytes = report::income_csv(&views)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, attachment("income.csv")),
        ],
        bytes,
    ))
}

pub async fn tickets_csv(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let (_, tickets) = filtered_entries(&state, &caller, &query).await?;
    let views: Vec<_> = tickets.into_iter().map(ticket_view).collect();
    let bytes = report::tickets_csv(&views)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, attachment("tickets.csv")),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_name_cannot_break_the_header() {
        assert_eq!(
            attachment("Ra\"him_Report_2025-01-01.pdf"),
            "attachment; filename=\"Ra_him_Report_2025-01-01.pdf\""
        );
        assert_eq!(
            attachment("income.csv"),
            "attachment; filename=\"income.csv\""
        );
    }

    #[test]
    fn explicit_period_wins() {
        let query = SummaryQuery {
            period: Some("Q1 2025".to_string()),
            year: Some(2024),
            ..Default::default()
        };
        assert_eq!(period_label(&query), "Q1 2025");
    }

    #[test]
    fn period_from_year_and_month() {
        let query = SummaryQuery {
            year: Some(2025),
            month: Some(3),
            ..Default::default()
        };
        assert_eq!(period_label(&query), "March 2025");
    }

    #[test]
    fn period_from_date_range() {
        let query = SummaryQuery {
            start_date: Some("2025-01-01".to_string()),
            end_date: Some("2025-01-31".to_string()),
            ..Default::default()
        };
        assert_eq!(period_label(&query), "2025-01-01 to 2025-01-31");
        assert_eq!(period_label(&SummaryQuery::default()), "All time");
    }
}
