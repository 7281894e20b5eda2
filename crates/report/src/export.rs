//! CSV dumps of the filtered entry lists.

use std::borrow::Cow;

use api_types::{income::IncomeView, ticket::TicketView};
use csv::Writer;
use serde::Serialize;

use crate::{ReportError, ResultReport};

#[derive(Serialize)]
struct IncomeCsvRow<'a> {
    id: i32,
    date: &'a str,
    time: &'a str,
    #[serde(rename = "type")]
    category: &'a str,
    amount: i64,
    description: Cow<'a, str>,
    recipient: Option<Cow<'a, str>>,
    staff: Cow<'a, str>,
}

#[derive(Serialize)]
struct TicketCsvRow<'a> {
    id: i32,
    issue_date: &'a str,
    passenger_name: Cow<'a, str>,
    pnr: Cow<'a, str>,
    trip_type: &'a str,
    flight_name: Cow<'a, str>,
    from: Cow<'a, str>,
    to: Cow<'a, str>,
    departure_date: &'a str,
    arrival_date: &'a str,
    return_date: Option<&'a str>,
    from_issuer: Cow<'a, str>,
    status: &'a str,
    staff: Cow<'a, str>,
}

/// Spreadsheets evaluate cells starting with these as formulas.
const FORMULA_PREFIXES: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Quote free text that a spreadsheet would read as a formula.
fn text_cell(value: &str) -> Cow<'_, str> {
    if value.starts_with(FORMULA_PREFIXES) {
        Cow::Owned(format!("'{value}"))
    } else {
        Cow::Borrowed(value)
    }
}

fn finish(writer: Writer<Vec<u8>>) -> ResultReport<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|err| ReportError::Flush(err.to_string()))
}

pub fn income_csv(entries: &[IncomeView]) -> ResultReport<Vec<u8>> {
    let mut writer = Writer::from_writer(vec![]);
    for entry in entries {
        writer.serialize(IncomeCsvRow {
            id: entry.id,
            date: &entry.date,
            time: &entry.time,
            category: entry.category.as_str(),
            amount: entry.amount,
            description: text_cell(&entry.description),
            recipient: entry.recipient.as_deref().map(text_cell),
            staff: text_cell(&entry.user_name),
        })?;
    }
    finish(writer)
}

pub fn tickets_csv(entries: &[TicketView]) -> ResultReport<Vec<u8>> {
    let mut writer = Writer::from_writer(vec![]);
    for entry in entries {
        writer.serialize(TicketCsvRow {
            id: entry.id,
            issue_date: &entry.issue_date,
            passenger_name: text_cell(&entry.passenger_name),
            pnr: text_cell(&entry.pnr),
            trip_type: entry.trip_type.as_str(),
            flight_name: text_cell(&entry.flight_name),
            from: text_cell(&entry.from),
            to: text_cell(&entry.to),
            departure_date: &entry.departure_date,
            arrival_date: &entry.arrival_date,
            return_date: entry.return_date.as_deref(),
            from_issuer: text_cell(&entry.from_issuer),
            status: entry.status.as_str(),
            staff: text_cell(&entry.user_name),
        })?;
    }
    finish(writer)
}

#[cfg(test)]
mod tests {
    use api_types::IncomeCategory;
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn income_csv_has_header_and_quoted_text() {
        let at = Utc.timestamp_opt(0, 0).unwrap();
        let entries = vec![IncomeView {
            id: 7,
            user_id: 1,
            user_name: "Rahim".to_string(),
            date: "2025-01-05".to_string(),
            time: "09:30".to_string(),
            category: IncomeCategory::OtpAdd,
            amount: 250,
            description: "cash, counter 2".to_string(),
            recipient: None,
            created_at: at,
            updated_at: at,
        }];

        let csv = String::from_utf8(income_csv(&entries).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,date,time,type,amount,description,recipient,staff")
        );
        assert_eq!(
            lines.next(),
            Some("7,2025-01-05,09:30,OTP Add,250,\"cash, counter 2\",,Rahim")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn formula_like_text_is_quoted() {
        let at = Utc.timestamp_opt(0, 0).unwrap();
        let entries = vec![IncomeView {
            id: 8,
            user_id: 1,
            user_name: "@Rahim".to_string(),
            date: "2025-01-05".to_string(),
            time: "09:30".to_string(),
            category: IncomeCategory::IncomeMinus,
            amount: 5,
            description: "=HYPERLINK(\"x\")".to_string(),
            recipient: Some("-Karim".to_string()),
            created_at: at,
            updated_at: at,
        }];

        let csv = String::from_utf8(income_csv(&entries).unwrap()).unwrap();
        assert_eq!(
            csv.lines().nth(1),
            Some("8,2025-01-05,09:30,Income Minus,5,\"'=HYPERLINK(\"\"x\"\")\",'-Karim,'@Rahim")
        );
        assert_eq!(text_cell("plain"), "plain");
        assert_eq!(text_cell("+1"), "'+1");
    }

    #[test]
    fn empty_list_is_empty_output() {
        assert!(tickets_csv(&[]).unwrap().is_empty());
    }
}
