//! Dashboard aggregation.
//!
//! Everything here is a pure function of the entry lists it is given; the
//! totals are recomputed per request and never stored.

use api_types::{
    IncomeCategory,
    stats::{CategoryTotals, Summary},
};

use crate::{IncomeEntry, TicketEntry};

/// In-memory narrowing applied on top of a storage list query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryFilter {
    pub year: Option<i32>,
    /// 1-based month.
    pub month: Option<u32>,
    /// Case-insensitive substring.
    pub search: Option<String>,
}

impl SummaryFilter {
    fn matches_date(&self, date: &str) -> bool {
        if let Some(year) = self.year
            && date.get(0..4) != Some(format!("{year:04}").as_str())
        {
            return false;
        }
        if let Some(month) = self.month
            && date.get(5..7) != Some(format!("{month:02}").as_str())
        {
            return false;
        }
        true
    }

    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches_income(&self, entry: &IncomeEntry) -> bool {
        if !self.matches_date(&entry.date) {
            return false;
        }
        let Some(needle) = self.needle() else {
            return true;
        };
        [
            Some(entry.description.as_str()),
            entry.recipient.as_deref(),
            Some(entry.user_name.as_str()),
            Some(entry.category.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches_ticket(&self, entry: &TicketEntry) -> bool {
        if !self.matches_date(&entry.issue_date) {
            return false;
        }
        let Some(needle) = self.needle() else {
            return true;
        };
        [
            &entry.passenger_name,
            &entry.pnr,
            &entry.flight_name,
            &entry.from,
            &entry.to,
            &entry.user_name,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply_income(&self, entries: Vec<IncomeEntry>) -> Vec<IncomeEntry> {
        entries
            .into_iter()
            .filter(|e| self.matches_income(e))
            .collect()
    }

    pub fn apply_tickets(&self, entries: Vec<TicketEntry>) -> Vec<TicketEntry> {
        entries
            .into_iter()
            .filter(|e| self.matches_ticket(e))
            .collect()
    }
}

/// Sum amounts per category.
pub fn category_totals(entries: &[IncomeEntry]) -> CategoryTotals {
    entries
        .iter()
        .fold(CategoryTotals::default(), |mut totals, entry| {
            let slot = match entry.category {
                IncomeCategory::IncomeAdd => &mut totals.income_add,
                IncomeCategory::IncomeMinus => &mut totals.income_minus,
                IncomeCategory::IncomePayment => &mut totals.income_payment,
                IncomeCategory::OtpAdd => &mut totals.otp_add,
                IncomeCategory::OtpMinus => &mut totals.otp_minus,
                IncomeCategory::OtpPayment => &mut totals.otp_payment,
            };
            *slot = slot.saturating_add(entry.amount);
            totals
        })
}

/// Income Add − (Income Minus + Income Payment).
pub fn net_income(totals: &CategoryTotals) -> i64 {
    totals
        .income_add
        .saturating_sub(totals.income_minus.saturating_add(totals.income_payment))
}

/// OTP Add − (OTP Minus + OTP Payment).
pub fn net_otp(totals: &CategoryTotals) -> i64 {
    totals
        .otp_add
        .saturating_sub(totals.otp_minus.saturating_add(totals.otp_payment))
}

pub fn summarize(income: &[IncomeEntry], tickets: &[TicketEntry]) -> Summary {
    let totals = category_totals(income);
    Summary {
        net_income: net_income(&totals),
        net_otp: net_otp(&totals),
        total_tickets: tickets.len() as u64,
        total_staff: None,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use api_types::{TicketStatus, TripType};
    use chrono::{TimeZone, Utc};

    use super::*;

    fn income(date: &str, category: IncomeCategory, amount: i64, description: &str) -> IncomeEntry {
        let at = Utc.timestamp_opt(0, 0).unwrap();
        IncomeEntry {
            id: 0,
            user_id: 1,
            user_name: "Rahim".to_string(),
            date: date.to_string(),
            time: "10:00".to_string(),
            category,
            amount,
            description: description.to_string(),
            recipient: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn ticket(issue_date: &str, passenger: &str) -> TicketEntry {
        let at = Utc.timestamp_opt(0, 0).unwrap();
        TicketEntry {
            id: 0,
            user_id: 1,
            user_name: "Rahim".to_string(),
            issue_date: issue_date.to_string(),
            passenger_name: passenger.to_string(),
            pnr: "X1Y2Z3".to_string(),
            trip_type: TripType::OneWay,
            flight_name: "QR 640".to_string(),
            from: "DOH".to_string(),
            to: "DAC".to_string(),
            departure_date: issue_date.to_string(),
            arrival_date: issue_date.to_string(),
            return_date: None,
            from_issuer: "Agency".to_string(),
            bd_number: None,
            qr_number: None,
            ticket_copy_url: None,
            ticket_copy_file_name: None,
            status: TicketStatus::Pending,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn net_income_subtracts_minus() {
        let entries = vec![
            income("2025-01-01", IncomeCategory::IncomeAdd, 300, "a"),
            income("2025-01-02", IncomeCategory::IncomeAdd, 200, "b"),
            income("2025-01-03", IncomeCategory::IncomeMinus, 120, "c"),
        ];
        let summary = summarize(&entries, &[]);
        assert_eq!(summary.totals.income_add, 500);
        assert_eq!(summary.totals.income_minus, 120);
        assert_eq!(summary.net_income, 380);
        assert_eq!(summary.net_otp, 0);
        assert_eq!(summary.total_staff, None);
    }

    #[test]
    fn payments_count_as_deductions() {
        let entries = vec![
            income("2025-01-01", IncomeCategory::IncomeAdd, 1000, "a"),
            income("2025-01-01", IncomeCategory::IncomePayment, 250, "b"),
            income("2025-01-01", IncomeCategory::OtpAdd, 400, "c"),
            income("2025-01-01", IncomeCategory::OtpMinus, 50, "d"),
            income("2025-01-01", IncomeCategory::OtpPayment, 100, "e"),
        ];
        let summary = summarize(&entries, &[ticket("2025-01-01", "A")]);
        assert_eq!(summary.net_income, 750);
        assert_eq!(summary.net_otp, 250);
        assert_eq!(summary.total_tickets, 1);
    }

    #[test]
    fn otp_and_income_are_kept_apart() {
        let entries = vec![income("2025-01-01", IncomeCategory::OtpAdd, 70, "a")];
        let summary = summarize(&entries, &[]);
        assert_eq!(summary.net_income, 0);
        assert_eq!(summary.net_otp, 70);
    }

    #[test]
    fn year_and_month_match_date_prefix() {
        let filter = SummaryFilter {
            year: Some(2025),
            month: Some(3),
            search: None,
        };
        let entries = vec![
            income("2025-03-10", IncomeCategory::IncomeAdd, 1, "in"),
            income("2025-04-10", IncomeCategory::IncomeAdd, 1, "out"),
            income("2024-03-10", IncomeCategory::IncomeAdd, 1, "out"),
        ];
        let kept = filter.apply_income(entries);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].description, "in");
    }

    #[test]
    fn month_without_year_spans_years() {
        let filter = SummaryFilter {
            month: Some(12),
            ..Default::default()
        };
        let tickets = vec![
            ticket("2024-12-01", "A"),
            ticket("2025-12-31", "B"),
            ticket("2025-11-30", "C"),
        ];
        assert_eq!(filter.apply_tickets(tickets).len(), 2);
    }

    #[test]
    fn search_is_case_insensitive() {
        let filter = SummaryFilter {
            search: Some("  KARIM ".to_string()),
            ..Default::default()
        };
        let mut paid = income("2025-01-01", IncomeCategory::IncomePayment, 5, "rent");
        paid.recipient = Some("Karim Uddin".to_string());
        let entries = vec![
            paid,
            income("2025-01-01", IncomeCategory::IncomeAdd, 5, "karimganj sale"),
            income("2025-01-01", IncomeCategory::IncomeAdd, 5, "other"),
        ];
        assert_eq!(filter.apply_income(entries).len(), 2);

        let filter = SummaryFilter {
            search: Some("dac".to_string()),
            ..Default::default()
        };
        assert!(filter.matches_ticket(&ticket("2025-01-01", "A")));
    }

    #[test]
    fn blank_search_matches_everything() {
        let filter = SummaryFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.matches_income(&income(
            "2025-01-01",
            IncomeCategory::IncomeAdd,
            1,
            "x"
        )));
    }
}
