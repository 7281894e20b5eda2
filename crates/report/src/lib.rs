//! Staff report export: page layout, PDF rendering and CSV dumps.

use api_types::{income::IncomeView, ticket::TicketView};
use chrono::NaiveDate;

pub use error::ReportError;
pub use export::{income_csv, tickets_csv};
pub use layout::{Align, Element, Page, Rgb, layout};
pub use pdf::render;

mod error;
mod export;
mod layout;
mod pdf;

type ResultReport<T> = Result<T, ReportError>;

/// Fixed texts printed on every report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branding {
    pub company: String,
    pub tagline: String,
    /// Currency label printed before totals, e.g. `QR`.
    pub currency: String,
    pub footer: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            company: "AMIN TOUCH".to_string(),
            tagline: "TRADING CONTRACTING & HOSPITALITY SERVICES".to_string(),
            currency: "QR".to_string(),
            footer: "© 2025 AMIN TOUCH. All rights reserved.".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomeRow {
    pub date: String,
    /// Category label.
    pub kind: String,
    pub description: String,
    pub amount: i64,
}

impl From<&IncomeView> for IncomeRow {
    fn from(entry: &IncomeView) -> Self {
        Self {
            date: entry.date.clone(),
            kind: entry.category.to_string(),
            description: entry.description.clone(),
            amount: entry.amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketRow {
    pub date: String,
    pub passenger: String,
    pub pnr: String,
    pub flight: String,
    pub from: String,
    pub to: String,
}

impl From<&TicketView> for TicketRow {
    fn from(entry: &TicketView) -> Self {
        Self {
            date: entry.issue_date.clone(),
            passenger: entry.passenger_name.clone(),
            pnr: entry.pnr.clone(),
            flight: entry.flight_name.clone(),
            from: entry.from.clone(),
            to: entry.to.clone(),
        }
    }
}

/// Everything a staff report shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportData {
    pub staff_name: String,
    /// Free-form period label, e.g. `January 2025`.
    pub period: String,
    pub generated: NaiveDate,
    pub income: Vec<IncomeRow>,
    pub tickets: Vec<TicketRow>,
    pub total_income: i64,
    pub total_otp: i64,
    pub total_tickets: u64,
}

impl ReportData {
    pub fn file_name(&self) -> String {
        file_name(&self.staff_name, self.generated)
    }
}

/// `Jane  Doe` on 2025-03-01 becomes `Jane_Doe_Report_2025-03-01.pdf`.
pub fn file_name(staff_name: &str, generated: NaiveDate) -> String {
    let mut name = String::with_capacity(staff_name.len());
    let mut in_space = false;
    for c in staff_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    format!("{name}_Report_{}.pdf", generated.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn file_name_collapses_whitespace_runs() {
        assert_eq!(
            file_name("Jane  Doe", day("2025-03-01")),
            "Jane_Doe_Report_2025-03-01.pdf"
        );
        assert_eq!(
            file_name("Jane \t Q Doe", day("2025-12-31")),
            "Jane_Q_Doe_Report_2025-12-31.pdf"
        );
    }

    #[test]
    fn file_name_keeps_single_names() {
        assert_eq!(
            file_name("Rahim", day("2024-02-29")),
            "Rahim_Report_2024-02-29.pdf"
        );
    }
}
