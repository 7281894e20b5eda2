//! Page layout of the staff report.
//!
//! Positions are millimetres on an A4 portrait page with the origin in the
//! top-left corner. Nothing here touches PDF; `pdf::render` only paints what
//! this module places.

use crate::{Branding, ReportData};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;

const LEFT: f32 = 15.0;
const RIGHT: f32 = 195.0;
const TOP: f32 = 20.0;
const ROW_HEIGHT: f32 = 7.0;
const SECTION_GAP: f32 = 10.0;
/// Rows starting below this line go to a new page.
const PAGE_BREAK_Y: f32 = 270.0;
/// The ticket table starts on a new page when the cursor is below this line.
const TICKETS_BREAK_Y: f32 = 200.0;

const DESCRIPTION_CHARS: usize = 30;
const PASSENGER_CHARS: usize = 15;
const FLIGHT_CHARS: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const DARK_BLUE: Rgb = Rgb(0, 0, 139);
    pub const GREY: Rgb = Rgb(60, 60, 60);
    pub const LIGHT_GREY: Rgb = Rgb(128, 128, 128);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    /// `x` is the centre of the text.
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        /// Points.
        size: f32,
        color: Rgb,
        align: Align,
        text: String,
    },
    /// Horizontal rule.
    Rule { x1: f32, x2: f32, y: f32 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

#[cfg(test)]
impl Page {
    /// Every text on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Rule { .. } => None,
        })
    }

    /// The y position of the first text equal to `needle`.
    pub fn find(&self, needle: &str) -> Option<f32> {
        self.elements.iter().find_map(|e| match e {
            Element::Text { text, y, .. } if text == needle => Some(*y),
            _ => None,
        })
    }
}

struct Column {
    title: String,
    x: f32,
}

fn columns(headers: &[(&str, f32)]) -> Vec<Column> {
    headers
        .iter()
        .map(|(title, x)| Column {
            title: title.to_string(),
            x: *x,
        })
        .collect()
}

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new(y: f32) -> Self {
        Self {
            pages: vec![Page::default()],
            y,
        }
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, color: Rgb, text: impl Into<String>) {
        self.push(Element::Text {
            x,
            y,
            size,
            color,
            align: Align::Left,
            text: text.into(),
        });
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = TOP;
    }

    fn column_headers(&mut self, columns: &[Column]) {
        for column in columns {
            self.text(column.x, self.y, 9.0, Rgb::BLACK, column.title.clone());
        }
        self.y += ROW_HEIGHT;
        self.push(Element::Rule {
            x1: LEFT,
            x2: RIGHT,
            y: self.y - 2.0,
        });
    }

    fn table(&mut self, title: &str, columns: &[Column], rows: Vec<Vec<String>>) {
        self.text(LEFT, self.y, 14.0, Rgb::DARK_BLUE, title);
        self.y += SECTION_GAP;
        self.column_headers(columns);

        for row in rows {
            if self.y > PAGE_BREAK_Y {
                self.new_page();
                self.column_headers(columns);
            }
            for (column, cell) in columns.iter().zip(row) {
                self.text(column.x, self.y, 9.0, Rgb::BLACK, cell);
            }
            self.y += ROW_HEIGHT;
        }
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

fn money(currency: &str, amount: i64) -> String {
    format!("{currency} {amount}.00")
}

/// Lay out the whole report.
pub fn layout(data: &ReportData, branding: &Branding) -> Vec<Page> {
    let mut cursor = Cursor::new(TOP);

    cursor.text(50.0, 20.0, 20.0, Rgb::DARK_BLUE, branding.company.as_str());
    cursor.text(50.0, 27.0, 10.0, Rgb::GREY, branding.tagline.as_str());
    cursor.text(LEFT, 50.0, 16.0, Rgb::BLACK, "STAFF REPORT");
    cursor.text(
        LEFT,
        60.0,
        11.0,
        Rgb::BLACK,
        format!("Staff Name: {}", data.staff_name),
    );
    cursor.text(LEFT, 67.0, 11.0, Rgb::BLACK, format!("Period: {}", data.period));
    cursor.text(
        LEFT,
        74.0,
        11.0,
        Rgb::BLACK,
        format!("Generated: {}", data.generated.format("%Y-%m-%d")),
    );

    cursor.text(LEFT, 90.0, 14.0, Rgb::DARK_BLUE, "Summary");
    cursor.text(
        LEFT,
        100.0,
        11.0,
        Rgb::BLACK,
        format!(
            "Total Income: {}",
            money(&branding.currency, data.total_income)
        ),
    );
    cursor.text(
        LEFT,
        107.0,
        11.0,
        Rgb::BLACK,
        format!("Total OTP: {}", money(&branding.currency, data.total_otp)),
    );
    cursor.text(
        LEFT,
        114.0,
        11.0,
        Rgb::BLACK,
        format!("Total Tickets: {}", data.total_tickets),
    );

    cursor.y = 130.0;

    if !data.income.is_empty() {
        let amount_title = format!("Amount ({})", branding.currency);
        let income_columns = columns(&[
            ("Date", 15.0),
            ("Type", 50.0),
            ("Description", 90.0),
            (amount_title.as_str(), 160.0),
        ]);
        let rows = data
            .income
            .iter()
            .map(|row| {
                vec![
                    row.date.clone(),
                    row.kind.clone(),
                    truncate(&row.description, DESCRIPTION_CHARS),
                    format!("{}.00", row.amount),
                ]
            })
            .collect();
        cursor.table("Income Entries", &income_columns, rows);
        cursor.y += SECTION_GAP;
    }

    if !data.tickets.is_empty() {
        if cursor.y > TICKETS_BREAK_Y {
            cursor.new_page();
        }
        let ticket_columns = columns(&[
            ("Date", 15.0),
            ("Passenger", 40.0),
            ("PNR", 80.0),
            ("Flight", 110.0),
            ("Route", 145.0),
        ]);
        let rows = data
            .tickets
            .iter()
            .map(|row| {
                vec![
                    row.date.clone(),
                    truncate(&row.passenger, PASSENGER_CHARS),
                    row.pnr.clone(),
                    truncate(&row.flight, FLIGHT_CHARS),
                    format!("{}-{}", row.from, row.to),
                ]
            })
            .collect();
        cursor.table("Ticket Entries", &ticket_columns, rows);
    }

    let mut pages = cursor.pages;
    let count = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        for (y, text) in [
            (PAGE_HEIGHT - 10.0, format!("Page {} of {count}", index + 1)),
            (PAGE_HEIGHT - 5.0, branding.footer.clone()),
        ] {
            page.elements.push(Element::Text {
                x: PAGE_WIDTH / 2.0,
                y,
                size: 8.0,
                color: Rgb::LIGHT_GREY,
                align: Align::Center,
                text,
            });
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{IncomeRow, TicketRow};

    fn data(income_rows: usize, ticket_rows: usize) -> ReportData {
        ReportData {
            staff_name: "Jane Doe".to_string(),
            period: "January 2025".to_string(),
            generated: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            income: (0..income_rows)
                .map(|i| IncomeRow {
                    date: format!("2025-01-{:02}", i % 28 + 1),
                    kind: "Income Add".to_string(),
                    description: format!("row {i}"),
                    amount: 100,
                })
                .collect(),
            tickets: (0..ticket_rows)
                .map(|i| TicketRow {
                    date: "2025-01-02".to_string(),
                    passenger: format!("Passenger {i}"),
                    pnr: "ABC123".to_string(),
                    flight: "QR 640".to_string(),
                    from: "DOH".to_string(),
                    to: "DAC".to_string(),
                })
                .collect(),
            total_income: 380,
            total_otp: 30,
            total_tickets: ticket_rows as u64,
        }
    }

    #[test]
    fn header_and_summary_are_placed() {
        let pages = layout(&data(0, 0), &Branding::default());
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert_eq!(page.find("AMIN TOUCH"), Some(20.0));
        assert_eq!(page.find("STAFF REPORT"), Some(50.0));
        assert_eq!(page.find("Staff Name: Jane Doe"), Some(60.0));
        assert_eq!(page.find("Generated: 2025-03-01"), Some(74.0));
        assert_eq!(page.find("Total Income: QR 380.00"), Some(100.0));
        assert_eq!(page.find("Total OTP: QR 30.00"), Some(107.0));
        assert_eq!(page.find("Total Tickets: 0"), Some(114.0));
        assert_eq!(page.find("Income Entries"), None);
        assert_eq!(page.find("Ticket Entries"), None);
    }

    #[test]
    fn income_rows_start_below_column_headers() {
        let pages = layout(&data(2, 0), &Branding::default());
        let page = &pages[0];
        assert_eq!(page.find("Income Entries"), Some(130.0));
        assert_eq!(page.find("Description"), Some(140.0));
        assert_eq!(page.find("row 0"), Some(147.0));
        assert_eq!(page.find("row 1"), Some(154.0));
        assert!(page.elements.contains(&Element::Rule {
            x1: 15.0,
            x2: 195.0,
            y: 145.0
        }));
    }

    #[test]
    fn page_break_repeats_column_headers() {
        let pages = layout(&data(20, 0), &Branding::default());
        assert_eq!(pages.len(), 2);

        // Rows sit at 147 + 7k; the first one past 270 is row 18.
        assert_eq!(pages[0].find("row 17"), Some(266.0));
        assert_eq!(pages[0].find("row 18"), None);

        let second = &pages[1];
        assert_eq!(second.find("Date"), Some(20.0));
        assert_eq!(second.find("Description"), Some(20.0));
        assert_eq!(second.find("Amount (QR)"), Some(20.0));
        assert_eq!(second.find("row 18"), Some(27.0));
        assert_eq!(second.find("Income Entries"), None);
        assert!(second.elements.contains(&Element::Rule {
            x1: 15.0,
            x2: 195.0,
            y: 25.0
        }));
    }

    #[test]
    fn long_fields_are_truncated() {
        let mut report = data(1, 1);
        report.income[0].description = "x".repeat(45);
        report.tickets[0].passenger = "Muhammad Abdullah Rahman".to_string();
        report.tickets[0].flight = "Qatar Airways QR 640".to_string();

        let pages = layout(&report, &Branding::default());
        let texts: Vec<&str> = pages[0].texts().collect();
        assert!(texts.contains(&"x".repeat(30).as_str()));
        assert!(texts.contains(&"Muhammad Abdull"));
        assert!(texts.contains(&"Qatar Airway"));
        assert!(texts.contains(&"DOH-DAC"));
    }

    #[test]
    fn tickets_move_to_new_page_when_low() {
        // 12 income rows leave the cursor at 241.
        let pages = layout(&data(12, 1), &Branding::default());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].find("Ticket Entries"), None);
        assert_eq!(pages[1].find("Ticket Entries"), Some(20.0));
        assert_eq!(pages[1].find("Passenger 0"), Some(37.0));
    }

    #[test]
    fn tickets_follow_short_income_table() {
        let pages = layout(&data(1, 1), &Branding::default());
        assert_eq!(pages.len(), 1);
        // 130 + 10 + 7 + 7 + 10
        assert_eq!(pages[0].find("Ticket Entries"), Some(164.0));
    }

    #[test]
    fn every_page_has_numbered_footer() {
        let pages = layout(&data(20, 0), &Branding::default());
        assert_eq!(pages[0].find("Page 1 of 2"), Some(287.0));
        assert_eq!(pages[1].find("Page 2 of 2"), Some(287.0));
        for page in &pages {
            assert_eq!(
                page.find("© 2025 AMIN TOUCH. All rights reserved."),
                Some(292.0)
            );
        }
    }
}
