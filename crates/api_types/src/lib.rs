//! Request/response schema shared by the server and its clients.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generates `as_str`, `ALL` and `TryFrom<&str>` for a closed label set.
macro_rules! labels {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            /// Returns the canonical label used on the wire and in the database.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = String;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                match value {
                    $($label => Ok(Self::$variant),)+
                    other => Err(format!(
                        concat!("invalid ", stringify!($name), ": {}"),
                        other
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

labels!(Role {
    Admin => "admin",
    Staff => "staff",
});

/// The six cash movement labels. `Income *` and `OTP *` are reported apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeCategory {
    #[serde(rename = "Income Add")]
    IncomeAdd,
    #[serde(rename = "Income Minus")]
    IncomeMinus,
    #[serde(rename = "Income Payment")]
    IncomePayment,
    #[serde(rename = "OTP Add")]
    OtpAdd,
    #[serde(rename = "OTP Minus")]
    OtpMinus,
    #[serde(rename = "OTP Payment")]
    OtpPayment,
}

labels!(IncomeCategory {
    IncomeAdd => "Income Add",
    IncomeMinus => "Income Minus",
    IncomePayment => "Income Payment",
    OtpAdd => "OTP Add",
    OtpMinus => "OTP Minus",
    OtpPayment => "OTP Payment",
});

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripType {
    #[serde(rename = "1 Way")]
    OneWay,
    Return,
}

labels!(TripType {
    OneWay => "1 Way",
    Return => "Return",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

labels!(TicketStatus {
    Pending => "Pending",
    Confirmed => "Confirmed",
    Cancelled => "Cancelled",
});

/// Generic acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub success: bool,
        pub user: super::user::UserView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ChangePassword {
        pub current_password: String,
        pub new_password: String,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub id: i32,
        pub username: String,
        pub name: String,
        pub role: Role,
        pub last_signed_in: Option<DateTime<Utc>>,
    }
}

/// Query string shared by every list endpoint.
///
/// `start_date`/`end_date` are inclusive `YYYY-MM-DD` bounds. `user_id` is
/// only honoured for admins.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryListQuery {
    pub user_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub mod income {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeNew {
        pub date: String,
        pub time: String,
        #[serde(rename = "type")]
        pub category: IncomeCategory,
        pub amount: i64,
        pub description: String,
        pub recipient: Option<String>,
        /// Owner of the entry. Staff may only name themselves.
        pub user_id: Option<i32>,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeUpdate {
        pub date: Option<String>,
        pub time: Option<String>,
        #[serde(rename = "type")]
        pub category: Option<IncomeCategory>,
        pub amount: Option<i64>,
        pub description: Option<String>,
        pub recipient: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct IncomeView {
        pub id: i32,
        pub user_id: i32,
        pub user_name: String,
        pub date: String,
        pub time: String,
        #[serde(rename = "type")]
        pub category: IncomeCategory,
        pub amount: i64,
        pub description: String,
        pub recipient: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod ticket {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TicketNew {
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
        /// Defaults to `Pending`.
        pub status: Option<TicketStatus>,
        /// Owner of the entry. Staff may only name themselves.
        pub user_id: Option<i32>,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TicketUpdate {
        pub issue_date: Option<String>,
        pub passenger_name: Option<String>,
        pub pnr: Option<String>,
        pub trip_type: Option<TripType>,
        pub flight_name: Option<String>,
        pub from: Option<String>,
        pub to: Option<String>,
        pub departure_date: Option<String>,
        pub arrival_date: Option<String>,
        pub return_date: Option<String>,
        pub from_issuer: Option<String>,
        pub bd_number: Option<String>,
        pub qr_number: Option<String>,
        pub ticket_copy_url: Option<String>,
        pub ticket_copy_file_name: Option<String>,
        pub status: Option<TicketStatus>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TicketView {
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
}

pub mod stats {
    use super::*;

    /// Dashboard filter: the list filters plus in-memory year/month/search.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SummaryQuery {
        pub user_id: Option<i32>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub year: Option<i32>,
        pub month: Option<u32>,
        pub search: Option<String>,
        /// Free-form period label printed on exported reports.
        pub period: Option<String>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryTotals {
        pub income_add: i64,
        pub income_minus: i64,
        pub income_payment: i64,
        pub otp_add: i64,
        pub otp_minus: i64,
        pub otp_payment: i64,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Summary {
        pub totals: CategoryTotals,
        pub net_income: i64,
        pub net_otp: i64,
        pub total_tickets: u64,
        /// Number of staff accounts; only sent to admins.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub total_staff: Option<u64>,
    }
}

pub mod upload {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UploadNew {
        pub file_name: String,
        /// File content, standard base64 (a `data:` URL prefix is accepted).
        pub content_base64: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UploadResponse {
        pub url: String,
        pub file_name: String,
    }
}
