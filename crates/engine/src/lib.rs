pub use api_types::{IncomeCategory, Role, TicketStatus, TripType};
pub use error::EngineError;
pub use income::IncomeEntry;
pub use ops::{
    DEFAULT_SESSION_TTL_HOURS, Engine, EngineBuilder, EntryFilter, LoginSession,
    MAX_SESSION_TTL_HOURS,
};
pub use summary::{SummaryFilter, category_totals, net_income, net_otp, summarize};
pub use tickets::TicketEntry;
pub use users::User;

mod error;
mod income;
mod ops;
mod password;
mod sessions;
mod summary;
mod tickets;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
