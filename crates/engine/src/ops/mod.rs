use api_types::EntryListQuery;
use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::{ResultEngine, util::validate_optional_date};

mod access;
mod auth;
mod income;
mod tickets;
mod users;

pub use auth::LoginSession;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Default lifetime of a login session.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

/// Longest accepted lifetime of a login session (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    session_ttl: Duration,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Filters for listing income and ticket entries.
///
/// `start_date` and `end_date` are inclusive `YYYY-MM-DD` bounds compared
/// lexicographically. `user_id` is only honoured for admins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub user_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl EntryFilter {
    fn date_range(&self) -> ResultEngine<(Option<String>, Option<String>)> {
        Ok((
            validate_optional_date(self.start_date.as_deref(), "startDate")?,
            validate_optional_date(self.end_date.as_deref(), "endDate")?,
        ))
    }
}

impl From<EntryListQuery> for EntryFilter {
    fn from(query: EntryListQuery) -> Self {
        Self {
            user_id: query.user_id,
            start_date: query.start_date,
            end_date: query.end_date,
        }
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    session_ttl: Duration,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// How long a login session stays valid.
    pub fn session_ttl(mut self, ttl: Duration) -> EngineBuilder {
        self.session_ttl = ttl;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.session_ttl <= Duration::zero() {
            return Err(crate::EngineError::InvalidInput(
                "session ttl must be positive".to_string(),
            ));
        }
        if self.session_ttl > Duration::hours(MAX_SESSION_TTL_HOURS) {
            return Err(crate::EngineError::InvalidInput(format!(
                "session ttl must be at most {MAX_SESSION_TTL_HOURS} hours"
            )));
        }
        Ok(Engine {
            database: self.database,
            session_ttl: self.session_ttl,
        })
    }
}
