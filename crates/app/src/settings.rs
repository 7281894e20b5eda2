//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and `STAFFBOOK__SECTION__KEY` environment
//! variables.
//!
//! See `settings.toml` for the configuration.
use chrono::TimeDelta;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub session_ttl_hours: i64,
    pub secure_cookies: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: 3000,
            database: Database::Sqlite("staffbook.db".to_string()),
            session_ttl_hours: engine::DEFAULT_SESSION_TTL_HOURS,
            secure_cookies: false,
        }
    }
}

impl Server {
    pub fn session_ttl(&self) -> Result<TimeDelta, ConfigError> {
        TimeDelta::try_hours(self.session_ttl_hours).ok_or_else(|| {
            ConfigError::Message(format!(
                "server.session_ttl_hours is out of range: {}",
                self.session_ttl_hours
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Report {
    pub company: String,
    pub tagline: String,
    pub currency: String,
    pub footer: String,
}

impl Default for Report {
    fn default() -> Self {
        let branding = report::Branding::default();
        Self {
            company: branding.company,
            tagline: branding.tagline,
            currency: branding.currency,
            footer: branding.footer,
        }
    }
}

impl From<Report> for report::Branding {
    fn from(value: Report) -> Self {
        Self {
            company: value.company,
            tagline: value.tagline,
            currency: value.currency,
            footer: value.footer,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Uploads {
    pub dir: String,
    pub public_url: String,
}

impl Default for Uploads {
    fn default() -> Self {
        Self {
            dir: "uploads".to_string(),
            public_url: "/uploads".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub report: Report,
    pub uploads: Uploads,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("STAFFBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    #[cfg(test)]
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(content, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("staffbook.db".to_string())
        );
        assert_eq!(settings.server.session_ttl_hours, 12);
        assert!(!settings.server.secure_cookies);
        assert_eq!(settings.report.currency, "QR");
        assert_eq!(settings.uploads.public_url, "/uploads");
    }

    #[test]
    fn sections_override_defaults() {
        let settings = Settings::from_toml(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 8080
            database = "memory"
            session_ttl_hours = 2
            secure_cookies = true

            [report]
            company = "ACME"
            "#,
        )
        .unwrap();
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.bind.as_deref(), Some("0.0.0.0"));
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.database, Database::Memory);
        assert_eq!(settings.server.session_ttl_hours, 2);
        assert!(settings.server.secure_cookies);
        assert_eq!(settings.report.company, "ACME");
        assert_eq!(settings.report.currency, "QR");
    }

    #[test]
    fn sqlite_path_is_a_table() {
        let settings = Settings::from_toml(
            r#"
            [server]
            database = { sqlite = "/var/lib/staffbook/data.db" }
            "#,
        )
        .unwrap();
        assert_eq!(
            settings.server.database,
            Database::Sqlite("/var/lib/staffbook/data.db".to_string())
        );
    }

    #[test]
    fn session_ttl_out_of_range_is_a_config_error() {
        let settings = Settings::from_toml(
            r#"
            [server]
            session_ttl_hours = 9223372036854775807
            "#,
        )
        .unwrap();
        assert!(matches!(
            settings.server.session_ttl(),
            Err(ConfigError::Message(_))
        ));

        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.server.session_ttl().unwrap(), TimeDelta::hours(12));
    }
}
