//! Bot configuration.
//!
//! Defaults describe the Rivas deporsite booking flow. Everything that
//! varies between machines (credentials, WebDriver endpoint, directories)
//! comes from the environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::EndpointClass;

/// Default WebDriver endpoint (a local chromedriver).
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

const ENV_USER: &str = "GYM_USER";
const ENV_PASS: &str = "GYM_PASS";
const ENV_WEBDRIVER_URL: &str = "WEBDRIVER_URL";
const ENV_HOLIDAYS_DIR: &str = "RIVASBOT_HOLIDAYS_DIR";
const ENV_EVIDENCE_DIR: &str = "RIVASBOT_EVIDENCE_DIR";
const ENV_HEADLESS: &str = "RIVASBOT_HEADLESS";

/// Errors reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but its value makes no sense
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Login credentials for the booking site.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// The booking site: where to go and what to click.
#[derive(Debug, Clone)]
pub struct FacilityConfig {
    /// Booking grid for weekday evening slots.
    pub weekday_url: String,
    /// Booking grid for weekend and holiday morning slots.
    pub weekend_url: String,
    /// Login page; a redirect here means credentials are needed.
    pub login_url: String,
    /// Label of the duration option in the slot dialog.
    pub duration_label: String,
    /// Label text of the username field.
    pub user_label: String,
    /// Label text of the password field.
    pub pass_label: String,
    /// Name of the login submit button.
    pub login_button: String,
    /// Name of the button that commits the reservation.
    pub confirm_button: String,
    /// Texts that show the reservation went through, probed in order.
    pub confirmation_texts: Vec<String>,
}

impl FacilityConfig {
    /// Booking grid URL for an endpoint class.
    pub fn url_for(&self, endpoint: EndpointClass) -> &str {
        match endpoint {
            EndpointClass::Weekday => &self.weekday_url,
            EndpointClass::WeekendOrHoliday => &self.weekend_url,
        }
    }
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            weekday_url: "https://deportesrivas.deporsite.net/reservas?IdDeporte=37".to_string(),
            weekend_url: "https://deportesrivas.deporsite.net/reservas?IdDeporte=56".to_string(),
            login_url: "https://deportesrivas.deporsite.net/login".to_string(),
            duration_label: "90'".to_string(),
            user_label: "Usuario".to_string(),
            pass_label: "Contraseña".to_string(),
            login_button: "Acceder".to_string(),
            confirm_button: "Reservar".to_string(),
            confirmation_texts: vec![
                "Reserva confirmada".to_string(),
                "Reserva realizada".to_string(),
                "Cancelar reserva".to_string(),
                "Mis reservas".to_string(),
            ],
        }
    }
}

/// Bounds for each step of a booking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTimeouts {
    pub navigation: Duration,
    pub slot: Duration,
    pub duration: Duration,
    /// Label-based lookups on the login form.
    pub login_primary: Duration,
    /// Positional lookups on the login form.
    pub login_fallback: Duration,
    pub confirm: Duration,
    pub quiescence: Duration,
    /// Each confirmation indicator probe.
    pub indicator: Duration,
}

impl Default for StepTimeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(60),
            slot: Duration::from_secs(30),
            duration: Duration::from_secs(30),
            login_primary: Duration::from_secs(2),
            login_fallback: Duration::from_secs(4),
            confirm: Duration::from_secs(60),
            quiescence: Duration::from_secs(60),
            indicator: Duration::from_secs(2),
        }
    }
}

/// Everything the bot needs to run.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Only required if the site asks for a login.
    pub credentials: Option<Credentials>,
    pub webdriver_url: String,
    pub headless: bool,
    /// Directory holding `festivos_rivas_<YEAR>.json` files.
    pub holidays_dir: PathBuf,
    /// Directory screenshots are written to.
    pub evidence_dir: PathBuf,
    pub facility: FacilityConfig,
    pub timeouts: StepTimeouts,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            holidays_dir: PathBuf::from("."),
            evidence_dir: PathBuf::from("."),
            facility: FacilityConfig::default(),
            timeouts: StepTimeouts::default(),
        }
    }
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps variable names to
    /// values.
    ///
    /// Credentials are only set when both user and password are present
    /// and non-empty; their absence is not an error here.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let (Some(user), Some(pass)) = (non_empty(ENV_USER), non_empty(ENV_PASS)) {
            config.credentials = Some(Credentials::new(user, pass));
        }

        if let Some(url) = non_empty(ENV_WEBDRIVER_URL) {
            config.webdriver_url = url.trim_end_matches('/').to_string();
        }

        if let Some(dir) = non_empty(ENV_HOLIDAYS_DIR) {
            config.holidays_dir = PathBuf::from(dir);
        }

        if let Some(dir) = non_empty(ENV_EVIDENCE_DIR) {
            config.evidence_dir = PathBuf::from(dir);
        }

        if let Some(value) = non_empty(ENV_HEADLESS) {
            config.headless = parse_bool(ENV_HEADLESS, &value)?;
        }

        Ok(config)
    }

    /// Attach credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Write screenshots to `dir`.
    pub fn with_evidence_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.evidence_dir = dir.into();
        self
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "expected true/false",
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = BotConfig::from_lookup(lookup(&[])).unwrap();

        assert!(config.credentials.is_none());
        assert_eq!(config.webdriver_url, DEFAULT_WEBDRIVER_URL);
        assert!(config.headless);
        assert_eq!(config.holidays_dir, PathBuf::from("."));
        assert_eq!(config.timeouts, StepTimeouts::default());
    }

    #[test]
    fn default_timeouts() {
        let t = StepTimeouts::default();
        assert_eq!(t.navigation, Duration::from_secs(60));
        assert_eq!(t.slot, Duration::from_secs(30));
        assert_eq!(t.duration, Duration::from_secs(30));
        assert_eq!(t.login_primary, Duration::from_secs(2));
        assert_eq!(t.login_fallback, Duration::from_secs(4));
        assert_eq!(t.confirm, Duration::from_secs(60));
        assert_eq!(t.quiescence, Duration::from_secs(60));
        assert_eq!(t.indicator, Duration::from_secs(2));
    }

    #[test]
    fn reads_environment() {
        let config = BotConfig::from_lookup(lookup(&[
            ("GYM_USER", "ana"),
            ("GYM_PASS", "secret"),
            ("WEBDRIVER_URL", "http://127.0.0.1:4444/"),
            ("RIVASBOT_HOLIDAYS_DIR", "/etc/rivas"),
            ("RIVASBOT_EVIDENCE_DIR", "/tmp/shots"),
            ("RIVASBOT_HEADLESS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.credentials, Some(Credentials::new("ana", "secret")));
        assert_eq!(config.webdriver_url, "http://127.0.0.1:4444");
        assert_eq!(config.holidays_dir, PathBuf::from("/etc/rivas"));
        assert_eq!(config.evidence_dir, PathBuf::from("/tmp/shots"));
        assert!(!config.headless);
    }

    #[test]
    fn partial_credentials_are_ignored() {
        let config = BotConfig::from_lookup(lookup(&[("GYM_USER", "ana")])).unwrap();
        assert!(config.credentials.is_none());

        let config =
            BotConfig::from_lookup(lookup(&[("GYM_USER", "ana"), ("GYM_PASS", "  ")])).unwrap();
        assert!(config.credentials.is_none());
    }

    #[test]
    fn invalid_headless_value() {
        let err = BotConfig::from_lookup(lookup(&[("RIVASBOT_HEADLESS", "maybe")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for RIVASBOT_HEADLESS: \"maybe\" (expected true/false)"
        );
    }

    #[test]
    fn password_is_redacted() {
        let creds = Credentials::new("ana", "secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ana"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn url_per_endpoint() {
        let facility = FacilityConfig::default();
        assert!(facility.url_for(EndpointClass::Weekday).ends_with("IdDeporte=37"));
        assert!(
            facility
                .url_for(EndpointClass::WeekendOrHoliday)
                .ends_with("IdDeporte=56")
        );
    }
}
