//! Process configuration, read from the environment (and a `.env` file if one
//! is present).

use std::env;
use std::str::FromStr;

pub const DEFAULT_DATABASE: &str = "campaign_db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEV_MONGO_URI: &str = "mongodb://localhost:27017/campaign_db";

/// How strictly new campaigns are checked before they are inserted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Every field is accepted verbatim, including empty text.
    Lenient,
    /// The campaign name and client must not be empty.
    Strict,
}

impl Default for ValidationPolicy {
    fn default() -> ValidationPolicy {
        ValidationPolicy::Lenient
    }
}

impl FromStr for ValidationPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(ValidationPolicy::Lenient),
            "strict" => Ok(ValidationPolicy::Strict),
            other => Err(format!("unknown validation policy: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Connection string for the store; `None` leaves the store unconfigured.
    pub mongo_uri: Option<String>,
    /// Database used when the connection string does not name one.
    pub database: String,
    pub bind_addr: String,
    pub validation: ValidationPolicy,
    pub dev_mode: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            mongo_uri: None,
            database: DEFAULT_DATABASE.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            validation: ValidationPolicy::default(),
            dev_mode: false,
        }
    }
}

impl Config {
    /// Reads the process environment. `main` loads any `.env` file first.
    pub fn from_env() -> Config {
        Config::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Config {
        let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());

        let dev_mode = var("CAMPAIGN_TRACKER_DEV")
            .map(|value| is_truthy(&value))
            .unwrap_or(false);

        let mongo_uri = var("MONGO_URI").or_else(|| {
            if dev_mode {
                Some(DEV_MONGO_URI.to_string())
            } else {
                None
            }
        });

        let validation = match var("CAMPAIGN_TRACKER_VALIDATION").map(|value| value.parse()) {
            Some(Ok(policy)) => policy,
            Some(Err(err)) => {
                tracing::warn!("{}, using lenient validation", err);
                ValidationPolicy::Lenient
            }
            None => ValidationPolicy::Lenient,
        };

        Config {
            mongo_uri,
            database: var("CAMPAIGN_TRACKER_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.into()),
            bind_addr: var("CAMPAIGN_TRACKER_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            validation,
            dev_mode,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
