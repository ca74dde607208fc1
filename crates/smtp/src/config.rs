use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming the relay address, e.g. `mail.example.com:25`.
pub const SMTP_SERVER_VAR: &str = "SMTPSERVER";

fn default_hello_name() -> String {
    "localhost".to_owned()
}

/// SMTP relay configuration.
///
/// The relay address is fixed for the lifetime of a sender; every send dials
/// it fresh and closes the connection afterwards.
///
/// # Examples
///
/// ```
/// use courier_smtp::SmtpConfig;
///
/// let config = SmtpConfig::new("mail.example.com:25").with_hello_name("courier.example.com");
/// assert_eq!(config.relay_addr, "mail.example.com:25");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay dial target as a `host:port` string.
    pub relay_addr: String,

    /// Client name announced in the EHLO greeting. Defaults to `localhost`.
    #[serde(default = "default_hello_name")]
    pub hello_name: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self::new("localhost:25")
    }
}

impl SmtpConfig {
    /// Create a config pointing at the given relay address.
    pub fn new(relay_addr: impl Into<String>) -> Self {
        Self {
            relay_addr: relay_addr.into(),
            hello_name: default_hello_name(),
        }
    }

    /// Set the name announced in the EHLO greeting.
    #[must_use]
    pub fn with_hello_name(mut self, hello_name: impl Into<String>) -> Self {
        self.hello_name = hello_name.into();
        self
    }

    /// Load the relay address from the `SMTPSERVER` environment variable.
    ///
    /// The variable is required; an unset or empty value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let relay_addr = lookup(SMTP_SERVER_VAR)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingVar(SMTP_SERVER_VAR))?;
        Ok(Self::new(relay_addr))
    }
}
