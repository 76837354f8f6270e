//! Environment-driven configuration.

use crate::{ClientBuilder, Error, Result};
use std::fmt;

/// Environment variable holding the MailSlurp API key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Optional environment variable overriding the API base URL.
pub const BASE_URL_VAR: &str = "MAILSLURP_BASE_URL";

/// Connection settings read once at startup.
#[derive(Clone)]
pub struct Config {
    api_key: String,
    base_url: Option<String>,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Fails with [`Error::MissingApiKey`] when `API_KEY` is unset or blank,
    /// before any network call is made.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey)?;

        let base_url = lookup(BASE_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(Self { api_key, base_url })
    }

    /// Base URL override, if one was configured.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// A client builder seeded with this configuration.
    pub fn builder(&self) -> ClientBuilder {
        let builder = ClientBuilder::new().api_key(&self.api_key);
        match &self.base_url {
            Some(url) => builder.base_url(url),
            None => builder,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
