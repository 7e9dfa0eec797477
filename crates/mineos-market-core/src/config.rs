//! Client configuration.
//!
//! A [`Config`] is owned by one [`MarketClient`](crate::MarketClient) and
//! read by every request it sends. Defaults point at the public MineOS
//! Market API; [`ConfigOverrides`] replaces individual fields at
//! construction time or later through
//! [`MarketClient::use_config`](crate::MarketClient::use_config).
//!
//! # Environment
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MINEOS_MARKET_HOST_URL` | `host_url` |
//! | `MINEOS_MARKET_PROXY_URL` | `proxy_url` |
//! | `MINEOS_MARKET_USER_AGENT` | `user_agent` (empty value removes the header) |
//! | `MINEOS_MARKET_VALIDATE_RESPONSES` | `validate_responses` (`true`/`false`/`1`/`0`) |

use std::collections::BTreeMap;

use url::Url;

use crate::error::MarketError;

pub const DEFAULT_HOST_URL: &str = "http://mineos.buttex.ru/MineOSAPI/2.04/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh Intel Mac OS X 10_13_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.119 Safari/537.36";

pub const HOST_URL_ENV: &str = "MINEOS_MARKET_HOST_URL";
pub const PROXY_URL_ENV: &str = "MINEOS_MARKET_PROXY_URL";
pub const USER_AGENT_ENV: &str = "MINEOS_MARKET_USER_AGENT";
pub const VALIDATE_RESPONSES_ENV: &str = "MINEOS_MARKET_VALIDATE_RESPONSES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL every `<endpoint>.php` is resolved against.
    pub host_url: String,
    /// `None` sends no `User-Agent` header at all.
    pub user_agent: Option<String>,
    /// Extra headers. They win over the built-in ones on collision.
    pub headers: BTreeMap<String, String>,
    /// Prefix placed before the percent-encoded endpoint URL.
    pub proxy_url: Option<String>,
    /// Check `result` payloads against their endpoint schema.
    pub validate_responses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host_url: String::from(DEFAULT_HOST_URL),
            user_agent: Some(String::from(DEFAULT_USER_AGENT)),
            headers: BTreeMap::new(),
            proxy_url: None,
            validate_responses: true,
        }
    }
}

impl Config {
    pub fn with_overrides(overrides: ConfigOverrides) -> Self {
        let mut config = Self::default();
        config.apply(overrides);
        config
    }

    /// Defaults layered with the `MINEOS_MARKET_*` environment variables.
    pub fn from_env() -> Result<Self, MarketError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MarketError> {
        let mut overrides = ConfigOverrides::new();

        if let Some(host_url) = lookup(HOST_URL_ENV) {
            overrides = overrides.host_url(host_url);
        }
        if let Some(proxy_url) = lookup(PROXY_URL_ENV).filter(|value| !value.is_empty()) {
            overrides = overrides.proxy_url(proxy_url);
        }
        if let Some(user_agent) = lookup(USER_AGENT_ENV) {
            overrides = if user_agent.is_empty() {
                overrides.without_user_agent()
            } else {
                overrides.user_agent(user_agent)
            };
        }
        if let Some(flag) = lookup(VALIDATE_RESPONSES_ENV) {
            overrides = overrides.validate_responses(parse_flag(VALIDATE_RESPONSES_ENV, &flag)?);
        }

        let config = Self::with_overrides(overrides);
        config.base_url()?;
        Ok(config)
    }

    /// Replace every field the overrides carry. `headers` is replaced as a
    /// whole, not merged.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            host_url,
            user_agent,
            headers,
            proxy_url,
            validate_responses,
        } = overrides;

        if let Some(host_url) = host_url {
            self.host_url = host_url;
        }
        if let Some(user_agent) = user_agent {
            self.user_agent = user_agent;
        }
        if let Some(headers) = headers {
            self.headers = headers;
        }
        if let Some(proxy_url) = proxy_url {
            self.proxy_url = proxy_url;
        }
        if let Some(validate_responses) = validate_responses {
            self.validate_responses = validate_responses;
        }
    }

    fn base_url(&self) -> Result<Url, MarketError> {
        Url::parse(&self.host_url).map_err(|error| MarketError::InvalidConfig {
            message: format!("host url '{}' is not valid: {error}", self.host_url),
        })
    }

    /// Absolute URL a request for `endpoint` is sent to, proxy included.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<String, MarketError> {
        let resolved = self
            .base_url()?
            .join(&format!("{endpoint}.php"))
            .map_err(|error| MarketError::InvalidConfig {
                message: format!("cannot resolve endpoint '{endpoint}': {error}"),
            })?;

        Ok(match &self.proxy_url {
            Some(proxy_url) => format!("{proxy_url}{}", urlencoding::encode(resolved.as_str())),
            None => resolved.into(),
        })
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, MarketError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(MarketError::InvalidConfig {
            message: format!("{name} must be a boolean, got '{value}'"),
        }),
    }
}

/// Partial configuration. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub host_url: Option<String>,
    pub user_agent: Option<Option<String>>,
    pub headers: Option<BTreeMap<String, String>>,
    pub proxy_url: Option<Option<String>>,
    pub validate_responses: Option<bool>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host_url(mut self, host_url: impl Into<String>) -> Self {
        self.host_url = Some(host_url.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(Some(user_agent.into()));
        self
    }

    pub fn without_user_agent(mut self) -> Self {
        self.user_agent = Some(None);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(Some(proxy_url.into()));
        self
    }

    pub fn without_proxy(mut self) -> Self {
        self.proxy_url = Some(None);
        self
    }

    pub fn validate_responses(mut self, validate: bool) -> Self {
        self.validate_responses = Some(validate);
        self
    }
}
