use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tracing::debug;

use crate::config::{Config, ConfigOverrides};
use crate::domain::UserCredentials;
use crate::error::MarketError;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::pipeline::RequestPipeline;
use crate::services::{Auth, LoginParams, Messages, Publications, Reviews, Statistics};

/// Entry point to the market: owns one configuration, one optional
/// session token and one transport.
///
/// Requests borrow the client shared, so any number of them can run
/// concurrently; changing the token or configuration needs `&mut self` and
/// therefore cannot overlap an in-flight request. Separate clients never
/// share state.
#[derive(Clone)]
pub struct MarketClient {
    config: Config,
    token: Option<String>,
    http: Arc<dyn HttpClient>,
}

impl MarketClient {
    /// Default configuration over a reqwest transport.
    pub fn new() -> Self {
        Self::with_config(ConfigOverrides::new())
    }

    pub fn with_config(overrides: ConfigOverrides) -> Self {
        Self::with_http_client(
            Config::with_overrides(overrides),
            Arc::new(ReqwestHttpClient::new()),
        )
    }

    /// Use a custom transport, e.g. a recording fake in tests.
    pub fn with_http_client(config: Config, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            token: None,
            http,
        }
    }

    fn pipeline(&self) -> RequestPipeline<'_> {
        RequestPipeline::new(&self.config, self.token.as_deref(), self.http.as_ref())
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self.pipeline())
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages::new(self.pipeline())
    }

    pub fn publications(&self) -> Publications<'_> {
        Publications::new(self.pipeline())
    }

    pub fn reviews(&self) -> Reviews<'_> {
        Reviews::new(self.pipeline())
    }

    pub fn statistics(&self) -> Statistics<'_> {
        Statistics::new(self.pipeline())
    }

    /// Log in and keep the returned token for later authenticated calls.
    pub async fn login(&mut self, params: &LoginParams) -> Result<UserCredentials, MarketError> {
        let credentials = self.auth().login(params).await?;
        self.token = Some(credentials.token.clone());
        debug!(user = %credentials.name, "session_started");
        Ok(credentials)
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub fn use_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the fields carried by `overrides`, keeping the rest.
    pub fn use_config(&mut self, overrides: ConfigOverrides) {
        self.config.apply(overrides);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for MarketClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for MarketClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketClient")
            .field("config", &self.config)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}
