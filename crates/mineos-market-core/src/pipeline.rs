//! # Request Pipeline
//!
//! One round trip against a market endpoint, as a fixed sequence of
//! stages that each fail fast:
//!
//! ```text
//! auth gate ─▶ flatten params ─▶ POST ─▶ decode ─▶ camelCase keys
//!     ─▶ envelope unwrap ─▶ field coercion ─▶ schema check ─▶ typed result
//! ```
//!
//! Endpoints are described once by an [`Endpoint`]; the service facades
//! only pick the descriptor, build the parameters and name the result type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::case::normalize_keys;
use crate::codec::decode;
use crate::coerce::{coerce_known_fields, STRING_FIELDS};
use crate::config::Config;
use crate::envelope::Envelope;
use crate::error::MarketError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::params::flatten_serialize;
use crate::schema::{convert, validate, Schema};
use crate::value::LuaValue;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const TOKEN_PARAM: &str = "token";

/// Static description of one endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    /// Script name without `.php`.
    pub name: &'static str,
    pub requires_auth: bool,
    pub schema: Option<fn() -> Schema>,
}

impl Endpoint {
    pub const fn public(name: &'static str) -> Self {
        Self {
            name,
            requires_auth: false,
            schema: None,
        }
    }

    pub const fn authenticated(name: &'static str) -> Self {
        Self {
            name,
            requires_auth: true,
            schema: None,
        }
    }

    pub const fn with_schema(mut self, schema: fn() -> Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// Borrowed view of a client's state for the duration of one call.
#[derive(Clone, Copy)]
pub struct RequestPipeline<'a> {
    config: &'a Config,
    token: Option<&'a str>,
    http: &'a dyn HttpClient,
}

impl<'a> RequestPipeline<'a> {
    pub fn new(config: &'a Config, token: Option<&'a str>, http: &'a dyn HttpClient) -> Self {
        Self {
            config,
            token,
            http,
        }
    }

    /// Run the call and convert the result into `T`.
    ///
    /// An absent result is converted from `nil`, so `T` must accept it
    /// (`Option`, `()`) for endpoints that may answer without a payload.
    pub async fn fetch<T, P>(&self, endpoint: &Endpoint, params: &P) -> Result<T, MarketError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let result = self.call(endpoint, params).await?.unwrap_or(LuaValue::Nil);

        convert(result).map_err(|violations| {
            warn!(endpoint = endpoint.name, %violations, "result_conversion_failed");
            MarketError::Schema {
                endpoint: endpoint.name.to_owned(),
                violations,
            }
        })
    }

    /// Run the call for an endpoint whose payload is ignored.
    pub async fn send<P>(&self, endpoint: &Endpoint, params: &P) -> Result<(), MarketError>
    where
        P: Serialize + ?Sized,
    {
        self.call(endpoint, params).await.map(|_| ())
    }

    /// Run every stage and return the coerced (and, when enabled,
    /// validated) `result` tree.
    #[instrument(name = "market_request", skip_all, fields(endpoint = endpoint.name))]
    pub async fn call<P>(
        &self,
        endpoint: &Endpoint,
        params: &P,
    ) -> Result<Option<LuaValue>, MarketError>
    where
        P: Serialize + ?Sized,
    {
        let token = self.token.filter(|token| !token.is_empty());
        if endpoint.requires_auth && token.is_none() {
            warn!("auth_required");
            return Err(MarketError::AuthRequired {
                endpoint: endpoint.name.to_owned(),
            });
        }

        let mut form = flatten_serialize(params)?;
        if endpoint.requires_auth {
            if let Some(token) = token {
                form.insert(TOKEN_PARAM, token);
            }
        }

        let request = self.build_request(endpoint, form.encode())?;
        debug!(url = %request.url, params = form.len(), "request_prepared");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| MarketError::Network {
                endpoint: endpoint.name.to_owned(),
                message: error.to_string(),
            })?;
        debug!(status = response.status, bytes = response.body.len(), "response_received");

        if !response.is_success() {
            warn!(status = response.status, "http_status_failure");
            return Err(MarketError::Http {
                endpoint: endpoint.name.to_owned(),
                status: response.status,
                status_text: response.status_text,
            });
        }

        let decoded = match decode(&response.body) {
            Ok(decoded) => decoded,
            Err(source) => {
                warn!(error = %source, "decode_failed");
                return Err(MarketError::Decode {
                    endpoint: endpoint.name.to_owned(),
                    body: response.body,
                    source,
                });
            }
        };
        debug!(kind = decoded.kind_name(), "payload_decoded");

        let envelope = Envelope::from_value(normalize_keys(decoded)).map_err(|violations| {
            warn!(%violations, "envelope_invalid");
            MarketError::Schema {
                endpoint: endpoint.name.to_owned(),
                violations,
            }
        })?;

        let result = envelope.into_result(endpoint.name).inspect_err(|error| {
            warn!(reason = %error, "api_failure");
        })?;

        let result = result.map(|result| match result {
            LuaValue::Mapping(_) => coerce_known_fields(result, STRING_FIELDS),
            other => other,
        });

        if let Some(schema) = endpoint.schema.filter(|_| self.config.validate_responses) {
            let payload = result.as_ref().unwrap_or(&LuaValue::Nil);
            if let Err(violations) = validate(payload, &schema()) {
                warn!(count = violations.len(), %violations, "schema_violation");
                return Err(MarketError::Schema {
                    endpoint: endpoint.name.to_owned(),
                    violations,
                });
            }
        }

        Ok(result)
    }

    fn build_request(&self, endpoint: &Endpoint, body: String) -> Result<HttpRequest, MarketError> {
        let mut request = HttpRequest::post(self.config.endpoint_url(endpoint.name)?)
            .with_header("Content-Type", FORM_CONTENT_TYPE);

        if let Some(user_agent) = &self.config.user_agent {
            request = request.with_header("User-Agent", user_agent);
        }
        for (name, value) in &self.config.headers {
            request = request.with_header(name, value);
        }

        Ok(request.with_body(body))
    }
}
