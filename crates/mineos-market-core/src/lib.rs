//! # MineOS Market Core
//!
//! Typed client for the MineOS Market service.
//!
//! ## Overview
//!
//! The market speaks form-encoded POST requests and answers with Lua table
//! literals rather than JSON. This crate hides that behind a typed surface:
//!
//! - **Wire codec** for the Lua literal subset the service emits
//! - **Key normalization** from snake_case to camelCase
//! - **Field coercion** for textual fields sent as bare numbers
//! - **Schema validation** that reports every violation at once
//! - **Request pipeline** with auth gating and typed error surfacing
//! - **Service facades** for auth, messages, publications, reviews and statistics
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`case`] | snake_case → camelCase key rewriting |
//! | [`client`] | [`MarketClient`], session token and configuration owner |
//! | [`codec`] | Lua table literal decoder |
//! | [`coerce`] | Forced-string field coercion |
//! | [`config`] | Client configuration and overrides |
//! | [`domain`] | Response models and wire enums |
//! | [`envelope`] | `success`/`result`/`reason` response wrapper |
//! | [`error`] | Error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`params`] | Form parameter flattening |
//! | [`pipeline`] | Request pipeline and endpoint descriptors |
//! | [`schema`] | Declarative response schemas and validator |
//! | [`services`] | Per-domain facades |
//! | [`value`] | Decoded value tree |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mineos_market_core::{LoginParams, MarketClient, PublicationsQuery, PublicationCategory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mineos_market_core::MarketError> {
//!     let mut client = MarketClient::new();
//!
//!     let wallpapers = client
//!         .publications()
//!         .publications(&PublicationsQuery::new().category(PublicationCategory::Wallpapers))
//!         .await?;
//!     println!("{} wallpapers", wallpapers.len());
//!
//!     client.login(&LoginParams::with_email("user@example.com", "password")?).await?;
//!     for dialog in client.messages().dialogs().await? {
//!         println!("{}: {}", dialog.dialog_user_name, dialog.text);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns `Result<T, MarketError>`; nothing is retried or
//! recovered internally.
//!
//! ```rust,ignore
//! match client.statistics().statistic().await {
//!     Ok(statistic) => println!("{} users", statistic.users_count),
//!     Err(MarketError::Api { reason }) => eprintln!("server refused: {reason}"),
//!     Err(MarketError::Schema { violations, .. }) => eprintln!("unexpected shape: {violations}"),
//!     Err(other) => eprintln!("{other}"),
//! }
//! ```
//!
//! ## Security
//!
//! - Session tokens and passwords are never logged and are redacted from
//!   `Debug` output
//! - Tokens are sent only to endpoints that require authentication

pub mod case;
pub mod client;
pub mod codec;
pub mod coerce;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod params;
pub mod pipeline;
pub mod schema;
pub mod services;
pub mod value;

// Client
pub use client::MarketClient;

// Configuration
pub use config::{Config, ConfigOverrides};

// Domain models
pub use domain::{
    Dependency, Dialog, FileType, License, Message, MessageStatus, OrderBy, OrderDirection,
    PreviewPublication, Publication, PublicationCategory, PublicationLanguage, Rating, Review,
    ReviewVotes, Statistic, UserCredentials, VerificationStatus,
};

// Error types
pub use codec::DecodeError;
pub use error::{MarketError, ValidationError};
pub use schema::{FieldPath, Violation, Violations};

// HTTP client types
pub use http_client::{
    HttpClient, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient, TransportError,
};

// Pipeline
pub use pipeline::{Endpoint, RequestPipeline};

// Services
pub use services::{
    Auth, ChangePasswordParams, LoginIdentity, LoginParams, Messages, PublicationDependency,
    Publications, PublicationsQuery, RegisterParams, Reviews, ReviewsQuery, Statistics,
    UpdatePublication, UploadPublication,
};

// Wire values
pub use value::{LuaMap, LuaValue};
