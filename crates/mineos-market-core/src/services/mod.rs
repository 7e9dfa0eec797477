//! # Service Facades
//!
//! Thin, typed call sites over the [request pipeline](crate::pipeline), one
//! per market domain. Each method picks a fixed endpoint, maps its
//! arguments to the snake_case wire parameters and names the result type.
//!
//! | Facade | Endpoints |
//! |--------|-----------|
//! | [`Auth`] | `login`, `register`, `change_password` |
//! | [`Messages`] | `dialogs`, `messages`, `message` |
//! | [`Publications`] | `publications`, `publication`, `download`, `upload`, `update`, `delete` |
//! | [`Reviews`] | `reviews`, `review_vote`, `review` |
//! | [`Statistics`] | `statistics` |
//!
//! Facades borrow their [`MarketClient`](crate::MarketClient) and never
//! catch errors: every failure reaches the caller as a
//! [`MarketError`](crate::MarketError).

mod auth;
mod messages;
mod publications;
mod reviews;
mod statistics;

pub use auth::{Auth, ChangePasswordParams, LoginIdentity, LoginParams, RegisterParams};
pub use messages::Messages;
pub use publications::{
    PublicationDependency, Publications, PublicationsQuery, UpdatePublication, UploadPublication,
    DEFAULT_MAIN_PATH, ICON_PATH, LOCALIZATIONS_DIR,
};
pub use reviews::{Reviews, ReviewsQuery};
pub use statistics::Statistics;
