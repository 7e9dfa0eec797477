//! # Domain Models
//!
//! Typed views of the market's responses and its wire enums.
//!
//! Every response model carries a `schema()` describing the normalized
//! (camelCase) tree it is built from, so the same declaration drives both
//! validation and the serde field names.
//!
//! ## Models
//!
//! | Type | Endpoint |
//! |------|----------|
//! | [`UserCredentials`] | `login` |
//! | [`Dialog`] | `dialogs` |
//! | [`Message`] | `messages` |
//! | [`PreviewPublication`] | `publications` |
//! | [`Publication`], [`Dependency`] | `publication` |
//! | [`Review`], [`ReviewVotes`] | `reviews` |
//! | [`Statistic`] | `statistics` |
//!
//! ## Enums
//!
//! Numeric enums ([`PublicationCategory`], [`PublicationLanguage`],
//! [`FileType`], [`License`], [`VerificationStatus`], [`MessageStatus`])
//! travel as their ids; [`OrderBy`] and [`OrderDirection`] travel as
//! lowercase words. All of them parse from their names, which is what the
//! command line uses.

mod enums;
mod models;

pub use enums::{
    FileType, License, MessageStatus, OrderBy, OrderDirection, PublicationCategory,
    PublicationLanguage, VerificationStatus,
};
pub use models::{
    unix_time, Dependency, Dialog, Listing, Message, PreviewPublication, Publication, Rating,
    Review, ReviewVotes, Statistic, UserCredentials,
};
