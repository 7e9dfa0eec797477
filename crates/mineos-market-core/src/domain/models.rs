use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::domain::enums::{
    FileType, License, MessageStatus, PublicationCategory, VerificationStatus,
};
use crate::error::ValidationError;
use crate::schema::{NumberSchema, ObjectSchema, Schema};

/// Unix seconds as a UTC date-time. Out-of-range values yield `None`.
pub fn unix_time(seconds: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(seconds).ok()
}

/// Review score, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::RatingOutOfRange { value })
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn schema() -> Schema {
        NumberSchema::integer()
            .min(f64::from(Self::MIN))
            .max(f64::from(Self::MAX))
            .into()
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredentials {
    pub id: u64,
    pub token: String,
    pub name: String,
    pub email: String,
    pub is_verified: VerificationStatus,
    pub timestamp: i64,
}

impl UserCredentials {
    pub fn schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("id", Schema::integer())
                .required("token", Schema::string())
                .required("name", Schema::string())
                .required("email", Schema::email())
                .required("isVerified", VerificationStatus::schema())
                .required("timestamp", Schema::number()),
        )
    }

    pub fn logged_in_at(&self) -> Option<OffsetDateTime> {
        unix_time(self.timestamp)
    }
}

/// Conversation summary with its most recent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
    pub dialog_user_name: String,
    pub timestamp: i64,
    pub text: String,
    pub last_message_is_read: MessageStatus,
    pub last_message_user_name: String,
    pub last_message_user_id: u64,
}

impl Dialog {
    pub fn schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("dialogUserName", Schema::string())
                .required("timestamp", Schema::number())
                .required("text", Schema::string())
                .required("lastMessageIsRead", MessageStatus::schema())
                .required("lastMessageUserName", Schema::string())
                .required("lastMessageUserId", Schema::integer()),
        )
    }

    pub fn last_message_at(&self) -> Option<OffsetDateTime> {
        unix_time(self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    pub user_name: String,
    pub timestamp: i64,
}

impl Message {
    pub fn schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("text", Schema::string())
                .required("userName", Schema::string())
                .required("timestamp", Schema::number()),
        )
    }

    pub fn sent_at(&self) -> Option<OffsetDateTime> {
        unix_time(self.timestamp)
    }
}

/// Listing entry for a publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPublication {
    pub file_id: u64,
    pub publication_name: String,
    pub user_name: String,
    pub version: f64,
    pub category_id: PublicationCategory,
    pub reviews_count: u64,
    pub downloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
}

impl PreviewPublication {
    pub fn schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("fileId", Schema::integer())
                .required("publicationName", Schema::string())
                .required("userName", Schema::string())
                .required("version", Schema::number())
                .required("categoryId", PublicationCategory::schema())
                .required("reviewsCount", Schema::integer())
                .required("downloads", Schema::integer())
                .optional("iconUrl", Schema::string())
                .optional("averageRating", Schema::number())
                .optional("popularity", Schema::number()),
        )
    }
}

/// A file or publication another publication needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub source_url: String,
    pub path: String,
    pub version: f64,
    pub type_id: FileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<PublicationCategory>,
}

impl Dependency {
    pub fn schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("sourceUrl", Schema::string())
                .required("path", Schema::string())
                .required("version", Schema::number())
                .required("typeId", FileType::schema())
                .optional("publicationName", Schema::string())
                .optional("categoryId", PublicationCategory::schema()),
        )
    }
}

/// Full publication details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub file_id: u64,
    pub publication_name: String,
    pub user_name: String,
    pub version: f64,
    pub category_id: PublicationCategory,
    pub source_url: String,
    pub path: String,
    pub license_id: License,
    pub timestamp: i64,
    pub initial_description: String,
    pub translated_description: String,
    /// Dependency files keyed by their file id.
    #[serde(default, deserialize_with = "dependency_table")]
    pub dependencies_data: BTreeMap<u64, Dependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_dependencies: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whats_new: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whats_new_version: Option<f64>,
    pub downloads: u64,
}

impl Publication {
    pub fn schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("fileId", Schema::integer())
                .required("publicationName", Schema::string())
                .required("userName", Schema::string())
                .required("version", Schema::number())
                .required("categoryId", PublicationCategory::schema())
                .required("sourceUrl", Schema::string())
                .required("path", Schema::string())
                .required("licenseId", License::schema())
                .required("timestamp", Schema::number())
                .required("initialDescription", Schema::string())
                .required("translatedDescription", Schema::string())
                .optional(
                    "dependenciesData",
                    Schema::union([
                        Schema::array(Dependency::schema().optional()),
                        Schema::record(Dependency::schema()),
                    ]),
                )
                .optional("dependencies", Schema::array(Schema::integer()))
                .optional("allDependencies", Schema::array(Schema::integer()))
                .optional("iconUrl", Schema::string())
                .optional("averageRating", Schema::number())
                .optional("whatsNew", Schema::string())
                .optional("whatsNewVersion", Schema::number())
                .required("downloads", Schema::integer()),
        )
    }

    pub fn published_at(&self) -> Option<OffsetDateTime> {
        unix_time(self.timestamp)
    }
}

/// Accept either a keyed table (`[fileId] = {...}`) or a dense sequence in
/// which position `n` stands for file id `n + 1`; `nil` holes are dropped.
fn dependency_table<'de, D>(deserializer: D) -> Result<BTreeMap<u64, Dependency>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Table {
        Dense(Vec<Option<Dependency>>),
        Keyed(BTreeMap<String, Option<Dependency>>),
    }

    let table = Option::<Table>::deserialize(deserializer)?;
    let mut by_id = BTreeMap::new();

    match table {
        None => {}
        Some(Table::Dense(items)) => {
            for (position, item) in items.into_iter().enumerate() {
                if let Some(dependency) = item {
                    by_id.insert(position as u64 + 1, dependency);
                }
            }
        }
        Some(Table::Keyed(entries)) => {
            for (key, item) in entries {
                let id = key.parse::<u64>().map_err(|_| {
                    serde::de::Error::custom(format!("dependency key '{key}' is not a file id"))
                })?;
                if let Some(dependency) = item {
                    by_id.insert(id, dependency);
                }
            }
        }
    }

    Ok(by_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewVotes {
    pub total: u64,
    pub positive: u64,
}

impl ReviewVotes {
    pub fn schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("total", Schema::integer())
                .required("positive", Schema::integer()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u64,
    pub user_name: String,
    /// Raw score. Checked against `1..=5` only when response validation is on.
    pub rating: u8,
    pub comment: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<ReviewVotes>,
}

impl Review {
    pub fn schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("id", Schema::integer())
                .required("userName", Schema::string())
                .required("rating", Rating::schema())
                .required("comment", Schema::string())
                .required("timestamp", Schema::number())
                .optional("votes", ReviewVotes::schema()),
        )
    }

    pub fn posted_at(&self) -> Option<OffsetDateTime> {
        unix_time(self.timestamp)
    }
}

/// Store-wide counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistic {
    pub users_count: u64,
    pub publications_count: u64,
    pub reviews_count: u64,
    pub messages_count: u64,
    pub last_registered_user: String,
    pub most_popular_user: String,
}

impl Statistic {
    pub fn schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("usersCount", Schema::integer())
                .required("publicationsCount", Schema::integer())
                .required("reviewsCount", Schema::integer())
                .required("messagesCount", Schema::integer())
                .required("lastRegisteredUser", Schema::string())
                .required("mostPopularUser", Schema::string()),
        )
    }
}

/// List payload. The service normally answers with a sequence but some
/// endpoints send a table keyed by id; entries are then ordered by key.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T>(pub Vec<T>);

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    /// Sequence of `item`, or a table of `item` keyed by id.
    pub fn schema(item: Schema) -> Schema {
        Schema::union([Schema::array(item.clone()), Schema::record(item)])
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Listing<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Sequence(Vec<T>),
            Keyed(BTreeMap<String, T>),
        }

        Ok(Self(match Option::<Repr<T>>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(Repr::Sequence(items)) => items,
            Some(Repr::Keyed(entries)) => {
                let mut entries = entries.into_iter().collect::<Vec<_>>();
                entries.sort_by(|(left, _), (right, _)| {
                    match (left.parse::<u64>(), right.parse::<u64>()) {
                        (Ok(left), Ok(right)) => left.cmp(&right),
                        _ => left.cmp(right),
                    }
                });
                entries.into_iter().map(|(_, item)| item).collect()
            }
        }))
    }
}
