use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schema::Schema;
use crate::value::LuaValue;

/// Numeric wire enum: serialized as its id, parsed from its id or name.
macro_rules! wire_id_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, $expected:literal {
            $($variant:ident = $id:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn id(self) -> u8 {
                match self {
                    $(Self::$variant => $id),+
                }
            }

            pub const fn from_id(id: u8) -> Option<Self> {
                match id {
                    $($id => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Accepts exactly the wire ids.
            pub fn schema() -> Schema {
                Schema::enumeration(
                    $kind,
                    Self::ALL.iter().map(|item| LuaValue::Integer(i64::from(item.id()))),
                )
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.id()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ValidationError;

            fn try_from(id: u8) -> Result<Self, Self::Error> {
                Self::from_id(id).ok_or_else(|| ValidationError::UnknownVariant {
                    kind: $kind,
                    value: id.to_string(),
                    expected: $expected,
                })
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let normalized = value.trim().to_ascii_lowercase();
                if let Ok(id) = normalized.parse::<u8>() {
                    return Self::try_from(id);
                }
                Self::ALL
                    .iter()
                    .copied()
                    .find(|item| item.as_str() == normalized)
                    .ok_or_else(|| ValidationError::UnknownVariant {
                        kind: $kind,
                        value: value.to_owned(),
                        expected: $expected,
                    })
            }
        }
    };
}

wire_id_enum! {
    /// Store section a publication is listed under.
    PublicationCategory, "category", "applications, libraries, scripts, wallpapers" {
        Applications = 1 => "applications",
        Libraries = 2 => "libraries",
        Scripts = 3 => "scripts",
        Wallpapers = 4 => "wallpapers",
    }
}

wire_id_enum! {
    /// Language a publication description is translated into.
    PublicationLanguage, "language", "english, russian" {
        English = 18 => "english",
        Russian = 71 => "russian",
    }
}

impl Default for PublicationLanguage {
    fn default() -> Self {
        Self::English
    }
}

wire_id_enum! {
    /// Role of a file inside a publication.
    FileType, "file type", "main, resource, icon, localization, preview" {
        Main = 1 => "main",
        Resource = 2 => "resource",
        Icon = 3 => "icon",
        Localization = 4 => "localization",
        Preview = 5 => "preview",
    }
}

wire_id_enum! {
    License, "license", "mit, gpl3, agpl3, lgpl3, apache2, mpl2, unlicense" {
        Mit = 1 => "mit",
        Gpl3 = 2 => "gpl3",
        Agpl3 = 3 => "agpl3",
        Lgpl3 = 4 => "lgpl3",
        ApacheLicense2 = 5 => "apache2",
        Mpl2 = 6 => "mpl2",
        TheUnlicense = 7 => "unlicense",
    }
}

wire_id_enum! {
    VerificationStatus, "verification status", "unverified, verified" {
        Unverified = 0 => "unverified",
        Verified = 1 => "verified",
    }
}

wire_id_enum! {
    MessageStatus, "message status", "unread, read" {
        Unread = 0 => "unread",
        Read = 1 => "read",
    }
}

/// Sort key for publication listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Popularity,
    Rating,
    Name,
    Date,
}

impl OrderBy {
    pub const ALL: [Self; 4] = [Self::Popularity, Self::Rating, Self::Name, Self::Date];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::Rating => "rating",
            Self::Name => "name",
            Self::Date => "date",
        }
    }
}

impl Display for OrderBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBy {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "popularity" => Ok(Self::Popularity),
            "rating" => Ok(Self::Rating),
            "name" => Ok(Self::Name),
            "date" => Ok(Self::Date),
            _ => Err(ValidationError::UnknownVariant {
                kind: "order",
                value: value.to_owned(),
                expected: "popularity, rating, name, date",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl OrderDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl Display for OrderDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderDirection {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ValidationError::UnknownVariant {
                kind: "order direction",
                value: value.to_owned(),
                expected: "asc, desc",
            }),
        }
    }
}
