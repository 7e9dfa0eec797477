use serde::Serialize;

use crate::domain::{
    License, Listing, OrderBy, OrderDirection, PreviewPublication, Publication,
    PublicationCategory, PublicationLanguage,
};
use crate::error::{MarketError, ValidationError};
use crate::pipeline::{Endpoint, RequestPipeline};
use crate::schema::Schema;
use crate::services::auth::non_empty;

fn preview_list() -> Schema {
    Listing::<PreviewPublication>::schema(PreviewPublication::schema())
}

const PUBLICATIONS: Endpoint = Endpoint::public("publications").with_schema(preview_list);
const PUBLICATION: Endpoint = Endpoint::public("publication").with_schema(Publication::schema);
const DOWNLOAD: Endpoint = Endpoint::authenticated("download");
const UPLOAD: Endpoint = Endpoint::authenticated("upload");
const UPDATE: Endpoint = Endpoint::authenticated("update");
const DELETE: Endpoint = Endpoint::authenticated("delete");

pub const DEFAULT_MAIN_PATH: &str = "Main.lua";
pub const ICON_PATH: &str = "Icon.pic";
pub const LOCALIZATIONS_DIR: &str = "Localizations";

/// Filters for the publication listing. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationsQuery {
    pub category: Option<PublicationCategory>,
    pub order_by: Option<OrderBy>,
    pub order_direction: Option<OrderDirection>,
    pub offset: Option<u64>,
    pub count: Option<u64>,
    pub search: Option<String>,
    pub user_name: Option<String>,
    pub file_ids: Vec<u64>,
}

impl PublicationsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: PublicationCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn order(mut self, order_by: OrderBy, direction: OrderDirection) -> Self {
        self.order_by = Some(order_by);
        self.order_direction = Some(direction);
        self
    }

    pub fn page(mut self, offset: u64, count: u64) -> Self {
        self.offset = Some(offset);
        self.count = Some(count);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn file_ids(mut self, file_ids: impl IntoIterator<Item = u64>) -> Self {
        self.file_ids = file_ids.into_iter().collect();
        self
    }

    fn wire(&self) -> QueryWire<'_> {
        QueryWire {
            category_id: self.category,
            order_by: self.order_by,
            order_direction: self.order_direction,
            offset: self.offset,
            count: self.count,
            search: self.search.as_deref(),
            user_name: self.user_name.as_deref(),
            file_ids: &self.file_ids,
        }
    }
}

/// Extra file or publication bundled with an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationDependency {
    /// Another market publication, by name.
    Publication { name: String },
    /// A file downloaded from `source_url` into `path`.
    File { source_url: String, path: String },
}

/// Contents of a new publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPublication {
    pub name: String,
    pub description: String,
    pub category: PublicationCategory,
    pub license: License,
    pub source_url: String,
    /// Install path of the main file, `Main.lua` when unset.
    pub path: Option<String>,
    pub icon_url: Option<String>,
    pub previews: Vec<String>,
    pub localizations: Vec<String>,
    pub dependencies: Vec<PublicationDependency>,
}

impl UploadPublication {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: PublicationCategory,
        license: License,
        source_url: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: non_empty("name", name.into())?,
            description: description.into(),
            category,
            license,
            source_url: non_empty("source_url", source_url.into())?,
            path: None,
            icon_url: None,
            previews: Vec::new(),
            localizations: Vec::new(),
            dependencies: Vec::new(),
        })
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_icon(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }

    pub fn with_preview(mut self, preview_url: impl Into<String>) -> Self {
        self.previews.push(preview_url.into());
        self
    }

    pub fn with_localization(mut self, localization_url: impl Into<String>) -> Self {
        self.localizations.push(localization_url.into());
        self
    }

    pub fn with_dependency(mut self, dependency: PublicationDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Wire list: icon, previews, localizations, then explicit dependencies.
    fn dependency_list(&self) -> Vec<DependencyWire<'_>> {
        let icon = self.icon_url.iter().map(|url| DependencyWire {
            source_url: Some(url.as_str()),
            path: Some(ICON_PATH.to_owned()),
            ..DependencyWire::default()
        });
        let previews = self.previews.iter().map(|url| DependencyWire {
            source_url: Some(url.as_str()),
            path: Some(last_segment(url).to_owned()),
            preview: Some(1),
            ..DependencyWire::default()
        });
        let localizations = self.localizations.iter().map(|url| DependencyWire {
            source_url: Some(url.as_str()),
            path: Some(format!("{LOCALIZATIONS_DIR}/{}", last_segment(url))),
            ..DependencyWire::default()
        });
        let explicit = self.dependencies.iter().map(|dependency| match dependency {
            PublicationDependency::Publication { name } => DependencyWire {
                publication_name: Some(name.as_str()),
                ..DependencyWire::default()
            },
            PublicationDependency::File { source_url, path } => DependencyWire {
                source_url: Some(source_url.as_str()),
                path: Some(path.clone()),
                ..DependencyWire::default()
            },
        });

        icon.chain(previews)
            .chain(localizations)
            .chain(explicit)
            .collect()
    }

    fn wire<'a>(&'a self, file_id: Option<u64>, whats_new: Option<&'a str>) -> PublicationWire<'a> {
        PublicationWire {
            file_id,
            whats_new,
            name: &self.name,
            description: &self.description,
            category_id: self.category,
            license_id: self.license,
            source_url: &self.source_url,
            path: self.path.as_deref().unwrap_or(DEFAULT_MAIN_PATH),
            dependencies: self.dependency_list(),
        }
    }
}

/// New contents for an existing publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePublication {
    pub file_id: u64,
    pub whats_new: Option<String>,
    pub publication: UploadPublication,
}

impl UpdatePublication {
    pub fn new(file_id: u64, publication: UploadPublication) -> Self {
        Self {
            file_id,
            whats_new: None,
            publication,
        }
    }

    pub fn with_whats_new(mut self, whats_new: impl Into<String>) -> Self {
        self.whats_new = Some(whats_new.into());
        self
    }
}

fn last_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[derive(Debug, Default, Serialize)]
struct DependencyWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    publication_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<u8>,
}

#[derive(Serialize)]
struct PublicationWire<'a> {
    file_id: Option<u64>,
    whats_new: Option<&'a str>,
    name: &'a str,
    description: &'a str,
    category_id: PublicationCategory,
    license_id: License,
    source_url: &'a str,
    path: &'a str,
    dependencies: Vec<DependencyWire<'a>>,
}

#[derive(Serialize)]
struct QueryWire<'a> {
    category_id: Option<PublicationCategory>,
    order_by: Option<OrderBy>,
    order_direction: Option<OrderDirection>,
    offset: Option<u64>,
    count: Option<u64>,
    search: Option<&'a str>,
    user_name: Option<&'a str>,
    file_ids: &'a [u64],
}

#[derive(Serialize)]
struct PublicationWireQuery {
    file_id: u64,
    language_id: PublicationLanguage,
}

#[derive(Serialize)]
struct FileIdWire {
    file_id: u64,
}

/// Browsing and managing store publications.
#[derive(Clone, Copy)]
pub struct Publications<'a> {
    pipeline: RequestPipeline<'a>,
}

impl<'a> Publications<'a> {
    pub(crate) fn new(pipeline: RequestPipeline<'a>) -> Self {
        Self { pipeline }
    }

    pub async fn publications(
        &self,
        query: &PublicationsQuery,
    ) -> Result<Vec<PreviewPublication>, MarketError> {
        let listed: Listing<PreviewPublication> =
            self.pipeline.fetch(&PUBLICATIONS, &query.wire()).await?;
        Ok(listed.into_vec())
    }

    /// Full details; descriptions are translated into `language`
    /// (English when `None`).
    pub async fn publication(
        &self,
        file_id: u64,
        language: Option<PublicationLanguage>,
    ) -> Result<Publication, MarketError> {
        self.pipeline
            .fetch(
                &PUBLICATION,
                &PublicationWireQuery {
                    file_id,
                    language_id: language.unwrap_or_default(),
                },
            )
            .await
    }

    /// Count a download of `file_id` for the logged-in user.
    pub async fn mark_downloaded(&self, file_id: u64) -> Result<(), MarketError> {
        self.pipeline.send(&DOWNLOAD, &FileIdWire { file_id }).await
    }

    pub async fn upload(&self, publication: &UploadPublication) -> Result<(), MarketError> {
        self.pipeline
            .send(&UPLOAD, &publication.wire(None, None))
            .await
    }

    pub async fn update(&self, update: &UpdatePublication) -> Result<(), MarketError> {
        let wire = update
            .publication
            .wire(Some(update.file_id), update.whats_new.as_deref());
        self.pipeline.send(&UPDATE, &wire).await
    }

    pub async fn delete(&self, file_id: u64) -> Result<(), MarketError> {
        self.pipeline.send(&DELETE, &FileIdWire { file_id }).await
    }
}
