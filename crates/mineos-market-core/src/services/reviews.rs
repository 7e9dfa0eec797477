use serde::Serialize;

use crate::domain::{Listing, Rating, Review};
use crate::error::MarketError;
use crate::pipeline::{Endpoint, RequestPipeline};
use crate::schema::Schema;
use crate::services::auth::non_empty;

fn review_list() -> Schema {
    Listing::<Review>::schema(Review::schema())
}

const REVIEWS: Endpoint = Endpoint::public("reviews").with_schema(review_list);
const VOTE: Endpoint = Endpoint::authenticated("review_vote");
const POST: Endpoint = Endpoint::authenticated("review");

/// Page of reviews for one publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewsQuery {
    pub file_id: u64,
    pub offset: Option<u64>,
    pub count: Option<u64>,
}

impl ReviewsQuery {
    pub fn new(file_id: u64) -> Self {
        Self {
            file_id,
            offset: None,
            count: None,
        }
    }

    pub fn page(mut self, offset: u64, count: u64) -> Self {
        self.offset = Some(offset);
        self.count = Some(count);
        self
    }
}

#[derive(Serialize)]
struct ReviewsWire {
    file_id: u64,
    offset: Option<u64>,
    count: Option<u64>,
}

#[derive(Serialize)]
struct VoteWire {
    review_id: u64,
    rating: u8,
}

#[derive(Serialize)]
struct PostWire<'a> {
    file_id: u64,
    rating: Rating,
    comment: &'a str,
}

/// Reading, writing and rating publication reviews.
#[derive(Clone, Copy)]
pub struct Reviews<'a> {
    pipeline: RequestPipeline<'a>,
}

impl<'a> Reviews<'a> {
    pub(crate) fn new(pipeline: RequestPipeline<'a>) -> Self {
        Self { pipeline }
    }

    pub async fn reviews(&self, query: &ReviewsQuery) -> Result<Vec<Review>, MarketError> {
        let wire = ReviewsWire {
            file_id: query.file_id,
            offset: query.offset,
            count: query.count,
        };
        let listed: Listing<Review> = self.pipeline.fetch(&REVIEWS, &wire).await?;
        Ok(listed.into_vec())
    }

    /// Mark a review as helpful or not.
    pub async fn vote(&self, review_id: u64, helpful: bool) -> Result<(), MarketError> {
        let wire = VoteWire {
            review_id,
            rating: u8::from(helpful),
        };
        self.pipeline.send(&VOTE, &wire).await
    }

    pub async fn post(&self, file_id: u64, rating: Rating, comment: &str) -> Result<(), MarketError> {
        let comment = non_empty("comment", comment.to_owned())?;
        let wire = PostWire {
            file_id,
            rating,
            comment: &comment,
        };
        self.pipeline.send(&POST, &wire).await
    }
}
