use mineos_market_core::{MarketClient, Rating, ReviewsQuery};
use serde_json::Value;

use crate::cli::{ReviewArgs, ReviewsArgs, VoteArgs};
use crate::error::CliError;

use super::done;

pub async fn list(client: &MarketClient, args: &ReviewsArgs) -> Result<Value, CliError> {
    let query = ReviewsQuery::new(args.file_id).page(args.offset, args.count);
    let reviews = client.reviews().reviews(&query).await?;
    Ok(serde_json::to_value(reviews)?)
}

pub async fn post(client: &MarketClient, args: &ReviewArgs) -> Result<Value, CliError> {
    let rating = Rating::new(args.rating)?;
    client
        .reviews()
        .post(args.file_id, rating, &args.comment)
        .await?;
    Ok(done("review", Value::from(args.file_id)))
}

pub async fn vote(client: &MarketClient, args: &VoteArgs) -> Result<Value, CliError> {
    client
        .reviews()
        .vote(args.review_id, !args.unhelpful)
        .await?;
    Ok(done("vote", Value::from(args.review_id)))
}
