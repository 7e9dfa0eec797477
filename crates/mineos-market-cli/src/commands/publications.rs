use mineos_market_core::{MarketClient, PublicationsQuery};
use serde_json::Value;

use crate::cli::{FileIdArgs, PublicationArgs, PublicationsArgs};
use crate::error::CliError;

use super::done;

pub async fn list(client: &MarketClient, args: &PublicationsArgs) -> Result<Value, CliError> {
    let mut query = PublicationsQuery::new().file_ids(args.file_ids.iter().copied());
    query.category = args.category;
    if let Some(order_by) = args.order_by {
        query = query.order(order_by, args.direction);
    }
    query.offset = args.offset;
    query.count = args.count;
    query.search = args.search.clone();
    query.user_name = args.user.clone();

    let publications = client.publications().publications(&query).await?;
    Ok(serde_json::to_value(publications)?)
}

pub async fn show(client: &MarketClient, args: &PublicationArgs) -> Result<Value, CliError> {
    let publication = client
        .publications()
        .publication(args.file_id, args.language)
        .await?;
    Ok(serde_json::to_value(publication)?)
}

pub async fn download(client: &MarketClient, args: &FileIdArgs) -> Result<Value, CliError> {
    client.publications().mark_downloaded(args.file_id).await?;
    Ok(done("download", Value::from(args.file_id)))
}

pub async fn delete(client: &MarketClient, args: &FileIdArgs) -> Result<Value, CliError> {
    client.publications().delete(args.file_id).await?;
    Ok(done("delete", Value::from(args.file_id)))
}
