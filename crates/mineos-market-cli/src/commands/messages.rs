use mineos_market_core::MarketClient;
use serde_json::Value;

use crate::cli::{MessagesArgs, SendMessageArgs};
use crate::error::CliError;

use super::done;

pub async fn dialogs(client: &MarketClient) -> Result<Value, CliError> {
    let dialogs = client.messages().dialogs().await?;
    Ok(serde_json::to_value(dialogs)?)
}

pub async fn conversation(client: &MarketClient, args: &MessagesArgs) -> Result<Value, CliError> {
    let messages = client.messages().dialog(&args.user_name).await?;
    Ok(serde_json::to_value(messages)?)
}

pub async fn send(client: &MarketClient, args: &SendMessageArgs) -> Result<Value, CliError> {
    client
        .messages()
        .send_message(&args.user_name, &args.text)
        .await?;
    Ok(done("message", Value::from(args.user_name.as_str())))
}
