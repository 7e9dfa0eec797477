mod messages;
mod publications;
mod reviews;

use std::sync::Arc;

use mineos_market_core::{
    Config, ConfigOverrides, LoginParams, MarketClient, ReqwestHttpClient,
};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command, LoginArgs};
use crate::error::CliError;

/// Execute the selected command and return its JSON output.
pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let mut client = build_client(cli)?;
    debug!(
        command = cli.command.name(),
        host = %client.config().host_url,
        authenticated = client.token().is_some(),
        "dispatching command"
    );

    match &cli.command {
        Command::Statistics => Ok(serde_json::to_value(
            client.statistics().statistic().await?,
        )?),
        Command::Publications(args) => publications::list(&client, args).await,
        Command::Publication(args) => publications::show(&client, args).await,
        Command::Download(args) => publications::download(&client, args).await,
        Command::Delete(args) => publications::delete(&client, args).await,
        Command::Reviews(args) => reviews::list(&client, args).await,
        Command::Review(args) => reviews::post(&client, args).await,
        Command::Vote(args) => reviews::vote(&client, args).await,
        Command::Dialogs => messages::dialogs(&client).await,
        Command::Messages(args) => messages::conversation(&client, args).await,
        Command::SendMessage(args) => messages::send(&client, args).await,
        Command::Login(args) => login(&mut client, args).await,
    }
}

fn build_client(cli: &Cli) -> Result<MarketClient, CliError> {
    let mut config = Config::from_env()?;

    let mut overrides = ConfigOverrides::new();
    if let Some(host) = &cli.host {
        overrides = overrides.host_url(host.as_str());
    }
    if let Some(proxy) = &cli.proxy {
        overrides = overrides.proxy_url(proxy.as_str());
    }
    if cli.no_validate {
        overrides = overrides.validate_responses(false);
    }
    config.apply(overrides);

    let mut client = MarketClient::with_http_client(config, Arc::new(ReqwestHttpClient::new()));
    if let Some(token) = &cli.token {
        client.use_token(token.as_str());
    }
    Ok(client)
}

async fn login(client: &mut MarketClient, args: &LoginArgs) -> Result<Value, CliError> {
    let params = match (&args.user, &args.email) {
        (Some(user), _) => LoginParams::with_user_name(user.as_str(), args.password.as_str())?,
        (None, Some(email)) => LoginParams::with_email(email.as_str(), args.password.as_str())?,
        (None, None) => return Err(mineos_market_core::ValidationError::MissingLogin.into()),
    };
    let credentials = client.login(&params).await?;
    Ok(serde_json::to_value(credentials)?)
}

/// Output for commands whose endpoint returns no payload.
fn done(action: &str, target: Value) -> Value {
    serde_json::json!({ "action": action, "target": target, "ok": true })
}
