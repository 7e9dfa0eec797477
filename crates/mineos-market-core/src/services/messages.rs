use serde::Serialize;

use crate::domain::{Dialog, Listing, Message};
use crate::error::MarketError;
use crate::pipeline::{Endpoint, RequestPipeline};
use crate::schema::Schema;
use crate::services::auth::non_empty;

fn dialog_list() -> Schema {
    Listing::<Dialog>::schema(Dialog::schema())
}

fn message_list() -> Schema {
    Listing::<Message>::schema(Message::schema())
}

const DIALOGS: Endpoint = Endpoint::authenticated("dialogs").with_schema(dialog_list);
const MESSAGES: Endpoint = Endpoint::authenticated("messages").with_schema(message_list);
const SEND_MESSAGE: Endpoint = Endpoint::authenticated("message");

#[derive(Serialize)]
struct DialogWire<'a> {
    user_name: &'a str,
}

#[derive(Serialize)]
struct SendMessageWire<'a> {
    user_name: &'a str,
    text: &'a str,
}

/// Private conversations of the logged-in user.
#[derive(Clone, Copy)]
pub struct Messages<'a> {
    pipeline: RequestPipeline<'a>,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(pipeline: RequestPipeline<'a>) -> Self {
        Self { pipeline }
    }

    /// One entry per conversation partner.
    pub async fn dialogs(&self) -> Result<Vec<Dialog>, MarketError> {
        let dialogs: Listing<Dialog> = self.pipeline.fetch(&DIALOGS, &()).await?;
        Ok(dialogs.into_vec())
    }

    /// Messages exchanged with `user_name`.
    pub async fn dialog(&self, user_name: &str) -> Result<Vec<Message>, MarketError> {
        let user_name = non_empty("user_name", user_name.to_owned())?;
        let messages: Listing<Message> = self
            .pipeline
            .fetch(&MESSAGES, &DialogWire { user_name: &user_name })
            .await?;
        Ok(messages.into_vec())
    }

    pub async fn send_message(&self, user_name: &str, text: &str) -> Result<(), MarketError> {
        let user_name = non_empty("user_name", user_name.to_owned())?;
        let text = non_empty("text", text.to_owned())?;
        self.pipeline
            .send(
                &SEND_MESSAGE,
                &SendMessageWire {
                    user_name: &user_name,
                    text: &text,
                },
            )
            .await
    }
}
