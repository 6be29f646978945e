// Replies built from a third-party API call.

use std::fmt::Display;

use crate::api::{FetchError, Service};
use crate::error::RelayResult;
use crate::handlers::utils::{ChatActionKeepAlive, send_reply_or_plain};
use teloxide::{prelude::*, types::ChatAction};
use tracing::warn;

/// Await `fetch` under a typing indicator and reply with the result, or with
/// the failure's user message. Fetch failures never reach the caller.
pub async fn reply_with_fetch<T, F>(
    bot: &Bot,
    msg: &Message,
    service: Service,
    fetch: F,
) -> RelayResult
where
    T: Display,
    F: Future<Output = Result<T, FetchError>>,
{
    let mut keep = ChatActionKeepAlive::spawn(bot.clone(), msg.chat.id, ChatAction::Typing);

    let reply = match fetch.await {
        Ok(value) => value.to_string(),
        Err(e) => {
            warn!("{:?} fetch failed for chat {}: {e}", service, msg.chat.id);
            e.user_message(service)
        }
    };

    keep.shutdown().await;

    send_reply_or_plain(bot, msg, reply, None).await?;
    Ok(())
}
