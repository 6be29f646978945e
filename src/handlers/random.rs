// Random picks from the static content sets.

use crate::content::{StaticContent, pick};
use crate::error::RelayResult;
use crate::handlers::utils::send_reply_or_plain;
use teloxide::{prelude::*, types::InputFile};
use tracing::warn;

pub fn empty_set_message(what: &str) -> String {
    format!("Sorry, I have no {what} to share right now.")
}

pub async fn congratulate(bot: &Bot, msg: &Message, content: &StaticContent) -> RelayResult {
    let text = match pick(&content.congratulations) {
        Some(text) => text.clone(),
        None => {
            warn!("congratulations set is empty");
            empty_set_message("congratulations")
        }
    };
    send_reply_or_plain(bot, msg, text, None).await?;
    Ok(())
}

pub async fn picture(bot: &Bot, msg: &Message, content: &StaticContent) -> RelayResult {
    let Some(url) = pick(&content.pictures).cloned() else {
        warn!("pictures set is empty");
        send_reply_or_plain(bot, msg, empty_set_message("pictures"), None).await?;
        return Ok(());
    };
    bot.send_photo(msg.chat.id, InputFile::url(url)).await?;
    Ok(())
}

pub async fn song(bot: &Bot, msg: &Message, content: &StaticContent) -> RelayResult {
    let Some(url) = pick(&content.songs).cloned() else {
        warn!("songs set is empty");
        send_reply_or_plain(bot, msg, empty_set_message("songs"), None).await?;
        return Ok(());
    };
    bot.send_audio(msg.chat.id, InputFile::url(url)).await?;
    Ok(())
}
