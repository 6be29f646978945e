// Replies of the two-step weather conversation.

use crate::api::{ApiClient, Service};
use crate::error::RelayResult;
use crate::handlers::{fetch::reply_with_fetch, start::reply_keyboard, utils::send_reply_or_plain};
use teloxide::prelude::*;
use tracing::info;

pub const CITY_PROMPT: &str = "Which city? Send me its name, or /cancel to stop.";
pub const CITY_REPROMPT: &str = "I'm still waiting for a city name. Send it, or /cancel to stop.";
pub const CANCELLED: &str = "Okay, weather request cancelled.";

pub async fn ask_city(bot: &Bot, msg: &Message) -> RelayResult {
    send_reply_or_plain(bot, msg, CITY_PROMPT, None).await?;
    Ok(())
}

pub async fn reprompt(bot: &Bot, msg: &Message) -> RelayResult {
    send_reply_or_plain(bot, msg, CITY_REPROMPT, None).await?;
    Ok(())
}

pub async fn cancel(bot: &Bot, msg: &Message) -> RelayResult {
    send_reply_or_plain(bot, msg, CANCELLED, Some(reply_keyboard())).await?;
    Ok(())
}

pub async fn report(bot: &Bot, msg: &Message, api: &ApiClient, city: &str) -> RelayResult {
    let city = city.trim();
    info!("Weather requested: chat_id = {}, city = {city}", msg.chat.id);
    reply_with_fetch(bot, msg, Service::Weather, api.weather(city)).await
}
