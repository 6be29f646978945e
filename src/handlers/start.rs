// Greeting for /start, sent together with the reply keyboard.

use crate::error::RelayResult;
use crate::handlers::utils::send_reply_or_plain;
use crate::rules::BUTTONS;
use teloxide::{
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup},
};

/// Every button label, three per row.
pub fn reply_keyboard() -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = BUTTONS
        .chunks(3)
        .map(|row| {
            row.iter()
                .map(|(label, _)| KeyboardButton::new(*label))
                .collect()
        })
        .collect();
    KeyboardMarkup::new(rows).resize_keyboard()
}

pub fn greeting(first_name: Option<&str>) -> String {
    let name = first_name.unwrap_or("there");
    format!(
        "Hello, {name}! Pick a button below: I can congratulate you, send a picture or a song, \
         tell a joke, share a quote or check the weather. Anything else you type I will repeat."
    )
}

pub async fn start(bot: &Bot, msg: &Message) -> RelayResult {
    let first_name = msg.from.as_ref().map(|u| u.first_name.as_str());
    send_reply_or_plain(bot, msg, greeting(first_name), Some(reply_keyboard())).await?;
    Ok(())
}
