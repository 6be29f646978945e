// Sends a text reply: quoted in groups, plain in private chats.

use teloxide::{
    prelude::*,
    types::{KeyboardMarkup, ReplyParameters},
};

pub async fn send_reply_or_plain(
    bot: &Bot,
    msg: &Message,
    text: impl Into<String>,
    keyboard: Option<KeyboardMarkup>,
) -> Result<Message, teloxide::RequestError> {
    let mut req = bot.send_message(msg.chat.id, text.into());

    // Group-like chats have a title; quote the triggering message there.
    if msg.chat.title().is_some() {
        req = req.reply_parameters(ReplyParameters::new(msg.id).allow_sending_without_reply());
        if let Some(tid) = msg.thread_id {
            req = req.message_thread_id(tid);
        }
    }

    if let Some(kb) = keyboard {
        req = req.reply_markup(kb);
    }

    req.await
}
