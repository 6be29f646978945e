pub mod chat_action_keep_alive;
pub use chat_action_keep_alive::ChatActionKeepAlive;

pub mod send_reply_or_plain;
pub use send_reply_or_plain::send_reply_or_plain;
