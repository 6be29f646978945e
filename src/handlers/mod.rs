mod fetch;
mod random;
mod start;
pub mod utils;
mod weather;

pub use random::empty_set_message;
pub use weather::{CANCELLED, CITY_PROMPT, CITY_REPROMPT};

use crate::api::{ApiClient, Service};
use crate::commands::Command;
use crate::config::AppConfig;
use crate::conversation::{ConversationKey, Conversations, Route};
use crate::error::{RelayError, RelayResult};
use crate::rules::{Action, RuleSet};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;
use utils::send_reply_or_plain;

pub const ECHO_PREFIX: &str = "You wrote: ";

/// Text messages are routed through the conversation state and the rule set;
/// at most one endpoint runs per update. The conversation only moves on once
/// the reply was sent.
pub fn get_update_handler() -> UpdateHandler<RelayError> {
    Update::filter_message().branch(dptree::filter_map(route_message).endpoint(handle_route))
}

fn route_message(
    msg: Message,
    rules: Arc<RuleSet>,
    conversations: Conversations,
) -> Option<Route> {
    let text = msg.text()?;
    conversations.route(ConversationKey::from_message(&msg), text, &rules)
}

async fn handle_route(
    bot: Bot,
    msg: Message,
    route: Route,
    cfg: Arc<AppConfig>,
    api: ApiClient,
    conversations: Conversations,
) -> RelayResult {
    info!("Update routed: chat_id = {}, route = {:?}", msg.chat.id, route);

    reply(&bot, &msg, &route, &cfg, &api).await?;
    conversations.commit(ConversationKey::from_message(&msg), &route);
    Ok(())
}

async fn reply(
    bot: &Bot,
    msg: &Message,
    route: &Route,
    cfg: &AppConfig,
    api: &ApiClient,
) -> RelayResult {
    match route {
        Route::Rule(Action::Greeting) => start::start(bot, msg).await,
        Route::Rule(Action::Help) => {
            send_reply_or_plain(bot, msg, Command::descriptions().to_string(), None).await?;
            Ok(())
        }
        Route::Rule(Action::Echo) => {
            let text = msg.text().unwrap_or_default();
            send_reply_or_plain(bot, msg, format!("{ECHO_PREFIX}{text}"), None).await?;
            Ok(())
        }
        Route::Rule(Action::Congratulate) => random::congratulate(bot, msg, &cfg.content).await,
        Route::Rule(Action::Picture) => random::picture(bot, msg, &cfg.content).await,
        Route::Rule(Action::Song) => random::song(bot, msg, &cfg.content).await,
        Route::Rule(Action::Joke) => {
            fetch::reply_with_fetch(bot, msg, Service::Joke, api.joke()).await
        }
        Route::Rule(Action::Quote) => {
            fetch::reply_with_fetch(bot, msg, Service::Quote, api.quote()).await
        }
        Route::Rule(Action::AskCity) => weather::ask_city(bot, msg).await,
        Route::City(city) => weather::report(bot, msg, api, city).await,
        Route::Cancel => weather::cancel(bot, msg).await,
        Route::Reprompt => weather::reprompt(bot, msg).await,
    }
}
