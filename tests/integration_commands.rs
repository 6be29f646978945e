mod common;

use common::{spawn_weather_stub, test_config};
use serial_test::serial;
use teloxide::dptree::{self, di::DependencyMap};
use teloxide::types::Message;
use teloxide_tests::{MockBot, MockMessageText};
use tgrelaybot_rs::handlers::{
    CANCELLED, CITY_PROMPT, CITY_REPROMPT, ECHO_PREFIX, get_update_handler,
};
use tgrelaybot_rs::rules::{CONGRATULATE_BUTTON, JOKE_BUTTON, WEATHER_BUTTON};
use tgrelaybot_rs::server::AppState;

async fn relay_state() -> (AppState, common::Recorder) {
    let (weather_url, weather_calls) = spawn_weather_stub().await;
    let state = AppState::new(test_config(Some("123456:TEST"), &weather_url)).unwrap();
    (state, weather_calls)
}

fn deps(state: &AppState) -> DependencyMap {
    dptree::deps![
        state.config.clone(),
        state.api.clone(),
        state.rules.clone(),
        state.conversations.clone()
    ]
}

fn last_text(sent: &[Message]) -> String {
    let last = sent.last().expect("At least 1 sent message was expected");
    last.text().unwrap_or_default().to_string()
}

#[tokio::test]
#[serial]
async fn start_command_greets() {
    let (state, _) = relay_state().await;
    let mut bot = MockBot::new(MockMessageText::new().text("/start"), get_update_handler());
    bot.dependencies(deps(&state));
    bot.dispatch().await;
    assert!(last_text(&bot.get_responses().sent_messages).starts_with("Hello, "));
}

#[tokio::test]
#[serial]
async fn help_command_lists_commands() {
    let (state, _) = relay_state().await;
    let mut bot = MockBot::new(MockMessageText::new().text("/help"), get_update_handler());
    bot.dependencies(deps(&state));
    bot.dispatch().await;
    let text = last_text(&bot.get_responses().sent_messages);
    assert!(
        text.contains("Available commands") && text.contains("/weather"),
        "Unexpected help text: {text}"
    );
}

#[tokio::test]
#[serial]
async fn plain_text_is_echoed() {
    let (state, _) = relay_state().await;
    let mut bot = MockBot::new(MockMessageText::new().text("hola"), get_update_handler());
    bot.dependencies(deps(&state));
    bot.dispatch().await;
    assert_eq!(last_text(&bot.get_responses().sent_messages), format!("{ECHO_PREFIX}hola"));
}

#[tokio::test]
#[serial]
async fn congratulate_button_picks_from_the_set() {
    let (state, _) = relay_state().await;
    let mut bot = MockBot::new(
        MockMessageText::new().text(CONGRATULATE_BUTTON),
        get_update_handler(),
    );
    bot.dependencies(deps(&state));
    bot.dispatch().await;
    let text = last_text(&bot.get_responses().sent_messages);
    assert!(
        state.config.content.congratulations.contains(&text),
        "Unexpected congratulation: {text}"
    );
}

#[tokio::test]
#[serial]
async fn unreachable_joke_service_gets_an_apology() {
    // The test config points the joke API at a closed port.
    let (state, _) = relay_state().await;
    let mut bot = MockBot::new(MockMessageText::new().text(JOKE_BUTTON), get_update_handler());
    bot.dependencies(deps(&state));
    bot.dispatch().await;
    let text = last_text(&bot.get_responses().sent_messages);
    assert!(
        text.starts_with("Could not connect to the joke service"),
        "Unexpected reply: {text}"
    );
}

#[tokio::test]
#[serial]
async fn unknown_command_sends_nothing() {
    let (state, _) = relay_state().await;
    let mut bot = MockBot::new(MockMessageText::new().text("/nope"), get_update_handler());
    bot.dependencies(deps(&state));
    bot.dispatch().await;
    assert!(bot.get_responses().sent_messages.is_empty());
}

#[tokio::test]
#[serial]
async fn weather_conversation_round_trip() {
    let (state, weather_calls) = relay_state().await;
    let mut bot = MockBot::new(MockMessageText::new().text(WEATHER_BUTTON), get_update_handler());
    bot.dependencies(deps(&state));

    bot.dispatch().await;
    assert_eq!(last_text(&bot.get_responses().sent_messages), CITY_PROMPT);
    assert_eq!(state.conversations.len(), 1);

    bot.update(MockMessageText::new().text("/joke"));
    bot.dispatch().await;
    assert_eq!(last_text(&bot.get_responses().sent_messages), CITY_REPROMPT);
    assert_eq!(state.conversations.len(), 1);

    bot.update(MockMessageText::new().text("Lisbon"));
    bot.dispatch().await;
    assert!(last_text(&bot.get_responses().sent_messages).starts_with("Weather in Lisbon"));
    assert_eq!(
        weather_calls.calls(),
        vec![("weather".to_string(), "Lisbon".to_string())]
    );
    assert!(state.conversations.is_empty());

    bot.update(MockMessageText::new().text("Porto"));
    bot.dispatch().await;
    assert_eq!(last_text(&bot.get_responses().sent_messages), format!("{ECHO_PREFIX}Porto"));
    assert_eq!(weather_calls.calls().len(), 1);
}

#[tokio::test]
#[serial]
async fn weather_conversation_can_be_cancelled() {
    let (state, weather_calls) = relay_state().await;
    let mut bot = MockBot::new(MockMessageText::new().text("/weather"), get_update_handler());
    bot.dependencies(deps(&state));
    bot.dispatch().await;

    bot.update(MockMessageText::new().text("/cancel"));
    bot.dispatch().await;
    assert_eq!(last_text(&bot.get_responses().sent_messages), CANCELLED);
    assert!(state.conversations.is_empty());
    assert!(weather_calls.calls().is_empty());
}
