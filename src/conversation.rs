//! Per-conversation state for the weather city prompt.
//!
//! A conversation is a chat plus its sender. Only `AwaitingCity` is stored;
//! a missing entry is `Idle`, so finished conversations leave nothing behind.

use std::sync::Arc;

use dashmap::DashMap;
use teloxide::types::{ChatId, Message, UserId};

use crate::commands::Command;
use crate::rules::{Action, RuleSet, is_command};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat: ChatId,
    pub user: Option<UserId>,
}

impl ConversationKey {
    pub fn from_message(msg: &Message) -> Self {
        Self {
            chat: msg.chat.id,
            user: msg.from.as_ref().map(|u| u.id),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingCity,
}

/// What a text message resolves to once conversation state is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Rule(Action),
    City(String),
    Cancel,
    /// A command other than cancel arrived while a city was expected.
    Reprompt,
}

impl Route {
    /// State after this route was handled; `None` keeps the current one.
    pub fn next_state(&self) -> Option<ConversationState> {
        match self {
            Route::Rule(Action::AskCity) => Some(ConversationState::AwaitingCity),
            Route::City(_) | Route::Cancel => Some(ConversationState::Idle),
            Route::Rule(_) | Route::Reprompt => None,
        }
    }
}

#[derive(Clone, Default)]
pub struct Conversations {
    states: Arc<DashMap<ConversationKey, ConversationState>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &ConversationKey) -> ConversationState {
        self.states.get(key).map(|s| *s).unwrap_or_default()
    }

    pub fn set(&self, key: ConversationKey, state: ConversationState) {
        match state {
            ConversationState::Idle => {
                self.states.remove(&key);
            }
            other => {
                self.states.insert(key, other);
            }
        }
    }

    /// Resolve `text` for `key` without changing any state. The transition is
    /// applied with [`Conversations::commit`] once the reply went out, so a
    /// redelivered update is read in the same state as the first delivery.
    pub fn route(&self, key: ConversationKey, text: &str, rules: &RuleSet) -> Option<Route> {
        match self.state(&key) {
            ConversationState::AwaitingCity if text == Command::Cancel.trigger() => {
                Some(Route::Cancel)
            }
            ConversationState::AwaitingCity if is_command(text) => Some(Route::Reprompt),
            ConversationState::AwaitingCity => Some(Route::City(text.to_string())),
            ConversationState::Idle => rules.resolve(text).map(Route::Rule),
        }
    }

    pub fn commit(&self, key: ConversationKey, route: &Route) {
        if let Some(next) = route.next_state() {
            self.set(key, next);
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
