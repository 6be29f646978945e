//! Reply rules: an ordered list of `(trigger, action)` pairs.
//!
//! Rules are checked in registration order and the first match wins. The
//! catch-all may only be registered last; the builder refuses anything after
//! it so a catch-all can never shadow a specific rule.

use regex::Regex;
use thiserror::Error;

use crate::commands::Command;

pub const CONGRATULATE_BUTTON: &str = "🎉 Congratulate";
pub const PICTURE_BUTTON: &str = "🖼 Picture";
pub const SONG_BUTTON: &str = "🎵 Song";
pub const JOKE_BUTTON: &str = "😂 Joke";
pub const QUOTE_BUTTON: &str = "💬 Quote";
pub const WEATHER_BUTTON: &str = "🌤 Weather";

/// Reply-keyboard buttons in display order, with the action each one fires.
pub const BUTTONS: [(&str, Action); 6] = [
    (CONGRATULATE_BUTTON, Action::Congratulate),
    (PICTURE_BUTTON, Action::Picture),
    (SONG_BUTTON, Action::Song),
    (JOKE_BUTTON, Action::Joke),
    (QUOTE_BUTTON, Action::Quote),
    (WEATHER_BUTTON, Action::AskCity),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Greeting,
    Help,
    Echo,
    Congratulate,
    Picture,
    Song,
    Joke,
    Quote,
    AskCity,
}

#[derive(Error, Debug)]
pub enum RuleSetError {
    #[error("rule for {0:?} registered after the catch-all")]
    RuleAfterCatchAll(Action),
    #[error("invalid button pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[derive(Clone, Debug)]
pub enum Trigger {
    /// Exact text equality.
    Command(String),
    /// Anchored (`^...$`) match on a button label.
    Button(Regex),
    /// Any text that is not a command.
    AnyText,
}

impl Trigger {
    pub fn button(label: &str) -> Result<Self, RuleSetError> {
        let pattern = format!("^{}$", regex::escape(label));
        Ok(Trigger::Button(Regex::new(&pattern)?))
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            Trigger::Command(command) => text == command,
            Trigger::Button(re) => re.is_match(text),
            Trigger::AnyText => !is_command(text),
        }
    }
}

pub fn is_command(text: &str) -> bool {
    text.starts_with('/')
}

#[derive(Clone, Debug)]
pub struct ReplyRule {
    pub trigger: Trigger,
    pub action: Action,
}

#[derive(Clone, Debug)]
pub struct RuleSet {
    rules: Vec<ReplyRule>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Commands, then keyboard buttons, then the echo catch-all.
    pub fn standard() -> Result<Self, RuleSetError> {
        let mut builder = RuleSet::builder()
            .command(Command::Start.trigger(), Action::Greeting)
            .command(Command::Help.trigger(), Action::Help)
            .command(Command::Joke.trigger(), Action::Joke)
            .command(Command::Quote.trigger(), Action::Quote)
            .command(Command::Weather.trigger(), Action::AskCity);

        for (label, action) in BUTTONS {
            builder = builder.button(label, action);
        }

        builder.catch_all(Action::Echo).build()
    }

    /// First matching rule's action.
    pub fn resolve(&self, text: &str) -> Option<Action> {
        self.rules
            .iter()
            .find(|rule| rule.trigger.matches(text))
            .map(|rule| rule.action)
    }

    pub fn rules(&self) -> &[ReplyRule] {
        &self.rules
    }
}

#[derive(Default)]
pub struct RuleSetBuilder {
    rules: Vec<ReplyRule>,
    sealed: bool,
    error: Option<RuleSetError>,
}

impl RuleSetBuilder {
    pub fn command(self, command: &str, action: Action) -> Self {
        self.push(Ok(Trigger::Command(command.to_string())), action)
    }

    pub fn button(self, label: &str, action: Action) -> Self {
        self.push(Trigger::button(label), action)
    }

    pub fn catch_all(mut self, action: Action) -> Self {
        self = self.push(Ok(Trigger::AnyText), action);
        self.sealed = true;
        self
    }

    pub fn build(self) -> Result<RuleSet, RuleSetError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(RuleSet { rules: self.rules }),
        }
    }

    // Keeps only the first registration error.
    fn push(mut self, trigger: Result<Trigger, RuleSetError>, action: Action) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.sealed {
            self.error = Some(RuleSetError::RuleAfterCatchAll(action));
            return self;
        }
        match trigger {
            Ok(trigger) => self.rules.push(ReplyRule { trigger, action }),
            Err(e) => self.error = Some(e),
        }
        self
    }
}
