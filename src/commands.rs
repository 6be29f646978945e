use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "show the greeting and the keyboard.")]
    Start,

    #[command(description = "display this text.")]
    Help,

    #[command(description = "tell a random joke.")]
    Joke,

    #[command(description = "share a random quote.")]
    Quote,

    #[command(description = "ask for a city and report its weather.")]
    Weather,

    #[command(description = "stop waiting for a city.")]
    Cancel,
}

impl Command {
    /// Literal text that triggers the command, e.g. `/joke`.
    pub fn trigger(&self) -> &'static str {
        match self {
            Command::Start => "/start",
            Command::Help => "/help",
            Command::Joke => "/joke",
            Command::Quote => "/quote",
            Command::Weather => "/weather",
            Command::Cancel => "/cancel",
        }
    }
}
