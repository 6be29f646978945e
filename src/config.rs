use crate::content::StaticContent;
use dotenvy::dotenv;
use std::env;
use thiserror::Error;

pub const DEFAULT_JOKE_API_URL: &str = "https://official-joke-api.appspot.com/random_joke";
pub const DEFAULT_QUOTE_API_URL: &str = "https://dummyjson.com/quotes/random";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("invalid HOSTING value (expected true|false): {0}")]
    InvalidHosting(String),
    #[error("invalid WEBHOOK_URL: {0}")]
    InvalidWebhookUrl(String),
    #[error("invalid URL in {var}: {value}")]
    InvalidEndpoint { var: &'static str, value: String },
    #[error("embedded content is invalid: {0}")]
    InvalidContent(#[from] serde_json::Error),
}

/// Third-party endpoints queried by the fetch handlers.
#[derive(Clone, Debug)]
pub struct ApiEndpoints {
    pub joke: String,
    pub quote: String,
    pub weather: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            joke: DEFAULT_JOKE_API_URL.to_string(),
            quote: DEFAULT_QUOTE_API_URL.to_string(),
            weather: DEFAULT_WEATHER_API_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Absent token is only reported when an update has to be processed.
    pub token: Option<String>,
    pub hosting: bool,
    pub webhook_url: Option<url::Url>,
    pub webhook_secret: Option<String>,
    pub port: u16,
    pub weather_api_key: Option<String>,
    pub endpoints: ApiEndpoints,
    pub content: StaticContent,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if cfg!(not(test)) {
            let _ = dotenv();
        }

        let token = non_empty("TELEGRAM_TOKEN").or_else(|| non_empty("TELOXIDE_TOKEN"));

        let hosting = match non_empty("HOSTING") {
            None => true,
            Some(raw) => match raw.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => return Err(ConfigError::InvalidHosting(other.to_string())),
            },
        };

        let webhook_url = match non_empty("WEBHOOK_URL") {
            Some(s) => {
                let parsed =
                    url::Url::parse(&s).map_err(|_| ConfigError::InvalidWebhookUrl(s.clone()))?;
                Some(parsed)
            }
            None => None,
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080u16);

        let defaults = ApiEndpoints::default();
        let endpoints = ApiEndpoints {
            joke: endpoint("JOKE_API_URL", defaults.joke)?,
            quote: endpoint("QUOTE_API_URL", defaults.quote)?,
            weather: endpoint("WEATHER_API_URL", defaults.weather)?,
        };

        Ok(AppConfig {
            token,
            hosting,
            webhook_url,
            webhook_secret: non_empty("WEBHOOK_SECRET"),
            port,
            weather_api_key: non_empty("WEATHER_API_KEY"),
            endpoints,
            content: StaticContent::embedded()?,
        })
    }
}

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|s| !s.trim().is_empty())
}

fn endpoint(var: &'static str, default: String) -> Result<String, ConfigError> {
    match non_empty(var) {
        Some(value) => {
            url::Url::parse(&value).map_err(|_| ConfigError::InvalidEndpoint {
                var,
                value: value.clone(),
            })?;
            Ok(value)
        }
        None => Ok(default),
    }
}
