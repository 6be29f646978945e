mod types;
pub use types::{Joke, Quote, Weather};

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::{ApiEndpoints, AppConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    Joke,
    Quote,
    Weather,
}

impl Service {
    fn name(self) -> &'static str {
        match self {
            Service::Joke => "joke",
            Service::Quote => "quote",
            Service::Weather => "weather",
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("resource not found")]
    NotFound,
    #[error("request was not authorized")]
    Unauthorized,
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("response body is not JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("response has an unexpected shape: {0}")]
    MissingField(String),
    #[error("no API key configured")]
    NotConfigured,
}

impl FetchError {
    /// Reply shown to the user instead of the failed result.
    pub fn user_message(&self, service: Service) -> String {
        let name = service.name();
        match (self, service) {
            (FetchError::NotFound, Service::Weather) => {
                "City not found. Check the spelling and try again.".to_string()
            }
            (FetchError::Unauthorized, Service::Weather) => {
                "The weather service rejected the authorization key. Please tell the bot owner."
                    .to_string()
            }
            (FetchError::NotConfigured, _) => {
                format!("The {name} service is not configured on this bot.")
            }
            (FetchError::Network(_), _) => {
                format!("Could not connect to the {name} service. Please try again later.")
            }
            (FetchError::InvalidJson(_), _) => {
                format!("The {name} service sent a response I could not read.")
            }
            (FetchError::MissingField(_), _) => {
                format!("The {name} service sent an incomplete answer.")
            }
            (FetchError::NotFound | FetchError::Unauthorized | FetchError::Status(_), _) => {
                let code = self.status().map(|s| s.as_u16()).unwrap_or_default();
                format!("The {name} service answered with an error ({code}).")
            }
        }
    }

    fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::NotFound => Some(StatusCode::NOT_FOUND),
            FetchError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            FetchError::Status(s) => Some(*s),
            _ => None,
        }
    }
}

/// Client for the joke, quote and weather APIs.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    endpoints: ApiEndpoints,
    weather_api_key: Option<String>,
}

impl ApiClient {
    pub fn new(cfg: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            http,
            endpoints: cfg.endpoints.clone(),
            weather_api_key: cfg.weather_api_key.clone(),
        })
    }

    pub async fn joke(&self) -> Result<Joke, FetchError> {
        let body = get_json(self.http.get(&self.endpoints.joke)).await?;
        Joke::from_json(body)
    }

    pub async fn quote(&self) -> Result<Quote, FetchError> {
        let body = get_json(self.http.get(&self.endpoints.quote)).await?;
        Quote::from_json(body)
    }

    pub async fn weather(&self, city: &str) -> Result<Weather, FetchError> {
        let key = self
            .weather_api_key
            .as_deref()
            .ok_or(FetchError::NotConfigured)?;
        let req = self.http.get(&self.endpoints.weather).query(&[
            ("q", city),
            ("appid", key),
            ("units", "metric"),
        ]);
        let body = get_json(req).await?;
        Weather::from_json(body)
    }
}

async fn get_json(req: RequestBuilder) -> Result<Value, FetchError> {
    let res = req.send().await?;

    let status = res.status();
    match status {
        StatusCode::NOT_FOUND => return Err(FetchError::NotFound),
        StatusCode::UNAUTHORIZED => return Err(FetchError::Unauthorized),
        s if !s.is_success() => return Err(FetchError::Status(s)),
        _ => {}
    }

    let body_text = res.text().await?;
    Ok(serde_json::from_str::<Value>(&body_text)?)
}
