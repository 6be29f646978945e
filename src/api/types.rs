// Response shapes of the third-party APIs and the replies built from them.

use std::fmt;

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use super::FetchError;

#[derive(Deserialize, Debug, Clone)]
pub struct Joke {
    pub setup: String,
    pub punchline: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Quote {
    #[serde(rename = "quote")]
    pub text: String,
    pub author: String,
}

#[derive(Debug, Clone)]
pub struct Weather {
    pub city: String,
    pub description: String,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: Option<u64>,
}

// Current-weather body; only the fields the reply needs.
#[derive(Deserialize, Debug)]
struct WeatherBody {
    name: String,
    weather: Vec<Condition>,
    main: Readings,
}

#[derive(Deserialize, Debug)]
struct Condition {
    description: String,
}

#[derive(Deserialize, Debug)]
struct Readings {
    temp: f64,
    feels_like: f64,
    humidity: Option<u64>,
}

impl Joke {
    pub fn from_json(body: Value) -> Result<Self, FetchError> {
        read(body)
    }
}

impl Quote {
    pub fn from_json(body: Value) -> Result<Self, FetchError> {
        read(body)
    }
}

impl Weather {
    pub fn from_json(body: Value) -> Result<Self, FetchError> {
        let WeatherBody {
            name,
            weather,
            main,
        } = read(body)?;
        let description = weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| FetchError::MissingField("weather[0].description".to_string()))?;
        Ok(Weather {
            city: name,
            description,
            temp: main.temp,
            feels_like: main.feels_like,
            humidity: main.humidity,
        })
    }
}

/// Body parsed as JSON but shaped differently is reported as incomplete.
fn read<T: DeserializeOwned>(body: Value) -> Result<T, FetchError> {
    serde_json::from_value(body).map_err(|e| FetchError::MissingField(e.to_string()))
}

impl fmt::Display for Joke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{}", self.setup, self.punchline)
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"\n- {}", self.text, self.author)
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Weather in {}: {}\nTemperature: {:.1}°C (feels like {:.1}°C)",
            self.city, self.description, self.temp, self.feels_like
        )?;
        if let Some(h) = self.humidity {
            write!(f, "\nHumidity: {h}%")?;
        }
        Ok(())
    }
}
