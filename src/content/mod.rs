// Static reply content embedded in the binary.

use rand::seq::SliceRandom;
use serde::Deserialize;
use url::Url;

use crate::config::ConfigError;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct StaticContent {
    pub congratulations: Vec<String>,
    pub pictures: Vec<Url>,
    pub songs: Vec<Url>,
}

impl StaticContent {
    /// Parse the content sets shipped with the binary.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_json(include_str!("./content.json"))
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Uniform random choice; `None` only for an empty set.
pub fn pick<T>(items: &[T]) -> Option<&T> {
    items.choose(&mut rand::thread_rng())
}
