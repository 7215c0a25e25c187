//! Session state and the button-triggered recommendation pipeline
//!
//! The one piece of state that outlives a single interaction is the
//! uploaded inventory. It lives in an explicit [`SessionContext`] that the
//! interaction layer passes in, rather than a hidden global; only a
//! successful upload replaces it.

use crate::completion;
use crate::config::Config;
use crate::inventory::{self, InventoryError};
use crate::models::RecommendationForm;
use crate::prompt;
use std::time::Instant;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("upload a perfume list before asking for a recommendation")]
    EmptyInventory,

    #[error("recommendation failed: {0}")]
    Service(#[source] anyhow::Error),
}

/// Per-session state: the most recently uploaded perfume list
///
/// Empty until the first successful upload; a failed upload leaves it
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inventory: Vec<String>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    /// Replace the held inventory after a successful upload
    pub fn replace_inventory(&mut self, perfumes: Vec<String>) {
        info!(count = perfumes.len(), "Session inventory replaced");
        self.inventory = perfumes;
    }

    /// Parse an uploaded file and, only on success, take its perfume column
    ///
    /// Any load failure propagates with the prior inventory left untouched.
    pub fn load_inventory(
        &mut self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<&[String], InventoryError> {
        let perfumes = inventory::load(filename, bytes)?;
        self.replace_inventory(perfumes);
        Ok(&self.inventory)
    }
}

/// Run one recommendation request against the session's inventory
///
/// Guard first: with an empty inventory the completion client is never
/// invoked, regardless of the other fields. On guard success the prompt is
/// composed and sent once; a service failure surfaces with its cause and
/// the session stays usable for the next interaction.
pub async fn recommend(
    session: &SessionContext,
    form: &RecommendationForm,
    config: &Config,
) -> Result<String, RecommendError> {
    if session.inventory.is_empty() {
        return Err(RecommendError::EmptyInventory);
    }

    let start = Instant::now();
    let prompt = prompt::compose(&session.inventory, &form.city, &form.weather, &form.preferences);

    let reply = completion::recommend(&prompt, &config.completion_api_key, &config.completion_model)
        .await
        .map_err(RecommendError::Service)?;

    info!(
        perfumes = session.inventory.len(),
        city = %form.city,
        duration_ms = %start.elapsed().as_millis(),
        "Recommendation pipeline completed"
    );

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Preferences, WeatherReading};

    fn test_config() -> Config {
        Config {
            weather_api_key: "weather-key".to_string(),
            completion_api_key: "completion-key".to_string(),
            completion_model: "gpt-3.5-turbo".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }

    fn gala_form() -> RecommendationForm {
        RecommendationForm {
            city: "Paris".to_string(),
            weather: WeatherReading {
                temperature_c: 18.0,
                humidity: 60,
                description: "light rain".to_string(),
            },
            preferences: Preferences {
                event: Some("evening gala".to_string()),
                ..Preferences::default()
            },
        }
    }

    #[tokio::test]
    async fn test_empty_inventory_never_calls_the_service() {
        // Guard failure returns before any network access; a real call with
        // this config would fail with an authentication error instead.
        let session = SessionContext::new();
        let err = recommend(&session, &gala_form(), &test_config())
            .await
            .unwrap_err();
        assert!(matches!(err, RecommendError::EmptyInventory));
    }

    #[test]
    fn test_failed_upload_leaves_inventory_untouched() {
        let mut session = SessionContext::new();
        session.replace_inventory(vec!["Rose Garden".to_string()]);

        let err = session
            .load_inventory("list.csv", b"name,price\nChanel No.5,120\n")
            .unwrap_err();
        assert!(matches!(err, InventoryError::MissingColumn));
        assert_eq!(session.inventory(), ["Rose Garden".to_string()]);

        let err = session.load_inventory("list.txt", b"perfumes\n").unwrap_err();
        assert!(matches!(err, InventoryError::UnsupportedFormat(_)));
        assert_eq!(session.inventory(), ["Rose Garden".to_string()]);
    }

    #[test]
    fn test_successful_upload_replaces_inventory() {
        let mut session = SessionContext::new();
        let perfumes = session
            .load_inventory("list.csv", b"Perfumes\nChanel No.5\n\nBleu de Chanel\n")
            .unwrap()
            .to_vec();
        assert_eq!(perfumes, vec!["Chanel No.5", "Bleu de Chanel"]);
        assert_eq!(session.inventory(), perfumes);
    }

    #[test]
    fn test_replace_inventory() {
        let mut session = SessionContext::new();
        assert!(session.inventory().is_empty());

        session.replace_inventory(vec!["Rose Garden".to_string()]);
        assert_eq!(session.inventory(), ["Rose Garden".to_string()]);

        session.replace_inventory(vec!["Ocean Breeze".to_string(), "Noir".to_string()]);
        assert_eq!(session.inventory().len(), 2);
    }
}
