use serde::{Deserialize, Serialize};

/// Temperature substituted when no live weather data is available
pub const FALLBACK_TEMPERATURE_C: f64 = 25.0;

/// Humidity substituted when no live weather data is available
pub const FALLBACK_HUMIDITY: u8 = 50;

/// A single weather observation used to pick perfumes
///
/// Humidity is a percentage in [0, 100] by convention; the lookup never
/// produces values outside that range but user-edited readings are taken
/// as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub humidity: u8,
    pub description: String,
}

impl WeatherReading {
    /// The fixed reading substituted whenever live weather data is unavailable
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            temperature_c: FALLBACK_TEMPERATURE_C,
            humidity: FALLBACK_HUMIDITY,
            description: String::new(),
        }
    }
}

/// The fixed set of fragrance families the form offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragranceType {
    Floral,
    Woody,
    Citrus,
    Fresh,
    Oriental,
    Spicy,
    Aquatic,
}

impl std::fmt::Display for FragranceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Floral => "Floral",
            Self::Woody => "Woody",
            Self::Citrus => "Citrus",
            Self::Fresh => "Fresh",
            Self::Oriental => "Oriental",
            Self::Spicy => "Spicy",
            Self::Aquatic => "Aquatic",
        };
        f.write_str(name)
    }
}

/// Optional attributes the customer may add to steer the recommendation
///
/// Absent fields are real `Option`s, never sentinel strings like "None".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub fragrance_type: Option<FragranceType>,
    pub age_group: Option<String>,
    pub event: Option<String>,
}

/// Everything one recommendation request needs besides the inventory
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationForm {
    pub city: String,
    pub weather: WeatherReading,
    pub preferences: Preferences,
}
