pub mod completion;
pub mod config;
pub mod http;
pub mod inventory;
pub mod models;
pub mod prompt;
pub mod session;
pub mod weather;

// Re-export commonly used types
pub use config::Config;
pub use inventory::InventoryError;
pub use models::{FragranceType, Preferences, RecommendationForm, WeatherReading};
pub use prompt::Prompt;
pub use session::{RecommendError, SessionContext};
pub use weather::WeatherLookup;
