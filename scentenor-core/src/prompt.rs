//! Prompt composition for the recommendation request
//!
//! Pure string assembly: the inventory, the (possibly edited) weather
//! reading and the optional preferences are merged into a fixed consultant
//! instruction pair. No I/O happens here.

use crate::models::{Preferences, WeatherReading};

/// Placeholder used when the customer gave no event description
const UNKNOWN_EVENT: &str = "an unknown event";

/// Placeholder used when no fragrance family was picked
const NO_FRAGRANCE_TYPE: &str = "No specific fragrance type";

/// Placeholder used when no age group was given
const NO_AGE_GROUP: &str = "No specific age group";

/// Fixed system-role instruction establishing the consultant persona
const SYSTEM_INSTRUCTION: &str = "\
You are a professional perfume consultant. Your job is to analyze the provided list of perfumes \
and carefully recommend a suitable selection based on:
- Optional weather conditions (temperature, humidity, general description).
- Optional event type (formal, casual, outdoor, etc.).
- Optional fragrance type preference.
- Optional age group.
Avoid random recommendations and give a thoughtful, tailored list.";

/// The composed instruction pair sent to the completion service
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Compose the instruction pair for one recommendation request
///
/// Deterministic for identical inputs. The caller guarantees a non-empty
/// inventory; an empty one still composes but is rejected upstream before
/// any request is sent.
#[must_use]
pub fn compose(
    inventory: &[String],
    city: &str,
    weather: &WeatherReading,
    preferences: &Preferences,
) -> Prompt {
    let perfumes = inventory.join(", ");

    let event = preferences
        .event
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or(UNKNOWN_EVENT);

    let fragrance_type = preferences
        .fragrance_type
        .map(|t| t.to_string())
        .unwrap_or_else(|| NO_FRAGRANCE_TYPE.to_string());

    let age_group = preferences
        .age_group
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or(NO_AGE_GROUP);

    let user = format!(
        r#"My shop has these perfumes: {perfumes}.
I want to recommend a perfume to a customer going to {event}. The weather in {city} is {description} ({temperature:.1}°C, {humidity}% humidity).
Recommend perfumes from the list based on the following:
- (Optional) Weather: adjust for temperature and humidity.
- (Optional) Event type: consider the formality or setting.
- Fragrance type (optional): {fragrance_type}.
- Age group (optional): {age_group}.

Carefully analyze the list and avoid random suggestions. Include:
1. The recommended perfumes list.
2. A brief reason for each choice.
3. (Optional) Guidance on when and how to wear them."#,
        description = weather.description,
        temperature = weather.temperature_c,
        humidity = weather.humidity,
    );

    Prompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        user,
    }
}
