//! Rule-based activity suggestion derived from current weather.
//!
//! Pure functions: no I/O, no shared state.

use std::fmt;

/// Clear-sky condition code.
const SUNNY_CODE: &str = "clear_day";

/// Condition codes that mean precipitation.
const RAIN_CODES: &[&str] = &["rain", "storm", "hail"];

/// Substrings of the description that mean rain. Some provider locales only
/// report rain in free text.
const RAIN_MARKERS: &[&str] = &["chuva", "chuvis", "rain", "drizzle"];

/// Cold branch upper bound (inclusive).
const COLD_MAX_C: f64 = 18.0;

/// Hot branch lower bound (inclusive).
const HOT_MIN_C: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
    CannotSuggest,
    HotChocolate,
    Beach,
    IceCream,
    RefreshingOutdoor,
    Outdoor,
    Movie,
    LightOuting,
}

impl Suggestion {
    pub fn message(&self) -> &'static str {
        match self {
            Self::CannotSuggest => "Cannot suggest an activity right now.",
            Self::HotChocolate => "Offer your contact a hot chocolate...",
            Self::Beach => "Invite your contact to the beach in this heat!",
            Self::IceCream => "Invite your contact out for an ice cream.",
            Self::RefreshingOutdoor => "Invite your contact to a refreshing outdoor activity.",
            Self::Outdoor => "Invite your contact to do an outdoor activity.",
            Self::Movie => "Invite your contact to watch a movie.",
            Self::LightOuting => "Invite your contact for a light outing.",
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub fn is_sunny(condition_code: &str) -> bool {
    condition_code == SUNNY_CODE
}

pub fn is_rainy(condition_code: &str, description: &str) -> bool {
    let code = condition_code.to_lowercase();
    let description = description.to_lowercase();
    RAIN_CODES.contains(&code.as_str()) || RAIN_MARKERS.iter().any(|m| description.contains(m))
}

/// Picks a suggestion. Rules are checked top to bottom; the first match wins.
pub fn suggest(temperature_c: f64, condition_code: &str, description: &str) -> Suggestion {
    if !temperature_c.is_finite() {
        return Suggestion::CannotSuggest;
    }
    if temperature_c <= COLD_MAX_C {
        return Suggestion::HotChocolate;
    }

    let sunny = is_sunny(condition_code);
    let rainy = is_rainy(condition_code, description);

    if temperature_c >= HOT_MIN_C {
        if sunny {
            Suggestion::Beach
        } else if rainy {
            Suggestion::IceCream
        } else {
            Suggestion::RefreshingOutdoor
        }
    } else if sunny {
        Suggestion::Outdoor
    } else if rainy {
        Suggestion::Movie
    } else {
        Suggestion::LightOuting
    }
}
