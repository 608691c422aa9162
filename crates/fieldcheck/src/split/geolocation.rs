//! Geolocation subvalues (`lat,lng`).

use serde::{Deserialize, Serialize};

use super::{split_field, SubGrammar};
use crate::error::{FieldcheckError, Result};

/// A latitude/longitude pair as submitted to a geolocation field.
///
/// Coordinates stay strings: numeric checking is done by
/// [`validate_latlong_value`](crate::validation::validate_latlong_value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    pub lat: String,
    pub lng: String,
}

/// Parses `"<lat>, <lng>"` subvalues.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeolocationGrammar;

impl GeolocationGrammar {
    /// Spreadsheets export a leading `+` as `\+`.
    fn clean_coordinate(raw: &str) -> String {
        raw.trim().trim_start_matches('\\').trim().to_string()
    }
}

impl SubGrammar for GeolocationGrammar {
    type Output = Geolocation;

    fn name(&self) -> &'static str {
        "geolocation"
    }

    fn parse(&self, segment: &str, position: usize) -> Result<Geolocation> {
        let parts: Vec<&str> = segment.split(',').collect();
        if parts.len() != 2 {
            return Err(FieldcheckError::MalformedSegment {
                grammar: self.name(),
                position,
                segment: segment.to_string(),
                reason: format!("expected 'lat,lng', found {} comma-separated parts", parts.len()),
            });
        }

        Ok(Geolocation {
            lat: Self::clean_coordinate(parts[0]),
            lng: Self::clean_coordinate(parts[1]),
        })
    }
}

/// Split a geolocation field into its `lat`/`lng` pairs.
pub fn split_geolocation_string(value: &str, subdelimiter: &str) -> Result<Vec<Geolocation>> {
    split_field(value, subdelimiter, &GeolocationGrammar)
}
