use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use weather_tourism::LatLon;
///
/// let dubai = LatLon(25.2048, 55.2708);
/// assert_eq!(dubai.0, 25.2048); // Latitude
/// assert_eq!(dubai.1, 55.2708); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    /// Dubai, United Arab Emirates. The location the built-in tourism series belongs to.
    pub const DUBAI: LatLon = LatLon(25.2048, 55.2708);

    pub fn lat(self) -> f64 {
        self.0
    }

    pub fn lon(self) -> f64 {
        self.1
    }

    /// Whether both components are finite and inside the usual geographic bounds.
    pub fn is_valid(self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(LatLon::DUBAI.is_valid());
        assert!(!LatLon(91.0, 0.0).is_valid());
        assert!(!LatLon(0.0, -180.5).is_valid());
        assert!(!LatLon(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_serializes_as_pair() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&LatLon::DUBAI)?, "[25.2048,55.2708]");
        let parsed: LatLon = serde_json::from_str("[48.8566, 2.3522]")?;
        assert_eq!(parsed, LatLon(48.8566, 2.3522));
        Ok(())
    }
}
