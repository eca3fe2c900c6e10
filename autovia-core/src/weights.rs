//! Travel-time weight derivation.
//!
//! Every edge weight used for routing is derived once at build time from
//! segment length and free-flow speed. Edges with no usable speed fall
//! back to a per-road-class default.

use hashbrown::HashMap;

use crate::Error;

/// Fallback speed for edges with no usable speed value and no recognized
/// road classification, in km/h.
pub const DEFAULT_SPEED_KPH: f64 = 30.0;

/// km/h to m/s conversion factor.
const KPH_TO_MPS: f64 = 1000.0 / 3600.0;

/// Fallback free-flow speeds keyed by road classification.
///
/// Classes follow the usual OSM highway taxonomy; anything else falls
/// back to [`DEFAULT_SPEED_KPH`].
#[derive(Debug, Clone)]
pub struct SpeedDefaults {
    class_speeds: HashMap<String, f64>,
    fallback: f64,
}

impl Default for SpeedDefaults {
    fn default() -> Self {
        let class_speeds = [
            ("motorway", 100.0),
            ("motorway_link", 60.0),
            ("trunk", 80.0),
            ("trunk_link", 50.0),
            ("primary", 60.0),
            ("primary_link", 40.0),
            ("secondary", 50.0),
            ("secondary_link", 35.0),
            ("tertiary", 40.0),
            ("tertiary_link", 30.0),
            ("unclassified", 30.0),
            ("residential", 30.0),
            ("living_street", 10.0),
            ("service", 20.0),
        ]
        .into_iter()
        .map(|(class, speed)| (class.to_string(), speed))
        .collect();

        Self {
            class_speeds,
            fallback: DEFAULT_SPEED_KPH,
        }
    }
}

impl SpeedDefaults {
    /// Overrides the fallback speed for a single road class.
    pub fn set_class_speed(&mut self, class: &str, speed_kph: f64) {
        self.class_speeds.insert(class.to_string(), speed_kph);
    }

    /// Overrides the last-resort fallback speed.
    pub fn set_fallback(&mut self, speed_kph: f64) {
        self.fallback = speed_kph;
    }

    /// Fallback speed in km/h for an edge of the given classification.
    pub fn speed_for(&self, class: Option<&str>) -> f64 {
        class
            .and_then(|c| self.class_speeds.get(c).copied())
            .unwrap_or(self.fallback)
    }

    /// Resolves the effective speed of an edge: its own value when
    /// positive, otherwise the class fallback.
    pub fn effective_speed(&self, speed_kph: Option<f64>, class: Option<&str>) -> f64 {
        match speed_kph {
            Some(speed) if speed > 0.0 => speed,
            _ => self.speed_for(class),
        }
    }
}

/// Derives the travel time in seconds for a segment of `length_m` meters
/// traversed at `speed_kph` km/h.
///
/// # Errors
///
/// Returns [`Error::InvalidWeight`] if the length or speed is not a
/// positive finite number. Graph construction validates both before
/// calling this, so a failure here means the validation layer let
/// something through.
pub fn derive_travel_time(length_m: f64, speed_kph: f64) -> Result<f64, Error> {
    if !length_m.is_finite() || length_m <= 0.0 {
        return Err(Error::InvalidWeight(format!(
            "edge length must be positive, got {length_m}"
        )));
    }
    if !speed_kph.is_finite() || speed_kph <= 0.0 {
        return Err(Error::InvalidWeight(format!(
            "effective speed must be positive, got {speed_kph} km/h"
        )));
    }

    Ok(length_m / (speed_kph * KPH_TO_MPS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_time_from_length_and_speed() {
        // 100 m at 36 km/h (10 m/s) is exactly 10 s
        let time = derive_travel_time(100.0, 36.0).unwrap();
        assert!((time - 10.0).abs() < 1e-9);

        let time = derive_travel_time(50.0, 18.0).unwrap();
        assert!((time - 10.0).abs() < 1e-9);
    }

    #[test]
    fn travel_time_grows_with_length() {
        let short = derive_travel_time(100.0, 50.0).unwrap();
        let long = derive_travel_time(101.0, 50.0).unwrap();
        assert!(long > short);
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(derive_travel_time(0.0, 30.0).is_err());
        assert!(derive_travel_time(-5.0, 30.0).is_err());
        assert!(derive_travel_time(100.0, 0.0).is_err());
        assert!(derive_travel_time(100.0, f64::NAN).is_err());
    }

    #[test]
    fn class_fallbacks() {
        let speeds = SpeedDefaults::default();
        assert_eq!(speeds.effective_speed(Some(70.0), Some("residential")), 70.0);
        assert_eq!(speeds.effective_speed(Some(0.0), Some("motorway")), 100.0);
        assert_eq!(speeds.effective_speed(None, Some("no_such_class")), DEFAULT_SPEED_KPH);
        assert_eq!(speeds.effective_speed(None, None), DEFAULT_SPEED_KPH);
    }
}
