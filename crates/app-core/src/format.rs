//! Distance and duration labels
//!
//! All splits truncate: 3725 s is 1 hr 2 min, 12345 m is 12 km 345 m. Zero
//! parts are left out of the labels.

use i18n::Translator;
use maps_client::Route;
use serde::{Deserialize, Serialize};

/// Route length and travel time split into display units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Whole hours
    pub hours: u64,
    /// Minutes past the hour
    pub minutes: u64,
    /// Whole kilometers
    pub kilometers: u64,
    /// Meters past the kilometer
    pub meters: u64,
}

impl RouteSummary {
    /// Split a distance and duration
    pub fn new(distance_meters: u64, duration_seconds: u64) -> Self {
        Self {
            hours: duration_seconds / 3600,
            minutes: (duration_seconds % 3600) / 60,
            kilometers: distance_meters / 1000,
            meters: distance_meters % 1000,
        }
    }

    /// Summary of a route
    pub fn from_route(route: &Route) -> Self {
        Self::new(route.distance_meters, route.duration_seconds)
    }

    /// e.g. "1 hr 2 min"
    pub fn duration_label(&self, tr: &Translator) -> String {
        join_parts(&[
            (self.hours, tr.tr("unit-hours")),
            (self.minutes, tr.tr("unit-minutes")),
        ])
    }

    /// e.g. "12 km 345 m"
    pub fn distance_label(&self, tr: &Translator) -> String {
        distance_parts(self.kilometers, self.meters, tr)
    }

    /// The route-panel label, e.g. "1 hr 2 min (12 km 345 m)"
    pub fn label(&self, tr: &Translator) -> String {
        let duration = self.duration_label(tr);
        let distance = self.distance_label(tr);
        if duration.is_empty() {
            format!("({})", distance)
        } else {
            format!("{} ({})", duration, distance)
        }
    }
}

fn join_parts(parts: &[(u64, String)]) -> String {
    parts
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{} {}", value, unit))
        .collect::<Vec<_>>()
        .join(" ")
}

fn distance_parts(kilometers: u64, meters: u64, tr: &Translator) -> String {
    join_parts(&[
        (kilometers, tr.tr("unit-kilometers")),
        (meters, tr.tr("unit-meters")),
    ])
}

/// Distance of a guidance step, e.g. "1 km 200 m"; empty for zero
pub fn step_distance_label(distance_meters: u64, tr: &Translator) -> String {
    distance_parts(distance_meters / 1000, distance_meters % 1000, tr)
}

/// Remaining distance of a session: kilometers with at most one decimal
///
/// Only an exact zero falls back to meters.
pub fn remaining_distance_label(distance_meters: f64, tr: &Translator) -> String {
    let distance_meters = distance_meters.max(0.0);
    if distance_meters > 0.0 {
        let kilometers = (distance_meters / 100.0).round() / 10.0;
        let value = if kilometers.fract() == 0.0 {
            format!("{}", kilometers as u64)
        } else {
            format!("{:.1}", kilometers)
        };
        format!("{} {}", value, tr.tr("unit-kilometers"))
    } else {
        format!("0 {}", tr.tr("unit-meters"))
    }
}

/// Remaining time of a session; minutes are always shown below an hour
pub fn remaining_time_label(time_seconds: f64, tr: &Translator) -> String {
    let seconds = time_seconds.max(0.0) as u64;
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        join_parts(&[
            (hours, tr.tr("unit-hours")),
            (minutes, tr.tr("unit-minutes")),
        ])
    } else {
        format!("{} {}", minutes, tr.tr("unit-minutes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> Translator {
        Translator::negotiated(&["en-US"]).unwrap()
    }

    #[test]
    fn test_summary_split() {
        let summary = RouteSummary::new(12_345, 3_725);
        assert_eq!(
            summary,
            RouteSummary {
                hours: 1,
                minutes: 2,
                kilometers: 12,
                meters: 345
            }
        );
    }

    #[test]
    fn test_summary_truncates() {
        let summary = RouteSummary::new(999, 3_599);
        assert_eq!(summary.hours, 0);
        assert_eq!(summary.minutes, 59);
        assert_eq!(summary.kilometers, 0);
        assert_eq!(summary.meters, 999);
    }

    #[test]
    fn test_summary_label() {
        let tr = english();
        assert_eq!(
            RouteSummary::new(12_345, 3_725).label(&tr),
            "1 hr 2 min (12 km 345 m)"
        );
        assert_eq!(RouteSummary::new(2_000, 600).label(&tr), "10 min (2 km)");
        assert_eq!(RouteSummary::new(40, 30).label(&tr), "(40 m)");
    }

    #[test]
    fn test_step_distance_label() {
        let tr = english();
        assert_eq!(step_distance_label(1_200, &tr), "1 km 200 m");
        assert_eq!(step_distance_label(3_000, &tr), "3 km");
        assert_eq!(step_distance_label(80, &tr), "80 m");
        assert_eq!(step_distance_label(0, &tr), "");
    }

    #[test]
    fn test_remaining_distance_label() {
        let tr = english();
        assert_eq!(remaining_distance_label(1_500.0, &tr), "1.5 km");
        assert_eq!(remaining_distance_label(2_000.0, &tr), "2 km");
        assert_eq!(remaining_distance_label(300.0, &tr), "0.3 km");
        assert_eq!(remaining_distance_label(0.0, &tr), "0 m");
    }

    #[test]
    fn test_remaining_time_label() {
        let tr = english();
        assert_eq!(remaining_time_label(3_725.0, &tr), "1 hr 2 min");
        assert_eq!(remaining_time_label(7_200.0, &tr), "2 hr");
        assert_eq!(remaining_time_label(30.0, &tr), "0 min");
    }
}
