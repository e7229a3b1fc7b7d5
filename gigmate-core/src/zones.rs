//! Static demand zones used as scoring units.
//!
//! Zone coordinates are percentages of a map viewport, not lat/lng. The table
//! currently covers central Bangalore only and is used for every city.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

/// A fixed area with baseline demand characteristics.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Zone {
    pub area: &'static str,
    pub coordinates: Coordinates,
    /// Demand baseline, 1-10.
    pub base_intensity: f64,
    pub demand_reason: &'static str,
    /// Display string, not derived from `coordinates`.
    pub distance: &'static str,
    pub base_incentive: &'static str,
}

impl Zone {
    pub const fn new(
        area: &'static str,
        xy: (f64, f64),
        base_intensity: f64,
        demand_reason: &'static str,
        distance: &'static str,
        base_incentive: &'static str,
    ) -> Self {
        Self {
            area,
            coordinates: Coordinates { x: xy.0, y: xy.1 },
            base_intensity,
            demand_reason,
            distance,
            base_incentive,
        }
    }
}

pub const DEFAULT_ZONES: [Zone; 6] = [
    Zone::new("Koramangala 5th Block", (35.0, 45.0), 7.8, "Food Cluster", "1.1 km", "₹35"),
    Zone::new("Indiranagar 100ft Rd", (65.0, 30.0), 8.5, "Night Peak", "3.2 km", "₹55"),
    Zone::new("Electronic City Ph 1", (50.0, 75.0), 6.9, "Office Exit", "7.8 km", "₹30"),
    Zone::new("MG Road Metro", (45.0, 20.0), 6.2, "Transit Peak", "4.1 km", "₹25"),
    Zone::new("HSR Sector 2", (25.0, 70.0), 8.1, "Grocery Surge", "2.5 km", "₹45"),
    Zone::new("Whitefield ITPL", (80.0, 55.0), 7.2, "Tech Park Exit", "11 km", "₹60"),
];
