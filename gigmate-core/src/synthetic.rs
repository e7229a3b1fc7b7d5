//! Synthetic demand history used to warm up forecasting experiments.
//!
//! Row shape: {timestamp, lat, lng, demand_score, platform, weather, day_of_week}.

use chrono::{DateTime, Datelike, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::context::WeatherCondition;
use crate::platform::Platform;

/// Hours of history the generator spreads points over (30 days).
pub const HISTORY_HOURS: i64 = 720;

const PLATFORMS: [Platform; 5] = [
    Platform::Swiggy,
    Platform::Zomato,
    Platform::Uber,
    Platform::Rapido,
    Platform::Zepto,
];

const WEATHER: [WeatherCondition; 3] = [
    WeatherCondition::Sunny,
    WeatherCondition::Rainy,
    WeatherCondition::Cloudy,
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingDataPoint {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lng: f64,
    /// 1-10
    pub demand_score: u8,
    pub platform: Platform,
    pub weather: WeatherCondition,
    /// 0 = Sunday
    pub day_of_week: u32,
}

/// Generate `count` random points around central Bangalore within the last
/// [`HISTORY_HOURS`] before `now`.
pub fn generate_synthetic_training_data<R: Rng + ?Sized>(
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<TrainingDataPoint> {
    (0..count)
        .map(|_| {
            let timestamp = now - Duration::hours(rng.gen_range(0..HISTORY_HOURS));
            TrainingDataPoint {
                timestamp,
                lat: 12.9 + rng.gen_range(0.0..0.1),
                lng: 77.5 + rng.gen_range(0.0..0.1),
                demand_score: rng.gen_range(1..=10),
                platform: *PLATFORMS.choose(rng).unwrap_or(&Platform::Swiggy),
                weather: *WEATHER.choose(rng).unwrap_or(&WeatherCondition::Sunny),
                day_of_week: timestamp.weekday().num_days_from_sunday(),
            }
        })
        .collect()
}
