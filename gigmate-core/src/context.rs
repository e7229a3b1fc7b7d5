//! Scoring inputs: weather snapshots and local events.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WeatherCondition {
    Sunny,
    Rainy,
    Cloudy,
    /// Anything we don't recognize. Scored like fair weather.
    #[serde(other)]
    Unknown,
}

impl WeatherCondition {
    pub fn is_rainy(&self) -> bool {
        matches!(self, WeatherCondition::Rainy)
    }
}

impl FromStr for WeatherCondition {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "sunny" => WeatherCondition::Sunny,
            "rainy" | "rain" => WeatherCondition::Rainy,
            "cloudy" => WeatherCondition::Cloudy,
            _ => WeatherCondition::Unknown,
        })
    }
}

/// Current weather at the worker's city. Only `condition` affects scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub condition: WeatherCondition,
}

impl WeatherSnapshot {
    pub fn new(temperature_c: f64, condition: WeatherCondition) -> Self {
        Self {
            temperature_c,
            condition,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum DemandLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl FromStr for DemandLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(DemandLevel::Low),
            "medium" => Ok(DemandLevel::Medium),
            "high" => Ok(DemandLevel::High),
            "extreme" => Ok(DemandLevel::Extreme),
            other => Err(anyhow::anyhow!("unknown demand level: {other}")),
        }
    }
}

/// A local happening (match, concert, festival) that may pull demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalEvent {
    pub name: String,
    pub location: String,
    /// Local wall-clock start, e.g. "19:30".
    pub start_time: String,
    pub expected_demand: DemandLevel,
}

impl LocalEvent {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        start_time: impl Into<String>,
        expected_demand: DemandLevel,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            start_time: start_time.into(),
            expected_demand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_condition_is_unknown() {
        let c: WeatherCondition = "Hailstorm".parse().unwrap();
        assert_eq!(c, WeatherCondition::Unknown);
        assert!(!c.is_rainy());

        let c: WeatherCondition = serde_json::from_str("\"Foggy\"").unwrap();
        assert_eq!(c, WeatherCondition::Unknown);
    }

    #[test]
    fn test_demand_level_parse() {
        assert_eq!("EXTREME".parse::<DemandLevel>().unwrap(), DemandLevel::Extreme);
        assert!("wild".parse::<DemandLevel>().is_err());
    }
}
