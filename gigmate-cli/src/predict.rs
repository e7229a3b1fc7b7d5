use anyhow::Result;
use gigmate_core::time::parse_timezone;
use gigmate_core::{
    DemandEngine, DemandLevel, Hotspot, LocalEvent, SleepLatency, WeatherCondition,
    WeatherSnapshot,
};
use rand::Rng;
use std::time::Duration;

use crate::config::Config;

/// Weather used when the caller doesn't supply any: mostly sunny, rain 30% of the time.
pub fn mock_weather() -> WeatherSnapshot {
    let condition = if rand::thread_rng().gen_bool(0.3) {
        WeatherCondition::Rainy
    } else {
        WeatherCondition::Sunny
    };
    WeatherSnapshot::new(27.0, condition)
}

pub fn mock_event() -> LocalEvent {
    LocalEvent::new(
        "IPL: RCB vs MI",
        "Chinnaswamy Stadium",
        "19:30",
        DemandLevel::Extreme,
    )
}

pub async fn run_prediction(
    cfg: &Config,
    city: &str,
    weather: &WeatherSnapshot,
    event: Option<&LocalEvent>,
) -> Result<Vec<Hotspot>> {
    let tz = parse_timezone(&cfg.engine.timezone)?;
    let engine = DemandEngine::new()
        .with_weights(cfg.weights)
        .with_timezone(tz)
        .with_latency(SleepLatency(Duration::from_millis(cfg.engine.latency_ms)));

    Ok(engine.predict(city, weather, event).await)
}

pub fn print_hotspots(city: &str, weather: &WeatherSnapshot, event: Option<&LocalEvent>, hotspots: &[Hotspot]) {
    println!("# Demand forecast: {city}\n");
    println!("Weather: {:?} {:.0}°C", weather.condition, weather.temperature_c);
    match event {
        Some(e) => println!(
            "Event: {} @ {} ({}, {:?} demand)\n",
            e.name, e.location, e.start_time, e.expected_demand
        ),
        None => println!("Event: none\n"),
    }

    for (i, h) in hotspots.iter().enumerate() {
        println!(
            "{:>2}. {:<24} intensity={:>4.1} | {} | {} | bonus {}",
            i + 1,
            h.zone.area,
            h.intensity,
            h.zone.demand_reason,
            h.zone.distance,
            h.zone.base_incentive
        );
    }
}
