//! Demand engine: weighted hotspot scoring over the static zone table.
//!
//! intensity = base × weather × event × time-of-day + noise, clamped to [1, 10].
//!
//! Every call waits on the configured latency, draws fresh noise per zone and
//! returns all zones sorted by intensity (stable, so ties keep table order).
//! Nothing is cached between calls.

use anyhow::{bail, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::context::{DemandLevel, LocalEvent, WeatherSnapshot};
use crate::latency::{Latency, SleepLatency};
use crate::noise::{NoiseSource, UniformNoise};
use crate::time::{local_hour, Clock, SystemClock};
use crate::zones::{Zone, DEFAULT_ZONES};

pub const MIN_INTENSITY: f64 = 1.0;
pub const MAX_INTENSITY: f64 = 10.0;

/// Multiplier table for the scoring formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Weights {
    pub rain: f64,
    pub extreme_event: f64,
    /// Applies to non-extreme events and to "no event" alike.
    pub default_event: f64,
    pub dinner_surge: f64,
    /// Inclusive local-hour window for the dinner surge.
    pub surge_start_hour: u32,
    pub surge_end_hour: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            rain: 1.7,
            extreme_event: 1.5,
            default_event: 1.1,
            dinner_surge: 1.3,
            surge_start_hour: 19,
            surge_end_hour: 22,
        }
    }
}

impl Weights {
    /// Multipliers must be finite and non-negative; surge hours must be a valid
    /// local-hour range.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("rain", self.rain),
            ("extreme_event", self.extreme_event),
            ("default_event", self.default_event),
            ("dinner_surge", self.dinner_surge),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("weight {name} must be a finite, non-negative number (got {value})");
            }
        }
        if self.surge_start_hour > 23 || self.surge_end_hour > 23 {
            bail!(
                "surge hours must be 0-23 (got {}-{})",
                self.surge_start_hour,
                self.surge_end_hour
            );
        }
        if self.surge_start_hour > self.surge_end_hour {
            bail!(
                "surge_start_hour {} is after surge_end_hour {}",
                self.surge_start_hour,
                self.surge_end_hour
            );
        }
        Ok(())
    }
}

/// Multipliers resolved for one prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    pub weather: f64,
    pub event: f64,
    pub time_of_day: f64,
}

impl Multipliers {
    pub fn combined(&self) -> f64 {
        self.weather * self.event * self.time_of_day
    }
}

/// A zone with its freshly computed intensity.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Hotspot {
    #[serde(flatten)]
    pub zone: Zone,
    pub intensity: f64,
}

/// Noise-free, unclamped score for one zone.
pub fn expected_intensity(zone: &Zone, multipliers: &Multipliers) -> f64 {
    zone.base_intensity * multipliers.combined()
}

pub struct DemandEngine<C = SystemClock, N = UniformNoise, L = SleepLatency> {
    zones: &'static [Zone],
    weights: Weights,
    timezone: Tz,
    clock: C,
    noise: N,
    latency: L,
}

impl DemandEngine {
    /// Production engine: system clock, uniform noise, 1.5s simulated inference.
    pub fn new() -> Self {
        Self {
            zones: &DEFAULT_ZONES,
            weights: Weights::default(),
            timezone: chrono_tz::Asia::Kolkata,
            clock: SystemClock,
            noise: UniformNoise::default(),
            latency: SleepLatency::default(),
        }
    }
}

impl Default for DemandEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, N, L> DemandEngine<C, N, L> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> DemandEngine<C2, N, L> {
        DemandEngine {
            zones: self.zones,
            weights: self.weights,
            timezone: self.timezone,
            clock,
            noise: self.noise,
            latency: self.latency,
        }
    }

    pub fn with_noise<N2: NoiseSource>(self, noise: N2) -> DemandEngine<C, N2, L> {
        DemandEngine {
            zones: self.zones,
            weights: self.weights,
            timezone: self.timezone,
            clock: self.clock,
            noise,
            latency: self.latency,
        }
    }

    pub fn with_latency<L2: Latency>(self, latency: L2) -> DemandEngine<C, N, L2> {
        DemandEngine {
            zones: self.zones,
            weights: self.weights,
            timezone: self.timezone,
            clock: self.clock,
            noise: self.noise,
            latency,
        }
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_zones(mut self, zones: &'static [Zone]) -> Self {
        self.zones = zones;
        self
    }

    pub fn zones(&self) -> &'static [Zone] {
        self.zones
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }
}

impl<C: Clock, N: NoiseSource, L: Latency> DemandEngine<C, N, L> {
    /// Resolve the weather/event/time multipliers for the current instant.
    pub fn multipliers(&self, weather: &WeatherSnapshot, event: Option<&LocalEvent>) -> Multipliers {
        let w = &self.weights;

        let weather_mult = if weather.condition.is_rainy() { w.rain } else { 1.0 };

        let event_mult = match event {
            Some(e) if e.expected_demand == DemandLevel::Extreme => w.extreme_event,
            _ => w.default_event,
        };

        let hour = local_hour(self.clock.now(), self.timezone);
        let time_mult = if (w.surge_start_hour..=w.surge_end_hour).contains(&hour) {
            w.dinner_surge
        } else {
            1.0
        };

        Multipliers {
            weather: weather_mult,
            event: event_mult,
            time_of_day: time_mult,
        }
    }

    /// Rank every zone for the next hour.
    ///
    /// `city` is accepted for callers but does not select a different table yet.
    pub async fn predict(
        &self,
        city: &str,
        weather: &WeatherSnapshot,
        event: Option<&LocalEvent>,
    ) -> Vec<Hotspot> {
        self.latency.wait().await;

        let m = self.multipliers(weather, event);
        log::debug!(
            "scoring {} zones for {city}: weather={:.2} event={:.2} time={:.2}",
            self.zones.len(),
            m.weather,
            m.event,
            m.time_of_day
        );

        let mut hotspots: Vec<Hotspot> = self
            .zones
            .iter()
            .map(|zone| {
                let raw = expected_intensity(zone, &m) + self.noise.sample();
                Hotspot {
                    zone: *zone,
                    intensity: raw.clamp(MIN_INTENSITY, MAX_INTENSITY),
                }
            })
            .collect();

        // sort_by is stable: equal intensities keep table order.
        hotspots.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
        hotspots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::WeatherCondition;
    use crate::latency::NoLatency;
    use crate::noise::{FixedNoise, ZeroNoise};
    use crate::time::FixedClock;
    use chrono::{DateTime, TimeZone, Utc};
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    // 20:00 and 12:00 in Asia/Kolkata
    fn dinner() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 19, 14, 30, 0).unwrap()
    }

    fn midday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 19, 6, 30, 0).unwrap()
    }

    fn engine_at<N: NoiseSource>(
        now: DateTime<Utc>,
        noise: N,
    ) -> DemandEngine<FixedClock, N, NoLatency> {
        DemandEngine::new()
            .with_clock(FixedClock(now))
            .with_noise(noise)
            .with_latency(NoLatency)
    }

    fn sunny() -> WeatherSnapshot {
        WeatherSnapshot::new(27.0, WeatherCondition::Sunny)
    }

    fn rainy() -> WeatherSnapshot {
        WeatherSnapshot::new(24.0, WeatherCondition::Rainy)
    }

    fn ipl() -> LocalEvent {
        LocalEvent::new("IPL: RCB vs MI", "Chinnaswamy Stadium", "19:30", DemandLevel::Extreme)
    }

    fn zone_intensity(hotspots: &[Hotspot], area: &str) -> f64 {
        hotspots.iter().find(|h| h.zone.area == area).unwrap().intensity
    }

    #[test]
    fn test_rain_raises_expected_intensity() {
        let engine = engine_at(midday(), ZeroNoise);
        let zone = &DEFAULT_ZONES[3];
        let dry = expected_intensity(zone, &engine.multipliers(&sunny(), None));
        let wet = expected_intensity(zone, &engine.multipliers(&rainy(), None));
        assert!(wet > dry);
        assert!((wet / dry - 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_event_multipliers() {
        let engine = engine_at(midday(), ZeroNoise);
        let mild = LocalEvent::new("Flea market", "HSR", "10:00", DemandLevel::High);

        let none = engine.multipliers(&sunny(), None).event;
        let high = engine.multipliers(&sunny(), Some(&mild)).event;
        let extreme = engine.multipliers(&sunny(), Some(&ipl())).event;

        assert_eq!(none, 1.1);
        assert_eq!(high, 1.1);
        assert_eq!(extreme, 1.5);
    }

    #[test]
    fn test_dinner_window_is_inclusive() {
        let at = |h: u32, m: u32| {
            // IST hour h:m expressed in UTC
            let local = chrono_tz::Asia::Kolkata
                .with_ymd_and_hms(2026, 2, 19, h, m, 0)
                .unwrap();
            engine_at(local.with_timezone(&Utc), ZeroNoise)
                .multipliers(&sunny(), None)
                .time_of_day
        };
        assert_eq!(at(18, 59), 1.0);
        assert_eq!(at(19, 0), 1.3);
        assert_eq!(at(22, 59), 1.3);
        assert_eq!(at(23, 0), 1.0);
    }

    #[tokio::test]
    async fn test_dinner_raises_intensity() {
        let day = engine_at(midday(), ZeroNoise).predict("Bangalore", &sunny(), None).await;
        let night = engine_at(dinner(), ZeroNoise).predict("Bangalore", &sunny(), None).await;

        let area = "MG Road Metro";
        assert!(zone_intensity(&night, area) > zone_intensity(&day, area));
    }

    #[tokio::test]
    async fn test_noise_free_scores() {
        let hotspots = engine_at(midday(), ZeroNoise).predict("Bangalore", &sunny(), None).await;
        // 6.2 * 1.0 * 1.1 * 1.0
        assert!((zone_intensity(&hotspots, "MG Road Metro") - 6.82).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_intensity_clamped_high() {
        let engine = engine_at(dinner(), FixedNoise(1.0));
        let hotspots = engine.predict("Bangalore", &rainy(), Some(&ipl())).await;
        assert_eq!(hotspots.len(), DEFAULT_ZONES.len());
        assert!(hotspots.iter().all(|h| h.intensity == MAX_INTENSITY));
    }

    #[tokio::test]
    async fn test_intensity_clamped_low() {
        static WEAK: [Zone; 1] = [Zone::new("Outskirts", (5.0, 5.0), 1.0, "Quiet", "20 km", "₹0")];
        let engine = engine_at(midday(), FixedNoise(-1.0)).with_zones(&WEAK);
        let hotspots = engine.predict("Bangalore", &sunny(), None).await;
        assert_eq!(hotspots[0].intensity, MIN_INTENSITY);
    }

    #[tokio::test]
    async fn test_sorted_descending_and_ties_stable() {
        static FLAT: [Zone; 3] = [
            Zone::new("A", (10.0, 10.0), 5.0, "x", "1 km", "₹10"),
            Zone::new("B", (20.0, 20.0), 5.0, "x", "1 km", "₹10"),
            Zone::new("C", (30.0, 30.0), 7.0, "x", "1 km", "₹10"),
        ];
        let engine = engine_at(midday(), ZeroNoise).with_zones(&FLAT);
        let hotspots = engine.predict("Bangalore", &sunny(), None).await;
        let areas: Vec<_> = hotspots.iter().map(|h| h.zone.area).collect();
        assert_eq!(areas, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_random_predictions_hold_invariants() {
        let engine = DemandEngine::new()
            .with_clock(FixedClock(dinner()))
            .with_latency(NoLatency);
        let mild = LocalEvent::new("Fair", "Koramangala", "18:00", DemandLevel::Low);
        let extreme = ipl();

        for weather in [sunny(), rainy()] {
            for event in [None, Some(&mild), Some(&extreme)] {
                for _ in 0..25 {
                    let hotspots = engine.predict("Bangalore", &weather, event).await;
                    assert_eq!(hotspots.len(), DEFAULT_ZONES.len());
                    for h in &hotspots {
                        assert!((MIN_INTENSITY..=MAX_INTENSITY).contains(&h.intensity));
                    }
                    for w in hotspots.windows(2) {
                        assert!(w[0].intensity >= w[1].intensity, "not sorted");
                    }
                }
            }
        }
    }

    #[derive(Default)]
    struct CountingLatency(AtomicUsize);

    impl Latency for CountingLatency {
        fn wait(&self) -> impl Future<Output = ()> + Send {
            self.0.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test]
    async fn test_predict_waits_on_latency_once_per_call() {
        let engine = DemandEngine::new()
            .with_clock(FixedClock(midday()))
            .with_noise(ZeroNoise)
            .with_latency(CountingLatency::default());

        engine.predict("Bangalore", &sunny(), None).await;
        engine.predict("Bangalore", &rainy(), None).await;
        assert_eq!(engine.latency.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_predict_suspends_for_sleep_latency() {
        let engine = DemandEngine::new()
            .with_clock(FixedClock(midday()))
            .with_latency(SleepLatency(Duration::from_millis(20)));

        let start = Instant::now();
        let hotspots = engine.predict("Bangalore", &sunny(), None).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(hotspots.len(), DEFAULT_ZONES.len());
    }

    #[tokio::test]
    async fn test_concurrent_predictions_hold_invariants() {
        let engine = DemandEngine::new()
            .with_clock(FixedClock(dinner()))
            .with_latency(SleepLatency(Duration::from_millis(10)));
        let extreme = ipl();
        let (w_a, w_b, w_c) = (sunny(), rainy(), rainy());

        let (a, b, c) = tokio::join!(
            engine.predict("Bangalore", &w_a, None),
            engine.predict("Bangalore", &w_b, Some(&extreme)),
            engine.predict("Bangalore", &w_c, None),
        );

        for hotspots in [a, b, c] {
            assert_eq!(hotspots.len(), DEFAULT_ZONES.len());
            for h in &hotspots {
                assert!((MIN_INTENSITY..=MAX_INTENSITY).contains(&h.intensity));
            }
            for w in hotspots.windows(2) {
                assert!(w[0].intensity >= w[1].intensity, "not sorted");
            }
        }
    }

    #[test]
    fn test_weights_validation() {
        assert!(Weights::default().validate().is_ok());

        let nan = Weights { rain: f64::NAN, ..Weights::default() };
        assert!(nan.validate().is_err());

        let inf = Weights { dinner_surge: f64::INFINITY, ..Weights::default() };
        assert!(inf.validate().is_err());

        let negative = Weights { extreme_event: -1.5, ..Weights::default() };
        assert!(negative.validate().is_err());

        let bad_hours = Weights { surge_start_hour: 22, surge_end_hour: 19, ..Weights::default() };
        assert!(bad_hours.validate().is_err());

        let late = Weights { surge_end_hour: 24, ..Weights::default() };
        assert!(late.validate().is_err());
    }

    #[test]
    fn test_weights_from_partial_json() {
        let w: Weights = serde_json::from_str(r#"{"rain": 2.0}"#).unwrap();
        assert_eq!(w.rain, 2.0);
        assert_eq!(w.extreme_event, 1.5);
    }
}
