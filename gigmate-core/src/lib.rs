//! gigmate-core: demand scoring engine and shared types for gig workers

pub mod analytics;
pub mod context;
pub mod engine;
pub mod latency;
pub mod noise;
pub mod platform;
pub mod synthetic;
pub mod time;
pub mod zones;

pub use analytics::{AnalyticsEvent, BufferedCollector, EventCollector, EventSink, LogSink};
pub use context::{DemandLevel, LocalEvent, WeatherCondition, WeatherSnapshot};
pub use engine::{expected_intensity, DemandEngine, Hotspot, Multipliers, Weights};
pub use latency::{Latency, NoLatency, SleepLatency};
pub use noise::{FixedNoise, NoiseSource, UniformNoise, ZeroNoise};
pub use platform::{ImportMethod, Platform};
pub use synthetic::{generate_synthetic_training_data, TrainingDataPoint};
pub use time::{Clock, FixedClock, SystemClock};
pub use zones::{Coordinates, Zone, DEFAULT_ZONES};
