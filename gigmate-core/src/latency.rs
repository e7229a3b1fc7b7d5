//! Simulated inference latency.
//!
//! `DemandEngine::predict` always suspends on its latency once before scoring.
//! Production uses a tokio timer; tests plug in `NoLatency`.

use std::future::Future;
use std::time::Duration;

pub trait Latency {
    fn wait(&self) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy)]
pub struct SleepLatency(pub Duration);

impl Default for SleepLatency {
    fn default() -> Self {
        Self(Duration::from_millis(1500))
    }
}

impl Latency for SleepLatency {
    fn wait(&self) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(self.0)
    }
}

/// Yields once to the runtime, then resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

impl Latency for NoLatency {
    fn wait(&self) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_sleep_latency_waits() {
        let start = Instant::now();
        SleepLatency(Duration::from_millis(20)).wait().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
