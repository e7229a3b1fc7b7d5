//! Analytics event buffering.
//!
//! Events are queued in memory and handed to an [`EventSink`] in batches once
//! the queue reaches the flush threshold. A failed sync drops the batch.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

pub const DEFAULT_FLUSH_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsEvent {
    pub event_name: String,
    pub params: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(event_name: impl Into<String>, params: &[(&str, &str)]) -> Self {
        Self {
            event_name: event_name.into(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            timestamp: Utc::now(),
        }
    }
}

/// Where flushed batches go (backend, file, log).
pub trait EventSink {
    fn sync(&self, batch: &[AnalyticsEvent]) -> Result<()>;
}

pub trait EventCollector {
    fn log_event(&self, event_name: &str, params: &[(&str, &str)]);
}

/// Writes each batch to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn sync(&self, batch: &[AnalyticsEvent]) -> Result<()> {
        log::info!("syncing {} analytics events", batch.len());
        for e in batch {
            log::debug!("[analytics] {} {:?}", e.event_name, e.params);
        }
        Ok(())
    }
}

pub struct BufferedCollector<S> {
    sink: S,
    threshold: usize,
    queue: Mutex<Vec<AnalyticsEvent>>,
}

impl<S: EventSink> BufferedCollector<S> {
    pub fn new(sink: S) -> Self {
        Self::with_threshold(sink, DEFAULT_FLUSH_THRESHOLD)
    }

    pub fn with_threshold(sink: S, threshold: usize) -> Self {
        Self {
            sink,
            threshold: threshold.max(1),
            queue: Mutex::new(Vec::new()),
        }
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Hand everything queued to the sink. The queue is emptied even if the sink fails.
    pub fn flush(&self) {
        let batch = std::mem::take(&mut *self.lock());
        if batch.is_empty() {
            return;
        }
        if let Err(e) = self.sink.sync(&batch) {
            log::error!("failed to sync {} analytics events: {e:#}", batch.len());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AnalyticsEvent>> {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: EventSink> EventCollector for BufferedCollector<S> {
    fn log_event(&self, event_name: &str, params: &[(&str, &str)]) {
        let event = AnalyticsEvent::new(event_name, params);
        log::debug!("[analytics] queued {}", event.event_name);

        let full = {
            let mut queue = self.lock();
            queue.push(event);
            queue.len() >= self.threshold
        };
        if full {
            self.flush();
        }
    }
}
