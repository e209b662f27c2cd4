//! Testing utilities for OTP workspace
//!
//! Shared zone systems, an in-memory fetcher that records every fetch, and
//! loader setup.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use async_trait::async_trait;
use otp_core::{IntensityMetric, IntensityRange, ZoneDefinition, ZoneSystem};
use otp_remote::{FetchError, Fetcher, Loader, LoaderConfig, Locator};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub fn locator(url: &str) -> Locator {
    Locator::parse(url).unwrap()
}

fn zone(code: &str, name: &str, metric: IntensityMetric, target: f64, range: (f64, f64)) -> ZoneDefinition {
    ZoneDefinition::new(code, name, format!("{name} running"), metric, target)
        .with_range(IntensityRange::new(range.0, range.1).unwrap())
}

/// Jack Daniels' five VO2max zones
pub fn daniels_zone_system() -> ZoneSystem {
    let metric = IntensityMetric::Vo2Max;
    ZoneSystem::new(
        "Daniels",
        Some("Jack Daniels' Running Formula".to_string()),
        [
            zone("E", "Easy", metric, 0.65, (0.59, 0.74)),
            zone("M", "Marathon", metric, 0.75, (0.75, 0.84)),
            zone("T", "Threshold", metric, 0.88, (0.85, 0.91)),
            zone("I", "Interval", metric, 0.95, (0.92, 0.97)),
            zone("R", "Repetition", metric, 1.0, (0.98, 1.0)),
        ],
    )
    .unwrap()
}

/// Five heart rate zones
pub fn heart_rate_zone_system() -> ZoneSystem {
    let metric = IntensityMetric::HrMax;
    ZoneSystem::new(
        "Heart Rate",
        None,
        [
            zone("Z1", "Recovery", metric, 0.60, (0.50, 0.60)),
            zone("Z2", "Aerobic", metric, 0.70, (0.60, 0.70)),
            zone("Z3", "Tempo", metric, 0.80, (0.70, 0.80)),
            zone("Z4", "Threshold", metric, 0.90, (0.80, 0.90)),
            zone("Z5", "Maximum", metric, 0.95, (0.90, 1.0)),
        ],
    )
    .unwrap()
}

/// In-memory fetcher that counts fetches per locator
#[derive(Debug, Default)]
pub struct RecordingFetcher {
    documents: HashMap<Locator, Vec<u8>>,
    calls: Mutex<HashMap<Locator, usize>>,
    latency: Option<Duration>,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(mut self, url: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(locator(url), bytes.into());
        self
    }

    #[must_use]
    pub fn with_json(self, url: &str, value: &serde_json::Value) -> Self {
        let bytes = serde_json::to_vec(value).unwrap();
        self.with_document(url, bytes)
    }

    /// Delay every fetch, to widen races between concurrent requests
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().get(&locator(url)).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn fetch(&self, locator: &Locator) -> Result<Vec<u8>, FetchError> {
        *self.calls.lock().entry(locator.clone()).or_default() += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.documents
            .get(locator)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(locator.clone()))
    }
}

/// Loader over a shared recording fetcher
pub fn setup_loader(fetcher: RecordingFetcher) -> (Loader, Arc<RecordingFetcher>) {
    setup_loader_with_config(fetcher, LoaderConfig::default())
}

pub fn setup_loader_with_config(
    fetcher: RecordingFetcher,
    config: LoaderConfig,
) -> (Loader, Arc<RecordingFetcher>) {
    let fetcher = Arc::new(fetcher);
    let loader = Loader::new(config, Arc::clone(&fetcher) as Arc<dyn Fetcher>);
    (loader, fetcher)
}
