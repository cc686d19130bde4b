// Sensor feed - Synthetic live samples kept in a sliding window
use crate::domain::error::DomainError;
use crate::domain::sensor::{detect_anomaly, AnomalyReport, SensorSample};
use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

pub const DEFAULT_WINDOW: usize = 24;

const UPDATE_CHANNEL_CAPACITY: usize = 64;
const EXCURSION_PROBABILITY: f64 = 0.05;
const MEAN_REVERSION: f64 = 0.25;

#[derive(Debug, Clone, Copy)]
struct Channel {
    nominal: f64,
    noise: f64,
    min: f64,
    max: f64,
}

impl Channel {
    fn step(&self, rng: &mut StdRng, current: f64) -> f64 {
        let pulled = current + (self.nominal - current) * MEAN_REVERSION;
        let next = pulled + rng.gen_range(-self.noise..=self.noise);
        round2(next.clamp(self.min, self.max))
    }
}

const PH: Channel = Channel { nominal: 7.2, noise: 0.15, min: 0.0, max: 14.0 };
const DISSOLVED_OXYGEN: Channel = Channel { nominal: 6.5, noise: 0.3, min: 0.0, max: 14.0 };
const TEMPERATURE: Channel = Channel { nominal: 29.0, noise: 0.4, min: 20.0, max: 40.0 };
const TURBIDITY: Channel = Channel { nominal: 25.0, noise: 4.0, min: 0.0, max: 500.0 };
const CONDUCTIVITY: Channel = Channel { nominal: 180.0, noise: 8.0, min: 0.0, max: 2000.0 };

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Random walk around typical readings for a Klang Valley river.
pub struct SensorGenerator {
    rng: StdRng,
    last: Option<SensorSample>,
}

impl SensorGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, last: None }
    }

    pub fn generate(&mut self, time: String) -> SensorSample {
        let mut sample = match &self.last {
            Some(last) => SensorSample {
                time,
                ph: PH.step(&mut self.rng, last.ph),
                dissolved_oxygen: DISSOLVED_OXYGEN.step(&mut self.rng, last.dissolved_oxygen),
                temp: TEMPERATURE.step(&mut self.rng, last.temp),
                turbidity: TURBIDITY.step(&mut self.rng, last.turbidity),
                conductivity: CONDUCTIVITY.step(&mut self.rng, last.conductivity),
            },
            None => SensorSample {
                time,
                ph: PH.nominal,
                dissolved_oxygen: DISSOLVED_OXYGEN.nominal,
                temp: TEMPERATURE.nominal,
                turbidity: TURBIDITY.nominal,
                conductivity: CONDUCTIVITY.nominal,
            },
        };

        // Occasional spikes so the anomaly path gets exercised
        if self.rng.gen_bool(EXCURSION_PROBABILITY) {
            match self.rng.gen_range(0..3) {
                0 => sample.ph = round2(self.rng.gen_range(4.0..5.4)),
                1 => sample.dissolved_oxygen = round2(self.rng.gen_range(1.5..3.9)),
                _ => sample.turbidity = round2(self.rng.gen_range(62.0..130.0)),
            }
        }

        self.last = Some(sample.clone());
        sample
    }
}

/// Keeps the most recent `capacity` samples, oldest first.
#[derive(Debug, Clone)]
pub struct SensorWindow {
    capacity: usize,
    samples: VecDeque<SensorSample>,
}

impl SensorWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: SensorSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn to_vec(&self) -> Vec<SensorSample> {
        self.samples.iter().cloned().collect()
    }

}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorUpdate {
    pub sample: SensorSample,
    pub anomaly: AnomalyReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub samples: Vec<SensorSample>,
    pub anomaly: AnomalyReport,
}

pub struct SensorFeed {
    generator: Mutex<SensorGenerator>,
    window: RwLock<SensorWindow>,
    updates: broadcast::Sender<SensorUpdate>,
}

impl SensorFeed {
    pub fn new(window: usize, seed: Option<u64>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            generator: Mutex::new(SensorGenerator::new(seed)),
            window: RwLock::new(SensorWindow::new(window)),
            updates,
        }
    }

    /// Generate one sample, push it into the window and notify subscribers.
    pub fn tick(&self) -> Result<SensorUpdate, DomainError> {
        let time = Local::now().format("%H:%M:%S").to_string();
        let sample = self
            .generator
            .lock()
            .map_err(|_| DomainError::Storage("sensor generator poisoned".to_string()))?
            .generate(time);
        self.record(sample)
    }

    /// Push a sample into the window, run the anomaly rules and notify subscribers.
    pub fn record(&self, sample: SensorSample) -> Result<SensorUpdate, DomainError> {
        let samples = {
            let mut window = self
                .window
                .write()
                .map_err(|_| DomainError::Storage("sensor window poisoned".to_string()))?;
            window.push(sample.clone());
            window.to_vec()
        };

        let anomaly = detect_anomaly(&samples)?;
        if let (true, Some(severity)) = (anomaly.is_anomaly, anomaly.severity) {
            tracing::warn!(
                parameter = anomaly.parameter.as_deref().unwrap_or_default(),
                %severity,
                "sensor anomaly: {}",
                anomaly.message.as_deref().unwrap_or_default()
            );
        }

        let update = SensorUpdate { sample, anomaly };
        // No subscribers is fine
        let _ = self.updates.send(update.clone());
        Ok(update)
    }

    pub fn snapshot(&self) -> Result<SensorSnapshot, DomainError> {
        let samples = self
            .window
            .read()
            .map_err(|_| DomainError::Storage("sensor window poisoned".to_string()))?
            .to_vec();
        let anomaly = detect_anomaly(&samples)?;
        Ok(SensorSnapshot { samples, anomaly })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SensorUpdate> {
        self.updates.subscribe()
    }

    /// Pre-fill the window so dashboards have history right after startup.
    pub fn warm_up(&self, count: usize) -> Result<(), DomainError> {
        for _ in 0..count {
            self.tick()?;
        }
        Ok(())
    }

    /// Start ticking on a fixed interval until the returned handle is shut down or dropped.
    pub fn spawn(self: &Arc<Self>, interval: Duration) -> FeedHandle {
        let feed = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = feed.tick() {
                    tracing::error!("sensor feed tick failed: {}", e);
                }
            }
        });
        tracing::info!(interval_ms = interval.as_millis() as u64, "sensor feed started");
        FeedHandle { task: Some(task) }
    }
}

pub struct FeedHandle {
    task: Option<JoinHandle<()>>,
}

impl FeedHandle {
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            tracing::info!("sensor feed stopped");
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sensor::fixtures::sample;
    use crate::domain::sensor::Severity;

    #[test]
    fn test_window_drops_oldest() {
        let mut window = SensorWindow::new(3);
        for i in 0..5 {
            let mut s = sample(7.0, 6.0, 20.0);
            s.time = format!("t{}", i);
            window.push(s);
        }
        let times: Vec<String> = window.to_vec().into_iter().map(|s| s.time).collect();
        assert_eq!(times, vec!["t2", "t3", "t4"]);
    }

    #[test]
    fn test_window_zero_capacity_keeps_one() {
        let mut window = SensorWindow::new(0);
        window.push(sample(7.0, 6.0, 20.0));
        window.push(sample(7.1, 6.0, 20.0));
        let kept = window.to_vec();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].ph, 7.1);
    }

    #[test]
    fn test_generator_is_reproducible_and_bounded() {
        let mut a = SensorGenerator::new(Some(42));
        let mut b = SensorGenerator::new(Some(42));
        for i in 0..500 {
            let sa = a.generate(i.to_string());
            let sb = b.generate(i.to_string());
            assert_eq!(sa, sb);
            assert!((0.0..=14.0).contains(&sa.ph));
            assert!((0.0..=14.0).contains(&sa.dissolved_oxygen));
            assert!((20.0..=40.0).contains(&sa.temp));
            assert!((0.0..=500.0).contains(&sa.turbidity));
        }
    }

    #[test]
    fn test_first_sample_is_nominal() {
        let mut generator = SensorGenerator::new(Some(1));
        let first = generator.generate("00:00".into());
        // An excursion may replace one channel; temperature never spikes
        assert_eq!(first.temp, 29.0);
        assert_eq!(first.conductivity, 180.0);
    }

    #[test]
    fn test_feed_window_capped() {
        let feed = SensorFeed::new(DEFAULT_WINDOW, Some(3));
        feed.warm_up(40).unwrap();
        let snapshot = feed.snapshot().unwrap();
        assert_eq!(snapshot.samples.len(), DEFAULT_WINDOW);
        assert_eq!(snapshot.anomaly, detect_anomaly(&snapshot.samples).unwrap());
    }

    #[test]
    fn test_empty_feed_has_no_anomaly() {
        let feed = SensorFeed::new(DEFAULT_WINDOW, Some(3));
        let snapshot = feed.snapshot().unwrap();
        assert!(snapshot.samples.is_empty());
        assert!(!snapshot.anomaly.is_anomaly);
    }

    #[tokio::test]
    async fn test_recorded_sample_drives_snapshot_and_subscribers() {
        let feed = SensorFeed::new(4, Some(9));
        feed.warm_up(6).unwrap();
        let mut rx = feed.subscribe();

        let update = feed.record(sample(4.0, 7.0, 10.0)).unwrap();
        assert_eq!(update.anomaly.severity, Some(Severity::High));
        assert_eq!(rx.recv().await.unwrap(), update);

        let snapshot = feed.snapshot().unwrap();
        assert_eq!(snapshot.samples.len(), 4);
        assert_eq!(snapshot.samples.last(), Some(&update.sample));
        assert_eq!(snapshot.anomaly.parameter.as_deref(), Some("pH"));
    }

    #[tokio::test]
    async fn test_subscribers_receive_ticks() {
        let feed = SensorFeed::new(4, Some(9));
        let mut rx = feed.subscribe();
        let sent = feed.tick().unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(sent, received);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_feed_ticks_and_stops() {
        let feed = Arc::new(SensorFeed::new(8, Some(5)));
        let mut rx = feed.subscribe();
        let handle = feed.spawn(Duration::from_secs(2));

        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        assert_eq!(feed.snapshot().unwrap().samples.len(), 2);

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(feed.snapshot().unwrap().samples.len(), 2);
    }
}
