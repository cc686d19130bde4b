// Pollution detection capability and the scripted stand-in model
use crate::domain::detection::{BoundingBox, DetectionResult, FrameRequest, PollutionType};
use crate::domain::error::{ensure_finite, DomainError};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::time::Duration;

const CYCLE_SECONDS: f64 = 10.0;

#[async_trait]
pub trait PollutionDetector: Send + Sync {
    /// Detect pollution in one frame. Bounding boxes are in frame pixel coordinates.
    async fn detect(&self, frame: &FrameRequest) -> Result<Vec<DetectionResult>, DomainError>;
}

/// Cycles through plastic, oil and chemical detections based on playback time.
///
/// `elapsed mod 10` selects the band: `[0,3)` plastic, `[3,6)` oil, `[6,9)`
/// chemical and `[9,10)` nothing. Confidence and box placement are random.
pub struct MockPollutionDetector {
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl MockPollutionDetector {
    pub fn new(latency: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            latency,
        }
    }

    pub fn seeded(seed: u64, latency: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency,
        }
    }

    fn band(elapsed: f64) -> Option<(PollutionType, RangeInclusive<f64>)> {
        let position = elapsed.rem_euclid(CYCLE_SECONDS);
        if position < 3.0 {
            Some((PollutionType::Plastic, 0.85..=0.95))
        } else if position < 6.0 {
            Some((PollutionType::Oil, 0.78..=0.93))
        } else if position < 9.0 {
            Some((PollutionType::Chemical, 0.72..=0.82))
        } else {
            None
        }
    }

    fn random_box(rng: &mut StdRng, frame_width: u32, frame_height: u32) -> BoundingBox {
        let fw = frame_width as f64;
        let fh = frame_height as f64;
        // At least one pixel; callers reject frames with no area
        let width = (fw * rng.gen_range(0.15..=0.35)).floor().max(1.0);
        let height = (fh * rng.gen_range(0.15..=0.35)).floor().max(1.0);
        let x = rng.gen_range(0.0..=(fw - width)).floor();
        let y = rng.gen_range(0.0..=(fh - height)).floor();
        BoundingBox { x, y, width, height }
    }
}

#[async_trait]
impl PollutionDetector for MockPollutionDetector {
    async fn detect(&self, frame: &FrameRequest) -> Result<Vec<DetectionResult>, DomainError> {
        let elapsed = ensure_finite("elapsedSeconds", frame.elapsed_seconds)?;
        if elapsed < 0.0 {
            return Err(DomainError::OutOfRange {
                field: "elapsedSeconds",
                reason: format!("{} is negative", elapsed),
            });
        }
        if frame.width == 0 || frame.height == 0 {
            return Err(DomainError::OutOfRange {
                field: "frame",
                reason: format!("{}x{} has no area", frame.width, frame.height),
            });
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let Some((kind, confidence_range)) = Self::band(elapsed) else {
            tracing::trace!(elapsed, "no pollution in frame");
            return Ok(Vec::new());
        };

        let mut rng = self
            .rng
            .lock()
            .map_err(|_| DomainError::Storage("detector rng poisoned".to_string()))?;
        let confidence = rng.gen_range(confidence_range);
        let bounding_box = Self::random_box(&mut rng, frame.width, frame.height);

        tracing::debug!(?kind, confidence, elapsed, "mock detection");

        Ok(vec![DetectionResult {
            kind,
            confidence,
            bounding_box: Some(bounding_box),
            timestamp: elapsed,
        }])
    }
}
