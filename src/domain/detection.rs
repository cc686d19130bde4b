// Pollution detection results for a single video frame
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollutionType {
    Plastic,
    Oil,
    Debris,
    Chemical,
    Unknown,
}

/// Rectangle in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    #[serde(rename = "type")]
    pub kind: PollutionType,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    pub timestamp: f64,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    360
}

/// A frame submitted for detection, identified by its playback position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRequest {
    pub elapsed_seconds: f64,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl FrameRequest {
    pub fn new(elapsed_seconds: f64) -> Self {
        Self {
            elapsed_seconds,
            width: default_width(),
            height: default_height(),
        }
    }
}
