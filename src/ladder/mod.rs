pub mod bitrate;
pub mod planner;

pub use bitrate::Bitrate;
pub use planner::{LadderPlanner, PlannedRung};

use serde::{Deserialize, Serialize};

/// Which source dimension a rung's `target_dimension` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleAxis {
    /// Rungs are keyed by output height (`720p` = 720 lines); width follows.
    #[default]
    Height,
    /// Rungs are keyed by output width (`720p` = 1280 columns); height follows.
    Width,
}

impl ScaleAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Width => "width",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderRung {
    pub label: String,
    pub target_dimension: u32,
    pub bitrate: Bitrate,
}

impl LadderRung {
    pub fn new(label: &str, target_dimension: u32, bitrate: Bitrate) -> Self {
        Self {
            label: label.to_string(),
            target_dimension,
            bitrate,
        }
    }
}

/// The stock height-keyed ladder.
pub fn default_ladder() -> Vec<LadderRung> {
    vec![
        LadderRung::new("480p", 480, Bitrate::from_kbps(750)),
        LadderRung::new("720p", 720, Bitrate::from_kbps(1500)),
        LadderRung::new("1080p", 1080, Bitrate::from_kbps(3500)),
        LadderRung::new("1440p", 1440, Bitrate::from_kbps(6000)),
        LadderRung::new("2160p", 2160, Bitrate::from_kbps(12000)),
    ]
}
