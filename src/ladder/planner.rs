use super::{Bitrate, LadderRung, ScaleAxis};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRung {
    pub rung: LadderRung,
    pub output_width: u32,
    pub output_height: u32,
}

impl PlannedRung {
    pub fn label(&self) -> &str {
        &self.rung.label
    }

    pub fn bitrate(&self) -> &Bitrate {
        &self.rung.bitrate
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", self.output_width, self.output_height)
    }
}

/// Computes which configured rungs apply to a source and at what size.
#[derive(Debug, Clone, Copy)]
pub struct LadderPlanner {
    axis: ScaleAxis,
}

impl LadderPlanner {
    pub fn new(axis: ScaleAxis) -> Self {
        Self { axis }
    }

    /// Rungs larger than the source on the keyed axis are dropped (no
    /// upscaling); the rest come back ascending by target dimension.
    pub fn plan(
        &self,
        rungs: &[LadderRung],
        source_width: u32,
        source_height: u32,
    ) -> Vec<PlannedRung> {
        let (source_dim, other_dim) = match self.axis {
            ScaleAxis::Height => (source_height, source_width),
            ScaleAxis::Width => (source_width, source_height),
        };

        if source_dim == 0 || other_dim == 0 {
            return Vec::new();
        }

        let mut planned: Vec<PlannedRung> = rungs
            .iter()
            .filter_map(|rung| {
                if rung.target_dimension > source_dim {
                    debug!(
                        "Skipping rung {}: {} {} exceeds source {}",
                        rung.label,
                        self.axis.as_str(),
                        rung.target_dimension,
                        source_dim
                    );
                    return None;
                }

                let companion = scale_companion(rung.target_dimension, other_dim, source_dim);
                let (output_width, output_height) = match self.axis {
                    ScaleAxis::Height => (companion, rung.target_dimension),
                    ScaleAxis::Width => (rung.target_dimension, companion),
                };

                Some(PlannedRung {
                    rung: rung.clone(),
                    output_width,
                    output_height,
                })
            })
            .collect();

        planned.sort_by_key(|p| p.rung.target_dimension);
        planned
    }
}

/// Scales `other` by `target / source`, rounding to nearest and then up to
/// the next even integer (4:2:0 chroma needs even dimensions).
pub fn scale_companion(target: u32, other: u32, source: u32) -> u32 {
    let scaled = (target as f64 * other as f64 / source as f64).round() as u32;
    let scaled = scaled.max(2);
    if scaled % 2 == 0 {
        scaled
    } else {
        scaled + 1
    }
}
