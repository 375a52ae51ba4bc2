//! K-means segmentation over the first two numeric columns.

use rand::rngs::StdRng;
use rand::SeedableRng;

use tabula_core::config::SegmentConfig;
use tabula_core::{Insight, InsightData, Segment, SegmentData};

use super::{log_skip, AnalysisContext, Analyzer};
use crate::algorithms::kmeans::kmeans;
use crate::error::{AnalysisError, AnalysisResult};

/// Clusters records into at most `max_k` groups.
///
/// Values that do not coerce to numbers become 0 so that every record keeps
/// its place. The emitted confidence is the fixed `config.confidence`,
/// independent of cluster quality.
#[derive(Debug, Clone, Default)]
pub struct SegmentAnalyzer {
    config: SegmentConfig,
    seed: Option<u64>,
}

impl SegmentAnalyzer {
    pub fn new(config: SegmentConfig, seed: Option<u64>) -> Self {
        Self { config, seed }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn segment(&self, ctx: &AnalysisContext<'_>) -> AnalysisResult<Insight> {
        let [col1, col2] = match ctx.schema.numeric.as_slice() {
            [a, b, ..] => [a.clone(), b.clone()],
            other => {
                return Err(AnalysisError::InsufficientData {
                    required: 2,
                    actual: other.len(),
                })
            }
        };
        if ctx.dataset.len() < self.config.min_records {
            return Err(AnalysisError::InsufficientData {
                required: self.config.min_records,
                actual: ctx.dataset.len(),
            });
        }

        let points: Vec<[f64; 2]> = ctx
            .dataset
            .rows()
            .iter()
            .map(|row| {
                let coerce = |c: &str| row.get(c).map(|v| v.to_number_or_zero()).unwrap_or(0.0);
                [coerce(&col1), coerce(&col2)]
            })
            .collect();

        let k = self.config.max_k.min(points.len() / 3);
        if points.len() < self.config.min_points || k == 0 {
            return Err(AnalysisError::InsufficientData {
                required: self.config.min_points,
                actual: points.len(),
            });
        }

        let result = kmeans(&points, k, self.config.max_iterations, &mut self.rng())?;

        let mut segments: Vec<Segment> = result
            .centroids
            .iter()
            .enumerate()
            .map(|(id, centroid)| Segment {
                id,
                size: 0,
                centroid: *centroid,
                points: Vec::new(),
            })
            .collect();
        for (point, &cluster) in points.iter().zip(&result.assignments) {
            segments[cluster].size += 1;
            segments[cluster].points.push(*point);
        }

        let summary = segments
            .iter()
            .map(|s| format!("Segment {}: {} records", s.id + 1, s.size))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Insight::new(
            format!("{} segments identified", k),
            format!("Records group by {} and {} into {} segments ({})", col1, col2, k, summary),
            self.config.confidence,
            InsightData::Segment(SegmentData {
                columns: [col1, col2],
                segments,
            }),
        ))
    }
}

impl Analyzer for SegmentAnalyzer {
    fn name(&self) -> &'static str {
        "segment"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        match self.segment(ctx) {
            Ok(insight) => vec![insight],
            Err(e) => {
                log_skip(self.name(), "dataset", &e);
                Vec::new()
            }
        }
    }
}
