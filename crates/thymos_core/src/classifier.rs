//! Emotion classification: VAD triple → discrete label
//!
//! Weighted-distance k-nearest-neighbor search over a fixed table of
//! labeled VAD points. The table is loaded once at startup and shared
//! read-only; classification is a pure function of its input.
//!
//! An earlier revision used a hand-written threshold cascade instead of
//! the nearest-neighbor search. It survives in [`legacy`] as a regression
//! fixture only.

use crate::vad::Vad;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Number of neighbors considered per query.
pub const K: usize = 3;

/// Beyond this weighted distance from every reference point, the query is
/// out of the table's range and falls back to [`NEUTRAL_LABEL`].
pub const MAX_DISTANCE: f32 = 0.8;

/// Label returned for out-of-range queries.
pub const NEUTRAL_LABEL: &str = "neutral";

/// Per-axis distance weights, applied to the difference before squaring.
const W_VALENCE: f32 = 0.4;
const W_DOMINANCE: f32 = 0.35;
const W_AROUSAL: f32 = 0.25;

/// Confidence ceiling (distance 0) and floor (distance = MAX_DISTANCE).
const CONFIDENCE_CEIL: f32 = 0.9;
const CONFIDENCE_FLOOR: f32 = 0.3;

/// Smoothing constant in the inverse-distance weight `1/(d + 0.1)`.
const WEIGHT_EPSILON: f32 = 0.1;

/// Scale applied to alternative candidates' confidence.
const ALTERNATIVE_SCALE: f32 = 0.8;

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// An empty table is a fatal configuration error at startup, never a
    /// per-call error path.
    #[error("reference table contains no entries")]
    EmptyTable,
}

/// One labeled point in the reference dataset.
///
/// Coordinate domains differ per axis: valence and dominance in [-1, 1],
/// arousal in [0, 1]. That asymmetry is a property of the dataset itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub emotion: String,
    pub valence: f32,
    pub dominance: f32,
    pub arousal: f32,
}

impl ReferencePoint {
    fn new(emotion: &str, valence: f32, dominance: f32, arousal: f32) -> Self {
        Self {
            emotion: emotion.to_string(),
            valence,
            dominance,
            arousal,
        }
    }
}

/// The immutable set of labeled VAD points the classifier queries.
///
/// Deliberately not deserializable as a whole: construction always goes
/// through [`ReferenceTable::new`] so the non-empty invariant holds.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceTable {
    points: Vec<ReferencePoint>,
}

impl ReferenceTable {
    /// Wrap a parsed point set. Fails on an empty set; callers must fall
    /// back to [`ReferenceTable::builtin`] before reaching here, not after.
    pub fn new(points: Vec<ReferencePoint>) -> Result<Self, ClassifierError> {
        if points.is_empty() {
            return Err(ClassifierError::EmptyTable);
        }
        Ok(Self { points })
    }

    /// Parse a JSON array of reference points.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let points: Vec<ReferencePoint> = serde_json::from_str(json)?;
        Ok(Self::new(points)?)
    }

    /// The compiled-in default dataset: 25 labeled points spanning the
    /// VAD space, used whenever no external table is supplied.
    pub fn builtin() -> Self {
        let points = vec![
            ReferencePoint::new("excited", 0.70, 0.65, 0.90),
            ReferencePoint::new("delighted", 0.85, 0.50, 0.70),
            ReferencePoint::new("happy", 0.80, 0.55, 0.60),
            ReferencePoint::new("elated", 0.75, 0.60, 0.80),
            ReferencePoint::new("proud", 0.65, 0.70, 0.55),
            ReferencePoint::new("content", 0.70, 0.45, 0.30),
            ReferencePoint::new("relaxed", 0.60, 0.40, 0.20),
            ReferencePoint::new("serene", 0.55, 0.35, 0.15),
            ReferencePoint::new("calm", 0.40, 0.30, 0.10),
            ReferencePoint::new("hopeful", 0.50, 0.40, 0.50),
            ReferencePoint::new("curious", 0.45, 0.35, 0.60),
            ReferencePoint::new("surprised", 0.20, 0.15, 0.85),
            ReferencePoint::new("alert", 0.10, 0.40, 0.75),
            ReferencePoint::new("tense", -0.30, 0.20, 0.80),
            ReferencePoint::new("angry", -0.60, 0.55, 0.85),
            ReferencePoint::new("frustrated", -0.50, 0.30, 0.65),
            ReferencePoint::new("annoyed", -0.40, 0.25, 0.60),
            ReferencePoint::new("afraid", -0.65, -0.45, 0.85),
            ReferencePoint::new("anxious", -0.45, -0.35, 0.75),
            ReferencePoint::new("distressed", -0.70, -0.30, 0.70),
            ReferencePoint::new("sad", -0.65, -0.40, 0.25),
            ReferencePoint::new("depressed", -0.75, -0.50, 0.15),
            ReferencePoint::new("bored", -0.35, -0.25, 0.15),
            ReferencePoint::new("lonely", -0.50, -0.35, 0.30),
            ReferencePoint::new(NEUTRAL_LABEL, 0.00, 0.00, 0.30),
        ];
        Self { points }
    }

    pub fn points(&self) -> &[ReferencePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Classification result with confidence and runner-up labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    /// [0, 1]; 0.9 at distance zero, 0.3 at the fallback boundary.
    pub confidence: f32,
    /// Up to two runner-up labels with scaled-down confidence.
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub label: String,
    pub confidence: f32,
}

/// Weighted-kNN emotion classifier over a shared read-only table.
#[derive(Debug, Clone)]
pub struct EmotionClassifier {
    table: Arc<ReferenceTable>,
}

impl Default for EmotionClassifier {
    fn default() -> Self {
        Self::new(ReferenceTable::builtin())
    }
}

impl EmotionClassifier {
    pub fn new(table: ReferenceTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Weighted Euclidean distance in the normalized VAD space. Weights
    /// multiply each axis's *difference* before squaring.
    fn distance(query: &crate::vad::NormalizedVad, point: &ReferencePoint) -> f32 {
        let dv = (query.valence - point.valence) * W_VALENCE;
        let dd = (query.dominance - point.dominance) * W_DOMINANCE;
        let da = (query.arousal - point.arousal) * W_AROUSAL;
        (dv * dv + dd * dd + da * da).sqrt()
    }

    /// Label-only query.
    pub fn classify(&self, vad: &Vad) -> String {
        self.classify_detailed(vad).label
    }

    /// Full query: label, confidence, and up to two alternatives.
    pub fn classify_detailed(&self, vad: &Vad) -> Classification {
        let query = vad.normalized();

        let mut neighbors: Vec<(f32, &ReferencePoint)> = self
            .table
            .points()
            .iter()
            .map(|p| (Self::distance(&query, p), p))
            .collect();
        neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbors.truncate(K);

        // Table is validated non-empty at construction.
        let min_distance = neighbors[0].0;

        // Out of the table's range entirely: not a classification, a
        // designated fallback.
        if min_distance > MAX_DISTANCE {
            return Classification {
                label: NEUTRAL_LABEL.to_string(),
                confidence: CONFIDENCE_FLOOR,
                alternatives: Vec::new(),
            };
        }

        // Inverse-distance weights, normalized to sum 1.
        let raw: Vec<f32> = neighbors
            .iter()
            .map(|(d, _)| 1.0 / (d + WEIGHT_EPSILON))
            .collect();
        let total: f32 = raw.iter().sum();
        let weights: Vec<f32> = raw.iter().map(|w| w / total).collect();

        // The winner is the single highest-weight *entry*, not a
        // label-level aggregate, even when several entries share a label.
        let (top_idx, top_weight) = weights
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((0, 1.0));
        let top = neighbors[top_idx].1;

        let confidence = (CONFIDENCE_CEIL
            - (min_distance / MAX_DISTANCE) * (CONFIDENCE_CEIL - CONFIDENCE_FLOOR))
            .clamp(0.0, 1.0)
            .min(top_weight);

        let mut alternatives = Vec::new();
        for (i, (_, point)) in neighbors.iter().enumerate() {
            if i == top_idx || point.emotion == top.emotion {
                continue;
            }
            if alternatives
                .iter()
                .any(|a: &Alternative| a.label == point.emotion)
            {
                continue;
            }
            alternatives.push(Alternative {
                label: point.emotion.clone(),
                confidence: weights[i] * ALTERNATIVE_SCALE,
            });
            if alternatives.len() == 2 {
                break;
            }
        }

        Classification {
            label: top.emotion.clone(),
            confidence,
            alternatives,
        }
    }
}

/// The retired threshold-cascade classifier, first revision of the model.
///
/// Kept only as a regression fixture against which the kNN classifier's
/// coarse behavior can be compared; nothing in the simulation path calls
/// it. Operates directly on the [0,100] VAD domain.
pub mod legacy {
    use crate::vad::Vad;

    pub fn classify(vad: &Vad) -> &'static str {
        let (a, v, d) = (vad.arousal, vad.valence, vad.dominance);

        if v > 70.0 && a > 70.0 && d > 60.0 {
            return "excited";
        }
        if v > 70.0 && a < 40.0 && d > 50.0 {
            return "content";
        }
        if v < 30.0 && a > 70.0 && d < 40.0 {
            return "anxious";
        }
        if v < 30.0 && a < 40.0 && d < 40.0 {
            return "depressed";
        }
        if v > 60.0 && a > 60.0 && d < 40.0 {
            return "pleasant";
        }
        if v < 40.0 && a > 60.0 && d > 60.0 {
            return "angry";
        }
        if v > 50.0 && a < 50.0 && d < 50.0 {
            return "calm";
        }
        "complex"
    }
}
