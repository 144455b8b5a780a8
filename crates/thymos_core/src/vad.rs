//! VAD projection: hormone bank → Valence–Arousal–Dominance triple
//!
//! The weights and signs below are fixed design constants. The clamp is
//! applied once, to the final combination; intermediate terms stay
//! unclamped, so a very high cortisol can push valence to its floor of 0
//! but not below.

use crate::hormone::HormoneBank;
use serde::{Deserialize, Serialize};

/// A derived, ephemeral affect triple. Each component lives in [0, 100].
/// Always recomputed from a bank snapshot, never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vad {
    pub arousal: f32,
    pub valence: f32,
    pub dominance: f32,
}

impl Vad {
    pub fn new(arousal: f32, valence: f32, dominance: f32) -> Self {
        Self {
            arousal: arousal.clamp(0.0, 100.0),
            valence: valence.clamp(0.0, 100.0),
            dominance: dominance.clamp(0.0, 100.0),
        }
    }

    /// Project a bank snapshot into VAD via the fixed linear combinations.
    pub fn project(bank: &HormoneBank) -> Vad {
        let arousal = bank.adrenaline.current + bank.cortisol.current - bank.gaba.current
            + bank.dopamine.current * 0.3;

        let valence = bank.serotonin.current
            + bank.dopamine.current * 0.7
            + bank.oxytocin.current * 0.5
            - bank.cortisol.current * 0.3;

        let dominance = bank.testosterone.current + bank.dopamine.current * 0.4
            - bank.oxytocin.current * 0.3
            + bank.adrenaline.current * 0.2;

        Vad::new(arousal, valence, dominance)
    }

    /// Map into the reference table's coordinate space:
    /// valence/dominance [0,100] → [-1,1], arousal [0,100] → [0,1].
    ///
    /// The asymmetry (arousal on a different domain than the other two
    /// axes) is an intentional property of the reference dataset.
    pub fn normalized(&self) -> NormalizedVad {
        NormalizedVad {
            valence: (self.valence - 50.0) / 50.0,
            dominance: (self.dominance - 50.0) / 50.0,
            arousal: self.arousal / 100.0,
        }
    }

    /// Emotional intensity: distance from the neutral center (50,50,50),
    /// rescaled to [0, 100].
    pub fn intensity(&self) -> f32 {
        let d = ((self.arousal - 50.0).powi(2)
            + (self.valence - 50.0).powi(2)
            + (self.dominance - 50.0).powi(2))
        .sqrt();
        (d / 3.0_f32.sqrt()).clamp(0.0, 100.0)
    }

    /// True if any axis exceeds the given threshold (strong emotion).
    pub fn is_intense(&self, threshold: f32) -> bool {
        self.arousal > threshold || self.valence > threshold || self.dominance > threshold
    }
}

/// A VAD point in the classifier's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVad {
    /// [-1, 1]
    pub valence: f32,
    /// [-1, 1]
    pub dominance: f32,
    /// [0, 1]
    pub arousal: f32,
}
