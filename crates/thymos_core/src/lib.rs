//! # Thymos Core
//!
//! The simulation core of the hormone/emotion model. Seven hormone-like
//! scalar signals decay over discrete time, combine into a
//! Valence–Arousal–Dominance (VAD) triple, and the triple is classified
//! into a discrete emotion label by weighted nearest-neighbor search
//! against a fixed reference table.
//!
//! ## Time Scales
//!
//! - Hormones: mutate per tick (multiplicative decay) and on injection
//! - VAD: derived on demand from the current bank, never stored
//! - History: bounded FIFO trail of past snapshots for trend consumers
//!
//! Everything here is synchronous and deterministic. The periodic driver
//! lives in `thymos_engine`; UI-facing consumers read snapshots and never
//! mutate core state directly.

pub mod classifier;
pub mod config;
pub mod history;
pub mod hormone;
pub mod session;
pub mod vad;

pub use classifier::{
    Alternative, Classification, ClassifierError, EmotionClassifier, ReferencePoint,
    ReferenceTable,
};
pub use config::ThymosConfig;
pub use history::{History, HistoryRecord};
pub use hormone::{Hormone, HormoneBank, HormoneKind, Param};
pub use session::Session;
pub use vad::{NormalizedVad, Vad};
