//! Single-writer simulation session
//!
//! Every mutation of the bank and the history trail funnels through this
//! one synchronous state machine. The periodic driver in `thymos_engine`
//! owns a `Session` behind its actor mailbox; in a single-threaded host
//! the session alone already gives the serialization guarantee.

use crate::classifier::{Classification, EmotionClassifier};
use crate::history::{History, HistoryRecord};
use crate::hormone::{HormoneBank, HormoneKind, Param};
use crate::vad::Vad;
use std::sync::Arc;

/// Bank + history + classifier, advanced by discrete steps.
///
/// Freshly constructed (and after `reset`) the history holds exactly one
/// record, captured from the default bank at time 0, so consumers always
/// have a baseline point to draw.
#[derive(Debug, Clone)]
pub struct Session {
    bank: HormoneBank,
    history: History,
    classifier: Arc<EmotionClassifier>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(EmotionClassifier::default()), History::default().max_len())
    }
}

impl Session {
    pub fn new(classifier: Arc<EmotionClassifier>, max_history: usize) -> Self {
        let mut session = Self {
            bank: HormoneBank::default(),
            history: History::new(max_history),
            classifier,
        };
        session.record_current();
        session
    }

    /// One simulation step: decay every hormone, then append a snapshot.
    pub fn tick(&mut self) {
        self.bank.tick();
        self.record_current();
    }

    /// Inject one hormone. `record` is true while the clock is running, so
    /// the injection shows up in the trail immediately instead of waiting
    /// for the next tick boundary.
    pub fn inject(&mut self, kind: HormoneKind, record: bool) {
        self.bank.inject(kind);
        if record {
            self.record_current();
        }
    }

    /// Permissive parameter edit (values clamped, never rejected).
    pub fn set_param(&mut self, kind: HormoneKind, param: Param, value: f32) {
        self.bank.set_param(kind, param, value);
    }

    /// Restore defaults and reseed the trail with a single time-0 record.
    pub fn reset(&mut self) {
        self.bank.reset();
        self.history.clear();
        self.record_current();
    }

    fn record_current(&mut self) {
        let vad = Vad::project(&self.bank);
        let emotion = self.classifier.classify(&vad);
        let time = self.history.next_time();
        self.history
            .push(HistoryRecord::capture(time, &self.bank, &vad, emotion));
    }

    pub fn bank(&self) -> &HormoneBank {
        &self.bank
    }

    pub fn vad(&self) -> Vad {
        Vad::project(&self.bank)
    }

    pub fn classification(&self) -> Classification {
        self.classifier.classify_detailed(&self.vad())
    }

    pub fn emotion(&self) -> String {
        self.classifier.classify(&self.vad())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn classifier(&self) -> &Arc<EmotionClassifier> {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_has_baseline_record() {
        let session = Session::default();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().last().unwrap().time, 0);
    }

    #[test]
    fn test_n_ticks_yield_n_plus_one_records() {
        let mut session = Session::default();
        for _ in 0..20 {
            session.tick();
        }
        assert_eq!(session.history().len(), 21);
        assert_eq!(session.history().last().unwrap().time, 20);
    }

    #[test]
    fn test_inject_recorded_increments_time_by_one() {
        let mut session = Session::default();
        session.tick();
        let before = session.history().last().unwrap().time;
        session.inject(HormoneKind::Dopamine, true);
        let after = session.history().last().unwrap();
        assert_eq!(after.time, before + 1);
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_inject_unrecorded_keeps_history() {
        let mut session = Session::default();
        session.inject(HormoneKind::Dopamine, false);
        assert_eq!(session.history().len(), 1);
        // Bank mutated regardless of recording.
        assert!(session.bank().dopamine.current > HormoneBank::default().dopamine.current);
    }

    #[test]
    fn test_dopamine_injection_scenario() {
        // Defaults dopamine {current 40}, with force edited to 60:
        // inject saturates at min(100, 40 + 60) = 100.
        let mut session = Session::default();
        session.set_param(HormoneKind::Dopamine, Param::Force, 60.0);
        session.inject(HormoneKind::Dopamine, true);
        assert_eq!(session.bank().dopamine.current, 100.0);
        let rec = session.history().last().unwrap();
        assert_eq!(rec.dopamine, 100.0);
        assert_eq!(rec.time, 1);
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut session = Session::default();
        for _ in 0..5 {
            session.tick();
        }
        session.inject(HormoneKind::Cortisol, true);
        session.reset();
        assert_eq!(session.bank(), &HormoneBank::default());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().last().unwrap().time, 0);
    }

    #[test]
    fn test_history_respects_capacity() {
        let mut session = Session::new(Arc::new(EmotionClassifier::default()), 10);
        for _ in 0..50 {
            session.tick();
        }
        assert_eq!(session.history().len(), 10);
        // Oldest evicted first; latest record is tick 50.
        assert_eq!(session.history().oldest().unwrap().time, 41);
        assert_eq!(session.history().last().unwrap().time, 50);
    }

    #[test]
    fn test_session_emotion_matches_record() {
        let mut session = Session::default();
        session.tick();
        let rec = session.history().last().unwrap().clone();
        assert_eq!(rec.emotion, session.emotion());
    }
}
