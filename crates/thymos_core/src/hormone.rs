//! Hormone signals and the bank that owns them
//!
//! Each hormone is a scalar level with an injection dose (`force`) and a
//! per-tick multiplicative retention factor (`decay`). The bank holds the
//! closed set of seven signals; hormone identity is an enum, not a string
//! key, so exhaustiveness is checked at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Valid range for `current` and `force`.
pub const LEVEL_MIN: f32 = 0.0;
pub const LEVEL_MAX: f32 = 100.0;

/// Valid range for the per-tick retention factor.
pub const DECAY_MIN: f32 = 0.80;
pub const DECAY_MAX: f32 = 0.99;

/// Clamp a hormone level (or injection dose) into [0, 100].
#[inline]
pub fn clamp_level(v: f32) -> f32 {
    v.clamp(LEVEL_MIN, LEVEL_MAX)
}

/// Clamp a decay factor into [0.80, 0.99].
#[inline]
pub fn clamp_decay(v: f32) -> f32 {
    v.clamp(DECAY_MIN, DECAY_MAX)
}

/// The closed set of hormone signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HormoneKind {
    Adrenaline,
    Cortisol,
    Gaba,
    Dopamine,
    Serotonin,
    Testosterone,
    Oxytocin,
}

impl HormoneKind {
    /// All seven signals, in canonical order.
    pub const ALL: [HormoneKind; 7] = [
        HormoneKind::Adrenaline,
        HormoneKind::Cortisol,
        HormoneKind::Gaba,
        HormoneKind::Dopamine,
        HormoneKind::Serotonin,
        HormoneKind::Testosterone,
        HormoneKind::Oxytocin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HormoneKind::Adrenaline => "adrenaline",
            HormoneKind::Cortisol => "cortisol",
            HormoneKind::Gaba => "gaba",
            HormoneKind::Dopamine => "dopamine",
            HormoneKind::Serotonin => "serotonin",
            HormoneKind::Testosterone => "testosterone",
            HormoneKind::Oxytocin => "oxytocin",
        }
    }

    /// Parse a hormone name (case-insensitive). Used at the CLI boundary;
    /// core operations take the enum directly.
    pub fn parse(name: &str) -> Option<HormoneKind> {
        match name.to_ascii_lowercase().as_str() {
            "adrenaline" => Some(HormoneKind::Adrenaline),
            "cortisol" => Some(HormoneKind::Cortisol),
            "gaba" => Some(HormoneKind::Gaba),
            "dopamine" => Some(HormoneKind::Dopamine),
            "serotonin" => Some(HormoneKind::Serotonin),
            "testosterone" => Some(HormoneKind::Testosterone),
            "oxytocin" => Some(HormoneKind::Oxytocin),
            _ => None,
        }
    }
}

impl fmt::Display for HormoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which editable field of a hormone a parameter edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Param {
    Force,
    Decay,
}

/// One named signal: live level, injection dose, retention factor.
///
/// Invariant: `current`, `force` ∈ [0,100] and `decay` ∈ [0.80, 0.99]
/// at all times. Every mutator clamps on write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hormone {
    pub current: f32,
    pub force: f32,
    pub decay: f32,
}

impl Hormone {
    pub fn new(current: f32, force: f32, decay: f32) -> Self {
        Self {
            current: clamp_level(current),
            force: clamp_level(force),
            decay: clamp_decay(decay),
        }
    }

    /// Additive injection: `current += force`, clamped.
    pub fn inject(&mut self) {
        self.current = clamp_level(self.current + self.force);
    }

    /// One decay step: `current *= decay`, clamped.
    pub fn step(&mut self) {
        self.current = clamp_level(self.current * self.decay);
    }

    /// Replace `force` or `decay`. Out-of-range input is silently clamped
    /// into the field's domain, never rejected.
    pub fn set_param(&mut self, param: Param, value: f32) {
        match param {
            Param::Force => self.force = clamp_level(value),
            Param::Decay => self.decay = clamp_decay(value),
        }
    }
}

/// The seven hormone signals with their default configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HormoneBank {
    pub adrenaline: Hormone,
    pub cortisol: Hormone,
    pub gaba: Hormone,
    pub dopamine: Hormone,
    pub serotonin: Hormone,
    pub testosterone: Hormone,
    pub oxytocin: Hormone,
}

impl Default for HormoneBank {
    fn default() -> Self {
        Self {
            adrenaline: Hormone::new(25.0, 15.0, 0.98),
            cortisol: Hormone::new(35.0, 20.0, 0.99),
            gaba: Hormone::new(45.0, 25.0, 0.97),
            dopamine: Hormone::new(40.0, 18.0, 0.985),
            serotonin: Hormone::new(50.0, 12.0, 0.99),
            testosterone: Hormone::new(30.0, 22.0, 0.975),
            oxytocin: Hormone::new(35.0, 16.0, 0.98),
        }
    }
}

impl Index<HormoneKind> for HormoneBank {
    type Output = Hormone;

    fn index(&self, kind: HormoneKind) -> &Hormone {
        match kind {
            HormoneKind::Adrenaline => &self.adrenaline,
            HormoneKind::Cortisol => &self.cortisol,
            HormoneKind::Gaba => &self.gaba,
            HormoneKind::Dopamine => &self.dopamine,
            HormoneKind::Serotonin => &self.serotonin,
            HormoneKind::Testosterone => &self.testosterone,
            HormoneKind::Oxytocin => &self.oxytocin,
        }
    }
}

impl IndexMut<HormoneKind> for HormoneBank {
    fn index_mut(&mut self, kind: HormoneKind) -> &mut Hormone {
        match kind {
            HormoneKind::Adrenaline => &mut self.adrenaline,
            HormoneKind::Cortisol => &mut self.cortisol,
            HormoneKind::Gaba => &mut self.gaba,
            HormoneKind::Dopamine => &mut self.dopamine,
            HormoneKind::Serotonin => &mut self.serotonin,
            HormoneKind::Testosterone => &mut self.testosterone,
            HormoneKind::Oxytocin => &mut self.oxytocin,
        }
    }
}

impl HormoneBank {
    /// Inject one hormone: `current ← clamp(current + force)`.
    pub fn inject(&mut self, kind: HormoneKind) {
        self[kind].inject();
    }

    /// Edit `force` or `decay` of one hormone, clamped into its domain.
    pub fn set_param(&mut self, kind: HormoneKind, param: Param, value: f32) {
        self[kind].set_param(param, value);
    }

    /// Advance one discrete time step: every hormone decays in the same
    /// step, no per-hormone clocks.
    pub fn tick(&mut self) {
        for kind in HormoneKind::ALL {
            self[kind].step();
        }
    }

    /// Restore the fixed default configuration.
    pub fn reset(&mut self) {
        *self = HormoneBank::default();
    }

    /// Iterate signals in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (HormoneKind, &Hormone)> {
        HormoneKind::ALL.into_iter().map(move |k| (k, &self[k]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_in_range() {
        let bank = HormoneBank::default();
        for (_, h) in bank.iter() {
            assert!(h.current >= LEVEL_MIN && h.current <= LEVEL_MAX);
            assert!(h.force >= LEVEL_MIN && h.force <= LEVEL_MAX);
            assert!(h.decay >= DECAY_MIN && h.decay <= DECAY_MAX);
        }
    }

    #[test]
    fn test_inject_clamps_at_ceiling() {
        let mut bank = HormoneBank::default();
        bank.dopamine.current = 95.0;
        bank.inject(HormoneKind::Dopamine);
        assert_eq!(bank.dopamine.current, 100.0);
    }

    #[test]
    fn test_inject_adds_force() {
        let mut bank = HormoneBank::default();
        // dopamine defaults: current 40, force 18
        bank.inject(HormoneKind::Dopamine);
        assert!((bank.dopamine.current - 58.0).abs() < 1e-4);
    }

    #[test]
    fn test_tick_decays_every_hormone() {
        let mut bank = HormoneBank::default();
        let before: Vec<f32> = bank.iter().map(|(_, h)| h.current).collect();
        bank.tick();
        for ((_, h), b) in bank.iter().zip(before) {
            assert!(h.current < b, "{} should decay: {} < {}", h.decay, h.current, b);
        }
    }

    #[test]
    fn test_decay_never_negative() {
        let mut bank = HormoneBank::default();
        for _ in 0..10_000 {
            bank.tick();
        }
        for (_, h) in bank.iter() {
            assert!(h.current >= 0.0);
        }
    }

    #[test]
    fn test_set_param_clamps_decay() {
        let mut bank = HormoneBank::default();
        bank.set_param(HormoneKind::Gaba, Param::Decay, 1.5);
        assert_eq!(bank.gaba.decay, 0.99);
        bank.set_param(HormoneKind::Gaba, Param::Decay, 0.1);
        assert_eq!(bank.gaba.decay, 0.80);
    }

    #[test]
    fn test_set_param_clamps_force() {
        let mut bank = HormoneBank::default();
        bank.set_param(HormoneKind::Oxytocin, Param::Force, 500.0);
        assert_eq!(bank.oxytocin.force, 100.0);
        bank.set_param(HormoneKind::Oxytocin, Param::Force, -3.0);
        assert_eq!(bank.oxytocin.force, 0.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut bank = HormoneBank::default();
        bank.inject(HormoneKind::Adrenaline);
        bank.set_param(HormoneKind::Serotonin, Param::Decay, 0.85);
        bank.tick();
        bank.reset();
        assert_eq!(bank, HormoneBank::default());
    }

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in HormoneKind::ALL {
            assert_eq!(HormoneKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(HormoneKind::parse("Dopamine"), Some(HormoneKind::Dopamine));
        assert_eq!(HormoneKind::parse("melatonin"), None);
    }

    #[test]
    fn test_bank_json_roundtrip() {
        let bank = HormoneBank::default();
        let json = serde_json::to_string(&bank).unwrap();
        let restored: HormoneBank = serde_json::from_str(&json).unwrap();
        assert_eq!(bank, restored);
    }
}
