//! The simulation clock actor
//!
//! A background tokio task owns the single mutation path for the
//! [`Session`]: periodic decay ticks while running, plus commands
//! (start/stop/reset/inject/parameter edits) arriving through a mailbox.
//! Ticks and commands are serialized by one `select!` loop, so a tick can
//! never interleave with an injection's read-modify-write.
//!
//! Every mutator is acknowledged through a oneshot channel: when
//! `stop().await` returns, the stop has been processed by the loop and no
//! further tick can touch the state; the running flag is checked at fire
//! time, which also drops any tick that was already scheduled.

use crate::clock::ClockConfig;
use serde::Serialize;
use std::sync::Arc;
use thymos_core::{
    Classification, HistoryRecord, HormoneBank, HormoneKind, Param, Session, ThymosConfig, Vad,
};
use tokio::sync::{mpsc, oneshot, watch, RwLock};
use tokio::time::MissedTickBehavior;

/// Two-state clock: Stopped (initial) or Running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    Stopped,
    Running,
}

/// Read-only view of the simulation, broadcast after every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub bank: HormoneBank,
    pub vad: Vad,
    pub emotion: Classification,
    pub state: ClockState,
    /// Tick index of the newest history record.
    pub time: u64,
    /// Unix timestamp of the last state update.
    pub last_updated: i64,
}

impl Snapshot {
    fn capture(shared: &Shared) -> Self {
        Self {
            bank: shared.session.bank().clone(),
            vad: shared.session.vad(),
            emotion: shared.session.classification(),
            state: if shared.running {
                ClockState::Running
            } else {
                ClockState::Stopped
            },
            time: shared.session.history().last().map_or(0, |r| r.time),
            last_updated: shared.last_updated,
        }
    }
}

struct Shared {
    session: Session,
    running: bool,
    last_updated: i64,
}

enum Command {
    Start(oneshot::Sender<()>),
    Stop(oneshot::Sender<()>),
    Reset(oneshot::Sender<()>),
    Inject(HormoneKind, oneshot::Sender<()>),
    SetParam(HormoneKind, Param, f32, oneshot::Sender<()>),
}

/// Handle to the simulation clock. Reads take a shared lock; all writes
/// go through the actor task, which is the sole writer. Dropping the
/// handle shuts the task down.
pub struct SimulationEngine {
    shared: Arc<RwLock<Shared>>,
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<Snapshot>,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationEngine {
    /// Engine with the built-in reference table and default cadence.
    pub fn new() -> Self {
        Self::with_config(ClockConfig::default(), Session::default())
    }

    /// Engine configured from a loaded [`ThymosConfig`]. Fails only on a
    /// fatally misconfigured reference table.
    pub fn from_config(config: &ThymosConfig) -> anyhow::Result<Self> {
        let classifier = Arc::new(config.classifier()?);
        let session = Session::new(classifier, config.history.max_len);
        Ok(Self::with_config(ClockConfig::from_config(config), session))
    }

    pub fn with_config(clock: ClockConfig, session: Session) -> Self {
        let (command_tx, command_rx) = mpsc::channel(64);

        let inner = Shared {
            session,
            running: false,
            last_updated: chrono::Utc::now().timestamp(),
        };
        let initial = Snapshot::capture(&inner);
        let shared = Arc::new(RwLock::new(inner));
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        tokio::spawn(Self::run(
            Arc::clone(&shared),
            command_rx,
            snapshot_tx,
            clock,
        ));

        Self {
            shared,
            command_tx,
            snapshot_rx,
        }
    }

    /// The actor loop. Sole writer of the shared state.
    async fn run(
        shared: Arc<RwLock<Shared>>,
        mut command_rx: mpsc::Receiver<Command>,
        snapshot_tx: watch::Sender<Snapshot>,
        clock: ClockConfig,
    ) {
        let mut interval = tokio::time::interval(clock.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Mirror of shared.running, owned by the loop so the select guard
        // needs no lock.
        let mut running = false;

        loop {
            tokio::select! {
                _ = interval.tick(), if running => {
                    let mut guard = shared.write().await;
                    guard.session.tick();
                    guard.last_updated = chrono::Utc::now().timestamp();
                    let snap = Snapshot::capture(&guard);
                    drop(guard);
                    tracing::trace!(time = snap.time, emotion = %snap.emotion.label, "tick");
                    let _ = snapshot_tx.send(snap);
                }

                cmd = command_rx.recv() => {
                    // All handles dropped: shut down, releasing the timer.
                    let Some(cmd) = cmd else { break };

                    let mut guard = shared.write().await;
                    match cmd {
                        Command::Start(ack) => {
                            if !guard.running {
                                guard.running = true;
                                running = true;
                                // First tick fires one full period from now.
                                interval.reset();
                                tracing::debug!("simulation clock started");
                            }
                            let _ = ack.send(());
                        }
                        Command::Stop(ack) => {
                            if guard.running {
                                guard.running = false;
                                running = false;
                                tracing::debug!("simulation clock stopped");
                            }
                            let _ = ack.send(());
                        }
                        Command::Reset(ack) => {
                            guard.running = false;
                            running = false;
                            guard.session.reset();
                            tracing::debug!("simulation reset to defaults");
                            let _ = ack.send(());
                        }
                        Command::Inject(kind, ack) => {
                            // While running, the injection is recorded
                            // immediately rather than waiting for the
                            // next tick boundary.
                            let record = guard.running;
                            guard.session.inject(kind, record);
                            tracing::debug!(hormone = %kind, recorded = record, "injection");
                            let _ = ack.send(());
                        }
                        Command::SetParam(kind, param, value, ack) => {
                            guard.session.set_param(kind, param, value);
                            let _ = ack.send(());
                        }
                    }
                    guard.last_updated = chrono::Utc::now().timestamp();
                    let snap = Snapshot::capture(&guard);
                    drop(guard);
                    let _ = snapshot_tx.send(snap);
                }
            }
        }

        tracing::debug!("simulation clock task exited");
    }

    async fn command(
        &self,
        make: impl FnOnce(oneshot::Sender<()>) -> Command,
    ) -> anyhow::Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(make(ack_tx))
            .await
            .map_err(|_| anyhow::anyhow!("simulation clock task is gone"))?;
        ack_rx
            .await
            .map_err(|_| anyhow::anyhow!("simulation clock dropped the command"))?;
        Ok(())
    }

    /// Stopped → Running. Idempotent.
    pub async fn start(&self) -> anyhow::Result<()> {
        self.command(Command::Start).await
    }

    /// Running → Stopped. When this returns, no further tick will fire.
    pub async fn stop(&self) -> anyhow::Result<()> {
        self.command(Command::Stop).await
    }

    /// Force Stopped, restore the default bank, reseed history with a
    /// single time-0 record.
    pub async fn reset(&self) -> anyhow::Result<()> {
        self.command(Command::Reset).await
    }

    /// Inject a hormone; valid in either clock state.
    pub async fn inject(&self, kind: HormoneKind) -> anyhow::Result<()> {
        self.command(|ack| Command::Inject(kind, ack)).await
    }

    /// Edit `force` or `decay`; out-of-domain values are clamped.
    pub async fn set_param(
        &self,
        kind: HormoneKind,
        param: Param,
        value: f32,
    ) -> anyhow::Result<()> {
        self.command(|ack| Command::SetParam(kind, param, value, ack))
            .await
    }

    /// Latest broadcast snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribe to snapshot updates (one per mutation).
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    pub async fn bank(&self) -> HormoneBank {
        self.shared.read().await.session.bank().clone()
    }

    pub async fn vad(&self) -> Vad {
        self.shared.read().await.session.vad()
    }

    pub async fn classification(&self) -> Classification {
        self.shared.read().await.session.classification()
    }

    pub async fn history(&self) -> Vec<HistoryRecord> {
        self.shared.read().await.session.history().to_vec()
    }

    pub async fn clock_state(&self) -> ClockState {
        if self.shared.read().await.running {
            ClockState::Running
        } else {
            ClockState::Stopped
        }
    }

    pub async fn is_running(&self) -> bool {
        self.shared.read().await.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    fn testing_engine() -> SimulationEngine {
        SimulationEngine::with_config(ClockConfig::testing(), Session::default())
    }

    #[tokio::test]
    async fn test_engine_starts_stopped_with_baseline() {
        let engine = SimulationEngine::new();
        let snap = engine.snapshot();
        assert_eq!(snap.state, ClockState::Stopped);
        assert_eq!(snap.time, 0);
        assert_eq!(engine.history().await.len(), 1);
        assert_eq!(snap.bank, HormoneBank::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_n_ticks_append_n_records() {
        let engine = testing_engine();
        engine.start().await.unwrap();
        assert!(engine.is_running().await);

        // 10 tick periods at the 10ms testing cadence.
        sleep(Duration::from_millis(105)).await;
        engine.stop().await.unwrap();

        let history = engine.history().await;
        assert_eq!(history.len(), 11, "baseline + 10 ticks");
        assert_eq!(history.last().unwrap().time, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_ticking() {
        let engine = testing_engine();
        engine.start().await.unwrap();
        sleep(Duration::from_millis(55)).await;
        engine.stop().await.unwrap();
        assert!(!engine.is_running().await);

        let frozen = engine.history().await.len();
        assert!(frozen > 1);

        // Plenty of would-be tick periods; none may land.
        sleep(Duration::from_millis(500)).await;
        assert_eq!(engine.history().await.len(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inject_while_running_records_immediately() {
        let engine = testing_engine();
        engine.start().await.unwrap();

        // Before the first tick period elapses.
        engine.inject(HormoneKind::Dopamine).await.unwrap();
        let history = engine.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().time, 1);
        assert!(
            history.last().unwrap().dopamine > HormoneBank::default().dopamine.current,
            "injection must be visible in the out-of-band record"
        );
    }

    #[tokio::test]
    async fn test_inject_while_stopped_mutates_without_record() {
        let engine = testing_engine();
        engine.inject(HormoneKind::Adrenaline).await.unwrap();

        assert_eq!(engine.history().await.len(), 1);
        let bank = engine.bank().await;
        assert!(bank.adrenaline.current > HormoneBank::default().adrenaline.current);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_forces_stopped_and_reseeds() {
        let engine = testing_engine();
        engine.start().await.unwrap();
        sleep(Duration::from_millis(55)).await;
        engine.inject(HormoneKind::Cortisol).await.unwrap();

        engine.reset().await.unwrap();
        assert!(!engine.is_running().await);
        assert_eq!(engine.bank().await, HormoneBank::default());
        let history = engine.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].time, 0);

        // Still stopped: no ticks resume on their own.
        sleep(Duration::from_millis(100)).await;
        assert_eq!(engine.history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_set_param_clamps_into_domain() {
        let engine = testing_engine();
        engine
            .set_param(HormoneKind::Gaba, Param::Decay, 1.5)
            .await
            .unwrap();
        assert_eq!(engine.bank().await.gaba.decay, 0.99);

        engine
            .set_param(HormoneKind::Gaba, Param::Force, -40.0)
            .await
            .unwrap();
        assert_eq!(engine.bank().await.gaba.force, 0.0);
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let engine = testing_engine();
        engine.start().await.unwrap();
        engine.start().await.unwrap();
        assert!(engine.is_running().await);
        engine.stop().await.unwrap();
        engine.stop().await.unwrap();
        assert!(!engine.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_receives_updates() {
        let engine = testing_engine();
        let mut rx = engine.subscribe();

        engine.inject(HormoneKind::Oxytocin).await.unwrap();
        rx.changed().await.unwrap();
        let snap = rx.borrow().clone();
        assert!(snap.bank.oxytocin.current > HormoneBank::default().oxytocin.current);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_tracks_emotion() {
        let engine = testing_engine();
        let snap = engine.snapshot();
        assert!(!snap.emotion.label.is_empty());
        assert!((0.0..=1.0).contains(&snap.emotion.confidence));

        engine.start().await.unwrap();
        sleep(Duration::from_millis(25)).await;
        let snap = engine.snapshot();
        assert_eq!(snap.state, ClockState::Running);
        assert!(snap.time >= 1);
    }
}
