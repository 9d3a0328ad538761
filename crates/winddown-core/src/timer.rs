//! The two-slot countdown engine.
//!
//! One slot closes a chosen application (optionally chaining into a
//! shutdown), the other performs a system power transition. Slots are
//! independent state machines driven by discrete `arm`/`cancel`/`tick`
//! commands; only the engine mutates slot state.

use std::fmt;
use std::time::{Duration, Instant};

use crate::action::{ActionExecutor, ActionOutcome, SystemAction, TerminateOutcome};

/// Identifies one of the two countdown slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotId {
    App,
    System,
}

/// Internal slot lifecycle. Completion always cycles back to `Idle`;
/// there is no separate "fired" resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Idle,
    Armed,
    Firing,
}

/// User-visible slot status, kept across the return to `Idle` so the
/// last outcome stays readable until the next arm.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotStatus {
    Idle,
    Armed,
    Fired,
    Cancelled,
    Failed(String),
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Armed => f.write_str("armed"),
            Self::Fired => f.write_str("fired"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Failed(cause) => write!(f, "failed: {cause}"),
        }
    }
}

/// Identity of the process captured when the app timer was armed.
///
/// A snapshot: later selection changes or list refreshes never touch it.
/// If the process exits early, the fire simply observes `AlreadyGone`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppTarget {
    pub pid: u32,
    pub name: String,
}

/// App-slot configuration captured at arm time.
#[derive(Debug, Clone)]
struct AppArm {
    target: AppTarget,
    shutdown_after: bool,
}

/// What a tick caused, for the daemon to react to.
///
/// An app fire asks for a process-list re-poll and a cleared selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickEffects {
    pub app_fired: bool,
    pub system_fired: bool,
}

/// One countdown slot.
struct TimerSlot {
    state: SlotState,
    status: SlotStatus,
    remaining: u64,
    deadline: Option<Instant>,
    /// Bumped on every arm and cancel. A fire whose epoch no longer
    /// matches records nothing.
    epoch: u64,
}

impl TimerSlot {
    fn new() -> Self {
        Self {
            state: SlotState::Idle,
            status: SlotStatus::Idle,
            remaining: 0,
            deadline: None,
            epoch: 0,
        }
    }

    /// Starts (or restarts) the countdown. Re-arming from `Armed` fully
    /// resets to the new duration; arming mid-fire is rejected.
    fn arm(&mut self, duration_secs: u64) -> Result<(), String> {
        if duration_secs == 0 {
            return Err("timer duration must be greater than zero".into());
        }
        if self.state == SlotState::Firing {
            return Err("timer is currently firing".into());
        }

        self.epoch += 1;
        self.state = SlotState::Armed;
        self.status = SlotStatus::Armed;
        self.remaining = duration_secs;
        self.deadline = Some(Instant::now() + Duration::from_secs(duration_secs));
        Ok(())
    }

    /// Stops an armed countdown. A no-op from `Idle`, and from `Firing`,
    /// where the action is already irreversible.
    fn cancel(&mut self) {
        if self.state != SlotState::Armed {
            return;
        }

        self.epoch += 1;
        self.state = SlotState::Idle;
        self.status = SlotStatus::Cancelled;
        self.remaining = 0;
        self.deadline = None;
    }

    /// One tick: decrements the countdown and clamps it to the wall-clock
    /// remainder, so ticks missed while the host slept compress instead
    /// of firing late. Returns `true` when the countdown reached zero.
    fn advance(&mut self) -> bool {
        if self.state != SlotState::Armed {
            return false;
        }

        let wall = self.deadline.map_or(0, wall_remaining);
        self.remaining = self.remaining.saturating_sub(1).min(wall);
        self.remaining == 0
    }

    /// Enters `Firing` and returns the epoch the fire belongs to.
    fn begin_fire(&mut self) -> u64 {
        self.state = SlotState::Firing;
        self.epoch
    }

    /// Records the fire outcome and returns to `Idle`, unless an
    /// intervening arm/cancel invalidated this fire.
    fn finish_fire(&mut self, epoch: u64, status: SlotStatus) {
        if self.epoch != epoch {
            return;
        }
        self.state = SlotState::Idle;
        self.status = status;
        self.deadline = None;
    }
}

/// Seconds until the deadline, rounded up so in-time ticks are never
/// clipped by sub-second scheduling jitter.
fn wall_remaining(deadline: Instant) -> u64 {
    let left = deadline.saturating_duration_since(Instant::now());
    let secs = left.as_secs();
    if left.subsec_nanos() > 0 { secs + 1 } else { secs }
}

/// Converts user-entered hours and minutes into seconds.
///
/// Unparsable or empty fields count as zero; the caller decides whether
/// a zero total is acceptable (arming rejects it).
pub fn parse_hours_minutes(hours: &str, minutes: &str) -> u64 {
    let h: u64 = hours.trim().parse().unwrap_or(0);
    let m: u64 = minutes.trim().parse().unwrap_or(0);
    h * 3600 + m * 60
}

/// Formats a second count as `H:MM:SS` for status lines.
pub fn format_hms(secs: u64) -> String {
    format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

/// The countdown engine: one app slot, one system slot.
pub struct TimerEngine {
    app: TimerSlot,
    app_arm: Option<AppArm>,
    system: TimerSlot,
    system_action: Option<SystemAction>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    pub fn new() -> Self {
        Self {
            app: TimerSlot::new(),
            app_arm: None,
            system: TimerSlot::new(),
            system_action: None,
        }
    }

    /// Arms the app slot against the given target.
    ///
    /// `shutdown_after` chains a system shutdown onto a successful (or
    /// already-gone) termination.
    pub fn arm_app(
        &mut self,
        target: AppTarget,
        duration_secs: u64,
        shutdown_after: bool,
    ) -> Result<(), String> {
        self.app.arm(duration_secs)?;
        self.app_arm = Some(AppArm {
            target,
            shutdown_after,
        });
        Ok(())
    }

    /// Arms the system slot with a power action.
    pub fn arm_system(&mut self, action: SystemAction, duration_secs: u64) -> Result<(), String> {
        self.system.arm(duration_secs)?;
        self.system_action = Some(action);
        Ok(())
    }

    pub fn cancel_app(&mut self) {
        self.app.cancel();
    }

    pub fn cancel_system(&mut self) {
        self.system.cancel();
    }

    /// Remaining seconds on a slot's countdown.
    pub fn remaining(&self, slot: SlotId) -> u64 {
        match slot {
            SlotId::App => self.app.remaining,
            SlotId::System => self.system.remaining,
        }
    }

    /// The slot's user-visible status.
    pub fn status(&self, slot: SlotId) -> SlotStatus {
        match slot {
            SlotId::App => self.app.status.clone(),
            SlotId::System => self.system.status.clone(),
        }
    }

    /// The target the app slot is armed against, while armed.
    pub fn app_target(&self) -> Option<&AppTarget> {
        if self.app.state == SlotState::Armed {
            self.app_arm.as_ref().map(|a| &a.target)
        } else {
            None
        }
    }

    /// The power action the system slot is armed with, while armed.
    pub fn system_action(&self) -> Option<SystemAction> {
        if self.system.state == SlotState::Armed {
            self.system_action
        } else {
            None
        }
    }

    /// Delivers one tick to both slots, firing any countdown that
    /// reached zero. Actions run synchronously; the slot returns to
    /// `Idle` only after its action sequence completed, so a slot can
    /// never overlap two fires.
    pub fn tick(&mut self, executor: &mut dyn ActionExecutor) -> TickEffects {
        let mut effects = TickEffects::default();

        if self.app.advance() {
            self.fire_app(executor);
            effects.app_fired = true;
        }
        if self.system.advance() {
            self.fire_system(executor);
            effects.system_fired = true;
        }

        effects
    }

    /// Fires the app slot: terminate the target, then the optional
    /// chained shutdown. A real terminate failure suppresses the chain —
    /// a failed close must not still power off the machine.
    fn fire_app(&mut self, executor: &mut dyn ActionExecutor) {
        let epoch = self.app.begin_fire();
        let Some(arm) = self.app_arm.take() else {
            self.app.finish_fire(epoch, SlotStatus::Failed("no target armed".into()));
            return;
        };

        let status = match executor.terminate(arm.target.pid) {
            TerminateOutcome::Terminated | TerminateOutcome::AlreadyGone => {
                if arm.shutdown_after {
                    match executor.shutdown() {
                        ActionOutcome::Requested => SlotStatus::Fired,
                        ActionOutcome::Failed(cause) => {
                            SlotStatus::Failed(format!("shutdown after closing: {cause}"))
                        }
                    }
                } else {
                    SlotStatus::Fired
                }
            }
            TerminateOutcome::Failed(cause) => {
                SlotStatus::Failed(format!("close {}: {cause}", arm.target.name))
            }
        };

        self.app.finish_fire(epoch, status);
    }

    /// Fires the system slot with the action resolved at arm time.
    fn fire_system(&mut self, executor: &mut dyn ActionExecutor) {
        let epoch = self.system.begin_fire();
        let Some(action) = self.system_action.take() else {
            self.system
                .finish_fire(epoch, SlotStatus::Failed("no action armed".into()));
            return;
        };

        let outcome = match action {
            SystemAction::Shutdown => executor.shutdown(),
            SystemAction::Restart => executor.restart(),
            SystemAction::Sleep => executor.sleep(),
        };

        let status = match outcome {
            ActionOutcome::Requested => SlotStatus::Fired,
            ActionOutcome::Failed(cause) => SlotStatus::Failed(format!("{action}: {cause}")),
        };

        self.system.finish_fire(epoch, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every executor call; outcomes are configurable per test.
    struct MockExecutor {
        calls: Vec<String>,
        terminate_outcome: TerminateOutcome,
        power_outcome: ActionOutcome,
    }

    impl MockExecutor {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                terminate_outcome: TerminateOutcome::Terminated,
                power_outcome: ActionOutcome::Requested,
            }
        }
    }

    impl ActionExecutor for MockExecutor {
        fn terminate(&mut self, pid: u32) -> TerminateOutcome {
            self.calls.push(format!("terminate:{pid}"));
            self.terminate_outcome.clone()
        }

        fn shutdown(&mut self) -> ActionOutcome {
            self.calls.push("shutdown".into());
            self.power_outcome.clone()
        }

        fn restart(&mut self) -> ActionOutcome {
            self.calls.push("restart".into());
            self.power_outcome.clone()
        }

        fn sleep(&mut self) -> ActionOutcome {
            self.calls.push("sleep".into());
            self.power_outcome.clone()
        }
    }

    fn target(pid: u32) -> AppTarget {
        AppTarget {
            pid,
            name: "Editor".into(),
        }
    }

    #[test]
    fn format_hms_pads_minutes_and_seconds() {
        assert_eq!(format_hms(0), "0:00:00");
        assert_eq!(format_hms(61), "0:01:01");
        assert_eq!(format_hms(9000), "2:30:00");
        assert_eq!(format_hms(86400 + 90), "24:01:30");
    }

    #[test]
    fn parse_hours_minutes_converts_and_defaults_to_zero() {
        assert_eq!(parse_hours_minutes("2", "30"), 9000);
        assert_eq!(parse_hours_minutes("0", "1"), 60);
        assert_eq!(parse_hours_minutes("", ""), 0);
        assert_eq!(parse_hours_minutes("abc", "5"), 300);
        assert_eq!(parse_hours_minutes("1", "oops"), 3600);
        assert_eq!(parse_hours_minutes(" 1 ", " 2 "), 3720);
    }

    #[test]
    fn remaining_equals_total_seconds_after_arm() {
        let mut engine = TimerEngine::new();
        let secs = parse_hours_minutes("1", "30");
        engine.arm_app(target(42), secs, false).unwrap();

        assert_eq!(engine.remaining(SlotId::App), 90 * 60);
        assert_eq!(engine.status(SlotId::App), SlotStatus::Armed);
    }

    #[test]
    fn zero_duration_is_rejected_and_slot_stays_idle() {
        let mut engine = TimerEngine::new();

        assert!(engine.arm_app(target(42), 0, false).is_err());
        assert!(engine.arm_system(SystemAction::Shutdown, 0).is_err());
        assert_eq!(engine.status(SlotId::App), SlotStatus::Idle);
        assert_eq!(engine.status(SlotId::System), SlotStatus::Idle);
    }

    #[test]
    fn n_ticks_fire_exactly_once() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        engine.arm_app(target(42), 3, false).unwrap();

        assert!(!engine.tick(&mut exec).app_fired);
        assert!(!engine.tick(&mut exec).app_fired);
        assert!(engine.tick(&mut exec).app_fired);

        assert_eq!(engine.status(SlotId::App), SlotStatus::Fired);
        assert_eq!(engine.remaining(SlotId::App), 0);
        assert_eq!(exec.calls, vec!["terminate:42"]);

        // Ticks after the return to Idle are no-ops.
        assert!(!engine.tick(&mut exec).app_fired);
        assert_eq!(exec.calls.len(), 1);
    }

    #[test]
    fn cancel_before_the_last_tick_prevents_the_fire() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        engine.arm_app(target(42), 3, false).unwrap();

        engine.tick(&mut exec);
        engine.tick(&mut exec);
        engine.cancel_app();
        engine.tick(&mut exec);

        assert_eq!(engine.status(SlotId::App), SlotStatus::Cancelled);
        assert_eq!(engine.remaining(SlotId::App), 0);
        assert!(exec.calls.is_empty());
    }

    #[test]
    fn cancel_when_idle_is_a_noop() {
        let mut engine = TimerEngine::new();
        engine.cancel_app();
        assert_eq!(engine.status(SlotId::App), SlotStatus::Idle);
    }

    #[test]
    fn rearming_resets_to_the_new_duration() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        engine.arm_app(target(42), 5, false).unwrap();
        engine.tick(&mut exec);
        engine.tick(&mut exec);

        engine.arm_app(target(99), 10, false).unwrap();
        assert_eq!(engine.remaining(SlotId::App), 10);
        assert_eq!(engine.app_target().unwrap().pid, 99);

        // The old countdown no longer fires at its original deadline.
        for _ in 0..3 {
            assert!(!engine.tick(&mut exec).app_fired);
        }
        assert!(exec.calls.is_empty());
    }

    #[test]
    fn chained_shutdown_runs_after_successful_close() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        engine.arm_app(target(42), 1, true).unwrap();

        assert!(engine.tick(&mut exec).app_fired);
        assert_eq!(exec.calls, vec!["terminate:42", "shutdown"]);
        assert_eq!(engine.status(SlotId::App), SlotStatus::Fired);
    }

    #[test]
    fn chained_shutdown_runs_when_target_already_gone() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        exec.terminate_outcome = TerminateOutcome::AlreadyGone;
        engine.arm_app(target(42), 1, true).unwrap();

        engine.tick(&mut exec);
        assert_eq!(exec.calls, vec!["terminate:42", "shutdown"]);
        assert_eq!(engine.status(SlotId::App), SlotStatus::Fired);
    }

    #[test]
    fn chained_shutdown_is_suppressed_when_close_fails() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        exec.terminate_outcome = TerminateOutcome::Failed("access denied".into());
        engine.arm_app(target(42), 1, true).unwrap();

        engine.tick(&mut exec);
        assert_eq!(exec.calls, vec!["terminate:42"]);
        match engine.status(SlotId::App) {
            SlotStatus::Failed(cause) => assert!(cause.contains("access denied")),
            other => panic!("expected failed status, got {other:?}"),
        }
    }

    #[test]
    fn system_slot_dispatches_the_armed_action() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        engine.arm_system(SystemAction::Restart, 2).unwrap();

        engine.tick(&mut exec);
        assert!(engine.tick(&mut exec).system_fired);
        assert_eq!(exec.calls, vec!["restart"]);
        assert_eq!(engine.status(SlotId::System), SlotStatus::Fired);
    }

    #[test]
    fn system_slot_failure_records_the_cause() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        exec.power_outcome = ActionOutcome::Failed("call rejected".into());
        engine.arm_system(SystemAction::Sleep, 1).unwrap();

        engine.tick(&mut exec);
        match engine.status(SlotId::System) {
            SlotStatus::Failed(cause) => {
                assert!(cause.contains("sleep"));
                assert!(cause.contains("call rejected"));
            }
            other => panic!("expected failed status, got {other:?}"),
        }
    }

    #[test]
    fn slots_count_down_independently() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        engine.arm_app(target(42), 2, false).unwrap();
        engine.arm_system(SystemAction::Shutdown, 4).unwrap();

        engine.tick(&mut exec);
        assert_eq!(engine.remaining(SlotId::App), 1);
        assert_eq!(engine.remaining(SlotId::System), 3);

        let effects = engine.tick(&mut exec);
        assert!(effects.app_fired);
        assert!(!effects.system_fired);
        assert_eq!(engine.status(SlotId::System), SlotStatus::Armed);
    }

    #[test]
    fn cancelling_one_slot_leaves_the_other_armed() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        engine.arm_app(target(42), 3, false).unwrap();
        engine.arm_system(SystemAction::Shutdown, 3).unwrap();

        engine.cancel_app();
        engine.tick(&mut exec);

        assert_eq!(engine.status(SlotId::App), SlotStatus::Cancelled);
        assert_eq!(engine.status(SlotId::System), SlotStatus::Armed);
        assert_eq!(engine.remaining(SlotId::System), 2);
    }

    #[test]
    fn armed_target_and_action_clear_after_firing() {
        let mut engine = TimerEngine::new();
        let mut exec = MockExecutor::new();
        engine.arm_app(target(42), 1, false).unwrap();
        engine.arm_system(SystemAction::Sleep, 1).unwrap();

        assert!(engine.app_target().is_some());
        assert!(engine.system_action().is_some());

        engine.tick(&mut exec);
        assert!(engine.app_target().is_none());
        assert!(engine.system_action().is_none());
    }
}
