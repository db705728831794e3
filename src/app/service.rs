//! Application service — the hexagonal core.
//!
//! [`ProjectorService`] owns the run-state machine and its context: RunState,
//! FrameCounter, LastTickTimestamp, TargetFrequency and the record of which
//! worker holds the periodic timer.  There is exactly one instance, owned by
//! the run loop; nothing lives in process-wide statics.
//!
//! ```text
//!  RequestConsumer ──▶ ┌────────────────────────┐ ──▶ ReportSink
//!                      │    ProjectorService    │
//!     HardwarePort ◀──▶│  FSM · Generator · Mon │
//!                      └────────────────────────┘
//! ```
//!
//! Every entry point runs to completion before the next one starts, so the
//! state needs no locking; duplicate requests are absorbed by the FSM's
//! idempotent transitions.

use log::info;

use crate::config::ProjectorConfig;
use crate::events::{Request, RequestConsumer};
use crate::fsm::context::{FrameCounter, FsmContext, Io, TimerRole};
use crate::fsm::states::build_state_table;
use crate::fsm::{RunState, RunStateMachine};

use super::events::Report;
use super::ports::{HardwarePort, ReportSink};

// ───────────────────────────────────────────────────────────────
// ProjectorService
// ───────────────────────────────────────────────────────────────

pub struct ProjectorService {
    fsm: RunStateMachine,
    ctx: FsmContext,
    /// Requests that changed the run state.
    transitions: u64,
    /// Requests absorbed because the machine was already in the target state.
    ignored_requests: u64,
}

impl ProjectorService {
    /// Construct the service from configuration.
    ///
    /// Does **not** arm any timer — call [`start`](Self::start) next.
    pub fn new(config: ProjectorConfig) -> Self {
        Self {
            fsm: RunStateMachine::new(build_state_table(), RunState::Idle),
            ctx: FsmContext::new(config),
            transitions: 0,
            ignored_requests: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter Idle and hand the timer to the frequency monitor.
    pub fn start(&mut self, hw: &mut impl HardwarePort, sink: &mut impl ReportSink) {
        let mut io = Io { hw, sink };
        self.fsm.start(&mut self.ctx, &mut io);
        io.sink.report(&Report::Ready);
        info!(
            "ProjectorService started in {:?} (target {} Hz)",
            self.fsm.current_state(),
            self.ctx.target_hz
        );
    }

    // ── Transitions ───────────────────────────────────────────

    /// Idle → Running.  No-op while Running.
    pub fn enter_running(
        &mut self,
        hw: &mut impl HardwarePort,
        sink: &mut impl ReportSink,
    ) -> bool {
        self.handle_request(Request::EnterRunning, hw, sink)
    }

    /// Running → Idle.  No-op while Idle.
    pub fn enter_idle(&mut self, hw: &mut impl HardwarePort, sink: &mut impl ReportSink) -> bool {
        self.handle_request(Request::EnterIdle, hw, sink)
    }

    /// Apply one deferred request.  Returns whether the run state changed.
    pub fn handle_request(
        &mut self,
        request: Request,
        hw: &mut impl HardwarePort,
        sink: &mut impl ReportSink,
    ) -> bool {
        let mut io = Io { hw, sink };
        let changed = match request {
            Request::EnterRunning => self.fsm.enter_running(&mut self.ctx, &mut io),
            Request::EnterIdle => self.fsm.enter_idle(&mut self.ctx, &mut io),
        };
        if changed {
            self.transitions += 1;
        } else {
            self.ignored_requests += 1;
        }
        changed
    }

    // ── Timer ─────────────────────────────────────────────────

    /// One expiry of the shared periodic timer.
    pub fn on_timer_tick(&mut self, hw: &mut impl HardwarePort, sink: &mut impl ReportSink) {
        let mut io = Io { hw, sink };
        self.fsm.tick(&mut self.ctx, &mut io);
    }

    // ── Run loop step ─────────────────────────────────────────

    /// Drain deferred requests in FIFO order, then deliver pending timer
    /// expiries.  Returns the number of ticks delivered.
    ///
    /// Requests go first: a stop request disarms the generator, which
    /// discards its pending expiries, so no frame is pulsed after stop.
    pub fn run_pending(
        &mut self,
        requests: &mut RequestConsumer<'_>,
        hw: &mut impl HardwarePort,
        sink: &mut impl ReportSink,
    ) -> u32 {
        while let Some(request) = requests.next() {
            self.handle_request(request, hw, sink);
        }

        let ticks = hw.take_ticks();
        for _ in 0..ticks {
            self.on_timer_tick(hw, sink);
        }
        ticks
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current RunState.
    pub fn state(&self) -> RunState {
        self.fsm.current_state()
    }

    /// Current FrameCounter (-1 while idle).
    pub fn frame_counter(&self) -> FrameCounter {
        self.ctx.frame_counter
    }

    /// TargetFrequency that the next run will use.
    pub fn target_frequency(&self) -> u8 {
        self.ctx.target_hz
    }

    /// Cadence of the current (or last) run.
    pub fn running_frequency(&self) -> u8 {
        self.ctx.generator.cadence_hz()
    }

    /// LastTickTimestamp of the generator.
    pub fn last_tick_ms(&self) -> u32 {
        self.ctx.generator.last_tick_ms()
    }

    /// Worker currently holding the periodic timer.
    pub fn timer_owner(&self) -> Option<TimerRole> {
        self.ctx.timer_owner()
    }

    /// Requests that changed state / requests absorbed as duplicates.
    pub fn request_counts(&self) -> (u64, u64) {
        (self.transitions, self.ignored_requests)
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.ctx.config
    }
}
