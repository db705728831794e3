//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  StateTable                                         │
//! │  ┌─────────┬───────────┬───────────┬─────────────┐  │
//! │  │ RunState│ on_enter  │ on_exit   │ on_tick     │  │
//! │  ├─────────┼───────────┼───────────┼─────────────┤  │
//! │  │ Idle    │ fn(ctx,io)│ fn(ctx,io)│ fn(ctx,io)  │  │
//! │  │ Running │ fn(ctx,io)│ fn(ctx,io)│ fn(ctx,io)  │  │
//! │  └─────────┴───────────┴───────────┴─────────────┘  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Transitions are requested from outside (the start / stop buttons) and are
//! idempotent: asking for the state the machine is already in does nothing.
//! Otherwise the engine runs `on_exit` for the current state, then `on_enter`
//! for the next, and updates the current pointer.
//!
//! Each expiry of the shared periodic timer calls `on_tick` of the current
//! state.  Because each state's `on_enter` acquires the timer and `on_exit`
//! releases it, the state alone decides which worker the tick belongs to.

pub mod context;
pub mod states;

use context::{FsmContext, Io};
use log::{debug, info};

use crate::app::events::Report;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// RunState.  Must stay in sync with the table built in
/// [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RunState {
    Idle = 0,
    Running = 1,
}

impl RunState {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert an index back to `RunState`.  Out-of-range values assert in
    /// debug builds and fall back to `Idle`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Running,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter`, `on_exit` and `on_tick`.
pub type StateActionFn = fn(&mut FsmContext, &mut Io<'_>);

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: RunState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    /// Work done on each periodic timer expiry while in this state.
    pub on_tick: StateActionFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The run-state machine engine.
pub struct RunStateMachine {
    /// Fixed-size table indexed by `RunState as usize`.
    table: [StateDescriptor; RunState::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Whether `start()` has run.  Ticks before that are ignored.
    started: bool,
}

impl RunStateMachine {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; RunState::COUNT], initial: RunState) -> Self {
        Self {
            table,
            current: initial as usize,
            started: false,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext, io: &mut Io<'_>) {
        if self.started {
            return;
        }
        info!("FSM starting in state: {}", self.table[self.current].name);
        self.started = true;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx, io);
        }
    }

    /// Deliver one periodic timer expiry to the current state.
    pub fn tick(&mut self, ctx: &mut FsmContext, io: &mut Io<'_>) {
        if !self.started {
            debug!("FSM: tick before start ignored");
            return;
        }
        (self.table[self.current].on_tick)(ctx, io);
    }

    /// Start button: Idle → Running.  Returns `false` if already Running.
    pub fn enter_running(&mut self, ctx: &mut FsmContext, io: &mut Io<'_>) -> bool {
        self.request(RunState::Running, ctx, io)
    }

    /// Stop button: Running → Idle.  Returns `false` if already Idle.
    pub fn enter_idle(&mut self, ctx: &mut FsmContext, io: &mut Io<'_>) -> bool {
        self.request(RunState::Idle, ctx, io)
    }

    /// Move to `next` unless already there.
    pub fn request(&mut self, next: RunState, ctx: &mut FsmContext, io: &mut Io<'_>) -> bool {
        if next as usize == self.current {
            debug!("FSM: already {}, request ignored", self.table[self.current].name);
            return false;
        }
        self.transition(next, ctx, io);
        true
    }

    /// The current state's identity.
    pub fn current_state(&self) -> RunState {
        RunState::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: RunState, ctx: &mut FsmContext, io: &mut Io<'_>) {
        let from = self.current_state();
        let next_idx = next as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx, io);
        }

        self.current = next_idx;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx, io);
        }

        io.sink.report(&Report::StateChanged { from, to: next });
    }
}
