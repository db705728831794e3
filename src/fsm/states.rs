//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no heap.
//!
//! ```text
//!          ┌────────[start edge]────────┐
//!          │                            ▼
//!        IDLE                        RUNNING
//!   timer: monitor @ 5 Hz      timer: generator @ TargetFrequency
//!          ▲                            │
//!          └─────────[stop edge]────────┘
//!                  (EOF pulse on the way out)
//! ```
//!
//! Leaving a state always releases the shared timer before the next state
//! acquires it.

use super::context::{FrameCounter, FsmContext, Io, TimerRole};
use super::{RunState, StateDescriptor};
use crate::app::events::Report;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; RunState::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: RunState::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: Some(idle_exit),
            on_tick: idle_tick,
        },
        // Index 1 — Running
        StateDescriptor {
            id: RunState::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: Some(running_exit),
            on_tick: running_tick,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext, io: &mut Io<'_>) {
    let poll_hz = u32::from(ctx.monitor.poll_hz());
    ctx.acquire_timer(TimerRole::Monitor, poll_hz, io.hw);
}

fn idle_exit(ctx: &mut FsmContext, io: &mut Io<'_>) {
    ctx.release_timer(TimerRole::Monitor, io.hw);
}

/// FrequencyMonitor poll: sample, scale, store, report.
fn idle_tick(ctx: &mut FsmContext, io: &mut Io<'_>) {
    let raw = io.hw.read_knob();
    let reading = ctx.monitor.sample(raw);
    if reading.target_hz != ctx.target_hz {
        debug!("knob: {} Hz -> {} Hz (raw={})", ctx.target_hz, reading.target_hz, raw);
    }
    ctx.target_hz = reading.target_hz;
    io.sink.report(&Report::Frequency(reading));
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING state
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut FsmContext, io: &mut Io<'_>) {
    ctx.frame_counter = FrameCounter::zero();
    let now = io.hw.now_ms();
    ctx.generator.arm(now, ctx.target_hz);
    info!("Projector running at {} Hz", ctx.target_hz);
    ctx.acquire_timer(TimerRole::Generator, u32::from(ctx.target_hz), io.hw);
}

fn running_exit(ctx: &mut FsmContext, io: &mut Io<'_>) {
    ctx.release_timer(TimerRole::Generator, io.hw);

    let total_frames = ctx.frame_counter.frames().unwrap_or(0);
    ctx.generator.emit_eof(&mut *io.hw);
    io.sink.report(&Report::EndOfFilm { total_frames });
    info!("EOF reached. Total frames: {}", total_frames);

    ctx.frame_counter = FrameCounter::IDLE;
}

/// SignalGenerator tick: pulse, report, count.
fn running_tick(ctx: &mut FsmContext, io: &mut Io<'_>) {
    let frame = ctx.frame_counter.frames().unwrap_or(0);
    let report = ctx.generator.tick(frame, &mut *io.hw);
    debug!(
        "frame {} after {} ms ({:?} fps)",
        report.frame, report.elapsed_ms, report.rate_fps
    );
    io.sink.report(&Report::Frame(report));
    ctx.frame_counter.increment();
}
