//! Interrupt-to-run-loop bridge.
//!
//! Deferred work is produced by:
//! - GPIO ISRs (start / stop button falling edges)
//! - The periodic timer callback (generator tick or knob poll)
//!
//! and consumed by the run loop, which executes it one item at a time.
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐
//! │ Start ISR   │────▶│ Request slot  │────┐
//! │ Stop ISR    │────▶│ (atomic)      │    │    ┌──────────────┐
//! └─────────────┘     └───────────────┘    ├───▶│  Run loop    │
//! ┌─────────────┐     ┌───────────────┐    │    │  (consumer)  │
//! │ Timer cb    │────▶│ Tick counter  │────┘    └──────────────┘
//! └─────────────┘     └───────────────┘
//! ```
//!
//! Requests are coalesced into a single atomic holding at most one pending
//! request per kind plus their arrival order, so enqueueing can neither block
//! nor fail.  Timer ticks only need counting, so they use a single atomic.

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

/// Run-state change requested from interrupt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Start button pressed.
    EnterRunning,
    /// Stop button pressed.
    EnterIdle,
}

// ── Request slot ──────────────────────────────────────────────

const RUN_PENDING: u8 = 0b001;
const IDLE_PENDING: u8 = 0b010;
/// With both kinds pending: set when `EnterIdle` arrived last.
const IDLE_LAST: u8 = 0b100;

/// Pending requests in application order.
fn decode(bits: u8) -> (Option<Request>, Option<Request>) {
    match (bits & RUN_PENDING != 0, bits & IDLE_PENDING != 0) {
        (false, false) => (None, None),
        (true, false) => (Some(Request::EnterRunning), None),
        (false, true) => (Some(Request::EnterIdle), None),
        (true, true) if bits & IDLE_LAST != 0 => {
            (Some(Request::EnterRunning), Some(Request::EnterIdle))
        }
        (true, true) => (Some(Request::EnterIdle), Some(Request::EnterRunning)),
    }
}

/// Backing storage for the pending requests.
///
/// On target this lives in a `static` so the ISR half can outlive `main`'s
/// stack frame; in tests it lives on the stack.
pub struct InterruptBridge {
    pending: AtomicU8,
}

impl Default for InterruptBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptBridge {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU8::new(0),
        }
    }

    /// Split into the ISR-side producer and the run-loop consumer.
    pub fn split(&mut self) -> (RequestProducer<'_>, RequestConsumer<'_>) {
        let pending = &self.pending;
        (
            RequestProducer { pending },
            RequestConsumer {
                pending,
                staged: None,
            },
        )
    }
}

/// ISR-side half.  Never blocks, never allocates, never fails.
pub struct RequestProducer<'q> {
    pending: &'q AtomicU8,
}

impl RequestProducer<'_> {
    /// Falling edge on the start button.
    pub fn on_start_edge(&mut self) {
        self.push(Request::EnterRunning);
    }

    /// Falling edge on the stop button.
    pub fn on_stop_edge(&mut self) {
        self.push(Request::EnterIdle);
    }

    /// Record a request.  A request of a kind already pending is moved behind
    /// the other kind, so the last edge always decides the final state.
    pub fn push(&mut self, request: Request) {
        let _ = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some(match request {
                    Request::EnterRunning => (bits | RUN_PENDING) & !IDLE_LAST,
                    Request::EnterIdle => bits | IDLE_PENDING | IDLE_LAST,
                })
            });
    }
}

/// Run-loop half.  Yields requests in the order they were recorded.
pub struct RequestConsumer<'q> {
    pending: &'q AtomicU8,
    /// Second request of the last batch taken from the slot.
    staged: Option<Request>,
}

impl RequestConsumer<'_> {
    /// Pop the oldest pending request.
    pub fn next(&mut self) -> Option<Request> {
        if let Some(request) = self.staged.take() {
            return Some(request);
        }
        let (first, second) = decode(self.pending.swap(0, Ordering::AcqRel));
        self.staged = second;
        first
    }

    /// Drain all pending requests into a callback in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(Request)) {
        while let Some(request) = self.next() {
            handler(request);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_none() && self.pending.load(Ordering::Acquire) == 0
    }
}

// ── Timer tick counter ────────────────────────────────────────

/// Pending periodic-timer ticks.
///
/// The timer callback increments, the run loop takes.  Stopping the timer
/// clears it so no tick of a stopped timer is ever delivered.
pub struct TickCounter {
    pending: AtomicU32,
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU32::new(0),
        }
    }

    /// Record one timer expiry.  Safe from the timer task or an ISR.
    pub fn signal(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    /// Take every pending tick.
    pub fn take(&self) -> u32 {
        self.pending.swap(0, Ordering::AcqRel)
    }

    /// Discard pending ticks.
    pub fn clear(&self) {
        self.pending.store(0, Ordering::Release);
    }
}
