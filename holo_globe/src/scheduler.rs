//! Cooperative per-frame task scheduler.
//!
//! Every loop in the application (vision, orbit, region, drag) is a
//! [`FrameTask`]. Once per display frame the scheduler steps each task in
//! spawn order; a task keeps being invoked for as long as it answers
//! [`Flow::Continue`]. All tasks share one thread, so there is no
//! parallelism and no locking anywhere in the pipeline.
//!
//! Teardown is a single path: a task that answers [`Flow::Stop`], a
//! cancelled [`CancelToken`], [`FrameScheduler::shutdown`] and dropping the
//! scheduler all end in [`FrameTask::teardown`], called exactly once per task.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ════════════════════════════════════════════════════════════════════════════
// FrameTick / FrameClock
// ════════════════════════════════════════════════════════════════════════════

/// Timing handed to every task for one display frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Seconds since the previous frame.
    pub delta:   f32,
    /// Seconds since the clock started, including this frame.
    pub elapsed: f64,
    /// Frame counter, starting at 1.
    pub frame:   u64,
}

/// Produces [`FrameTick`]s from wall-clock time, or from explicit deltas.
#[derive(Debug)]
pub struct FrameClock {
    last:    Instant,
    elapsed: f64,
    frame:   u64,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock { last: Instant::now(), elapsed: 0.0, frame: 0 }
    }

    /// Tick using the time since the previous call.
    pub fn tick(&mut self) -> FrameTick {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        self.advance(delta)
    }

    /// Tick by a fixed amount (deterministic loops and tests).
    pub fn advance(&mut self, delta: Duration) -> FrameTick {
        self.elapsed += delta.as_secs_f64();
        self.frame += 1;
        FrameTick { delta: delta.as_secs_f32(), elapsed: self.elapsed, frame: self.frame }
    }
}

impl Default for FrameClock {
    fn default() -> Self { FrameClock::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameTask
// ════════════════════════════════════════════════════════════════════════════

/// What a task wants after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Invoke me again next frame.
    Continue,
    /// Stop invoking me; tear me down.
    Stop,
}

/// A unit of per-frame work.
pub trait FrameTask {
    fn name(&self) -> &'static str;

    fn step(&mut self, tick: &FrameTick) -> Flow;

    /// Release resources. Called once, after the last `step`.
    fn teardown(&mut self) {}
}

// ════════════════════════════════════════════════════════════════════════════
// CancelToken
// ════════════════════════════════════════════════════════════════════════════

/// Shared stop flag. Cancelling tears down every task on the next frame.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self { CancelToken::default() }
    pub fn cancel(&self) { self.0.set(true); }
    pub fn is_cancelled(&self) -> bool { self.0.get() }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameScheduler
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct FrameScheduler {
    tasks:  Vec<Box<dyn FrameTask>>,
    cancel: CancelToken,
}

impl FrameScheduler {
    pub fn new() -> Self { FrameScheduler::default() }

    pub fn spawn<T: FrameTask + 'static>(&mut self, task: T) {
        log::debug!("scheduling task '{}'", task.name());
        self.tasks.push(Box::new(task));
    }

    pub fn cancel_token(&self) -> CancelToken { self.cancel.clone() }

    pub fn len(&self) -> usize { self.tasks.len() }

    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }

    pub fn task_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.name()).collect()
    }

    /// Step every live task once. Returns false when nothing is left to run.
    pub fn run_frame(&mut self, tick: &FrameTick) -> bool {
        if self.cancel.is_cancelled() {
            self.shutdown();
            return false;
        }

        let mut i = 0;
        while i < self.tasks.len() {
            match self.tasks[i].step(tick) {
                Flow::Continue => i += 1,
                Flow::Stop => {
                    let mut task = self.tasks.remove(i);
                    log::debug!("task '{}' stopped at frame {}", task.name(), tick.frame);
                    task.teardown();
                }
            }
        }

        !self.tasks.is_empty()
    }

    /// Tear down every remaining task.
    pub fn shutdown(&mut self) {
        for mut task in self.tasks.drain(..) {
            log::debug!("tearing down task '{}'", task.name());
            task.teardown();
        }
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
