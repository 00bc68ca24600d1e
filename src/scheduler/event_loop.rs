//! Single-threaded native event loop
//!
//! Turn callbacks go through a ready queue of handles; frame callbacks wait
//! in a list that is swapped out and drained once per frame. Callbacks are
//! always invoked with no internal borrow held, so they may schedule more work.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use super::{FrameCallback, Scheduler, TurnCallback, TurnHandle, TurnTable};
use crate::platform::Clock;

/// Cooperative scheduler with an explicit ready queue
#[derive(Default)]
pub struct EventLoop {
    turns: RefCell<TurnTable>,
    ready: RefCell<VecDeque<TurnHandle>>,
    frames: RefCell<Vec<FrameCallback>>,
}

impl Scheduler for EventLoop {
    fn next_frame(&self, callback: FrameCallback) {
        self.frames.borrow_mut().push(callback);
    }

    fn next_turn(&self, callback: TurnCallback) -> TurnHandle {
        let handle = self.turns.borrow_mut().insert(callback);
        self.ready.borrow_mut().push_back(handle);
        handle
    }

    fn cancel_turn(&self, handle: TurnHandle) {
        self.turns.borrow_mut().cancel(handle);
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the oldest ready turn. Returns false if the queue was empty.
    ///
    /// A cancelled handle still counts as a turn; its callback is just gone.
    pub fn run_turn(&self) -> bool {
        let Some(handle) = self.ready.borrow_mut().pop_front() else {
            return false;
        };
        let task = self.turns.borrow_mut().take(handle);
        if let Some(task) = task {
            task();
        }
        true
    }

    /// Run every turn that was ready when called; turns queued meanwhile wait
    pub fn run_turns(&self) -> usize {
        let queued = self.ready.borrow().len();
        for _ in 0..queued {
            self.run_turn();
        }
        queued
    }

    /// Deliver one display refresh to every waiting frame callback
    pub fn run_frame(&self, timestamp: f64) -> usize {
        let callbacks = std::mem::take(&mut *self.frames.borrow_mut());
        let count = callbacks.len();
        for callback in callbacks {
            callback(timestamp);
        }
        count
    }

    pub fn has_ready_turns(&self) -> bool {
        !self.ready.borrow().is_empty()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Drive the loop until `should_stop` returns true or nothing is left to run
    ///
    /// Frames fire every `frame_interval_ms` by `clock`; turns run back to back
    /// in between, yielding the thread after each one.
    pub fn run(&self, clock: &dyn Clock, frame_interval_ms: f64, mut should_stop: impl FnMut() -> bool) {
        let mut next_frame_at = clock.now();

        while !should_stop() {
            let now = clock.now();
            if now >= next_frame_at {
                self.run_frame(now);
                next_frame_at += frame_interval_ms;
                if next_frame_at < now {
                    // Fell behind by more than a frame; don't burst to catch up
                    next_frame_at = now + frame_interval_ms;
                }
            }

            if self.run_turn() {
                std::thread::yield_now();
                continue;
            }

            if self.pending_frames() == 0 {
                log::debug!("Event loop idle, stopping");
                break;
            }
            let wait = (next_frame_at - clock.now()).max(0.0);
            std::thread::sleep(Duration::from_secs_f64(wait / 1000.0));
        }
    }
}
