//! Callback scheduling
//!
//! The simulation runs as two self-rescheduling callback chains:
//! - render, once per display refresh (`next_frame`)
//! - update, at the soonest available task turn (`next_turn`)
//!
//! Both chains run on one thread, so they never overlap.

pub mod event_loop;

#[cfg(target_arch = "wasm32")]
pub mod browser;

use std::collections::HashMap;
use std::num::NonZeroU32;

pub use event_loop::EventLoop;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserScheduler;

/// Runs at the next display refresh with the frame timestamp (ms)
pub type FrameCallback = Box<dyn FnOnce(f64)>;
/// Runs at the next task turn
pub type TurnCallback = Box<dyn FnOnce()>;

/// Identifies a pending turn callback. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnHandle(NonZeroU32);

impl TurnHandle {
    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }
}

/// The two scheduling primitives the simulation needs
pub trait Scheduler {
    /// Run `callback` once at the next display refresh
    fn next_frame(&self, callback: FrameCallback);

    /// Run `callback` once at the soonest task turn, without blocking other work
    fn next_turn(&self, callback: TurnCallback) -> TurnHandle;

    /// Drop a pending turn callback. No-op if it already ran.
    fn cancel_turn(&self, handle: TurnHandle);
}

/// Pending turn callbacks by handle
///
/// Handles count up from 1 and are never handed out twice.
pub struct TurnTable {
    next: u32,
    tasks: HashMap<TurnHandle, TurnCallback>,
}

impl Default for TurnTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnTable {
    pub fn new() -> Self {
        Self {
            next: 1,
            tasks: HashMap::new(),
        }
    }

    /// Store a callback under a fresh handle
    pub fn insert(&mut self, callback: TurnCallback) -> TurnHandle {
        let handle = TurnHandle::from_raw(self.next).unwrap_or_else(|| {
            // Wrapped after 2^32 turns; restart past zero
            self.next = 1;
            TurnHandle(NonZeroU32::MIN)
        });
        self.next = self.next.wrapping_add(1);
        self.tasks.insert(handle, callback);
        handle
    }

    /// Remove a callback so it can run. `None` if cancelled or already run.
    pub fn take(&mut self, handle: TurnHandle) -> Option<TurnCallback> {
        self.tasks.remove(&handle)
    }

    pub fn cancel(&mut self, handle: TurnHandle) {
        self.tasks.remove(&handle);
    }

    /// Number of callbacks still waiting
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_start_at_one_and_increase() {
        let mut table = TurnTable::new();
        let a = table.insert(Box::new(|| {}));
        let b = table.insert(Box::new(|| {}));
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(table.pending(), 2);
    }

    #[test]
    fn test_take_once() {
        let mut table = TurnTable::new();
        let h = table.insert(Box::new(|| {}));
        assert!(table.take(h).is_some());
        assert!(table.take(h).is_none());
        // Cancelling after the callback was taken is harmless
        table.cancel(h);
        assert_eq!(table.pending(), 0);
    }

    #[test]
    fn test_handle_from_raw_rejects_zero() {
        assert!(TurnHandle::from_raw(0).is_none());
        assert_eq!(TurnHandle::from_raw(7).map(TurnHandle::get), Some(7));
    }
}
