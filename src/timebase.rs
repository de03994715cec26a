//! Seconds counting and the 1 Hz flag, driven by the slow tick.
//!
//! The slow-tick interrupt is the only writer; the dispatch loop is the only
//! consumer. Everything crossing that boundary is a single atomic word, with
//! the flag consumed by an atomic test-and-clear so two real seconds can
//! never coalesce into one observed tick. All methods take `&self` so a
//! `Timebase` can live in a `static` shared between the handler and the loop.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

/// Slow-tick firings per wall-clock second with the stock timer divider.
pub const DEFAULT_SLOW_TICKS_PER_SECOND: u16 = 15;

pub struct Timebase {
    ticks_per_second: u16,
    subsecond: AtomicU16,
    /// Monotonic seconds since startup; drives the time-to-first-fix display.
    seconds: AtomicU32,
    second_flag: AtomicBool,
}

impl Timebase {
    pub const fn new(ticks_per_second: u16) -> Self {
        Self {
            ticks_per_second,
            subsecond: AtomicU16::new(0),
            seconds: AtomicU32::new(0),
            second_flag: AtomicBool::new(false),
        }
    }

    /// Called once per slow-tick interrupt.
    pub fn slow_tick(&self) {
        let elapsed = self.subsecond.load(Ordering::Relaxed) + 1;
        if elapsed >= self.ticks_per_second {
            self.subsecond.store(0, Ordering::Relaxed);
            self.seconds.fetch_add(1, Ordering::Relaxed);
            self.second_flag.store(true, Ordering::Release);
        } else {
            self.subsecond.store(elapsed, Ordering::Relaxed);
        }
    }

    /// One-shot consumption of the 1 Hz flag: returns true at most once per
    /// elapsed second.
    pub fn take_second(&self) -> bool {
        self.second_flag.swap(false, Ordering::AcqRel)
    }

    /// Whole seconds since startup.
    pub fn seconds(&self) -> u32 {
        self.seconds.load(Ordering::Relaxed)
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::new(DEFAULT_SLOW_TICKS_PER_SECOND)
    }
}
