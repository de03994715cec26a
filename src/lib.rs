//! Navigation core for a handheld GPS waypoint tracker.
//!
//! Turns a raw NMEA byte stream into a continuously refreshed fix, derives
//! decimal-degree coordinates and fixed-column display strings from it,
//! computes the Haversine distance to a stored waypoint, and drives
//! mode/operation/memory selection from four debounced buttons.
//!
//! The crate is `no_std` and hardware-free: the serial link, button pins,
//! waypoint store and tick timers are capability traits in [`hal`], so the
//! whole core runs natively in tests against simulated implementations. The
//! LCD renderer, startup sequencing and the top-level dispatch loop live in
//! the firmware binary, outside this crate; its obligations end at producing
//! the fixed-width strings the renderer consumes.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod buttons;
pub mod context;
pub mod distance;
pub mod gnss;
pub mod hal;
pub mod timebase;
pub mod ui;

pub use buttons::{Button, DebounceConfig, Debouncer};
pub use context::NavContext;
pub use gnss::fix::{FixRecord, PositionDecimal};
pub use gnss::sentence::{SentenceKind, SentenceParser};
pub use hal::{ByteSource, DigitalInput, Level, PeriodicTimer, TransportError, WaypointStore};
pub use timebase::Timebase;
pub use ui::{Mode, Operation, Ui, Waypoint};
