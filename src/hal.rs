//! Capability traits for everything the navigation core does not own.
//!
//! The core never touches hardware registers directly: the serial link, the
//! button pins, the waypoint store and the tick timers are all reached through
//! these traits, so the whole crate can be exercised natively against
//! simulated implementations.

use crate::buttons::Button;

/// Receive-side fault flagged by the serial link alongside a byte slot.
///
/// There is no resend mechanism on an NMEA link, so these are dropped after
/// being logged; the parser simply waits for the next good byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No stop bit where one was expected.
    Frame,
    /// A byte arrived before the previous one was collected.
    Overrun,
    /// The receive buffer filled up and bytes were lost.
    Overflow,
}

/// One already-framed byte at a time from the GPS serial link.
pub trait ByteSource {
    /// Pull the next received byte.
    ///
    /// Returns `nb::Error::WouldBlock` while nothing has arrived yet; the
    /// parser keeps its partial-sentence state and resumes on the next call.
    /// A transport error means the byte it accompanied was dropped.
    fn read_byte(&mut self) -> nb::Result<u8, TransportError>;
}

/// Raw level of a button pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Pressed,
    #[default]
    Released,
}

/// Digital input capability, polled once per fast tick per channel.
pub trait DigitalInput {
    fn sample(&mut self, button: Button) -> Level;
}

/// Persistent waypoint storage, addressed by slot index.
///
/// Storage is best-effort at this layer: there is no error path, and a slot
/// that was never written reads back as `(0.0, 0.0)`.
pub trait WaypointStore {
    /// Load `(longitude, latitude)` for a slot.
    fn load(&mut self, index: usize) -> (f32, f32);

    /// Persist `(longitude, latitude)` for a slot.
    fn save(&mut self, index: usize, longitude: f32, latitude: f32);
}

/// Periodic timer capability used to deliver the fast and slow ticks.
pub trait PeriodicTimer {
    /// Arrange for `tick` to be invoked at `hz` from interrupt context until
    /// the timer is stopped or dropped.
    fn start(&mut self, hz: u32, tick: impl FnMut() + Send + 'static);
}
