//! The navigation context: one explicit object owning all mutable core state.
//!
//! The dispatch loop and the tick handlers reach everything through this, so
//! tests can instantiate independent contexts instead of sharing globals.

use crate::buttons::{DebounceConfig, Debouncer};
use crate::distance::{self, DISTANCE_STR_LEN};
use crate::gnss::fix::{FixRecord, PositionDecimal};
use crate::gnss::sentence::{SentenceKind, SentenceParser};
use crate::hal::{ByteSource, DigitalInput, WaypointStore};
use crate::ui::Ui;

pub struct NavContext<S: WaypointStore> {
    pub fix: FixRecord,
    pub position: PositionDecimal,
    pub buttons: Debouncer,
    pub ui: Ui,
    /// Formatted distance to the selected waypoint, in km.
    pub distance_str: [u8; DISTANCE_STR_LEN],
    parser: SentenceParser,
    store: S,
}

impl<S: WaypointStore> NavContext<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, DebounceConfig::default())
    }

    pub fn with_config(mut store: S, debounce: DebounceConfig) -> Self {
        let ui = Ui::new(&mut store);
        Self {
            fix: FixRecord::new(),
            position: PositionDecimal::default(),
            buttons: Debouncer::new(debounce),
            ui,
            distance_str: [b' '; DISTANCE_STR_LEN],
            parser: SentenceParser::new(),
            store,
        }
    }

    /// Drain the byte source until it would block, feeding the parser.
    /// Transport errors are logged and dropped; the link has no resend.
    pub fn pump(&mut self, source: &mut impl ByteSource) {
        loop {
            match source.read_byte() {
                Ok(byte) => self.handle_byte(byte),
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => debug!("transport error: {:?}", e),
            }
        }
    }

    /// Feed one received byte through the sentence parser. When a position
    /// sentence completes with a valid fix, the decimal position and its
    /// display strings are re-derived.
    pub fn handle_byte(&mut self, byte: u8) {
        if let Some(kind) = self.parser.feed(byte, &mut self.fix) {
            trace!("sentence complete: {:?}", kind);
            if kind == SentenceKind::Position && self.fix.fix_valid() {
                self.position.recompute(&self.fix);
            }
        }
    }

    /// Fast-tick body: debounce every button, then run the UI state machine
    /// on this tick's edges.
    pub fn on_fast_tick(&mut self, inputs: &mut impl DigitalInput) {
        self.buttons.poll(inputs);
        self.ui
            .on_tick(&self.buttons, &self.position, &mut self.store);
    }

    /// 1 Hz task body: refresh the distance readout while navigating.
    /// The caller is expected to check [`link_out_of_sync`](Self::link_out_of_sync)
    /// first and run its retry-and-warn sequence instead when it trips.
    pub fn on_second(&mut self) {
        if self.ui.mode == crate::ui::Mode::Nav {
            self.refresh_distance();
        }
    }

    /// Distance from the current position to the selected waypoint.
    pub fn refresh_distance(&mut self) {
        let waypoint = self.ui.selected_waypoint();
        let km = distance::haversine_km(
            self.position.latitude,
            self.position.longitude,
            waypoint.latitude,
            waypoint.longitude,
            self.position.altitude,
        );
        distance::format_distance(km, &mut self.distance_str);
    }

    /// See [`FixRecord::link_out_of_sync`].
    pub fn link_out_of_sync(&self) -> bool {
        self.fix.link_out_of_sync()
    }

    /// Restart navigation input after a desynchronized link: drop any partial
    /// sentence and blank the fix record so the next sentences rebuild it.
    pub fn resync(&mut self) {
        warn!("navigation link out of sync, restarting input");
        self.parser.reset();
        self.fix.reset();
    }

    pub fn distance_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.distance_str).ok()
    }
}
