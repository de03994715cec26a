//! Mode, operation and waypoint-memory selection.
//!
//! Runs once per fast tick, right after debouncing, and consumes debounced
//! release edges. At most one action executes per tick, picked by fixed
//! priority; simultaneous edges on lower-priority buttons are discarded (the
//! "virtual short" policy).

use crate::buttons::{Button, Debouncer};
use crate::gnss::coords;
use crate::gnss::fix::{PositionDecimal, LAT_STR_LEN, LON_STR_LEN};
use crate::hal::WaypointStore;

/// Number of waypoint slots.
pub const WAYPOINT_SLOTS: usize = 10;

/// A stored waypoint.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Waypoint {
    pub latitude: f32,
    pub longitude: f32,
}

/// Display mode. Stat shows fix statistics; Nav shows waypoint navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Stat,
    Nav,
}

impl Mode {
    fn toggled(self) -> Self {
        match self {
            Mode::Stat => Mode::Nav,
            Mode::Nav => Mode::Stat,
        }
    }
}

/// The operation the action button will execute, cycled modulo three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    Save,
    Clear,
    Reset,
}

impl Operation {
    fn next(self) -> Self {
        match self {
            Operation::Save => Operation::Clear,
            Operation::Clear => Operation::Reset,
            Operation::Reset => Operation::Save,
        }
    }

    /// Fixed five-column label for the display.
    pub fn label(self) -> &'static str {
        match self {
            Operation::Save => " SAVE",
            Operation::Clear => "CLEAR",
            Operation::Reset => "RESET",
        }
    }
}

/// UI state plus the in-memory waypoint array it owns.
///
/// The waypoints are mirrored to the persistent store on every mutation;
/// storage is best-effort, so there is nothing to handle on that path.
pub struct Ui {
    pub mode: Mode,
    pub operation: Operation,
    selected: usize,
    waypoints: [Waypoint; WAYPOINT_SLOTS],
    /// Formatted coordinates of the selected slot, kept current for display.
    pub selected_lat_str: [u8; LAT_STR_LEN],
    pub selected_lon_str: [u8; LON_STR_LEN],
}

impl Ui {
    /// Load every slot from the store and derive the selected slot's strings.
    pub fn new(store: &mut impl WaypointStore) -> Self {
        let mut waypoints = [Waypoint::default(); WAYPOINT_SLOTS];
        for (index, waypoint) in waypoints.iter_mut().enumerate() {
            let (longitude, latitude) = store.load(index);
            *waypoint = Waypoint {
                latitude,
                longitude,
            };
        }
        let mut ui = Self {
            mode: Mode::Nav,
            operation: Operation::Save,
            selected: 0,
            waypoints,
            selected_lat_str: [b' '; LAT_STR_LEN],
            selected_lon_str: [b' '; LON_STR_LEN],
        };
        ui.refresh_selected_strings();
        ui
    }

    /// Selected memory index; always in `0..WAYPOINT_SLOTS`.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_waypoint(&self) -> Waypoint {
        self.waypoints[self.selected]
    }

    /// Consume this tick's release edges, executing at most one action.
    ///
    /// Priority: mode select, then memory select, then operation select, then
    /// action. Mode select toggles unconditionally; everything else is a
    /// no-op while in Stat mode.
    pub fn on_tick(
        &mut self,
        buttons: &Debouncer,
        position: &PositionDecimal,
        store: &mut impl WaypointStore,
    ) {
        if buttons.released_edge(Button::ModeSelect) {
            self.mode = self.mode.toggled();
            debug!("mode toggled");
        } else if self.mode != Mode::Stat && buttons.released_edge(Button::MemorySelect) {
            self.selected = (self.selected + 1) % WAYPOINT_SLOTS;
            self.refresh_selected_strings();
        } else if self.mode != Mode::Stat && buttons.released_edge(Button::OperationSelect) {
            self.operation = self.operation.next();
        } else if self.mode != Mode::Stat && buttons.released_edge(Button::Action) {
            self.execute(position, store);
        }
    }

    fn execute(&mut self, position: &PositionDecimal, store: &mut impl WaypointStore) {
        match self.operation {
            Operation::Save => {
                self.waypoints[self.selected] = Waypoint {
                    latitude: position.latitude,
                    longitude: position.longitude,
                };
                self.persist(self.selected, store);
            }
            Operation::Clear => {
                self.waypoints[self.selected] = Waypoint::default();
                self.persist(self.selected, store);
            }
            Operation::Reset => {
                for index in 0..WAYPOINT_SLOTS {
                    self.waypoints[index] = Waypoint::default();
                    self.persist(index, store);
                }
            }
        }
        self.refresh_selected_strings();
    }

    fn persist(&self, index: usize, store: &mut impl WaypointStore) {
        let waypoint = self.waypoints[index];
        store.save(index, waypoint.longitude, waypoint.latitude);
    }

    fn refresh_selected_strings(&mut self) {
        let waypoint = self.waypoints[self.selected];
        coords::format_latitude(waypoint.latitude, &mut self.selected_lat_str);
        coords::format_longitude(waypoint.longitude, &mut self.selected_lon_str);
    }

    pub fn selected_lat_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.selected_lat_str).ok()
    }

    pub fn selected_lon_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.selected_lon_str).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::{DebounceConfig, NUM_BUTTONS};
    use crate::hal::{DigitalInput, Level};

    /// In-memory store recording every save call.
    #[derive(Default)]
    struct FakeStore {
        slots: [(f32, f32); WAYPOINT_SLOTS],
        saves: std::vec::Vec<usize>,
    }

    impl WaypointStore for FakeStore {
        fn load(&mut self, index: usize) -> (f32, f32) {
            self.slots[index]
        }

        fn save(&mut self, index: usize, longitude: f32, latitude: f32) {
            self.slots[index] = (longitude, latitude);
            self.saves.push(index);
        }
    }

    struct Pins {
        levels: [Level; NUM_BUTTONS],
    }

    impl DigitalInput for Pins {
        fn sample(&mut self, button: Button) -> Level {
            self.levels[button as usize]
        }
    }

    /// Drives a full debounced press-and-release of `buttons` in lockstep,
    /// ticking the UI after every poll.
    fn press_and_release(
        ui: &mut Ui,
        debouncer: &mut Debouncer,
        position: &PositionDecimal,
        store: &mut FakeStore,
        buttons: &[Button],
    ) {
        let mut pins = Pins {
            levels: [Level::Released; NUM_BUTTONS],
        };
        for &b in buttons {
            pins.levels[b as usize] = Level::Pressed;
        }
        for _ in 0..3 {
            debouncer.poll(&mut pins);
            ui.on_tick(debouncer, position, store);
        }
        for &b in buttons {
            pins.levels[b as usize] = Level::Released;
        }
        for _ in 0..2 {
            debouncer.poll(&mut pins);
            ui.on_tick(debouncer, position, store);
        }
    }

    fn fixture() -> (Ui, Debouncer, PositionDecimal, FakeStore) {
        let mut store = FakeStore::default();
        let ui = Ui::new(&mut store);
        let debouncer = Debouncer::new(DebounceConfig {
            on_ticks: 3,
            off_ticks: 2,
        });
        let mut position = PositionDecimal::default();
        position.latitude = 41.38745;
        position.longitude = -92.054;
        (ui, debouncer, position, store)
    }

    #[test]
    fn mode_toggles_both_ways() {
        let (mut ui, mut debouncer, position, mut store) = fixture();
        assert_eq!(ui.mode, Mode::Nav);
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::ModeSelect]);
        assert_eq!(ui.mode, Mode::Stat);
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::ModeSelect]);
        assert_eq!(ui.mode, Mode::Nav);
    }

    #[test]
    fn virtual_short_prefers_mode_select() {
        let (mut ui, mut debouncer, position, mut store) = fixture();
        press_and_release(
            &mut ui,
            &mut debouncer,
            &position,
            &mut store,
            &[Button::ModeSelect, Button::Action],
        );
        // Mode toggled; the simultaneous action edge was discarded.
        assert_eq!(ui.mode, Mode::Stat);
        assert!(store.saves.is_empty());
    }

    #[test]
    fn memory_select_wraps_modulo_slots() {
        let (mut ui, mut debouncer, position, mut store) = fixture();
        for expected in [1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1] {
            press_and_release(
                &mut ui,
                &mut debouncer,
                &position,
                &mut store,
                &[Button::MemorySelect],
            );
            assert_eq!(ui.selected(), expected);
        }
    }

    #[test]
    fn operation_cycles_save_clear_reset() {
        let (mut ui, mut debouncer, position, mut store) = fixture();
        assert_eq!(ui.operation, Operation::Save);
        let expected = [Operation::Clear, Operation::Reset, Operation::Save];
        for op in expected {
            press_and_release(
                &mut ui,
                &mut debouncer,
                &position,
                &mut store,
                &[Button::OperationSelect],
            );
            assert_eq!(ui.operation, op);
        }
    }

    #[test]
    fn stat_mode_gates_everything_but_mode_select() {
        let (mut ui, mut debouncer, position, mut store) = fixture();
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::ModeSelect]);
        assert_eq!(ui.mode, Mode::Stat);

        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::MemorySelect]);
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::Action]);
        assert_eq!(ui.selected(), 0);
        assert!(store.saves.is_empty());
    }

    #[test]
    fn save_persists_current_position() {
        let (mut ui, mut debouncer, position, mut store) = fixture();
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::Action]);

        assert_eq!(store.saves, [0]);
        let (lon, lat) = store.slots[0];
        assert_eq!((lon, lat), (-92.054, 41.38745));
        assert_eq!(ui.selected_waypoint().latitude, 41.38745);
        assert_eq!(ui.selected_lat_str(), Some("+41.38745"));
    }

    #[test]
    fn clear_zeroes_selected_slot() {
        let (mut ui, mut debouncer, position, mut store) = fixture();
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::Action]);
        // Cycle to Clear, then execute.
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::OperationSelect]);
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::Action]);

        assert_eq!(store.slots[0], (0.0, 0.0));
        assert_eq!(ui.selected_lat_str(), Some("+00.00000"));
    }

    #[test]
    fn reset_zeroes_and_persists_every_slot() {
        let (mut ui, mut debouncer, position, mut store) = fixture();
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::Action]);
        store.saves.clear();

        // Save -> Clear -> Reset.
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::OperationSelect]);
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::OperationSelect]);
        press_and_release(&mut ui, &mut debouncer, &position, &mut store, &[Button::Action]);

        assert_eq!(store.saves.len(), WAYPOINT_SLOTS);
        assert!(store.slots.iter().all(|&slot| slot == (0.0, 0.0)));
    }

    #[test]
    fn operation_labels_are_fixed_width() {
        for op in [Operation::Save, Operation::Clear, Operation::Reset] {
            assert_eq!(op.label().len(), 5);
        }
    }
}
