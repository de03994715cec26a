//! Two-threshold debouncing for the four mechanical buttons.
//!
//! Each channel is sampled once per fast tick. A raw level has to hold for a
//! configured number of consecutive ticks before the debounced state follows
//! it; the on and off thresholds are independent because the hardware bounces
//! differently on press and release. The thresholds are configuration, not
//! constants: revisions of the device shipped with different values.

use crate::hal::{DigitalInput, Level};

/// One physical button per channel.
pub const NUM_BUTTONS: usize = 4;

/// The four buttons, in virtual-short priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    ModeSelect,
    MemorySelect,
    OperationSelect,
    Action,
}

impl Button {
    pub const ALL: [Button; NUM_BUTTONS] = [
        Button::ModeSelect,
        Button::MemorySelect,
        Button::OperationSelect,
        Button::Action,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Debounce thresholds in fast ticks.
#[derive(Debug, Clone, Copy)]
pub struct DebounceConfig {
    /// Consecutive pressed samples before the channel counts as pressed.
    pub on_ticks: u16,
    /// Consecutive released samples before the channel counts as released.
    pub off_ticks: u16,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            on_ticks: 100,
            off_ticks: 30,
        }
    }
}

/// Raw counters and debounced state of one button.
#[derive(Debug, Clone, Copy, Default)]
struct ButtonChannel {
    on_time: u16,
    off_time: u16,
    state: Level,
    previous: Level,
}

pub struct Debouncer {
    config: DebounceConfig,
    channels: [ButtonChannel; NUM_BUTTONS],
}

impl Debouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            channels: [ButtonChannel::default(); NUM_BUTTONS],
        }
    }

    /// Sample and update every channel. Called once per fast tick; the
    /// pre-update debounced states are snapshotted first so edge queries
    /// refer to this tick's transitions only.
    pub fn poll(&mut self, inputs: &mut impl DigitalInput) {
        for channel in &mut self.channels {
            channel.previous = channel.state;
        }
        for button in Button::ALL {
            let channel = &mut self.channels[button.index()];
            match inputs.sample(button) {
                Level::Pressed => {
                    channel.on_time += 1;
                    channel.off_time = 0;
                    if channel.on_time >= self.config.on_ticks {
                        channel.state = Level::Pressed;
                        channel.on_time = 0;
                    }
                }
                Level::Released => {
                    channel.off_time += 1;
                    channel.on_time = 0;
                    if channel.off_time >= self.config.off_ticks {
                        channel.state = Level::Released;
                        channel.off_time = 0;
                    }
                }
            }
        }
    }

    /// Debounced level of a channel.
    pub fn state(&self, button: Button) -> Level {
        self.channels[button.index()].state
    }

    /// Whether this tick completed a debounced press-to-release transition.
    /// Actions fire on release so a held button cannot repeat-fire.
    pub fn released_edge(&self, button: Button) -> bool {
        let channel = &self.channels[button.index()];
        channel.previous == Level::Pressed && channel.state == Level::Released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted pin levels, one entry per tick per channel.
    struct Pins {
        levels: [Level; NUM_BUTTONS],
    }

    impl Pins {
        fn released() -> Self {
            Self {
                levels: [Level::Released; NUM_BUTTONS],
            }
        }

        fn press(&mut self, button: Button) {
            self.levels[button as usize] = Level::Pressed;
        }

        fn release(&mut self, button: Button) {
            self.levels[button as usize] = Level::Released;
        }
    }

    impl DigitalInput for Pins {
        fn sample(&mut self, button: Button) -> Level {
            self.levels[button as usize]
        }
    }

    fn config() -> DebounceConfig {
        DebounceConfig {
            on_ticks: 5,
            off_ticks: 3,
        }
    }

    #[test]
    fn press_latches_on_the_nth_tick_not_before() {
        let mut debouncer = Debouncer::new(config());
        let mut pins = Pins::released();
        pins.press(Button::Action);

        for _ in 0..4 {
            debouncer.poll(&mut pins);
            assert_eq!(debouncer.state(Button::Action), Level::Released);
        }
        debouncer.poll(&mut pins);
        assert_eq!(debouncer.state(Button::Action), Level::Pressed);
    }

    #[test]
    fn bounce_resets_the_on_counter() {
        let mut debouncer = Debouncer::new(config());
        let mut pins = Pins::released();

        pins.press(Button::Action);
        for _ in 0..4 {
            debouncer.poll(&mut pins);
        }
        // One released sample resets the streak.
        pins.release(Button::Action);
        debouncer.poll(&mut pins);

        pins.press(Button::Action);
        for _ in 0..4 {
            debouncer.poll(&mut pins);
            assert_eq!(debouncer.state(Button::Action), Level::Released);
        }
        debouncer.poll(&mut pins);
        assert_eq!(debouncer.state(Button::Action), Level::Pressed);
    }

    #[test]
    fn long_hold_produces_exactly_one_release_edge() {
        let mut debouncer = Debouncer::new(config());
        let mut pins = Pins::released();

        pins.press(Button::MemorySelect);
        let mut edges = 0;
        for _ in 0..50 {
            debouncer.poll(&mut pins);
            if debouncer.released_edge(Button::MemorySelect) {
                edges += 1;
            }
        }
        assert_eq!(edges, 0);
        assert_eq!(debouncer.state(Button::MemorySelect), Level::Pressed);

        pins.release(Button::MemorySelect);
        for _ in 0..50 {
            debouncer.poll(&mut pins);
            if debouncer.released_edge(Button::MemorySelect) {
                edges += 1;
            }
        }
        assert_eq!(edges, 1);
    }

    #[test]
    fn asymmetric_thresholds_apply_per_direction() {
        let mut debouncer = Debouncer::new(config());
        let mut pins = Pins::released();

        pins.press(Button::ModeSelect);
        for _ in 0..5 {
            debouncer.poll(&mut pins);
        }
        assert_eq!(debouncer.state(Button::ModeSelect), Level::Pressed);

        pins.release(Button::ModeSelect);
        for _ in 0..2 {
            debouncer.poll(&mut pins);
            assert_eq!(debouncer.state(Button::ModeSelect), Level::Pressed);
        }
        debouncer.poll(&mut pins);
        assert_eq!(debouncer.state(Button::ModeSelect), Level::Released);
        assert!(debouncer.released_edge(Button::ModeSelect));
    }
}
