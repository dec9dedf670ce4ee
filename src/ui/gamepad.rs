/// Gamepad navigation using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick ←→   →  Retreat / Advance
///   A / R1 / Start          →  Advance
///   B / L1                  →  Retreat
///   Select                  →  Quit
///
/// Only edges count: one press, one step.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::sim::nav::NavCommand;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

const BTN_COUNT: usize = 10;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    advance: Vec<Btn>,
    retreat: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            advance: vec![Btn::A, Btn::R1, Btn::Start],
            retreat: vec![Btn::B, Btn::L1],
            quit:    vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons pressed since the last `update()`.
    just_pressed: [bool; BTN_COUNT],
    dpad_left: bool,
    dpad_right: bool,

    stick_x: f32,
    stick_left: bool,
    stick_right: bool,
    stick_left_edge: bool,
    stick_right_edge: bool,

    action_map: ActionMap,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    pub fn new() -> Self {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: Gilrs::new().ok(),
            just_pressed: [false; BTN_COUNT],
            dpad_left: false,
            dpad_right: false,
            stick_x: 0.0,
            stick_left: false,
            stick_right: false,
            stick_left_edge: false,
            stick_right_edge: false,
            action_map: ActionMap::default(),
        }
    }

    /// Load button mapping from config. Unknown names are skipped; an
    /// action whose list ends up empty keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let adv = parse_list(&cfg.advance);
        if !adv.is_empty() { map.advance = adv; }
        let ret = parse_list(&cfg.retreat);
        if !ret.is_empty() { map.retreat = ret; }
        let quit = parse_list(&cfg.quit);
        if !quit.is_empty() { map.quit = quit; }
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.dpad_left = false;
        self.dpad_right = false;
        self.stick_left_edge = false;
        self.stick_right_edge = false;

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(Button::DPadLeft, _) => self.dpad_left = true,
                EventType::ButtonPressed(Button::DPadRight, _) => self.dpad_right = true,
                EventType::ButtonPressed(btn, _) => {
                    if let Some(b) = Btn::from_gilrs(btn) {
                        self.just_pressed[btn_index(b)] = true;
                    }
                }
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::Disconnected => self.stick_x = 0.0,
                _ => {}
            }
        }

        self.derive_stick_edges();
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn derive_stick_edges(&mut self) {
        let left = self.stick_x < -STICK_DEADZONE;
        let right = self.stick_x > STICK_DEADZONE;
        self.stick_left_edge = left && !self.stick_left;
        self.stick_right_edge = right && !self.stick_right;
        self.stick_left = left;
        self.stick_right = right;
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[btn_index(b)])
    }

    /// Navigation requested this frame. Retreat wins if both fire.
    pub fn nav_command(&self) -> Option<NavCommand> {
        if self.dpad_left || self.stick_left_edge || self.any_just_pressed(&self.action_map.retreat) {
            Some(NavCommand::Retreat)
        } else if self.dpad_right || self.stick_right_edge || self.any_just_pressed(&self.action_map.advance) {
            Some(NavCommand::Advance)
        } else {
            None
        }
    }

    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Rb"), Some(Btn::R1));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_overrides_but_empty_keeps_default() {
        let mut gp = GamepadState::new();
        gp.load_button_config(&GamepadConfig {
            advance: vec!["X".into()],
            retreat: vec!["nonsense".into()],
            quit: vec![],
        });
        assert_eq!(gp.action_map.advance, vec![Btn::X]);
        assert_eq!(gp.action_map.retreat, ActionMap::default().retreat);
        assert_eq!(gp.action_map.quit, vec![Btn::Select]);
    }

    #[test]
    fn stick_fires_once_per_push() {
        let mut gp = GamepadState::new();
        gp.stick_x = 0.9;
        gp.derive_stick_edges();
        assert_eq!(gp.nav_command(), Some(NavCommand::Advance));
        gp.derive_stick_edges();
        assert_eq!(gp.nav_command(), None);
        gp.stick_x = 0.0;
        gp.derive_stick_edges();
        gp.stick_x = -0.9;
        gp.derive_stick_edges();
        assert_eq!(gp.nav_command(), Some(NavCommand::Retreat));
    }

    #[test]
    fn mapped_buttons_navigate() {
        let mut gp = GamepadState::new();
        gp.just_pressed[btn_index(Btn::B)] = true;
        assert_eq!(gp.nav_command(), Some(NavCommand::Retreat));
        gp.just_pressed = [false; BTN_COUNT];
        gp.just_pressed[btn_index(Btn::Select)] = true;
        assert_eq!(gp.nav_command(), None);
        assert!(gp.quit_pressed());
    }
}
