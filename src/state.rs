// ABOUTME: Two-screen navigation state with explicit transition rules.
// ABOUTME: The demo screen is only reachable while the HUD preference is enabled.

use std::fmt;

/// Which screen the window is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Main,
    Demo,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Main => write!(f, "Main"),
            Screen::Demo => write!(f, "Demo"),
        }
    }
}

/// Navigation requests from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    OpenDemo,
    Back,
}

impl Screen {
    /// Attempt a transition. Returns the new screen if the transition is
    /// valid, or None if the event should be ignored on the current screen.
    pub fn transition(self, event: &Event, hud_enabled: bool) -> Option<Screen> {
        match (self, event) {
            // The test button is disabled while the HUD is off
            (Screen::Main, Event::OpenDemo) if hud_enabled => Some(Screen::Demo),
            (Screen::Main, Event::OpenDemo) => None,

            (Screen::Demo, Event::Back) => Some(Screen::Main),

            // Already on the demo, or nothing to go back to
            (Screen::Demo, Event::OpenDemo) => None,
            (Screen::Main, Event::Back) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_main() {
        assert_eq!(Screen::default(), Screen::Main);
    }

    #[test]
    fn open_demo_requires_hud_enabled() {
        assert_eq!(Screen::Main.transition(&Event::OpenDemo, true), Some(Screen::Demo));
        assert_eq!(Screen::Main.transition(&Event::OpenDemo, false), None);
    }

    #[test]
    fn back_returns_to_main_regardless_of_hud() {
        assert_eq!(Screen::Demo.transition(&Event::Back, true), Some(Screen::Main));
        assert_eq!(Screen::Demo.transition(&Event::Back, false), Some(Screen::Main));
    }

    #[test]
    fn redundant_events_are_ignored() {
        assert_eq!(Screen::Demo.transition(&Event::OpenDemo, true), None);
        assert_eq!(Screen::Main.transition(&Event::Back, true), None);
    }
}
