/// Stage controller: owns "what is shown" and "which way did we move".
///
/// ## State machine
///
///   states:      the ten `Stage` values, starting at `Intro`
///   advance:     stage → stage+1, only below `Contact`
///   retreat:     stage → stage−1, only above `Intro`
///
/// Requests at a boundary are no-ops, not errors. `direction` exists only
/// to pick the slide variant for the transition.

use crossterm::event::KeyCode;
use tracing::debug;

use crate::domain::content::{content_for, StageContent};
use crate::domain::stage::Stage;
use crate::sim::schedule::{Channel, Scheduler, Subscription};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Backward = -1,
    Still = 0,
    Forward = 1,
}

impl Direction {
    pub fn sign(self) -> i8 {
        self as i8
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavCommand {
    Advance,
    Retreat,
}

impl NavCommand {
    pub fn direction(self) -> Direction {
        match self {
            NavCommand::Advance => Direction::Forward,
            NavCommand::Retreat => Direction::Backward,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NavigationState {
    pub current: Stage,
    pub direction: Direction,
}

impl NavigationState {
    pub fn initial() -> Self {
        NavigationState { current: Stage::Intro, direction: Direction::Still }
    }
}

/// A completed move. Boundary no-ops produce no `StageChange`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StageChange {
    pub from: Stage,
    pub to: Stage,
    pub direction: Direction,
}

/// Which command a key maps to, if any.
pub fn command_for_key(code: KeyCode) -> Option<NavCommand> {
    match code {
        KeyCode::Right | KeyCode::Char(' ') => Some(NavCommand::Advance),
        KeyCode::Left => Some(NavCommand::Retreat),
        _ => None,
    }
}

pub struct StageController {
    state: NavigationState,
    key_sub: Option<Subscription>,
}

impl StageController {
    pub fn new() -> Self {
        StageController { state: NavigationState::initial(), key_sub: None }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn current(&self) -> Stage {
        self.state.current
    }

    #[allow(dead_code)]
    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    /// Register the keyboard subscription. Calling again while mounted does nothing.
    pub fn mount(&mut self, scheduler: &mut Scheduler) {
        if self.key_sub.is_none() {
            self.key_sub = Some(scheduler.subscribe(Channel::Key));
        }
    }

    pub fn unmount(&mut self, scheduler: &mut Scheduler) {
        if let Some(sub) = self.key_sub.take() {
            scheduler.unsubscribe(sub);
        }
    }

    pub fn is_listening(&self, scheduler: &Scheduler) -> bool {
        self.key_sub.as_ref().is_some_and(|s| scheduler.is_live(s))
    }

    pub fn advance(&mut self) -> Option<StageChange> {
        let from = self.state.current;
        let to = from.next()?;
        self.state = NavigationState { current: to, direction: Direction::Forward };
        debug!(from = from.label(), to = to.label(), "advance");
        Some(StageChange { from, to, direction: Direction::Forward })
    }

    pub fn retreat(&mut self) -> Option<StageChange> {
        let from = self.state.current;
        let to = from.prev()?;
        self.state = NavigationState { current: to, direction: Direction::Backward };
        debug!(from = from.label(), to = to.label(), "retreat");
        Some(StageChange { from, to, direction: Direction::Backward })
    }

    pub fn apply(&mut self, cmd: NavCommand) -> Option<StageChange> {
        match cmd {
            NavCommand::Advance => self.advance(),
            NavCommand::Retreat => self.retreat(),
        }
    }

    /// Right arrow or space advances, left arrow retreats, anything else is ignored.
    pub fn handle_key(&mut self, code: KeyCode) -> Option<StageChange> {
        command_for_key(code).and_then(|cmd| self.apply(cmd))
    }

    pub fn current_view(&self) -> &'static StageContent {
        content_for(self.state.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn starts_at_intro_standing_still() {
        let c = StageController::new();
        assert_eq!(c.state(), NavigationState { current: Stage::Intro, direction: Direction::Still });
    }

    #[test]
    fn index_stays_in_range_and_moves_by_one() {
        let mut c = StageController::new();
        // deterministic pseudo-random walk, biased to hit both ends
        let mut seed: u32 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let before = c.current().index() as i32;
            if (seed >> 16) % 3 == 0 { c.retreat(); } else { c.advance(); }
            let after = c.current().index() as i32;
            assert!((0..=9).contains(&after));
            assert!((after - before).abs() <= 1);
        }
    }

    #[test]
    fn advance_at_contact_is_a_no_op() {
        let mut c = StageController::new();
        for _ in 0..9 { c.advance(); }
        let before = c.state();
        assert_eq!(before.current, Stage::Contact);
        assert_eq!(c.advance(), None);
        assert_eq!(c.state(), before);
    }

    #[test]
    fn retreat_at_intro_is_a_no_op() {
        let mut c = StageController::new();
        assert_eq!(c.retreat(), None);
        assert_eq!(c.state(), NavigationState::initial());

        c.advance();
        c.retreat();
        let before = c.state();
        assert_eq!(c.retreat(), None);
        assert_eq!(c.state(), before);
    }

    #[test]
    fn direction_follows_last_move() {
        let mut c = StageController::new();
        c.advance();
        assert_eq!(c.direction(), Direction::Forward);
        c.advance();
        c.retreat();
        assert_eq!(c.direction(), Direction::Backward);
        c.advance();
        assert_eq!(c.direction(), Direction::Forward);
    }

    #[test]
    fn right_arrow_nine_times_reaches_contact() {
        let mut c = StageController::new();
        for _ in 0..9 {
            assert!(c.handle_key(KeyCode::Right).is_some());
        }
        assert_eq!(c.current(), Stage::Contact);
        assert_eq!(c.handle_key(KeyCode::Right), None);
        assert_eq!(c.current(), Stage::Contact);
    }

    #[test]
    fn left_arrow_from_contact() {
        let mut c = StageController::new();
        for _ in 0..9 { c.advance(); }
        let change = c.handle_key(KeyCode::Left).unwrap();
        assert_eq!(change, StageChange { from: Stage::Contact, to: Stage::PartyReview, direction: Direction::Backward });
        assert_eq!(c.current().index(), 8);
        assert_eq!(c.direction().sign(), -1);
    }

    #[test]
    fn space_advances_and_other_keys_are_ignored() {
        let mut c = StageController::new();
        assert!(c.handle_key(KeyCode::Char(' ')).is_some());
        assert_eq!(c.current(), Stage::Stats);
        for code in [KeyCode::Up, KeyCode::Down, KeyCode::Enter, KeyCode::Char('x')] {
            assert_eq!(c.handle_key(code), None);
        }
        assert_eq!(c.current(), Stage::Stats);
    }

    #[test]
    fn current_view_is_pure() {
        let mut c = StageController::new();
        for _ in 0..Stage::COUNT {
            let a = c.current_view() as *const StageContent;
            let b = c.current_view() as *const StageContent;
            assert_eq!(a, b);
            assert_eq!(c.current_view().stage(), c.current());
            c.advance();
        }
    }

    #[test]
    fn mount_registers_one_key_listener() {
        let mut sched = Scheduler::new(Duration::from_millis(16), Instant::now());
        let mut c = StageController::new();
        c.mount(&mut sched);
        c.mount(&mut sched);
        assert_eq!(sched.live_on(Channel::Key), 1);
        assert!(c.is_listening(&sched));

        c.unmount(&mut sched);
        assert_eq!(sched.live_on(Channel::Key), 0);
        assert!(!c.is_listening(&sched));

        // remount after unmount registers exactly one again
        c.mount(&mut sched);
        assert_eq!(sched.live_on(Channel::Key), 1);
    }
}
