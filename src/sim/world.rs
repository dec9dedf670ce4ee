/// Tour: everything the running application holds between frames.
///
/// Two independent components share the frame scheduler:
///   - the stage controller (+ its transition and progress bar)
///   - the starfield layer
/// They never read each other's state.
///
/// ## Viewport mapping
///
/// The starfield works in "sub-cell" space: `cols × rows*2`. Terminal
/// cells are about twice as tall as wide, so this keeps the projection
/// roughly square. The renderer maps `y / 2` back to a row.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::domain::content::StageContent;
use crate::domain::stage::Stage;
use crate::sim::event::TourEvent;
use crate::sim::nav::{command_for_key, NavCommand, StageChange, StageController};
use crate::sim::schedule::{Channel, Scheduler, Subscription};
use crate::sim::starfield::Starfield;
use crate::sim::transition::{SpringParams, Spring, Transition};

/// Sub-rows per terminal row in starfield space.
pub const SUB_ROWS: u16 = 2;

pub fn starfield_space(cols: u16, rows: u16) -> (f32, f32) {
    (cols as f32, rows as f32 * SUB_ROWS as f32)
}

/// Starfield plus the two subscriptions it holds while mounted.
pub struct StarfieldLayer {
    pub field: Starfield,
    frame_sub: Subscription,
    resize_sub: Subscription,
}

impl StarfieldLayer {
    pub fn mount(field: Starfield, scheduler: &mut Scheduler) -> Self {
        StarfieldLayer {
            field,
            frame_sub: scheduler.subscribe(Channel::Frame),
            resize_sub: scheduler.subscribe(Channel::Resize),
        }
    }

    pub fn unmount(self, scheduler: &mut Scheduler) {
        scheduler.unsubscribe(self.frame_sub);
        scheduler.unsubscribe(self.resize_sub);
    }
}

/// Clickable region recorded by the renderer for the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hitbox {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
    pub command: NavCommand,
}

impl Hitbox {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col
            && row >= self.row
            && col < self.col.saturating_add(self.width)
            && row < self.row.saturating_add(self.height)
    }
}

pub struct Tour {
    pub scheduler: Scheduler,
    pub controller: StageController,
    pub transition: Transition,
    pub progress: Spring,
    pub starfield: Option<StarfieldLayer>,
    pub hitboxes: Vec<Hitbox>,
    pub help_visible: bool,
    /// Rows of the current stage scrolled off the top. The renderer
    /// clamps it to the content height.
    pub scroll: u16,
    pub anim_tick: u64,
    spring: SpringParams,
    frame_dt: f32,
    frame_sub: Option<Subscription>,
}

fn progress_fraction(stage: Stage) -> f32 {
    (stage.index() + 1) as f32 / Stage::COUNT as f32
}

impl Tour {
    pub fn mount(config: &AppConfig, cols: u16, rows: u16, now: Instant) -> Self {
        let interval = Duration::from_secs_f64(1.0 / config.display.fps as f64);
        let mut scheduler = Scheduler::new(interval, now);

        let mut controller = StageController::new();
        controller.mount(&mut scheduler);
        let frame_sub = Some(scheduler.subscribe(Channel::Frame));

        let spring = SpringParams {
            stiffness: config.transition.stiffness,
            damping: config.transition.damping,
        };
        let start = controller.current();

        let starfield = if config.starfield.enabled {
            let (w, h) = starfield_space(cols, rows);
            let field = Starfield::new(
                config.starfield.count,
                w,
                h,
                config.starfield.speed,
                config.starfield.seed,
            );
            Some(StarfieldLayer::mount(field, &mut scheduler))
        } else {
            None
        };

        let frame_dt = scheduler.frame_interval().as_secs_f32();
        let stars = starfield.as_ref().map_or(0, |l| l.field.len());
        info!(cols, rows, stars, "tour mounted");

        Tour {
            scheduler,
            controller,
            transition: Transition::settled(start, spring),
            progress: Spring::at(progress_fraction(start)),
            starfield,
            hitboxes: Vec::new(),
            help_visible: false,
            scroll: 0,
            anim_tick: 0,
            spring,
            frame_dt,
            frame_sub,
        }
    }

    /// Release every subscription. Safe to call more than once.
    pub fn unmount(&mut self) {
        self.controller.unmount(&mut self.scheduler);
        if let Some(sub) = self.frame_sub.take() {
            self.scheduler.unsubscribe(sub);
        }
        if let Some(layer) = self.starfield.take() {
            layer.unmount(&mut self.scheduler);
        }
        self.hitboxes.clear();
        info!(live = self.scheduler.live_count(), "tour unmounted");
    }

    pub fn current(&self) -> Stage {
        self.controller.current()
    }

    pub fn current_view(&self) -> &'static StageContent {
        self.controller.current_view()
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Vec<TourEvent> {
        if !self.controller.is_listening(&self.scheduler) {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        match self.controller.handle_key(code) {
            Some(change) => self.on_stage_change(change, &mut events),
            // a navigation key that changed nothing hit a boundary
            None => {
                if let Some(cmd) = command_for_key(code) {
                    events.push(TourEvent::Bumped {
                        at: self.controller.current(),
                        direction: cmd.direction(),
                    });
                }
            }
        }
        events
    }

    pub fn navigate(&mut self, cmd: NavCommand) -> Vec<TourEvent> {
        let mut events = Vec::with_capacity(2);
        match self.controller.apply(cmd) {
            Some(change) => self.on_stage_change(change, &mut events),
            None => events.push(TourEvent::Bumped {
                at: self.controller.current(),
                direction: cmd.direction(),
            }),
        }
        events
    }

    /// Pointer press at a terminal cell. Only hit boxes recorded by the
    /// last render respond.
    pub fn click(&mut self, col: u16, row: u16) -> Vec<TourEvent> {
        let hit = self.hitboxes.iter().find(|h| h.contains(col, row)).map(|h| h.command);
        match hit {
            Some(cmd) => self.navigate(cmd),
            None => Vec::new(),
        }
    }

    fn on_stage_change(&mut self, change: StageChange, events: &mut Vec<TourEvent>) {
        self.transition.begin(change.to, change.direction);
        self.progress.target = progress_fraction(change.to);
        self.hitboxes.clear();
        self.scroll = 0;
        events.push(TourEvent::StageChanged {
            from: change.from,
            to: change.to,
            direction: change.direction,
        });
        if change.to == Stage::LAST {
            events.push(TourEvent::GameClear);
        }
    }

    /// Scroll the current stage's content. Never affects navigation.
    pub fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll as i32 + delta).clamp(0, u16::MAX as i32);
        self.scroll = next as u16;
        self.hitboxes.clear();
    }

    /// Viewport changed. Dimensions only; particles keep their place.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if let Some(layer) = self.starfield.as_mut() {
            if self.scheduler.is_live(&layer.resize_sub) {
                let (w, h) = starfield_space(cols, rows);
                layer.field.resize(w, h);
                debug!(cols, rows, "starfield resized");
            }
        }
        self.hitboxes.clear();
    }

    pub fn frame_due(&mut self, now: Instant) -> bool {
        self.scheduler.frame_due(now)
    }

    pub fn until_next_frame(&self, now: Instant) -> Duration {
        self.scheduler.until_next_frame(now)
    }

    /// One frame of work for every live frame subscriber.
    pub fn frame(&mut self) {
        self.anim_tick = self.anim_tick.wrapping_add(1);

        if self.frame_sub.as_ref().is_some_and(|s| self.scheduler.is_live(s)) {
            self.transition.step(self.frame_dt);
            self.progress.step(self.frame_dt, self.spring);
        }

        if let Some(layer) = self.starfield.as_mut() {
            if self.scheduler.is_live(&layer.frame_sub) {
                layer.field.step();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::nav::Direction;

    fn config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.starfield.seed = Some(99);
        cfg
    }

    fn tour() -> Tour {
        Tour::mount(&config(), 80, 24, Instant::now())
    }

    #[test]
    fn mount_and_unmount_balance_subscriptions() {
        let mut t = tour();
        assert_eq!(t.scheduler.live_on(Channel::Key), 1);
        assert_eq!(t.scheduler.live_on(Channel::Resize), 1);
        assert_eq!(t.scheduler.live_on(Channel::Frame), 2);
        t.unmount();
        assert_eq!(t.scheduler.live_count(), 0);
        assert!(t.starfield.is_none());
        t.unmount();
        assert_eq!(t.scheduler.live_count(), 0);
    }

    #[test]
    fn keys_ignored_after_unmount() {
        let mut t = tour();
        t.unmount();
        assert!(t.handle_key(KeyCode::Right).is_empty());
        assert_eq!(t.current(), Stage::Intro);
    }

    #[test]
    fn full_tour_by_keyboard() {
        let mut t = tour();
        let mut cleared = 0;
        for _ in 0..9 {
            let ev = t.handle_key(KeyCode::Right);
            cleared += ev.iter().filter(|e| **e == TourEvent::GameClear).count();
        }
        assert_eq!(t.current(), Stage::Contact);
        assert_eq!(cleared, 1);

        let ev = t.handle_key(KeyCode::Right);
        assert_eq!(ev, vec![TourEvent::Bumped { at: Stage::Contact, direction: Direction::Forward }]);
        assert_eq!(t.current(), Stage::Contact);

        let ev = t.handle_key(KeyCode::Left);
        assert_eq!(
            ev,
            vec![TourEvent::StageChanged {
                from: Stage::Contact,
                to: Stage::PartyReview,
                direction: Direction::Backward,
            }]
        );
    }

    #[test]
    fn keys_go_through_the_controller() {
        let mut t = tour();
        assert!(t.handle_key(KeyCode::Char('x')).is_empty());
        assert_eq!(
            t.handle_key(KeyCode::Left),
            vec![TourEvent::Bumped { at: Stage::Intro, direction: Direction::Backward }]
        );
        let ev = t.handle_key(KeyCode::Char(' '));
        assert!(matches!(ev[0], TourEvent::StageChanged { to: Stage::Stats, .. }));
        assert_eq!(t.current_view().stage(), Stage::Stats);
        assert_eq!(t.transition.entering().stage, t.current());
    }

    #[test]
    fn navigation_starts_a_transition() {
        let mut t = tour();
        assert!(!t.transition.in_flight());
        t.navigate(NavCommand::Advance);
        assert!(t.transition.in_flight());
        assert_eq!(t.transition.entering().stage, Stage::Stats);
        for _ in 0..240 { t.frame(); }
        assert!(!t.transition.in_flight());
        assert!((t.progress.value - 0.2).abs() < 1e-6);
    }

    #[test]
    fn resize_updates_dimensions_only() {
        let mut t = tour();
        let before = t.starfield.as_ref().unwrap().field.stars().to_vec();
        t.resize(100, 30);
        let layer = t.starfield.as_ref().unwrap();
        assert_eq!(layer.field.dimensions(), (100.0, 60.0));
        assert_eq!(layer.field.stars(), &before[..]);
    }

    #[test]
    fn starfield_and_navigation_are_independent() {
        let mut t = tour();
        let before = t.starfield.as_ref().unwrap().field.stars().to_vec();
        t.navigate(NavCommand::Advance);
        t.navigate(NavCommand::Retreat);
        assert_eq!(t.starfield.as_ref().unwrap().field.stars(), &before[..]);
    }

    #[test]
    fn clicks_only_hit_recorded_boxes() {
        let mut t = tour();
        assert!(t.click(5, 5).is_empty());
        t.hitboxes.push(Hitbox { col: 70, row: 22, width: 3, height: 1, command: NavCommand::Advance });
        assert!(t.click(69, 22).is_empty());
        let ev = t.click(71, 22);
        assert!(matches!(ev[0], TourEvent::StageChanged { to: Stage::Stats, .. }));
        // a stage change invalidates the old layout
        assert!(t.hitboxes.is_empty());
    }

    #[test]
    fn scroll_resets_on_stage_change() {
        let mut t = tour();
        t.scroll_by(-3);
        assert_eq!(t.scroll, 0);
        t.scroll_by(5);
        assert_eq!(t.scroll, 5);
        t.navigate(NavCommand::Retreat);
        assert_eq!(t.scroll, 5, "a bump keeps the page where it was");
        t.navigate(NavCommand::Advance);
        assert_eq!(t.scroll, 0);
    }

    #[test]
    fn disabled_starfield_holds_no_subscriptions() {
        let mut cfg = config();
        cfg.starfield.enabled = false;
        let mut t = Tour::mount(&cfg, 80, 24, Instant::now());
        assert!(t.starfield.is_none());
        assert_eq!(t.scheduler.live_on(Channel::Resize), 0);
        t.unmount();
        assert_eq!(t.scheduler.live_count(), 0);
    }
}
