/// Stage transition: spring-driven slide + fade between content blocks.
///
/// Two layers at most:
///   - `entering`: the stage now current, sliding toward the centre
///   - `exiting`:  the stage just left, sliding off and fading out
///
/// Forward moves enter from +x and exit toward −x; backward moves mirror.
/// A new `begin` while a transition is running supersedes it: the layer
/// that was entering becomes the exiting one *from wherever it is now*,
/// velocity included, so nothing jumps. If the target is the stage still
/// fading out, that layer turns around and becomes the entering one.

use crate::domain::stage::Stage;
use crate::sim::nav::Direction;

/// Largest integration step. Keeps the stiff default spring stable.
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

const REST_DELTA: f32 = 0.001;
const REST_SPEED: f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        SpringParams { stiffness: 300.0, damping: 30.0 }
    }
}

/// Damped spring with unit mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
}

impl Spring {
    pub fn at(value: f32) -> Self {
        Spring { value, velocity: 0.0, target: value }
    }

    pub fn toward(value: f32, target: f32) -> Self {
        Spring { value, velocity: 0.0, target }
    }

    pub fn step(&mut self, dt: f32, p: SpringParams) {
        if dt <= 0.0 || self.at_rest() {
            return;
        }
        let steps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        for _ in 0..steps {
            let accel = -p.stiffness * (self.value - self.target) - p.damping * self.velocity;
            self.velocity += accel * h;
            self.value += self.velocity * h;
        }
        if self.at_rest() {
            self.settle();
        }
    }

    pub fn at_rest(&self) -> bool {
        (self.value - self.target).abs() < REST_DELTA && self.velocity.abs() < REST_SPEED
    }

    pub fn settle(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }
}

/// One animated content block. `x` is in content widths (1.0 = one full
/// width to the right of centre).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    pub stage: Stage,
    pub x: Spring,
    pub opacity: Spring,
}

impl Layer {
    fn centred(stage: Stage) -> Self {
        Layer { stage, x: Spring::at(0.0), opacity: Spring::at(1.0) }
    }

    fn step(&mut self, dt: f32, p: SpringParams) {
        self.x.step(dt, p);
        self.opacity.step(dt, p);
    }

    pub fn at_rest(&self) -> bool {
        self.x.at_rest() && self.opacity.at_rest()
    }

    /// Opacity clamped for drawing (the spring may overshoot).
    pub fn alpha(&self) -> f32 {
        self.opacity.value.clamp(0.0, 1.0)
    }
}

pub struct Transition {
    params: SpringParams,
    entering: Layer,
    exiting: Option<Layer>,
}

impl Transition {
    /// Mount state: content already in place, no entrance animation.
    pub fn settled(stage: Stage, params: SpringParams) -> Self {
        Transition { params, entering: Layer::centred(stage), exiting: None }
    }

    pub fn begin(&mut self, to: Stage, direction: Direction) {
        let side = direction.sign() as f32;

        // reversing mid-flight brings the still-visible layer back
        let returning = self.exiting.take().filter(|l| l.stage == to);

        let mut leaving = self.entering;
        leaving.x.target = -side;
        leaving.opacity.target = 0.0;
        // any older exiting layer is superseded
        self.exiting = Some(leaving);

        self.entering = match returning {
            Some(mut layer) => {
                layer.x.target = 0.0;
                layer.opacity.target = 1.0;
                layer
            }
            None => Layer {
                stage: to,
                x: Spring::toward(side, 0.0),
                opacity: Spring::toward(0.0, 1.0),
            },
        };
    }

    pub fn step(&mut self, dt: f32) {
        self.entering.step(dt, self.params);
        if let Some(layer) = self.exiting.as_mut() {
            layer.step(dt, self.params);
            if layer.at_rest() {
                self.exiting = None;
            }
        }
    }

    pub fn in_flight(&self) -> bool {
        self.exiting.is_some() || !self.entering.at_rest()
    }

    pub fn entering(&self) -> &Layer {
        &self.entering
    }

    #[cfg(test)]
    pub fn exiting(&self) -> Option<&Layer> {
        self.exiting.as_ref()
    }

    /// Draw order: exiting below, entering on top.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.exiting.iter().chain(std::iter::once(&self.entering))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(t: &mut Transition, frames: usize) {
        for _ in 0..frames { t.step(DT); }
    }

    #[test]
    fn spring_converges_to_target() {
        let mut s = Spring::toward(1.0, 0.0);
        for _ in 0..120 { s.step(DT, SpringParams::default()); }
        assert!(s.at_rest());
        assert_eq!(s.value, 0.0);
    }

    #[test]
    fn settled_has_nothing_in_flight() {
        let t = Transition::settled(Stage::Intro, SpringParams::default());
        assert!(!t.in_flight());
        assert_eq!(t.layers().count(), 1);
        assert_eq!(t.entering().alpha(), 1.0);
    }

    #[test]
    fn forward_enters_from_positive_side() {
        let mut t = Transition::settled(Stage::Intro, SpringParams::default());
        t.begin(Stage::Stats, Direction::Forward);

        let e = t.entering();
        assert_eq!(e.stage, Stage::Stats);
        assert_eq!((e.x.value, e.x.target), (1.0, 0.0));
        assert_eq!((e.opacity.value, e.opacity.target), (0.0, 1.0));

        let x = t.exiting().unwrap();
        assert_eq!(x.stage, Stage::Intro);
        assert_eq!((x.x.value, x.x.target), (0.0, -1.0));
        assert_eq!((x.opacity.value, x.opacity.target), (1.0, 0.0));
    }

    #[test]
    fn backward_is_mirrored() {
        let mut t = Transition::settled(Stage::Stats, SpringParams::default());
        t.begin(Stage::Intro, Direction::Backward);
        assert_eq!(t.entering().x.value, -1.0);
        assert_eq!(t.exiting().unwrap().x.target, 1.0);
    }

    #[test]
    fn transition_completes() {
        let mut t = Transition::settled(Stage::Intro, SpringParams::default());
        t.begin(Stage::Stats, Direction::Forward);
        assert!(t.in_flight());
        run(&mut t, 240);
        assert!(!t.in_flight());
        assert!(t.exiting().is_none());
        assert_eq!(t.entering().x.value, 0.0);
        assert_eq!(t.entering().opacity.value, 1.0);
    }

    #[test]
    fn supersede_starts_from_current_visual_state() {
        let mut t = Transition::settled(Stage::Intro, SpringParams::default());
        t.begin(Stage::Stats, Direction::Forward);
        run(&mut t, 5);
        let mid = *t.entering();
        assert!(mid.x.value > 0.0 && mid.x.value < 1.0);

        t.begin(Stage::Origin, Direction::Forward);
        let leaving = t.exiting().unwrap();
        assert_eq!(leaving.stage, Stage::Stats);
        assert_eq!(leaving.x.value, mid.x.value);
        assert_eq!(leaving.x.velocity, mid.x.velocity);
        assert_eq!(leaving.opacity.value, mid.opacity.value);
        // only one transition: the Intro layer is gone
        assert_eq!(t.layers().count(), 2);
        assert!(t.layers().all(|l| l.stage != Stage::Intro));
    }

    #[test]
    fn reversing_mid_flight_keeps_the_visible_layer() {
        let mut t = Transition::settled(Stage::Intro, SpringParams::default());
        t.begin(Stage::Stats, Direction::Forward);
        run(&mut t, 5);
        let fading = *t.exiting().unwrap();
        assert_eq!(fading.stage, Stage::Intro);
        assert!(fading.x.value < 0.0 && fading.alpha() > 0.0);

        t.begin(Stage::Intro, Direction::Backward);
        let back = t.entering();
        assert_eq!(back.stage, Stage::Intro);
        assert_eq!(back.x.value, fading.x.value);
        assert_eq!(back.x.velocity, fading.x.velocity);
        assert_eq!(back.opacity.value, fading.opacity.value);
        assert_eq!((back.x.target, back.opacity.target), (0.0, 1.0));
        assert_eq!(t.exiting().unwrap().stage, Stage::Stats);

        run(&mut t, 240);
        assert!(!t.in_flight());
        assert_eq!(t.entering().x.value, 0.0);
    }
}
