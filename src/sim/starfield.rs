/// Starfield: a fixed pool of particles flying toward the viewer.
///
/// Each particle has a lateral position `(x, y)` in viewport space and a
/// depth `z` in `(0, w]`. Every frame `z` shrinks by `speed`; a particle
/// that reaches the viewer is recycled in place at `z = w` with a fresh
/// random `(x, y)`. The pool never grows or shrinks.
///
/// Projection (pinhole camera, centred on the viewport):
///   sx = (x − w/2) · (w / z) + w/2
///   sy = (y − h/2) · (w / z) + h/2
/// Size and alpha both follow proximity `1 − z/w`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_STAR_COUNT: usize = 800;
pub const DEFAULT_SPEED: f32 = 0.5;
pub const MAX_STAR_SIZE: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A particle's screen-space footprint for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedStar {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub alpha: f32,
}

/// `1 − z/w`, clamped to `[0, 1]`.
pub fn proximity(z: f32, w: f32) -> f32 {
    if w <= 0.0 {
        return 0.0;
    }
    (1.0 - z / w).clamp(0.0, 1.0)
}

pub fn star_size(z: f32, w: f32) -> f32 {
    proximity(z, w) * MAX_STAR_SIZE
}

pub fn star_alpha(z: f32, w: f32) -> f32 {
    proximity(z, w)
}

/// Uniform sample in `[0, upper)`, or 0 for an empty range.
fn sample<R: Rng>(rng: &mut R, upper: f32) -> f32 {
    if upper > 0.0 {
        rng.random_range(0.0..upper)
    } else {
        0.0
    }
}

pub struct Starfield<R = StdRng> {
    stars: Vec<Star>,
    width: f32,
    height: f32,
    speed: f32,
    rng: R,
}

impl Starfield<StdRng> {
    /// Seeded from the OS unless a fixed seed is given.
    pub fn new(count: usize, width: f32, height: f32, speed: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Starfield::with_rng(count, width, height, speed, rng)
    }
}

impl<R: Rng> Starfield<R> {
    pub fn with_rng(count: usize, width: f32, height: f32, speed: f32, mut rng: R) -> Self {
        let mut stars = Vec::with_capacity(count);
        for _ in 0..count {
            let x = sample(&mut rng, width);
            let y = sample(&mut rng, height);
            // (0, w] rather than [0, w): a star is never spawned at the eye
            let z = width - sample(&mut rng, width);
            stars.push(Star { x, y, z });
        }
        Starfield { stars, width, height, speed, rng }
    }

    #[cfg(test)]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    #[cfg(test)]
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Advance one frame. A zero-sized viewport freezes the field.
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        if w <= 0.0 {
            return;
        }
        for star in &mut self.stars {
            star.z -= self.speed;
            if star.z <= 0.0 {
                star.z = w;
                star.x = sample(&mut self.rng, w);
                star.y = sample(&mut self.rng, h);
            } else if star.z > w {
                // viewport shrank since this star spawned
                star.z = w;
            }
        }
    }

    /// Adopt new viewport dimensions. Particles are left exactly as they are.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Screen position, size and alpha, or `None` when off-screen.
    pub fn project(&self, star: &Star) -> Option<ProjectedStar> {
        let (w, h) = (self.width, self.height);
        if w <= 0.0 || h <= 0.0 || star.z <= 0.0 {
            return None;
        }
        let k = w / star.z;
        let x = (star.x - w / 2.0) * k + w / 2.0;
        let y = (star.y - h / 2.0) * k + h / 2.0;
        if x < 0.0 || x >= w || y < 0.0 || y >= h {
            return None;
        }
        Some(ProjectedStar {
            x,
            y,
            size: star_size(star.z, w),
            alpha: star_alpha(star.z, w),
        })
    }

    pub fn visible(&self) -> impl Iterator<Item = ProjectedStar> + '_ {
        self.stars.iter().filter_map(|s| self.project(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(count: usize, w: f32, h: f32) -> Starfield {
        Starfield::new(count, w, h, DEFAULT_SPEED, Some(0x5eed))
    }

    #[test]
    fn pool_has_requested_size_and_depth_range() {
        let f = field(DEFAULT_STAR_COUNT, 160.0, 96.0);
        assert_eq!(f.len(), 800);
        for s in f.stars() {
            assert!(s.z > 0.0 && s.z <= 160.0, "z = {}", s.z);
            assert!(s.x >= 0.0 && s.x < 160.0);
            assert!(s.y >= 0.0 && s.y < 96.0);
        }
    }

    #[test]
    fn depth_stays_in_range_across_many_steps() {
        let mut f = field(200, 40.0, 20.0);
        for _ in 0..2_000 {
            f.step();
            for s in f.stars() {
                assert!(s.z > 0.0 && s.z <= 40.0, "z = {}", s.z);
            }
        }
        assert_eq!(f.len(), 200);
    }

    #[test]
    fn recycle_resets_depth_to_width() {
        let star = Star { x: 1.0, y: 1.0, z: 0.25 };
        let mut f = Starfield::with_rng(0, 50.0, 30.0, DEFAULT_SPEED, StdRng::seed_from_u64(1));
        f.stars.push(star);
        f.step();
        let s = f.stars()[0];
        assert_eq!(s.z, 50.0);
        assert!(s.x >= 0.0 && s.x < 50.0);
        assert!(s.y >= 0.0 && s.y < 30.0);
    }

    #[test]
    fn resize_leaves_particles_untouched() {
        let mut f = field(100, 120.0, 60.0);
        f.step();
        let before: Vec<Star> = f.stars().to_vec();
        f.resize(80.0, 40.0);
        assert_eq!(f.dimensions(), (80.0, 40.0));
        assert_eq!(f.stars(), &before[..]);
    }

    #[test]
    fn shrink_then_step_restores_depth_invariant() {
        let mut f = field(100, 120.0, 60.0);
        f.resize(30.0, 15.0);
        f.step();
        for s in f.stars() {
            assert!(s.z > 0.0 && s.z <= 30.0);
        }
    }

    #[test]
    fn size_and_alpha_follow_proximity() {
        let w = 100.0;
        assert_eq!(star_size(w, w), 0.0);
        assert_eq!(star_alpha(w, w), 0.0);
        assert!((star_size(1e-4, w) - 2.0).abs() < 1e-3);
        assert!((star_alpha(1e-4, w) - 1.0).abs() < 1e-3);

        let mut prev = (f32::INFINITY, f32::INFINITY);
        for i in 1..=100 {
            let z = i as f32;
            let now = (star_size(z, w), star_alpha(z, w));
            assert!(now.0 <= prev.0 && now.1 <= prev.1);
            prev = now;
        }
    }

    #[test]
    fn centre_projects_to_centre() {
        let f = field(0, 100.0, 50.0);
        let p = f.project(&Star { x: 50.0, y: 25.0, z: 10.0 }).unwrap();
        assert_eq!((p.x, p.y), (50.0, 25.0));
        assert!((p.alpha - 0.9).abs() < 1e-6);
    }

    #[test]
    fn close_stars_off_centre_leave_the_screen() {
        let f = field(0, 100.0, 50.0);
        // (10 - 50) * (100 / 1) + 50 is far off to the left
        assert_eq!(f.project(&Star { x: 10.0, y: 25.0, z: 1.0 }), None);
        assert!(f.visible().next().is_none());
    }

    #[test]
    fn zero_viewport_is_inert() {
        let mut f = field(10, 0.0, 0.0);
        assert_eq!(f.len(), 10);
        let before: Vec<Star> = f.stars().to_vec();
        f.step();
        assert_eq!(f.stars(), &before[..]);
        assert_eq!(f.visible().count(), 0);
    }
}
