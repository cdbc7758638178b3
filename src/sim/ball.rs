//! The ball: kinematic state plus the effects it leaves behind

use std::rc::Rc;

use glam::Vec2;
use rand::Rng;

use super::arena::Arena;
use super::collision::{ball_boundary_collision, reflect_with_losses};
use super::trail::TrailManager;
use crate::polar_to_cartesian;
use crate::renderer::{Rgb, Surface};
use crate::settings::{PhysicsParams, Settings, TrailParams};

/// A ball confined to an arena
///
/// The arena is shared (`Rc`) so it outlives every ball placed in it; the
/// trail manager is owned and lives exactly as long as the ball.
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Grows toward `arena.radius * max_ratio`, never shrinks
    pub radius: f32,
    color_index: usize,
    arena: Rc<Arena>,
    palette: Rc<[Rgb]>,
    params: PhysicsParams,
    pub trails: TrailManager,
    /// Set once the radius reaches its cap
    at_max_radius: bool,
}

impl Ball {
    /// Spawn above center with a random horizontal launch and a fixed upward bias
    pub fn new(arena: Rc<Arena>, settings: &Settings, rng: &mut impl Rng) -> Self {
        let params = settings.physics;
        let angle = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
        let launch = polar_to_cartesian(params.initial_speed, angle);

        let pos = arena.center - Vec2::new(0.0, arena.radius * params.start_height_ratio);
        let vel = Vec2::new(launch.x, params.initial_vy);

        log::debug!(
            "Launching ball at ({:.1}, {:.1}) angle {:.3} rad vel ({:.1}, {:.1})",
            pos.x,
            pos.y,
            angle,
            vel.x,
            vel.y
        );

        Self::with_state(
            arena,
            pos,
            vel,
            params,
            settings.trail,
            Rc::from(settings.palette.as_slice()),
        )
    }

    /// Build a ball with explicit kinematics
    pub fn with_state(
        arena: Rc<Arena>,
        pos: Vec2,
        vel: Vec2,
        params: PhysicsParams,
        trail: TrailParams,
        palette: Rc<[Rgb]>,
    ) -> Self {
        assert!(
            params.base_radius < arena.radius,
            "ball radius {} must be smaller than arena radius {}",
            params.base_radius,
            arena.radius
        );
        assert!(!palette.is_empty(), "palette must not be empty");

        Self {
            pos,
            vel,
            radius: params.base_radius,
            color_index: 0,
            arena,
            palette,
            params,
            trails: TrailManager::new(trail),
            at_max_radius: false,
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn color(&self) -> Rgb {
        self.palette[self.color_index]
    }

    /// Advance to the next palette color, wrapping around
    pub fn cycle_color(&mut self) {
        self.color_index = (self.color_index + 1) % self.palette.len();
    }

    /// Largest radius the ball may grow to
    pub fn max_radius(&self) -> f32 {
        self.arena.radius * self.params.max_ratio
    }

    /// Advance one frame; returns the number of wall bounces this frame
    pub fn update(&mut self, dt: f32) -> u32 {
        let params = self.params;

        // Gravity, then air friction once per frame, not dt-scaled
        self.vel.y += params.gravity * dt;
        self.vel *= params.linear_friction;

        // Explicit Euler
        self.pos += self.vel * dt;

        let target_max = self.max_radius();
        if self.radius < target_max {
            self.radius = (self.radius + params.growth_per_sec * dt).min(target_max);
            if self.radius >= target_max && !self.at_max_radius {
                self.at_max_radius = true;
                log::info!("Ball reached maximum radius {:.1}", self.radius);
            }
        }

        let mut bounces = 0;
        let collision = ball_boundary_collision(self.pos, self.radius, &self.arena);
        if collision.hit {
            let speed_before = self.vel.length();
            self.pos = collision.point;
            self.vel = reflect_with_losses(
                self.vel,
                collision.normal,
                params.restitution,
                params.tangential_friction,
            );

            // Flash keeps the color the ball had when it hit
            self.trails.add_impact(self.pos, self.color());
            self.cycle_color();
            bounces += 1;

            log::debug!(
                "Bounce at ({:.1}, {:.1}) depth {:.2} speed {:.1} -> {:.1}, color {}",
                self.pos.x,
                self.pos.y,
                collision.penetration,
                speed_before,
                self.vel.length(),
                self.color_index
            );
        }

        self.trails.push_position(self.pos);
        self.trails.update(dt);

        bounces
    }

    /// Draw impact flashes and trail, then the ball on top
    pub fn draw(&self, surface: &mut impl Surface) {
        let color = self.color();
        self.trails.draw(surface, self.pos, color);
        surface.draw_filled_circle(self.pos, self.radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 120.0;

    fn arena() -> Rc<Arena> {
        Rc::new(Arena::new(Vec2::new(400.0, 300.0), 250.0))
    }

    fn lossless() -> PhysicsParams {
        PhysicsParams {
            gravity: 200.0,
            linear_friction: 1.0,
            restitution: 1.0,
            tangential_friction: 1.0,
            growth_per_sec: 0.0,
            ..Default::default()
        }
    }

    fn ball_at(pos: Vec2, vel: Vec2, params: PhysicsParams) -> Ball {
        Ball::with_state(
            arena(),
            pos,
            vel,
            params,
            TrailParams::default(),
            Rc::from(&PALETTE[..]),
        )
    }

    fn dist_from_center(ball: &Ball) -> f32 {
        (ball.pos - ball.arena().center).length()
    }

    #[test]
    fn test_new_spawns_above_center() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(12345);
        let ball = Ball::new(arena(), &settings, &mut rng);

        assert_eq!(ball.pos, Vec2::new(400.0, 175.0));
        assert_eq!(ball.vel.y, INITIAL_VY);
        assert!(ball.vel.x.abs() <= INITIAL_SPEED);
        assert_eq!(ball.radius, BALL_BASE_RADIUS);
        assert_eq!(ball.color_index(), 0);
        assert_eq!(ball.color(), PALETTE[0]);
    }

    #[test]
    fn test_new_is_deterministic_per_seed() {
        let settings = Settings::default();
        let a = Ball::new(arena(), &settings, &mut Pcg32::seed_from_u64(7));
        let b = Ball::new(arena(), &settings, &mut Pcg32::seed_from_u64(7));
        assert_eq!(a.vel, b.vel);
    }

    #[test]
    fn test_gravity_only_first_frame() {
        let center = Vec2::new(400.0, 300.0);
        let mut ball = ball_at(center, Vec2::ZERO, lossless());

        let bounces = ball.update(DT);

        assert_eq!(bounces, 0);
        assert_eq!(ball.vel.x, 0.0);
        assert!((ball.vel.y - 200.0 * DT).abs() < 1e-6);
        assert!((ball.pos.y - (300.0 + 200.0 * DT * DT)).abs() < 1e-4);
        assert_eq!(ball.pos.x, 400.0);
        assert!(ball.trails.impacts().is_empty());
        assert_eq!(ball.trails.motion_trail().len(), 1);
    }

    #[test]
    fn test_linear_friction_is_per_frame() {
        let params = PhysicsParams {
            gravity: 0.0,
            linear_friction: 0.5,
            growth_per_sec: 0.0,
            ..Default::default()
        };
        let mut a = ball_at(Vec2::new(400.0, 300.0), Vec2::new(10.0, 0.0), params);
        let mut b = a.clone();

        // Same decay per call regardless of dt
        a.update(0.001);
        b.update(0.01);
        assert_eq!(a.vel.x, 5.0);
        assert_eq!(b.vel.x, 5.0);
    }

    #[test]
    fn test_lossless_bounce_preserves_speed() {
        let params = lossless();
        let mut ball = ball_at(Vec2::new(400.0, 300.0), Vec2::new(0.0, -150.0), params);

        let mut bounced = false;
        for _ in 0..(120 * 10) {
            // Velocity right before the wall check this frame
            let pre = (ball.vel + Vec2::new(0.0, params.gravity * DT)) * params.linear_friction;
            if ball.update(DT) > 0 {
                assert!((ball.vel.length() - pre.length()).abs() < 1e-2);
                bounced = true;
                break;
            }
        }
        assert!(bounced, "ball never reached the wall");
        assert!(dist_from_center(&ball) <= 250.0 - ball.radius + 1e-3);
    }

    #[test]
    fn test_bounce_reflects_and_records_impact() {
        let params = PhysicsParams {
            gravity: 0.0,
            linear_friction: 1.0,
            growth_per_sec: 0.0,
            ..Default::default()
        };
        // One frame from crossing the bottom of the allowed circle (y = 535)
        let mut ball = ball_at(Vec2::new(400.0, 534.0), Vec2::new(0.0, 240.0), params);

        assert_eq!(ball.update(DT), 1);

        assert!((ball.pos - Vec2::new(400.0, 535.0)).length() < 1e-3);
        assert!((ball.vel.y - (-240.0 * RESTITUTION)).abs() < 1e-3);
        assert_eq!(ball.trails.impacts().len(), 1);
        let impact = ball.trails.impacts()[0];
        assert_eq!(impact.color, PALETTE[0]);
        assert_eq!(impact.position, ball.pos);
        assert_eq!(ball.color_index(), 1);
        assert_eq!(ball.trails.motion_trail().newest(), Some(ball.pos));
    }

    #[test]
    fn test_bounce_energy_split() {
        let params = PhysicsParams {
            gravity: 0.0,
            linear_friction: 1.0,
            growth_per_sec: 0.0,
            ..Default::default()
        };
        // Moving down and sideways into the bottom of the wall
        let mut ball = ball_at(Vec2::new(400.0, 534.5), Vec2::new(60.0, 240.0), params);
        let v_before = ball.vel;
        assert_eq!(ball.update(DT), 1);

        let normal = (ball.pos - ball.arena().center).normalize();
        let vn_before = v_before.dot(normal);
        let vt_before = (v_before - vn_before * normal).length();
        let vn_after = ball.vel.dot(normal);
        let vt_after = (ball.vel - vn_after * normal).length();

        assert!((vn_after.abs() - vn_before.abs() * RESTITUTION).abs() < 1e-2);
        assert!((vt_after - vt_before * TANGENTIAL_FRICTION).abs() < 1e-2);
        assert!(vn_after < 0.0);
    }

    #[test]
    fn test_radius_grows_to_cap() {
        let params = PhysicsParams {
            growth_per_sec: 1000.0,
            ..Default::default()
        };
        let mut ball = ball_at(Vec2::new(400.0, 300.0), Vec2::ZERO, params);
        let cap = ball.max_radius();
        assert!((cap - 200.0).abs() < 1e-3);

        let mut last = ball.radius;
        for _ in 0..120 {
            ball.update(DT);
            assert!(ball.radius >= last);
            assert!(ball.radius <= cap);
            last = ball.radius;
        }
        assert_eq!(ball.radius, cap);
    }

    #[test]
    fn test_containment_and_color_cycle_long_run() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut ball = Ball::new(arena(), &settings, &mut rng);

        let mut total_bounces = 0u32;
        let mut last_radius = ball.radius;
        for _ in 0..(120 * 60) {
            total_bounces += ball.update(DT);
            assert!(dist_from_center(&ball) <= 250.0 - ball.radius + 1e-3);
            assert!(ball.radius >= last_radius);
            assert!(ball.radius <= 250.0 * BALL_MAX_RATIO);
            last_radius = ball.radius;
        }

        assert!(total_bounces > 0);
        assert_eq!(ball.color_index(), total_bounces as usize % PALETTE.len());
        assert_eq!(ball.trails.motion_trail().len(), TRAIL_LEN);
    }

    #[test]
    fn test_draw_order() {
        #[derive(Default)]
        struct CallLog(Vec<&'static str>);
        impl Surface for CallLog {
            fn draw_circle_outline(&mut self, _: Vec2, _: f32, _: f32, _: Rgb) {
                self.0.push("outline");
            }
            fn draw_filled_circle(&mut self, _: Vec2, _: f32, _: Rgb) {
                self.0.push("fill");
            }
            fn draw_line(&mut self, _: Vec2, _: Vec2, _: Rgb, alpha: u8, _: f32) {
                self.0.push(if alpha == 255 { "impact" } else { "trail" });
            }
        }

        let mut ball = ball_at(Vec2::new(400.0, 300.0), Vec2::new(50.0, 0.0), lossless());
        ball.update(DT);
        ball.update(DT);
        ball.trails.add_impact(Vec2::new(400.0, 535.0), [255, 0, 0]);

        let mut log = CallLog::default();
        ball.draw(&mut log);
        assert_eq!(log.0, vec!["impact", "trail", "fill"]);
    }

    #[test]
    #[should_panic(expected = "must be smaller than arena radius")]
    fn test_ball_as_large_as_arena_panics() {
        let params = PhysicsParams {
            base_radius: 250.0,
            ..Default::default()
        };
        ball_at(Vec2::new(400.0, 300.0), Vec2::ZERO, params);
    }

    #[test]
    #[should_panic(expected = "palette must not be empty")]
    fn test_empty_palette_panics() {
        Ball::with_state(
            arena(),
            Vec2::new(400.0, 300.0),
            Vec2::ZERO,
            PhysicsParams::default(),
            TrailParams::default(),
            Rc::from(Vec::<Rgb>::new()),
        );
    }
}
