//! Property tests for the ball/arena invariants

use std::rc::Rc;

use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use ring_bounce::consts::*;
use ring_bounce::settings::{PhysicsParams, TrailParams};
use ring_bounce::sim::{Arena, Ball, TrailBuffer, TrailManager, reflect_with_losses};
use ring_bounce::Settings;

fn arena() -> Rc<Arena> {
    Rc::new(Arena::new(Vec2::new(400.0, 300.0), 250.0))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ball_stays_inside_arena(
        seed in any::<u64>(),
        dt in 0.002f32..0.05,
        frames in 1usize..1500,
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ball = Ball::new(arena(), &Settings::default(), &mut rng);
        let cap = 250.0 * BALL_MAX_RATIO;
        let mut last_radius = ball.radius;

        for _ in 0..frames {
            ball.update(dt);
            let dist = (ball.pos - ball.arena().center).length();
            prop_assert!(dist <= 250.0 - ball.radius + 1e-3);
            prop_assert!(ball.radius >= last_radius);
            prop_assert!(ball.radius <= cap + 1e-4);
            prop_assert!(ball.pos.is_finite() && ball.vel.is_finite());
            last_radius = ball.radius;
        }
    }

    #[test]
    fn any_start_inside_stays_inside(
        x in -200.0f32..200.0,
        y in -200.0f32..200.0,
        vx in -800.0f32..800.0,
        vy in -800.0f32..800.0,
    ) {
        let arena = arena();
        let start = arena.center + Vec2::new(x, y).clamp_length_max(230.0);
        let mut ball = Ball::with_state(
            Rc::clone(&arena),
            start,
            Vec2::new(vx, vy),
            PhysicsParams::default(),
            TrailParams::default(),
            Rc::from(&PALETTE[..]),
        );

        let mut bounces = 0u32;
        for _ in 0..600 {
            bounces += ball.update(1.0 / 120.0);
            let dist = (ball.pos - arena.center).length();
            prop_assert!(dist <= arena.radius - ball.radius + 1e-3);
        }
        prop_assert_eq!(ball.color_index(), bounces as usize % PALETTE.len());
        prop_assert!(ball.trails.impacts().iter().all(|i| i.remaining_life > 0.0));
    }

    #[test]
    fn reflection_loses_energy(
        angle in -std::f32::consts::PI..std::f32::consts::PI,
        vn in 1.0f32..500.0,
        vt in -500.0f32..500.0,
    ) {
        let normal = Vec2::new(angle.cos(), angle.sin());
        let tangent = Vec2::new(-normal.y, normal.x);
        let velocity = normal * vn + tangent * vt;

        let out = reflect_with_losses(velocity, normal, RESTITUTION, TANGENTIAL_FRICTION);
        let vn_out = out.dot(normal);
        let vt_out = out.dot(tangent);

        prop_assert!((vn_out + vn * RESTITUTION).abs() < 1e-2);
        prop_assert!((vt_out - vt * TANGENTIAL_FRICTION).abs() < 1e-2);
        prop_assert!(vn_out.abs() < vn);
    }

    #[test]
    fn trail_keeps_most_recent(capacity in 1usize..64, pushes in 0usize..300) {
        let mut buffer = TrailBuffer::new(capacity);
        for i in 0..pushes {
            buffer.push(Vec2::new(i as f32, 0.0));
        }

        prop_assert_eq!(buffer.len(), pushes.min(capacity));
        let xs: Vec<f32> = buffer.iter().map(|p| p.x).collect();
        let expected: Vec<f32> = (pushes.saturating_sub(capacity)..pushes)
            .map(|i| i as f32)
            .collect();
        prop_assert_eq!(xs, expected);
    }

    #[test]
    fn impacts_expire_after_lifetime(steps in prop::collection::vec(0.001f32..0.2, 1..40)) {
        let mut trails = TrailManager::new(TrailParams::default());
        trails.add_impact(Vec2::ZERO, [255, 0, 0]);

        let mut elapsed = 0.0f32;
        for dt in steps {
            trails.update(dt);
            elapsed += dt;
            if elapsed < IMPACT_LIFETIME - 1e-4 {
                prop_assert_eq!(trails.impacts().len(), 1);
            } else if elapsed > IMPACT_LIFETIME + 1e-4 {
                prop_assert!(trails.impacts().is_empty());
            }
        }
    }
}
