//! Frame loop orchestration
//!
//! One frame is: check quit, advance the ball by `dt`, then draw arena and
//! ball onto the surface. Physics for a frame always finishes before any of
//! that frame's draw calls are issued.

use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::renderer::Surface;
use crate::settings::Settings;
use crate::sim::{Arena, Ball};

/// Frames between FPS log lines
const FPS_LOG_INTERVAL: u64 = 600;

/// Running counters for the loop
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub frames: u64,
    pub bounces: u64,
    /// Simulated seconds
    pub sim_time: f64,
    /// Exponentially smoothed frames per second
    fps: f32,
}

impl FrameStats {
    fn record(&mut self, dt: f32, bounces: u32) {
        self.frames += 1;
        self.bounces += bounces as u64;
        self.sim_time += dt as f64;
        if dt > 0.0 {
            let instant = 1.0 / dt;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps + (instant - self.fps) * 0.05
            };
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// The whole scene plus loop state
pub struct App {
    arena: Rc<Arena>,
    ball: Ball,
    running: bool,
    stats: FrameStats,
    seed: u64,
}

impl App {
    /// Build the arena from the window settings and launch a ball into it
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let arena = Rc::new(Arena::from_window(&settings.window, settings.arena_color));
        log::info!(
            "Arena center ({}, {}) radius {}",
            arena.center.x,
            arena.center.y,
            arena.radius
        );

        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = Ball::new(Rc::clone(&arena), settings, &mut rng);

        Self {
            arena,
            ball,
            running: true,
            stats: FrameStats::default(),
            seed,
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the loop at the next frame boundary
    pub fn request_quit(&mut self) {
        if self.running {
            log::info!(
                "Quit after {} frames, {} bounces, {:.1}s simulated",
                self.stats.frames,
                self.stats.bounces,
                self.stats.sim_time
            );
        }
        self.running = false;
    }

    /// Physics phase
    pub fn update(&mut self, dt: f32) -> u32 {
        let bounces = self.ball.update(dt);
        self.stats.record(dt, bounces);
        if self.stats.frames % FPS_LOG_INTERVAL == 0 {
            log::debug!(
                "Frame {}: {:.0} fps, {} bounces",
                self.stats.frames,
                self.stats.fps(),
                self.stats.bounces
            );
        }
        bounces
    }

    /// Render phase: arena outline, then the ball with its effects
    pub fn draw(&self, surface: &mut impl Surface) {
        self.arena.draw(surface);
        self.ball.draw(surface);
    }

    /// Run one frame; returns whether the loop should keep going
    pub fn frame(&mut self, dt: f32, quit: bool, surface: &mut impl Surface) -> bool {
        if quit {
            self.request_quit();
        }
        if !self.running {
            return false;
        }
        self.update(dt);
        self.draw(surface);
        true
    }
}
