//! Ring Bounce - an elastic ball inside a circular arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arena, ball physics, trail and impact effects)
//! - `renderer`: Drawing surface abstraction and the WebGPU pipeline behind it
//! - `app`: Frame loop orchestration (update, then draw)
//! - `settings`: Startup configuration

pub mod app;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{App, FrameStats};
pub use settings::{PhysicsParams, Settings, SettingsError, TrailParams, WindowSettings};

use glam::Vec2;

/// Default configuration constants
pub mod consts {
    /// Window dimensions (pixels)
    pub const WIDTH: u32 = 800;
    pub const HEIGHT: u32 = 600;
    /// Target frame rate
    pub const FPS: u32 = 120;
    /// Largest dt the frame driver will hand to the simulation
    pub const MAX_FRAME_DT: f32 = 0.1;
    pub const WINDOW_TITLE: &str = "Bouncing Ball — Smooth Physics";

    /// Padding between the window edge and the arena circle
    pub const MARGIN: f32 = 50.0;
    /// Arena outline stroke width
    pub const ARENA_STROKE: f32 = 2.0;

    /// Ball defaults
    pub const BALL_BASE_RADIUS: f32 = 15.0;
    /// Radius cap as a fraction of the arena radius
    pub const BALL_MAX_RATIO: f32 = 0.8;
    /// Radius growth (pixels/s) until the cap is reached
    pub const GROWTH_PER_SEC: f32 = 12.0;
    /// Launch speed along x (scaled by cos of a random angle)
    pub const INITIAL_SPEED: f32 = 250.0;
    /// Fixed upward bias on launch
    pub const INITIAL_VY: f32 = -150.0;
    /// Start height above center, as a fraction of the arena radius
    pub const START_HEIGHT_RATIO: f32 = 0.5;

    /// Normal velocity kept after a bounce
    pub const RESTITUTION: f32 = 0.95;
    /// Tangential velocity kept after a bounce
    pub const TANGENTIAL_FRICTION: f32 = 0.99;
    /// Air friction, applied once per frame (not dt-scaled)
    pub const LINEAR_FRICTION: f32 = 0.999;
    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 200.0;

    /// Motion trail samples kept
    pub const TRAIL_LEN: usize = 140;
    /// Impact flash lifetime (seconds)
    pub const IMPACT_LIFETIME: f32 = 0.6;
    pub const IMPACT_WIDTH: f32 = 2.0;
    pub const TRAIL_WIDTH: f32 = 2.0;
    /// Alpha of the newest trail segment (oldest fades toward 0)
    pub const TRAIL_ALPHA_CEILING: u8 = 180;

    pub const ARENA_COLOR: [u8; 3] = [255, 255, 255];
    pub const BG_COLOR: [u8; 3] = [0, 0, 0];

    /// Ball colors, cycled once per bounce
    pub const PALETTE: [[u8; 3]; 6] = [
        [255, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [255, 255, 0],
        [255, 0, 255],
        [0, 255, 255],
    ];
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
