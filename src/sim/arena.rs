//! The circular boundary the ball lives in

use glam::Vec2;

use crate::consts::{ARENA_COLOR, ARENA_STROKE};
use crate::renderer::{Rgb, Surface};
use crate::settings::WindowSettings;

/// Immutable circular arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub center: Vec2,
    pub radius: f32,
    /// Outline color
    pub color: Rgb,
}

impl Arena {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            color: ARENA_COLOR,
        }
    }

    /// Largest arena that fits the window minus its margin
    pub fn from_window(window: &WindowSettings, color: Rgb) -> Self {
        Self {
            center: window.arena_center(),
            radius: window.arena_radius(),
            color,
        }
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        surface.draw_circle_outline(self.center, self.radius, ARENA_STROKE, self.color);
    }
}
