//! Fading visual effects that follow the ball
//!
//! Two kinds of state, both driven only by elapsed time and bounce events:
//! - a motion trail of recent positions in a fixed-capacity ring buffer
//! - impact flashes, lines from a bounce point to the ball that fade out

use glam::Vec2;

use crate::renderer::{Rgb, Surface};
use crate::settings::TrailParams;

/// Fixed-capacity FIFO of positions
///
/// Storage is allocated once; when full, each push overwrites the oldest sample.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: Vec<Vec2>,
    /// Index of the oldest sample
    head: usize,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    pub fn push(&mut self, point: Vec2) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() < self.capacity {
            self.points.push(point);
        } else {
            self.points[self.head] = point;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> + Clone + '_ {
        let (newer, older) = self.points.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn newest(&self) -> Option<Vec2> {
        if self.points.is_empty() {
            None
        } else {
            let idx = (self.head + self.points.len() - 1) % self.points.len();
            Some(self.points[idx])
        }
    }
}

/// A fading line anchored where the ball hit the wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub position: Vec2,
    /// Seconds until the flash disappears
    pub remaining_life: f32,
    /// Ball color at the moment of impact
    pub color: Rgb,
}

/// Owns the motion trail and live impact flashes for one ball
#[derive(Debug, Clone)]
pub struct TrailManager {
    motion_trail: TrailBuffer,
    impacts: Vec<Impact>,
    params: TrailParams,
}

impl TrailManager {
    pub fn new(params: TrailParams) -> Self {
        Self {
            motion_trail: TrailBuffer::new(params.capacity),
            impacts: Vec::new(),
            params,
        }
    }

    pub fn push_position(&mut self, position: Vec2) {
        self.motion_trail.push(position);
    }

    pub fn add_impact(&mut self, position: Vec2, color: Rgb) {
        self.impacts.push(Impact {
            position,
            remaining_life: self.params.impact_lifetime,
            color,
        });
    }

    /// Age every impact by `dt`, dropping any that reach zero
    pub fn update(&mut self, dt: f32) {
        self.impacts.retain_mut(|impact| {
            impact.remaining_life -= dt;
            impact.remaining_life > 0.0
        });
    }

    pub fn motion_trail(&self) -> &TrailBuffer {
        &self.motion_trail
    }

    pub fn impacts(&self) -> &[Impact] {
        &self.impacts
    }

    pub fn params(&self) -> &TrailParams {
        &self.params
    }

    /// Opacity of an impact line: full when fresh, zero when expired
    pub fn impact_alpha(&self, impact: &Impact) -> u8 {
        let ratio = impact.remaining_life / self.params.impact_lifetime;
        (255.0 * ratio).clamp(0.0, 255.0) as u8
    }

    /// Opacity of trail segment `index` (1-based, ending at the newest sample) out of `len` samples
    pub fn trail_alpha(&self, index: usize, len: usize) -> u8 {
        let fade = index as f32 / len as f32;
        (self.params.alpha_ceiling as f32 * fade) as u8
    }

    /// Draw impact lines, then the motion trail
    ///
    /// Impact lines end at the ball's current position and keep the color they
    /// were created with. Trail segments all use the ball's current color.
    pub fn draw(&self, surface: &mut impl Surface, ball_pos: Vec2, ball_color: Rgb) {
        for impact in &self.impacts {
            surface.draw_line(
                impact.position,
                ball_pos,
                impact.color,
                self.impact_alpha(impact),
                self.params.impact_width,
            );
        }

        let len = self.motion_trail.len();
        if len > 1 {
            let segments = self.motion_trail.iter().zip(self.motion_trail.iter().skip(1));
            for (i, (from, to)) in segments.enumerate() {
                surface.draw_line(
                    *from,
                    *to,
                    ball_color,
                    self.trail_alpha(i + 1, len),
                    self.params.trail_width,
                );
            }
        }
    }
}
