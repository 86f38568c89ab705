// ABOUTME: Per-frame rotation accumulator for the demo cube.
// ABOUTME: Produces the cube's model matrix from the accumulated angle.

use glam::Mat4;

use crate::math;

/// Radians added on every cube frame.
pub const DEFAULT_STEP: f32 = 0.005;

/// Monotonic rotation angle. It only ever grows; periodicity comes from
/// sin/cos, so the angle is never wrapped or reset while a scene is alive.
/// Past roughly 2^17 rad an f32 step of 0.005 no longer changes the angle and
/// the cube holds still; that is about 120 hours of one demo visit at 60 Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    angle: f32,
    step: f32,
}

impl Spin {
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() { step.max(0.0) } else { 0.0 };
        Self { angle: 0.0, step }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Advance one frame and return the new angle.
    pub fn advance(&mut self) -> f32 {
        self.angle += self.step;
        self.angle
    }

    /// Y rotation at full angle composed with X rotation at half angle.
    pub fn model_matrix(&self) -> Mat4 {
        math::rotation_y(self.angle) * math::rotation_x(self.angle * 0.5)
    }
}

impl Default for Spin {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}
