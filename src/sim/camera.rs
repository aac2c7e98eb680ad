//! Smoothed, clamped 2D camera that follows a target

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Camera tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered per follow call (0 < f <= 1)
    pub lerp_factor: f32,
    /// Initial viewport size in world units
    pub view_width: f32,
    pub view_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            lerp_factor: 0.1,
            view_width: 800.0,
            view_height: 600.0,
        }
    }
}

/// Visible world rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub view: View,
    lerp_factor: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            view: View::default(),
            lerp_factor: sanitize_lerp(config.lerp_factor),
        };
        camera.set_viewport(config.view_width, config.view_height);
        camera
    }

    pub fn lerp_factor(&self) -> f32 {
        self.lerp_factor
    }

    /// Resize the view without moving its origin
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.view.w = width.max(0.0);
        self.view.h = height.max(0.0);
    }

    /// Ease toward centering the target, then clamp inside the world.
    ///
    /// Smoothing is a fixed fraction per call, so the effective follow speed
    /// depends on how often this runs.
    pub fn follow(&mut self, target: Vec2, world_w: f32, world_h: f32) {
        let desired_x = target.x - self.view.w * 0.5;
        let desired_y = target.y - self.view.h * 0.5;

        self.view.x += (desired_x - self.view.x) * self.lerp_factor;
        self.view.y += (desired_y - self.view.y) * self.lerp_factor;

        self.view.x = clamp_axis(self.view.x, world_w - self.view.w);
        self.view.y = clamp_axis(self.view.y, world_h - self.view.h);
    }

    /// Jump straight to the clamped centered position (used on spawn)
    pub fn snap_to(&mut self, target: Vec2, world_w: f32, world_h: f32) {
        self.view.x = clamp_axis(target.x - self.view.w * 0.5, world_w - self.view.w);
        self.view.y = clamp_axis(target.y - self.view.h * 0.5, world_h - self.view.h);
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.view.x, self.view.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.view.w, self.view.h)
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.origin()
    }
}

fn sanitize_lerp(f: f32) -> f32 {
    if f.is_finite() && f > 0.0 { f.min(1.0) } else { 1.0 }
}

/// Clamp into [0, max]; a negative max (world smaller than view) pins to 0
#[inline]
fn clamp_axis(v: f32, max: f32) -> f32 {
    v.min(max).max(0.0)
}
