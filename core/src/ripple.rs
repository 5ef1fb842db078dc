//! Touch ripple: an expanding ring that fades out on its own timer

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TimingError;
use crate::render::{Paint, RenderSurface, Rgba};
use crate::timing::{Animator, Interpolator, TimingSpec};

/// Ripple appearance and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RippleConfig {
    /// Ring radius at the end of the animation (default: 150)
    #[serde(default = "default_max_radius")]
    pub max_radius: f32,
    /// Animation length in milliseconds (default: 300)
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    /// Easing of the progress value (default: accelerate_decelerate)
    #[serde(default = "default_interpolator")]
    pub interpolator: Interpolator,
    /// Ring stroke width (default: 8)
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    /// Ring RGB colour (default: [0, 125, 251])
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    /// Intensity at the moment of the touch (default: 100)
    #[serde(default = "default_peak_alpha")]
    pub peak_alpha: f32,
}

fn default_max_radius() -> f32 {
    150.0
}
fn default_duration_ms() -> f64 {
    300.0
}
fn default_interpolator() -> Interpolator {
    Interpolator::AccelerateDecelerate
}
fn default_stroke_width() -> f32 {
    8.0
}
fn default_color() -> [u8; 3] {
    [0, 125, 251]
}
fn default_peak_alpha() -> f32 {
    100.0
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            max_radius: default_max_radius(),
            duration_ms: default_duration_ms(),
            interpolator: default_interpolator(),
            stroke_width: default_stroke_width(),
            color: default_color(),
            peak_alpha: default_peak_alpha(),
        }
    }
}

impl RippleConfig {
    pub fn timing(&self) -> Result<TimingSpec, TimingError> {
        Ok(TimingSpec::from_millis("ripple", self.duration_ms)?.with_interpolator(self.interpolator))
    }
}

/// Ring state at one progress value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RippleFrame {
    pub center: Vec2,
    pub progress: f32,
    pub radius: f32,
    /// Intensity, `peak · (1 − p)`
    pub alpha: f32,
}

impl RippleFrame {
    /// Ring at progress `p`, clamped to `[0, 1]`
    pub fn at(center: Vec2, progress: f32, config: &RippleConfig) -> Self {
        let p = progress.clamp(0.0, 1.0);
        Self {
            center,
            progress: p,
            radius: config.max_radius * p,
            alpha: config.peak_alpha * (1.0 - p),
        }
    }

    /// Channel alpha actually painted: half the intensity
    pub fn paint_alpha(&self) -> u8 {
        (self.alpha / 2.0).round().clamp(0.0, 255.0) as u8
    }

    pub fn paint(&self, config: &RippleConfig) -> Paint {
        Paint::stroke(
            Rgba::rgb(config.color).with_alpha(self.paint_alpha()),
            config.stroke_width,
        )
    }

    pub fn draw<S: RenderSurface + ?Sized>(&self, config: &RippleConfig, surface: &mut S) {
        surface.draw_circle(self.center, self.radius, &self.paint(config));
    }
}

/// Ripple animation bound to the last touch point
#[derive(Debug, Clone)]
pub struct RippleEffect {
    config: RippleConfig,
    animator: Animator,
    center: Option<Vec2>,
}

impl RippleEffect {
    pub fn new(config: RippleConfig) -> Result<Self, TimingError> {
        let animator = Animator::new("ripple", config.timing()?, [0.0, 1.0])?;
        Ok(Self {
            config,
            animator,
            center: None,
        })
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    /// Restart the ring at `center`; a ripple in progress is dropped
    pub fn trigger(&mut self, center: Vec2) {
        self.animator.cancel();
        self.center = Some(center);
        self.animator.start();
    }

    pub fn is_active(&self) -> bool {
        self.animator.is_running()
    }

    /// Advance by `dt`, returning the new frame while the ripple runs
    pub fn advance(&mut self, dt: Duration) -> Option<RippleFrame> {
        let tick = self.animator.advance(dt)?;
        let center = self.center?;
        let frame = RippleFrame::at(center, tick.value, &self.config);
        if tick.finished {
            self.center = None;
        }
        Some(frame)
    }

    /// Ring to draw for the current state, if any
    pub fn frame(&self) -> Option<RippleFrame> {
        let center = self.center.filter(|_| self.is_active())?;
        Some(RippleFrame::at(center, self.animator.value(), &self.config))
    }
}
