//! Screen-space geometry helpers
//!
//! All points are [`glam::Vec2`] in screen coordinates: x grows to the right,
//! y grows downward. Angles are degrees measured from +x.

use glam::Vec2;

/// Place a point `length` away from `origin` along `angle_deg`.
///
/// The y term uses `sin(angle - 180°)`, i.e. `-sin(angle)`, so that positive
/// angles open toward the top of the screen even though y grows downward.
/// Every joint of the fish is chained through this one function.
#[inline]
pub fn offset_point(origin: Vec2, length: f32, angle_deg: f32) -> Vec2 {
    let dx = angle_deg.to_radians().cos() * length;
    let dy = (angle_deg - 180.0).to_radians().sin() * length;
    Vec2::new(origin.x + dx, origin.y + dy)
}

/// Sine of an angle given in degrees
#[inline]
pub fn sin_deg(angle_deg: f32) -> f32 {
    angle_deg.to_radians().sin()
}

/// Cosine of an angle given in degrees
#[inline]
pub fn cos_deg(angle_deg: f32) -> f32 {
    angle_deg.to_radians().cos()
}

/// Axis-aligned rectangle (used for compositing layer bounds)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}
