//! Procedural fish body
//!
//! The body is a chain of joints. Each joint is placed relative to its parent
//! with [`offset_point`], using an angle made of the parent's angle plus a
//! periodic wobble driven by the phase:
//!
//! ```text
//! anchor ─▶ head ─▶ body rear ─▶ segment 2 ─▶ segment 3 ─▶ tail
//!             └─▶ fins (left/right)
//! ```
//!
//! [`BodyKinematics::compute_skeleton`] is a pure function of its inputs; the
//! resulting [`Skeleton`] is rebuilt from scratch every frame and turned into
//! draw commands by [`render_skeleton`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::KinematicsError;
use crate::geometry::{cos_deg, offset_point, sin_deg};

mod render;
#[cfg(test)]
mod tests;

pub use render::{draw_skeleton, render_skeleton};

/// Phase multiplier and swing (degrees) of the head wobble
const HEAD_WAVE: (f32, f32) = (1.2, 2.0);
/// Phase multiplier and swing of the upper body segment
const UPPER_WAVE: (f32, f32) = (1.5, 15.0);
/// Phase multiplier and swing of the tail-bearing segment
const LOWER_WAVE: (f32, f32) = (1.5, 35.0);
/// Phase multiplier of the tail flick
const TAIL_WAVE: f32 = 1.7;

/// Fin root sits this far round from the head direction
const FIN_ROOT_ANGLE: f32 = 110.0;
/// Extra twist of the fin's curve control point
const FIN_CONTROL_ANGLE: f32 = 110.0;

/// Inner tail triangle is this much shorter than the outer one
const TAIL_INNER_INSET: f32 = 10.0;
/// Inner tail triangle is this much narrower (per side) than the outer one
const TAIL_INNER_NARROWING: f32 = 20.0;

/// Body proportions and colours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Head circle radius; every other dimension scales from it (default: 30)
    #[serde(default = "default_head_radius")]
    pub head_radius: f32,
    /// Base RGB colour of the fish (default: [244, 92, 71])
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    /// Alpha of the main body panel (default: 220)
    #[serde(default = "default_body_alpha")]
    pub body_alpha: u8,
    /// Alpha of the side fins (default: 100)
    #[serde(default = "default_fin_alpha")]
    pub fin_alpha: u8,
    /// Alpha of head, segments and tail (default: 160)
    #[serde(default = "default_other_alpha")]
    pub other_alpha: u8,
    /// Alpha of the compositing layer the fish is drawn into (default: 240)
    #[serde(default = "default_layer_alpha")]
    pub layer_alpha: u8,
    /// Extra half-width added to the tail flick (default: 50)
    #[serde(default = "default_tail_flare")]
    pub tail_flare: f32,
    /// Peak fin flutter angle in degrees (default: 1)
    #[serde(default = "default_fin_flutter_degrees")]
    pub fin_flutter_degrees: f32,
}

fn default_head_radius() -> f32 {
    30.0
}
fn default_color() -> [u8; 3] {
    [244, 92, 71]
}
fn default_body_alpha() -> u8 {
    220
}
fn default_fin_alpha() -> u8 {
    100
}
fn default_other_alpha() -> u8 {
    160
}
fn default_layer_alpha() -> u8 {
    240
}
fn default_tail_flare() -> f32 {
    50.0
}
fn default_fin_flutter_degrees() -> f32 {
    1.0
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            head_radius: default_head_radius(),
            color: default_color(),
            body_alpha: default_body_alpha(),
            fin_alpha: default_fin_alpha(),
            other_alpha: default_other_alpha(),
            layer_alpha: default_layer_alpha(),
            tail_flare: default_tail_flare(),
            fin_flutter_degrees: default_fin_flutter_degrees(),
        }
    }
}

impl BodyConfig {
    /// Distance from head centre to the rear of the body panel
    pub fn body_length(&self) -> f32 {
        self.head_radius * 3.2
    }

    /// Length of a side fin's main axis
    pub fn fin_length(&self) -> f32 {
        self.head_radius * 1.3
    }

    /// Top radius of the upper segment
    pub fn upper_radius(&self) -> f32 {
        self.head_radius * 0.7
    }

    /// Top radius of the tail-bearing segment
    pub fn lower_radius(&self) -> f32 {
        self.upper_radius() * 0.6
    }

    /// Tail flick amplitude before the constant head-radius share is added
    pub fn tail_max_width(&self) -> f32 {
        self.lower_radius() + self.tail_flare
    }

    /// Upper bound of [`BodyKinematics::tail_half_width`]
    pub fn tail_width_bound(&self) -> f32 {
        self.tail_max_width() + self.head_radius / 5.0
    }

    /// Pivot (body centre) relative to the box's top-left corner
    pub fn pivot_offset(&self) -> Vec2 {
        Vec2::splat(self.head_radius * 4.18)
    }
}

/// Which side of the fish a fin is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FinSide {
    Right,
    Left,
}

impl FinSide {
    /// Rotation direction: right fins turn clockwise (negative angles)
    fn sign(self) -> f32 {
        match self {
            FinSide::Right => -1.0,
            FinSide::Left => 1.0,
        }
    }
}

/// Front body panel between the head and the upper segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyPanel {
    pub front_right: Vec2,
    pub rear_right: Vec2,
    pub rear_left: Vec2,
    pub front_left: Vec2,
    pub control_right: Vec2,
    pub control_left: Vec2,
    /// Centre of the panel's rear edge, parent of the upper segment
    pub rear_center: Vec2,
}

/// Tapered trapezoid between two circles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// Segment axis angle including its wobble
    pub angle: f32,
    pub top: Vec2,
    pub bottom: Vec2,
    pub top_radius: f32,
    pub bottom_radius: f32,
    /// Distance between the two circle centres
    pub length: f32,
    pub top_right: Vec2,
    pub top_left: Vec2,
    pub bottom_left: Vec2,
    pub bottom_right: Vec2,
}

/// Two nested triangles fanning out from the tail anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tail {
    pub base: Vec2,
    /// Half width of the outer triangle
    pub half_width: f32,
    /// Outer triangle: apex, right, left
    pub outer: [Vec2; 3],
    /// Inner triangle: apex, right, left
    pub inner: [Vec2; 3],
}

/// A side fin: quadratic curve from root to tip
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fin {
    pub side: FinSide,
    pub root: Vec2,
    pub control: Vec2,
    pub tip: Vec2,
}

/// All joints of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Skeleton {
    pub anchor: Vec2,
    /// Externally set heading
    pub heading: f32,
    /// Heading plus the head wobble; parent angle of everything below the head
    pub body_angle: f32,
    pub head: Vec2,
    pub head_radius: f32,
    pub body: BodyPanel,
    pub upper: Segment,
    pub lower: Segment,
    pub tail: Tail,
    /// Right fin first, then left
    pub fins: [Fin; 2],
}

/// Skeleton generator for one body configuration
#[derive(Debug, Clone, Default)]
pub struct BodyKinematics {
    config: BodyConfig,
}

impl BodyKinematics {
    pub fn new(config: BodyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    /// Head centre for a given anchor and heading (no wobble)
    pub fn head_position(&self, anchor: Vec2, heading: f32) -> Vec2 {
        offset_point(anchor, self.config.body_length() / 2.0, heading)
    }

    /// Tail half width: `|sin(phase·1.7·f)|·max + HR/5`, never negative
    pub fn tail_half_width(&self, phase: f32, frequency_scale: f32) -> f32 {
        sin_deg(phase * TAIL_WAVE * frequency_scale).abs() * self.config.tail_max_width()
            + self.config.head_radius / 5.0
    }

    /// Derive every joint for one frame.
    ///
    /// `heading` and `fin_flutter` are degrees; `phase` is in degrees of the
    /// virtual oscillator. Non-finite inputs are rejected.
    pub fn compute_skeleton(
        &self,
        anchor: Vec2,
        heading: f32,
        phase: f32,
        frequency_scale: f32,
        fin_flutter: f32,
    ) -> Result<Skeleton, KinematicsError> {
        KinematicsError::check("anchor.x", anchor.x)?;
        KinematicsError::check("anchor.y", anchor.y)?;
        let heading = KinematicsError::check("heading", heading)?;
        let phase = KinematicsError::check("phase", phase)?;
        let frequency_scale = KinematicsError::check("frequency_scale", frequency_scale)?;
        let fin_flutter = KinematicsError::check("fin_flutter", fin_flutter)?;

        let cfg = &self.config;
        let radius = cfg.head_radius;

        let body_angle = heading + sin_deg(phase * HEAD_WAVE.0 * frequency_scale) * HEAD_WAVE.1;
        let head = self.head_position(anchor, heading);

        let fins = [
            self.fin(head, body_angle, fin_flutter, FinSide::Right),
            self.fin(head, body_angle, fin_flutter, FinSide::Left),
        ];

        let rear_center = offset_point(head, cfg.body_length(), body_angle - 180.0);
        let body = BodyPanel {
            front_right: offset_point(head, radius, body_angle - 80.0),
            front_left: offset_point(head, radius, body_angle + 80.0),
            rear_right: offset_point(rear_center, radius * 0.7, body_angle - 90.0),
            rear_left: offset_point(rear_center, radius * 0.7, body_angle + 90.0),
            control_right: offset_point(head, cfg.body_length() * 0.56, body_angle - 130.0),
            control_left: offset_point(head, cfg.body_length() * 0.56, body_angle + 130.0),
            rear_center,
        };

        let upper_angle = body_angle + cos_deg(phase * UPPER_WAVE.0 * frequency_scale) * UPPER_WAVE.1;
        let upper = segment(rear_center, cfg.upper_radius(), 0.6, 1.0, upper_angle);

        let lower_angle = upper_angle + sin_deg(phase * LOWER_WAVE.0 * frequency_scale) * LOWER_WAVE.1;
        let lower = segment(upper.bottom, cfg.lower_radius(), 0.4, 2.7, lower_angle);

        let tail = self.tail(&lower, phase, frequency_scale);

        Ok(Skeleton {
            anchor,
            heading,
            body_angle,
            head,
            head_radius: radius,
            body,
            upper,
            lower,
            tail,
            fins,
        })
    }

    fn fin(&self, head: Vec2, body_angle: f32, flutter: f32, side: FinSide) -> Fin {
        let sign = side.sign();
        let length = self.config.fin_length();
        let root = offset_point(head, self.config.head_radius * 0.9, body_angle + sign * FIN_ROOT_ANGLE);
        let tip = offset_point(root, length, body_angle + sign * (flutter + 180.0));
        let control = offset_point(
            root,
            length * 1.8,
            body_angle + sign * (flutter + FIN_CONTROL_ANGLE),
        );
        Fin {
            side,
            root,
            control,
            tip,
        }
    }

    fn tail(&self, lower: &Segment, phase: f32, frequency_scale: f32) -> Tail {
        let base = lower.top;
        let angle = lower.angle;
        let length = lower.length;
        let half_width = self.tail_half_width(phase, frequency_scale);

        let outer_base = offset_point(base, length, angle - 180.0);
        let inner_base = offset_point(base, length - TAIL_INNER_INSET, angle - 180.0);
        let inner_half = half_width - TAIL_INNER_NARROWING;

        Tail {
            base,
            half_width,
            outer: [
                base,
                offset_point(outer_base, half_width, angle - 90.0),
                offset_point(outer_base, half_width, angle + 90.0),
            ],
            inner: [
                base,
                offset_point(inner_base, inner_half, angle - 90.0),
                offset_point(inner_base, inner_half, angle + 90.0),
            ],
        }
    }
}

/// Build a tapered segment hanging off `top` along `angle`.
///
/// The bottom circle has radius `top_radius · ratio` and sits
/// `top_radius · (ratio + stretch)` away from the top.
fn segment(top: Vec2, top_radius: f32, ratio: f32, stretch: f32, angle: f32) -> Segment {
    let bottom_radius = top_radius * ratio;
    let length = top_radius * (ratio + stretch);
    let bottom = offset_point(top, length, angle - 180.0);
    Segment {
        angle,
        top,
        bottom,
        top_radius,
        bottom_radius,
        length,
        top_right: offset_point(top, top_radius, angle - 90.0),
        top_left: offset_point(top, top_radius, angle + 90.0),
        bottom_left: offset_point(bottom, bottom_radius, angle + 90.0),
        bottom_right: offset_point(bottom, bottom_radius, angle - 90.0),
    }
}
