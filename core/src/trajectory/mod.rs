//! Swim trajectory controller
//!
//! A touch turns into a [`SwimPath`]: a cubic from the fish's current origin
//! to a target that puts the head on the touch point. While the swim runs the
//! controller owns the heading, feeding it from the path tangent, and raises
//! the oscillation frequency so the body beats faster.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::body::BodyKinematics;
use crate::error::TimingError;
use crate::geometry::offset_point;
use crate::timing::{Animator, Interpolator, TimingSpec};

mod path;

pub use path::{PathSample, SwimPath};

/// Swim timing and frequency modulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimConfig {
    /// Time to travel the whole path in milliseconds (default: 2000)
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    /// Easing along the path (default: accelerate_decelerate)
    #[serde(default = "default_swim_interpolator")]
    pub interpolator: Interpolator,
    /// Frequency scale while idle (default: 1)
    #[serde(default = "default_idle_frequency")]
    pub idle_frequency: f32,
    /// Frequency scale while swimming (default: 2)
    #[serde(default = "default_swim_frequency")]
    pub swim_frequency: f32,
    /// Distance of the second control handle from the pivot, in head radii (default: 1.6)
    #[serde(default = "default_control_reach")]
    pub control_reach: f32,
    /// Drop back to the idle frequency when a swim completes (default: true)
    #[serde(default = "default_restore_on_complete")]
    pub restore_on_complete: bool,
    /// Length of one fin flutter run in milliseconds (default: 500)
    #[serde(default = "default_flutter_duration_ms")]
    pub flutter_duration_ms: f64,
    /// Upper bound of the random flutter repeat count, inclusive (default: 2)
    #[serde(default = "default_flutter_max_repeat")]
    pub flutter_max_repeat: u32,
}

fn default_duration_ms() -> f64 {
    2000.0
}
fn default_swim_interpolator() -> Interpolator {
    Interpolator::AccelerateDecelerate
}
fn default_idle_frequency() -> f32 {
    1.0
}
fn default_swim_frequency() -> f32 {
    2.0
}
fn default_control_reach() -> f32 {
    1.6
}
fn default_restore_on_complete() -> bool {
    true
}
fn default_flutter_duration_ms() -> f64 {
    500.0
}
fn default_flutter_max_repeat() -> u32 {
    2
}

impl Default for SwimConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            interpolator: default_swim_interpolator(),
            idle_frequency: default_idle_frequency(),
            swim_frequency: default_swim_frequency(),
            control_reach: default_control_reach(),
            restore_on_complete: default_restore_on_complete(),
            flutter_duration_ms: default_flutter_duration_ms(),
            flutter_max_repeat: default_flutter_max_repeat(),
        }
    }
}

impl SwimConfig {
    /// Validated timing of the swim animation
    pub fn timing(&self) -> Result<TimingSpec, TimingError> {
        Ok(TimingSpec::from_millis("swim", self.duration_ms)?.with_interpolator(self.interpolator))
    }

    /// Validated duration of one flutter run
    pub fn flutter_duration(&self) -> Result<Duration, TimingError> {
        Ok(TimingSpec::from_millis("flutter", self.flutter_duration_ms)?.duration)
    }
}

/// Signed angle in degrees between `O→A` and `O→B`.
///
/// The sign comes from the cross product `(O−B)×(A−B)`: a positive cross
/// yields a negative angle, a negative cross a positive one. Collinear points
/// give `0` when `B` is on `A`'s side of `O` and `180` otherwise. A zero-length
/// vector means there is nothing to turn toward, so the result is `0`.
pub fn turn_angle(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    let oa = a - o;
    let ob = b - o;
    let norms = oa.length() * ob.length();
    if norms <= f32::EPSILON {
        return 0.0;
    }

    let dot = oa.dot(ob);
    let angle = (dot / norms).clamp(-1.0, 1.0).acos().to_degrees();
    let cross = (o.x - b.x) * (a.y - b.y) - (o.y - b.y) * (a.x - b.x);

    if cross == 0.0 {
        if dot >= 0.0 { 0.0 } else { 180.0 }
    } else if cross > 0.0 {
        -angle
    } else {
        angle
    }
}

/// Fin flutter parameters chosen when a swim starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlutterPlan {
    pub duration: Duration,
    pub repeat: u32,
}

/// Everything decided when a touch starts a swim
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwimPlan {
    pub path: SwimPath,
    /// Signed turn from the current head direction toward the touch
    pub turn_angle: f32,
    /// Frequency scale in effect once the swim has started
    pub frequency_scale: f32,
    pub flutter: FlutterPlan,
    /// A swim was already running and got cancelled
    pub superseded: bool,
}

/// One frame of an active swim
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwimStep {
    pub origin: Vec2,
    /// Tangent heading, `None` on a degenerate path
    pub heading: Option<f32>,
    pub fraction: f32,
    pub finished: bool,
}

/// Owns the swim animation and the frequency scale
#[derive(Debug, Clone)]
pub struct SwimController {
    config: SwimConfig,
    animator: Animator,
    flutter_duration: Duration,
    path: Option<SwimPath>,
    frequency_scale: f32,
}

impl SwimController {
    pub fn new(config: SwimConfig) -> Result<Self, TimingError> {
        let animator = Animator::new("swim", config.timing()?, [0.0, 1.0])?;
        let flutter_duration = config.flutter_duration()?;
        Ok(Self {
            frequency_scale: config.idle_frequency,
            config,
            animator,
            flutter_duration,
            path: None,
        })
    }

    pub fn config(&self) -> &SwimConfig {
        &self.config
    }

    /// Current oscillation frequency multiplier
    pub fn frequency_scale(&self) -> f32 {
        self.frequency_scale
    }

    pub fn is_swimming(&self) -> bool {
        self.animator.is_running()
    }

    /// Path of the swim in progress
    pub fn active_path(&self) -> Option<&SwimPath> {
        self.path.as_ref().filter(|_| self.is_swimming())
    }

    /// Start a swim toward `touch`, superseding any swim in progress.
    ///
    /// `origin` is the top-left of the fish's box and `heading` its current
    /// heading. The path ends where the head lands on the touch point.
    pub fn on_interaction<R: Rng + ?Sized>(
        &mut self,
        body: &BodyKinematics,
        origin: Vec2,
        heading: f32,
        touch: Vec2,
        rng: &mut R,
    ) -> SwimPlan {
        let superseded = self.cancel();

        let pivot = origin + body.config().pivot_offset();
        let head = body.head_position(pivot, heading);
        let turn = turn_angle(pivot, head, touch);
        let reach = self.config.control_reach * body.config().head_radius;

        let path = SwimPath::new(
            origin,
            head,
            offset_point(pivot, reach, turn / 2.0),
            touch - (head - origin),
        );
        if path.length() <= f32::EPSILON {
            tracing::warn!(x = touch.x, y = touch.y, "Touch on the head, swim path is empty");
        }

        let flutter = FlutterPlan {
            duration: self.flutter_duration,
            repeat: rng.random_range(0..=self.config.flutter_max_repeat),
        };

        self.frequency_scale = self.config.swim_frequency;
        self.animator.start();
        self.path = Some(path.clone());

        tracing::debug!(
            turn,
            length = path.length(),
            flutter_repeat = flutter.repeat,
            superseded,
            "Swim started"
        );

        SwimPlan {
            path,
            turn_angle: turn,
            frequency_scale: self.frequency_scale,
            flutter,
            superseded,
        }
    }

    /// Advance the swim by `dt`. Returns `None` when no swim is running.
    pub fn advance(&mut self, dt: Duration) -> Option<SwimStep> {
        let tick = self.animator.advance(dt)?;
        let sample = self.path.as_ref()?.sample_at(tick.fraction);

        if tick.finished {
            self.path = None;
            if self.config.restore_on_complete {
                self.frequency_scale = self.config.idle_frequency;
            }
            tracing::debug!("Swim finished");
        }

        Some(SwimStep {
            origin: sample.position,
            heading: sample.heading(),
            fraction: tick.fraction,
            finished: tick.finished,
        })
    }

    /// Stop the swim in progress and restore the idle frequency.
    /// Returns `true` if a swim was running.
    pub fn cancel(&mut self) -> bool {
        if !self.animator.cancel() {
            return false;
        }
        self.path = None;
        self.frequency_scale = self.config.idle_frequency;
        tracing::debug!("Swim cancelled");
        true
    }
}
