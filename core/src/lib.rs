//! Finwave Core - procedural swimming fish
//!
//! This crate computes and draws a fish whose body is a chain of joints
//! oscillating around a heading, and steers it along cubic swim paths toward
//! touch points.
//!
//! # Architecture
//!
//! - [`BodyKinematics`] - Pure skeleton computation from heading and phase
//! - [`SwimController`] - Swim paths, tangent heading and frequency modulation
//! - [`Animator`] - Keyframed timers driving phase, flutter, swim and ripple
//! - [`Simulation`] - Owns the timers and pose, produces draw commands per frame
//! - [`RenderSurface`] - Host drawing backend; [`CommandBuffer`] records frames

pub mod body;
pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
pub mod ripple;
pub mod sim;
pub mod timing;
pub mod trajectory;

// Re-export the kinematics entry points
pub use body::{BodyConfig, BodyKinematics, Skeleton, draw_skeleton, render_skeleton};
pub use geometry::{Rect, offset_point};

// Re-export trajectory types
pub use trajectory::{PathSample, SwimConfig, SwimController, SwimPath, SwimPlan, turn_angle};

// Re-export timing types
pub use timing::{Animator, Interpolator, RepeatCount, RepeatMode, Tick, TimingSpec};

// Re-export rendering types
pub use render::{CommandBuffer, DrawCommand, Paint, PaintStyle, Path2D, RenderSurface, Rgba};
pub use ripple::{RippleConfig, RippleEffect, RippleFrame};

// Re-export simulation and configuration
pub use config::{FinwaveConfig, MotionConfig, ViewportConfig};
pub use error::{ConfigError, KinematicsError, SimError, TimingError};
pub use sim::{SimState, Simulation, draw_frame};
