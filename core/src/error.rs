//! Error types for the fish simulation
//!
//! Each concern gets its own enum so callers can match on exactly the
//! failures that operation can produce.

use std::path::PathBuf;

/// Failure while deriving the skeleton for a frame
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    /// A kinematic input was NaN or infinite
    #[error("non-finite {name} ({value}) passed to skeleton computation")]
    NonFinite { name: &'static str, value: f32 },
}

impl KinematicsError {
    /// Reject `value` if it is NaN or infinite
    pub(crate) fn check(name: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { name, value })
        }
    }
}

/// Invalid timing configuration, reported at setup time
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimingError {
    /// Duration was negative, NaN or infinite
    #[error("{what}: duration must be a finite, non-negative number of milliseconds (got {millis})")]
    InvalidDuration { what: &'static str, millis: f64 },

    /// Repeat count below -1 (the infinite sentinel)
    #[error("{what}: repeat count {count} is invalid (use -1 for infinite)")]
    InvalidRepeatCount { what: &'static str, count: i64 },

    /// Animator needs at least one keyframe value
    #[error("{what}: animator requires at least one keyframe")]
    NoKeyframes { what: &'static str },
}

/// Configuration loading or validation failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Timing(#[from] TimingError),

    /// A numeric field that must be positive and finite was not
    #[error("{field} must be positive and finite (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },
}

/// Errors surfaced by [`crate::Simulation`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Someone other than the swim controller tried to steer mid-swim
    #[error("heading is owned by the active swim path")]
    HeadingLocked,

    /// Touch coordinates were NaN or infinite
    #[error("touch point ({x}, {y}) is not finite")]
    InvalidTouch { x: f32, y: f32 },

    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}
