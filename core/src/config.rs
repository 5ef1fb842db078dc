//! Configuration (finwave.toml)
//!
//! Every section and field has a default, so an empty or partial file is
//! valid. Raw timing values are only checked by [`FinwaveConfig::validate`],
//! which turns them into [`TimingSpec`]s before the first tick.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::body::BodyConfig;
use crate::error::ConfigError;
use crate::geometry::Rect;
use crate::ripple::RippleConfig;
use crate::timing::{Interpolator, RepeatCount, RepeatMode, TimingSpec};
use crate::trajectory::SwimConfig;

/// Complete configuration.
///
/// Serialized to/from TOML; each section maps to one `[table]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FinwaveConfig {
    /// Body proportions and colours
    #[serde(default)]
    pub body: BodyConfig,
    /// Idle oscillation
    #[serde(default)]
    pub motion: MotionConfig,
    /// Swim path timing and frequency modulation
    #[serde(default)]
    pub swim: SwimConfig,
    /// Touch ripple
    #[serde(default)]
    pub ripple: RippleConfig,
    /// Drawing area and initial pose
    #[serde(default)]
    pub viewport: ViewportConfig,
}

/// Phase oscillator settings.
///
/// The phase sweeps `phase_start → phase_end` and back forever by default,
/// which keeps the wave arguments bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Phase at the start of a run, in degrees (default: 0)
    #[serde(default)]
    pub phase_start: f32,
    /// Phase at the end of a run, in degrees (default: 54000)
    #[serde(default = "default_phase_end")]
    pub phase_end: f32,
    /// Length of one run in milliseconds (default: 180000)
    #[serde(default = "default_phase_duration_ms")]
    pub phase_duration_ms: f64,
    /// Extra runs after the first; -1 repeats forever (default: -1)
    #[serde(default = "default_phase_repeat")]
    pub phase_repeat: i64,
    /// Behaviour at the end of each run (default: reverse)
    #[serde(default = "default_phase_repeat_mode")]
    pub phase_repeat_mode: RepeatMode,
    /// Easing of the phase sweep (default: linear)
    #[serde(default)]
    pub phase_interpolator: Interpolator,
}

/// Drawing area and the fish's starting pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Width of the drawing area (default: 1080)
    #[serde(default = "default_viewport_width")]
    pub width: f32,
    /// Height of the drawing area (default: 1920)
    #[serde(default = "default_viewport_height")]
    pub height: f32,
    /// Top-left of the fish's box at startup (default: [0, 0])
    #[serde(default)]
    pub start_origin: [f32; 2],
    /// Heading at startup in degrees, 90 is up the screen (default: 90)
    #[serde(default = "default_start_heading")]
    pub start_heading: f32,
}

fn default_phase_end() -> f32 {
    54_000.0
}
fn default_phase_duration_ms() -> f64 {
    180_000.0
}
fn default_phase_repeat() -> i64 {
    RepeatCount::INFINITE_SENTINEL
}
fn default_phase_repeat_mode() -> RepeatMode {
    RepeatMode::Reverse
}
fn default_viewport_width() -> f32 {
    1080.0
}
fn default_viewport_height() -> f32 {
    1920.0
}
fn default_start_heading() -> f32 {
    90.0
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            phase_start: 0.0,
            phase_end: default_phase_end(),
            phase_duration_ms: default_phase_duration_ms(),
            phase_repeat: default_phase_repeat(),
            phase_repeat_mode: default_phase_repeat_mode(),
            phase_interpolator: Interpolator::Linear,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
            start_origin: [0.0, 0.0],
            start_heading: default_start_heading(),
        }
    }
}

impl MotionConfig {
    pub fn phase_timing(&self) -> Result<TimingSpec, ConfigError> {
        Ok(TimingSpec::from_millis("phase", self.phase_duration_ms)?
            .with_interpolator(self.phase_interpolator)
            .with_repeat(RepeatCount::from_raw("phase", self.phase_repeat)?)
            .with_repeat_mode(self.phase_repeat_mode))
    }
}

impl ViewportConfig {
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    pub fn start_origin(&self) -> Vec2 {
        Vec2::from_array(self.start_origin)
    }
}

/// Timing derived from a validated configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedTimings {
    pub phase: TimingSpec,
    pub swim: TimingSpec,
    pub flutter: Duration,
    pub ripple: TimingSpec,
}

impl FinwaveConfig {
    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field that cannot be enforced by the type alone
    pub fn validate(&self) -> Result<ValidatedTimings, ConfigError> {
        positive("body.head_radius", self.body.head_radius)?;
        positive("swim.idle_frequency", self.swim.idle_frequency)?;
        positive("swim.swim_frequency", self.swim.swim_frequency)?;
        positive("swim.control_reach", self.swim.control_reach)?;
        positive("ripple.max_radius", self.ripple.max_radius)?;
        positive("ripple.stroke_width", self.ripple.stroke_width)?;
        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;
        finite("body.tail_flare", self.body.tail_flare)?;
        finite("body.fin_flutter_degrees", self.body.fin_flutter_degrees)?;
        finite("motion.phase_start", self.motion.phase_start)?;
        finite("motion.phase_end", self.motion.phase_end)?;
        finite("ripple.peak_alpha", self.ripple.peak_alpha)?;
        finite("viewport.start_heading", self.viewport.start_heading)?;
        finite("viewport.start_origin.x", self.viewport.start_origin[0])?;
        finite("viewport.start_origin.y", self.viewport.start_origin[1])?;

        Ok(ValidatedTimings {
            phase: self.motion.phase_timing()?,
            swim: self.swim.timing()?,
            flutter: self.swim.flutter_duration()?,
            ripple: self.ripple.timing()?,
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimingError;

    // =============================================================
    // Defaults
    // =============================================================

    #[test]
    fn test_config_default_validates() {
        let timings = FinwaveConfig::default().validate().unwrap();
        assert_eq!(timings.phase.duration, Duration::from_secs(180));
        assert_eq!(timings.phase.repeat, RepeatCount::Infinite);
        assert_eq!(timings.phase.repeat_mode, RepeatMode::Reverse);
        assert_eq!(timings.phase.interpolator, Interpolator::Linear);
        assert_eq!(timings.swim.duration, Duration::from_secs(2));
        assert_eq!(timings.swim.interpolator, Interpolator::AccelerateDecelerate);
        assert_eq!(timings.flutter, Duration::from_millis(500));
        assert_eq!(timings.ripple.duration, Duration::from_millis(300));
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config = FinwaveConfig::from_toml_str("").unwrap();
        assert_eq!(config, FinwaveConfig::default());
    }

    #[test]
    fn test_config_deserialize_partial_body() {
        let toml_str = r#"
[body]
head_radius = 20.0
"#;
        let config = FinwaveConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.body.head_radius, 20.0);
        assert_eq!(config.body.color, [244, 92, 71]); // default
        assert_eq!(config.swim, SwimConfig::default());
    }

    #[test]
    fn test_config_enums_use_snake_case() {
        let toml_str = r#"
[motion]
phase_repeat_mode = "restart"
phase_interpolator = "accelerate_decelerate"
"#;
        let config = FinwaveConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.motion.phase_repeat_mode, RepeatMode::Restart);
        assert_eq!(
            config.motion.phase_interpolator,
            Interpolator::AccelerateDecelerate
        );
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let mut config = FinwaveConfig::default();
        config.swim.restore_on_complete = false;
        config.viewport.start_origin = [12.0, 34.0];
        let text = config.to_toml_string().unwrap();
        assert_eq!(FinwaveConfig::from_toml_str(&text).unwrap(), config);
    }

    // =============================================================
    // Validation
    // =============================================================

    #[test]
    fn test_validate_rejects_negative_duration() {
        let mut config = FinwaveConfig::default();
        config.ripple.duration_ms = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Timing(TimingError::InvalidDuration { what: "ripple", .. }))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_repeat_count() {
        let mut config = FinwaveConfig::default();
        config.motion.phase_repeat = -3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Timing(TimingError::InvalidRepeatCount { count: -3, .. }))
        ));
    }

    #[test]
    fn test_validate_accepts_finite_repeat() {
        let mut config = FinwaveConfig::default();
        config.motion.phase_repeat = 4;
        let timings = config.validate().unwrap();
        assert_eq!(timings.phase.repeat, RepeatCount::Finite(4));
    }

    #[test]
    fn test_validate_rejects_zero_head_radius() {
        let mut config = FinwaveConfig::default();
        config.body.head_radius = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "body.head_radius", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_start_heading() {
        let mut config = FinwaveConfig::default();
        config.viewport.start_heading = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "viewport.start_heading", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_phase_end_from_toml() {
        let config = FinwaveConfig::from_toml_str("[motion]\nphase_end = nan\n").unwrap();
        assert!(config.motion.phase_end.is_nan());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "motion.phase_end", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_infinite_phase_start() {
        let mut config = FinwaveConfig::default();
        config.motion.phase_start = f32::NEG_INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "motion.phase_start", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_body_shape() {
        let mut config = FinwaveConfig::default();
        config.body.fin_flutter_degrees = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "body.fin_flutter_degrees", .. })
        ));

        let mut config = FinwaveConfig::default();
        config.body.tail_flare = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "body.tail_flare", .. })
        ));
    }

    #[test]
    fn test_validate_accepts_zero_flutter_and_flare() {
        let mut config = FinwaveConfig::default();
        config.body.fin_flutter_degrees = 0.0;
        config.body.tail_flare = 0.0;
        config.ripple.peak_alpha = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nan_control_reach() {
        let mut config = FinwaveConfig::default();
        config.swim.control_reach = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "swim.control_reach", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_ripple_paint() {
        let mut config = FinwaveConfig::default();
        config.ripple.stroke_width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "ripple.stroke_width", .. })
        ));

        let mut config = FinwaveConfig::default();
        config.ripple.peak_alpha = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "ripple.peak_alpha", .. })
        ));
    }

    // =============================================================
    // Files
    // =============================================================

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finwave.toml");
        std::fs::write(&path, "[ripple]\nmax_radius = 90.0\n").unwrap();

        let config = FinwaveConfig::load(&path).unwrap();
        assert_eq!(config.ripple.max_radius, 90.0);
        assert_eq!(config.ripple.stroke_width, 8.0);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = FinwaveConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[body\nhead_radius = ").unwrap();
        assert!(matches!(
            FinwaveConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
