//! Timing driver: keyframed value animators
//!
//! An [`Animator`] turns elapsed time into an interpolated value. It supports
//! a fixed duration, an easing curve, a repeat count (finite or infinite) and
//! a repeat mode (restart or ping-pong). Animators never block; the owner
//! calls [`Animator::advance`] once per frame with the frame's delta and
//! consumes the returned [`Tick`].

use std::time::Duration;

use crate::error::TimingError;


/// Easing curve applied to the linear time fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolator {
    #[default]
    Linear,
    /// Slow start, fast middle, slow end: `cos((t + 1)π) / 2 + 0.5`
    AccelerateDecelerate,
}

impl Interpolator {
    /// Map a linear fraction in `[0, 1]` onto the curve
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Interpolator::Linear => t,
            Interpolator::AccelerateDecelerate => {
                ((t + 1.0) * std::f32::consts::PI).cos() / 2.0 + 0.5
            }
        }
    }
}

/// How many times an animation repeats after its first run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    Finite(u32),
    Infinite,
}

impl RepeatCount {
    /// Raw value that means "repeat forever"
    pub const INFINITE_SENTINEL: i64 = -1;

    /// Validate a raw repeat count where `-1` means infinite
    pub fn from_raw(what: &'static str, count: i64) -> Result<Self, TimingError> {
        match count {
            Self::INFINITE_SENTINEL => Ok(RepeatCount::Infinite),
            n if n >= 0 => u32::try_from(n)
                .map(RepeatCount::Finite)
                .map_err(|_| TimingError::InvalidRepeatCount { what, count }),
            _ => Err(TimingError::InvalidRepeatCount { what, count }),
        }
    }

    /// Total number of runs, or `None` when infinite
    fn total_runs(self) -> Option<u64> {
        match self {
            RepeatCount::Finite(n) => Some(n as u64 + 1),
            RepeatCount::Infinite => None,
        }
    }
}

/// What happens at the end of each run when repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Jump back to the first keyframe
    #[default]
    Restart,
    /// Play the next run backwards (ping-pong)
    Reverse,
}

/// Validated timing parameters for one animator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSpec {
    pub duration: Duration,
    pub interpolator: Interpolator,
    pub repeat: RepeatCount,
    pub repeat_mode: RepeatMode,
}

impl TimingSpec {
    /// Single linear run of `duration`
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            interpolator: Interpolator::Linear,
            repeat: RepeatCount::Finite(0),
            repeat_mode: RepeatMode::Restart,
        }
    }

    /// Build from a raw millisecond value, rejecting negative or non-finite input
    pub fn from_millis(what: &'static str, millis: f64) -> Result<Self, TimingError> {
        if !millis.is_finite() || millis < 0.0 {
            return Err(TimingError::InvalidDuration { what, millis });
        }
        Ok(Self::new(Duration::from_secs_f64(millis / 1000.0)))
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    pub fn with_repeat(mut self, repeat: RepeatCount) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_repeat_mode(mut self, repeat_mode: RepeatMode) -> Self {
        self.repeat_mode = repeat_mode;
        self
    }
}

/// Result of advancing a running animator by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Interpolated keyframe value
    pub value: f32,
    /// Eased fraction of the current run (already reversed for ping-pong runs)
    pub fraction: f32,
    /// Number of run boundaries crossed during this advance
    pub repeated: u32,
    /// The animation reached its end during this advance
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running,
    Finished,
}

/// Keyframed value animator
#[derive(Debug, Clone)]
pub struct Animator {
    spec: TimingSpec,
    keyframes: Vec<f32>,
    elapsed: Duration,
    run: u64,
    state: State,
    last_fraction: f32,
}

impl Animator {
    /// Create an idle animator over `keyframes`, evenly spaced in time
    pub fn new(
        what: &'static str,
        spec: TimingSpec,
        keyframes: impl Into<Vec<f32>>,
    ) -> Result<Self, TimingError> {
        let keyframes = keyframes.into();
        if keyframes.is_empty() {
            return Err(TimingError::NoKeyframes { what });
        }
        Ok(Self {
            spec,
            keyframes,
            elapsed: Duration::ZERO,
            run: 0,
            state: State::Idle,
            last_fraction: 0.0,
        })
    }

    /// Timing the next [`start`](Self::start) will run with
    pub fn spec(&self) -> &TimingSpec {
        &self.spec
    }

    /// Change the duration; takes effect on the next [`start`](Self::start)
    pub fn set_duration(&mut self, duration: Duration) {
        self.spec.duration = duration;
    }

    /// Change the repeat count; takes effect on the next [`start`](Self::start)
    pub fn set_repeat(&mut self, repeat: RepeatCount) {
        self.spec.repeat = repeat;
    }

    /// (Re)start from the first keyframe. A running animation restarts.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.run = 0;
        self.last_fraction = self.spec.interpolator.apply(0.0);
        self.state = State::Running;
    }

    /// Stop a running animation. Returns `true` if it was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.state == State::Running;
        if was_running {
            self.state = State::Idle;
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Value at the last computed fraction
    pub fn value(&self) -> f32 {
        self.value_at(self.last_fraction)
    }

    /// Advance by `dt`. Returns `None` unless the animator is running.
    pub fn advance(&mut self, dt: Duration) -> Option<Tick> {
        if self.state != State::Running {
            return None;
        }
        self.elapsed += dt;

        let total_runs = self.spec.repeat.total_runs();
        let (run, linear, finished) = if self.spec.duration.is_zero() {
            // Zero-length animations jump straight to their final frame
            let last = total_runs.unwrap_or(1) - 1;
            (last, 1.0, true)
        } else {
            let raw = self.elapsed.as_secs_f64() / self.spec.duration.as_secs_f64();
            let run = raw.floor() as u64;
            match total_runs {
                Some(total) if run >= total => (total - 1, 1.0, true),
                _ => (run, raw.fract() as f32, false),
            }
        };

        let reversed = self.spec.repeat_mode == RepeatMode::Reverse && run % 2 == 1;
        let linear = if reversed { 1.0 - linear } else { linear };
        let fraction = self.spec.interpolator.apply(linear);

        let repeated = u32::try_from(run.saturating_sub(self.run)).unwrap_or(u32::MAX);
        self.run = run;
        self.last_fraction = fraction;
        if finished {
            self.state = State::Finished;
        }

        Some(Tick {
            value: self.value_at(fraction),
            fraction,
            repeated,
            finished,
        })
    }

    /// Piecewise-linear interpolation across the keyframes
    pub fn value_at(&self, fraction: f32) -> f32 {
        let frames = &self.keyframes;
        if frames.len() == 1 {
            return frames[0];
        }
        let span = (frames.len() - 1) as f32;
        let position = fraction.clamp(0.0, 1.0) * span;
        let index = (position.floor() as usize).min(frames.len() - 2);
        let local = position - index as f32;
        frames[index] + (frames[index + 1] - frames[index]) * local
    }
}
