//! Frame-stepped simulation of one fish
//!
//! [`Simulation`] owns the four independent timers (phase, fin flutter, swim
//! and ripple) and advances them all by the same delta on every
//! [`tick`](Simulation::tick). The fish pose is an *origin* (top-left of its
//! box) plus a heading; the kinematic anchor sits at a fixed offset from the
//! origin.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::body::{BodyKinematics, Skeleton, draw_skeleton};
use crate::config::FinwaveConfig;
use crate::error::{ConfigError, KinematicsError, SimError};
use crate::render::{CommandBuffer, DrawCommand, RenderSurface};
use crate::ripple::{RippleEffect, RippleFrame};
use crate::timing::{Animator, Interpolator, RepeatCount, RepeatMode, TimingSpec};
use crate::trajectory::{SwimController, SwimPath, SwimPlan};

/// Seed used by [`Simulation::new`]
pub const DEFAULT_SEED: u64 = 0x5EED_F15F;

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimState {
    pub frame: u64,
    pub elapsed_ms: f64,
    /// Top-left of the fish's box
    pub origin: Vec2,
    /// Kinematic anchor (body pivot)
    pub anchor: Vec2,
    pub heading: f32,
    pub phase: f32,
    pub frequency_scale: f32,
    pub fin_flutter: f32,
    pub swimming: bool,
    pub ripple: Option<RippleFrame>,
}

/// A single fish reacting to touches
#[derive(Debug, Clone)]
pub struct Simulation<R = Pcg32> {
    config: FinwaveConfig,
    body: BodyKinematics,
    phase: Animator,
    flutter: Animator,
    swim: SwimController,
    ripple: RippleEffect,
    origin: Vec2,
    heading: f32,
    frame: u64,
    elapsed: Duration,
    rng: R,
}

impl Simulation<Pcg32> {
    /// Simulation with the default deterministic seed
    pub fn new(config: FinwaveConfig) -> Result<Self, ConfigError> {
        Self::seeded(config, DEFAULT_SEED)
    }

    pub fn seeded(config: FinwaveConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Validate `config` and start the idle oscillation
    pub fn with_rng(config: FinwaveConfig, mut rng: R) -> Result<Self, ConfigError> {
        let timings = config.validate()?;

        let mut phase = Animator::new(
            "phase",
            timings.phase,
            [config.motion.phase_start, config.motion.phase_end],
        )?;
        phase.start();

        // Phase repeats flutter before the first touch picks its own count
        let repeat = rng.random_range(0..=config.swim.flutter_max_repeat);
        let amplitude = config.body.fin_flutter_degrees;
        let flutter = Animator::new(
            "flutter",
            TimingSpec::new(timings.flutter)
                .with_interpolator(Interpolator::AccelerateDecelerate)
                .with_repeat(RepeatCount::Finite(repeat))
                .with_repeat_mode(RepeatMode::Reverse),
            [0.0, amplitude, 0.0],
        )?;

        let swim = SwimController::new(config.swim.clone())?;
        let ripple = RippleEffect::new(config.ripple.clone())?;

        Ok(Self {
            body: BodyKinematics::new(config.body.clone()),
            origin: config.viewport.start_origin(),
            heading: config.viewport.start_heading,
            config,
            phase,
            flutter,
            swim,
            ripple,
            frame: 0,
            elapsed: Duration::ZERO,
            rng,
        })
    }

    pub fn config(&self) -> &FinwaveConfig {
        &self.config
    }

    pub fn body(&self) -> &BodyKinematics {
        &self.body
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn anchor(&self) -> Vec2 {
        self.origin + self.config.body.pivot_offset()
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn frequency_scale(&self) -> f32 {
        self.swim.frequency_scale()
    }

    pub fn is_swimming(&self) -> bool {
        self.swim.is_swimming()
    }

    pub fn active_path(&self) -> Option<&SwimPath> {
        self.swim.active_path()
    }

    /// Steer the fish directly. Rejected while a swim owns the heading.
    pub fn set_heading(&mut self, heading: f32) -> Result<(), SimError> {
        if self.swim.is_swimming() {
            return Err(SimError::HeadingLocked);
        }
        self.heading = KinematicsError::check("heading", heading)?;
        Ok(())
    }

    /// Start a ripple and a swim toward `point`
    pub fn touch(&mut self, point: Vec2) -> Result<SwimPlan, SimError> {
        if !point.is_finite() {
            tracing::warn!(x = point.x, y = point.y, "Ignoring non-finite touch");
            return Err(SimError::InvalidTouch {
                x: point.x,
                y: point.y,
            });
        }

        self.ripple.trigger(point);
        let plan = self.swim.on_interaction(
            &self.body,
            self.origin,
            self.heading,
            point,
            &mut self.rng,
        );

        self.flutter.set_duration(plan.flutter.duration);
        self.flutter.set_repeat(RepeatCount::Finite(plan.flutter.repeat));
        self.flutter.start();
        Ok(plan)
    }

    /// Advance every timer by `dt` and return the resulting state
    pub fn tick(&mut self, dt: Duration) -> SimState {
        self.frame += 1;
        self.elapsed += dt;

        let phase_repeated = self
            .phase
            .advance(dt)
            .is_some_and(|tick| tick.repeated > 0);
        if phase_repeated {
            tracing::debug!(
                frame = self.frame,
                repeat = ?self.flutter.spec().repeat,
                "Phase repeated, restarting fin flutter"
            );
            self.flutter.start();
        }
        self.flutter.advance(dt);

        if let Some(step) = self.swim.advance(dt) {
            self.origin = step.origin;
            if let Some(heading) = step.heading {
                self.heading = heading;
            }
        }

        self.ripple.advance(dt);
        self.state()
    }

    /// Snapshot of the current state without advancing
    pub fn state(&self) -> SimState {
        SimState {
            frame: self.frame,
            elapsed_ms: self.elapsed.as_secs_f64() * 1000.0,
            origin: self.origin,
            anchor: self.anchor(),
            heading: self.heading,
            phase: self.phase.value(),
            frequency_scale: self.swim.frequency_scale(),
            fin_flutter: self.flutter.value(),
            swimming: self.swim.is_swimming(),
            ripple: self.ripple.frame(),
        }
    }

    pub fn skeleton(&self) -> Result<Skeleton, SimError> {
        skeleton_for(&self.body, &self.state())
    }

    /// Draw the current frame onto `surface`
    pub fn draw<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> Result<(), SimError> {
        draw_frame(&self.state(), &self.body, &self.config, surface)
    }

    /// Record the current frame as draw commands
    pub fn compose_frame(&self) -> Result<Vec<DrawCommand>, SimError> {
        let mut buffer = CommandBuffer::new();
        self.draw(&mut buffer)?;
        Ok(buffer.into_commands())
    }
}

fn skeleton_for(body: &BodyKinematics, state: &SimState) -> Result<Skeleton, SimError> {
    Ok(body.compute_skeleton(
        state.anchor,
        state.heading,
        state.phase,
        state.frequency_scale,
        state.fin_flutter,
    )?)
}

/// Draw `state`: the ripple ring first, then the fish inside a translucent
/// full-viewport layer. Nothing is drawn if the skeleton cannot be computed.
pub fn draw_frame<S: RenderSurface + ?Sized>(
    state: &SimState,
    body: &BodyKinematics,
    config: &FinwaveConfig,
    surface: &mut S,
) -> Result<(), SimError> {
    let skeleton = skeleton_for(body, state)?;

    if let Some(ripple) = &state.ripple {
        ripple.draw(&config.ripple, surface);
    }

    surface.begin_layer(config.viewport.bounds(), config.body.layer_alpha);
    draw_skeleton(&skeleton, &config.body, surface);
    surface.end_layer();
    Ok(())
}
