//! Scripted touches and the fixed-step driver shared by all commands

use std::collections::VecDeque;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use finwave_core::{SimState, Simulation, SwimPlan};
use glam::Vec2;

/// Scene options shared by `simulate` and `snapshot`
#[derive(Args)]
pub struct SceneArgs {
    /// Configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Random seed for the flutter repeat counts
    #[arg(long, default_value_t = finwave_core::sim::DEFAULT_SEED)]
    pub seed: u64,

    /// Simulation steps per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Touch at a time offset, as `MS:X,Y` (repeatable)
    #[arg(long = "touch", value_name = "MS:X,Y")]
    pub touches: Vec<TouchEvent>,
}

impl SceneArgs {
    /// Build the simulation and its driver
    pub fn driver(&self) -> Result<Driver> {
        if self.fps == 0 {
            bail!("--fps must be at least 1");
        }
        let config = crate::config::load(self.config.as_deref())?;
        let sim = Simulation::seeded(config, self.seed).context("Invalid configuration")?;
        Ok(Driver::new(
            sim,
            self.touches.clone(),
            Duration::from_secs(1) / self.fps,
        ))
    }
}

/// One scripted touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub at: Duration,
    pub point: Vec2,
}

impl FromStr for TouchEvent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (time, point) = s
            .split_once(':')
            .with_context(|| format!("Touch '{s}' must look like MS:X,Y"))?;
        let (x, y) = point
            .split_once(',')
            .with_context(|| format!("Touch point '{point}' must look like X,Y"))?;

        let millis: u64 = time
            .trim()
            .parse()
            .with_context(|| format!("Invalid touch time '{time}'"))?;
        let x: f32 = x.trim().parse().with_context(|| format!("Invalid x '{x}'"))?;
        let y: f32 = y.trim().parse().with_context(|| format!("Invalid y '{y}'"))?;

        Ok(Self {
            at: Duration::from_millis(millis),
            point: Vec2::new(x, y),
        })
    }
}

/// Result of one driver step
#[derive(Debug)]
pub struct Step {
    pub state: SimState,
    /// Swims started just before this step's tick
    pub swims: Vec<SwimPlan>,
}

/// Fixed-step driver that fires scripted touches on time
pub struct Driver {
    sim: Simulation,
    pending: VecDeque<TouchEvent>,
    dt: Duration,
    clock: Duration,
}

impl Driver {
    pub fn new(sim: Simulation, mut touches: Vec<TouchEvent>, dt: Duration) -> Self {
        touches.sort_by_key(|touch| touch.at);
        Self {
            sim,
            pending: touches.into(),
            dt,
            clock: Duration::ZERO,
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn dt(&self) -> Duration {
        self.dt
    }

    /// Fire due touches, then advance one step
    pub fn step(&mut self) -> Result<Step> {
        let mut swims = Vec::new();
        while let Some(touch) = self.pending.front().copied() {
            if touch.at > self.clock {
                break;
            }
            self.pending.pop_front();
            let plan = self
                .sim
                .touch(touch.point)
                .with_context(|| format!("Touch at {} ms rejected", touch.at.as_millis()))?;
            swims.push(plan);
        }

        let state = self.sim.tick(self.dt);
        self.clock += self.dt;
        Ok(Step { state, swims })
    }

    /// Step until the clock reaches `time`
    pub fn run_until(&mut self, time: Duration) -> Result<()> {
        while self.clock < time {
            self.step()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finwave_core::FinwaveConfig;

    #[test]
    fn test_parse_touch() {
        let touch: TouchEvent = "1500:200.5, 300".parse().unwrap();
        assert_eq!(touch.at, Duration::from_millis(1500));
        assert_eq!(touch.point, Vec2::new(200.5, 300.0));
    }

    #[test]
    fn test_parse_touch_rejects_garbage() {
        assert!("200,300".parse::<TouchEvent>().is_err());
        assert!("10:200".parse::<TouchEvent>().is_err());
        assert!("-5:1,2".parse::<TouchEvent>().is_err());
        assert!("5:a,2".parse::<TouchEvent>().is_err());
    }

    #[test]
    fn test_driver_fires_touches_in_order() {
        let sim = Simulation::new(FinwaveConfig::default()).unwrap();
        let touches = vec![
            "100:900,900".parse().unwrap(),
            "0:300,300".parse().unwrap(),
        ];
        let mut driver = Driver::new(sim, touches, Duration::from_millis(50));

        let first = driver.step().unwrap();
        assert_eq!(first.swims.len(), 1);
        assert!(first.state.swimming);

        assert!(driver.step().unwrap().swims.is_empty());
        let third = driver.step().unwrap();
        assert_eq!(third.swims.len(), 1);
        assert!(third.swims[0].superseded);
    }

    #[test]
    fn test_run_until_reaches_time() {
        let sim = Simulation::new(FinwaveConfig::default()).unwrap();
        let mut driver = Driver::new(sim, Vec::new(), Duration::from_millis(20));
        driver.run_until(Duration::from_millis(100)).unwrap();
        assert_eq!(driver.sim().state().frame, 5);
    }

    #[test]
    fn test_non_finite_touch_fails_the_run() {
        let sim = Simulation::new(FinwaveConfig::default()).unwrap();
        let touches = vec!["0:NaN,1".parse().unwrap()];
        let mut driver = Driver::new(sim, touches, Duration::from_millis(20));
        assert!(driver.step().is_err());
    }
}
