//! Simulate command - step the simulation and write a JSON trace

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use finwave_core::SimState;
use serde::Serialize;

use crate::script::{Driver, SceneArgs};

/// Arguments for the simulate command
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Number of steps to run
    #[arg(short, long, default_value_t = 300)]
    pub frames: u64,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

/// One frame of the trace
#[derive(Serialize)]
struct TraceFrame {
    #[serde(flatten)]
    state: SimState,
    /// Number of draw calls the frame produces
    draw_commands: usize,
    /// Turn angles of swims started on this frame
    #[serde(skip_serializing_if = "Vec::is_empty")]
    swims_started: Vec<f32>,
}

#[derive(Serialize)]
struct Trace {
    seed: u64,
    step_ms: f64,
    frames: Vec<TraceFrame>,
}

/// Execute the simulate command
pub fn execute(args: SimulateArgs) -> Result<()> {
    let mut driver = args.scene.driver()?;
    let trace = Trace {
        seed: args.scene.seed,
        step_ms: driver.dt().as_secs_f64() * 1000.0,
        frames: run(&mut driver, args.frames)?,
    };
    tracing::info!(frames = trace.frames.len(), "Simulation finished");

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    if args.pretty {
        serde_json::to_writer_pretty(&mut writer, &trace)?;
    } else {
        serde_json::to_writer(&mut writer, &trace)?;
    }
    writeln!(writer)?;
    writer.flush().context("Failed to write trace")?;
    Ok(())
}

fn run(driver: &mut Driver, frames: u64) -> Result<Vec<TraceFrame>> {
    let mut trace = Vec::new();
    for _ in 0..frames {
        let step = driver.step()?;
        let draw_commands = driver
            .sim()
            .compose_frame()
            .context("Frame could not be composed")?
            .len();
        trace.push(TraceFrame {
            state: step.state,
            draw_commands,
            swims_started: step.swims.iter().map(|plan| plan.turn_angle).collect(),
        });
    }
    Ok(trace)
}
