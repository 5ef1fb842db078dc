//! Snapshot command - render one frame to SVG

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use finwave_core::{Paint, Rgba};

use crate::script::{Driver, SceneArgs};
use crate::svg::SvgSurface;

/// Overlay colour for the active swim path
const PATH_OVERLAY: Rgba = Rgba::rgb([40, 40, 40]).with_alpha(160);

/// Arguments for the snapshot command
#[derive(Args)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Simulation time of the frame in milliseconds
    #[arg(long, default_value_t = 0)]
    pub at_ms: u64,

    /// Output SVG file
    #[arg(short, long, default_value = "finwave.svg")]
    pub output: PathBuf,

    /// Overlay the active swim path
    #[arg(long)]
    pub show_path: bool,
}

/// Execute the snapshot command
pub fn execute(args: SnapshotArgs) -> Result<()> {
    let mut driver = args.scene.driver()?;
    let svg = render(&mut driver, Duration::from_millis(args.at_ms), args.show_path)?;
    std::fs::write(&args.output, svg)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), at_ms = args.at_ms, "Snapshot written");
    Ok(())
}

fn render(driver: &mut Driver, at: Duration, show_path: bool) -> Result<String> {
    driver.run_until(at)?;
    let sim = driver.sim();
    let viewport = &sim.config().viewport;

    let mut svg = SvgSurface::new(viewport.width, viewport.height);
    sim.draw(&mut svg).context("Frame could not be drawn")?;
    if let Some(path) = sim.active_path().filter(|_| show_path) {
        svg.draw_open_path(&path.to_path2d(), &Paint::stroke(PATH_OVERLAY, 2.0));
    }
    Ok(svg.finish())
}
