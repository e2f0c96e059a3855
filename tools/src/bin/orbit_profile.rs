// cargo run --bin orbit-profile --release -- --body moon --frames 20000 --speed 10 /tmp/moon.txt

use clap::Parser;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;

use bodies::prelude::BodyKind;
use orrery_lib::{
    scenario::Scenario,
    scene::HeadlessCanvas,
    system::{FixedView, System},
};

/// Print a body's position over time
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Scenario configuration toml file.
    ///
    /// The default nominal scenario is used when not provided.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Body name
    #[arg(short = 'b', long)]
    body: BodyKind,

    /// Number of frames
    #[arg(short = 'f', long)]
    frames: u64,

    /// Speed multiplier
    #[arg(short = 's', long)]
    speed: Option<u32>,

    /// Output file path to write
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let mut scenario = Scenario::load(opts.scenario.as_ref())?;
    scenario.playback.start_paused = false;
    if let Some(m) = opts.speed {
        scenario.playback.speed_multiplier = m;
    }

    let mut system = System::new(&scenario, Box::new(HeadlessCanvas::new()))?;
    let body = system
        .scene()
        .find(opts.body)
        .ok_or_else(|| format!("Body '{}' isn't part of the scenario", opts.body))?;
    let parent = system.scene().body(body).parent;

    let mut output = File::create(opts.output)?;

    for _ in 0..opts.frames {
        let t = system.frame(&mut FixedView);
        let p = system.scene().position(body);
        let parent_distance = parent
            .map(|id| (p - system.scene().position(id)).norm())
            .unwrap_or(0.0);

        writeln!(
            &mut output,
            "{} {} {} {} {} {}",
            system.sim_info().frame,
            t.as_f64(),
            p.x,
            p.y,
            p.z,
            parent_distance,
        )?;
    }

    Ok(())
}
