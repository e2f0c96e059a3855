use clap::Parser;
use controls::{parse_control_script, ControlCommand, ControlScript};
use std::{fs, path::PathBuf};
use tracing::{info, warn};

use orrery_lib::{
    gui::{GuiState, GuiViewControl, KissCanvas},
    scenario::Scenario,
    scene::HeadlessCanvas,
    system::{FixedView, System},
};

#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Scenario configuration toml file.
    ///
    /// The default nominal scenario is used when not provided.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Start with playback stopped
    #[arg(long)]
    pause: bool,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames.
    ///
    /// Headless runs default to the end of the control script, or 1000 frames
    /// without one.
    #[arg(long)]
    frames: Option<u64>,

    /// Control script file, applies frame-stamped commands
    #[arg(long)]
    script: Option<PathBuf>,
}

const DEFAULT_HEADLESS_FRAMES: u64 = 1000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let intr = interruptor::Interruptor::new();
    let intr_clone = intr.clone();
    ctrlc::set_handler(move || {
        if intr_clone.is_set() {
            let exit_code = if cfg!(target_family = "unix") {
                // 128 (fatal error signal "n") + 2 (control-c is fatal error signal 2)
                130
            } else {
                // Windows code 3221225786
                // -1073741510 == C000013A
                -1073741510
            };
            std::process::exit(exit_code);
        } else {
            intr_clone.set();
        }
    })?;

    let mut scenario = Scenario::load(opts.scenario.as_ref())?;
    if opts.pause {
        scenario.playback.start_paused = true;
    }

    let mut script = match opts.script.as_ref() {
        Some(path) => {
            info!(script = %path.display(), "Loading control script");
            let text = fs::read_to_string(path)?;
            Some(parse_control_script(&text)?)
        }
        None => None,
    };

    let max_frames = opts.frames.or_else(|| {
        opts.headless.then(|| {
            script
                .as_ref()
                .and_then(ControlScript::last_frame)
                .map(|f| f + 1)
                .unwrap_or(DEFAULT_HEADLESS_FRAMES)
        })
    });

    let system = if opts.headless {
        let mut system = System::new(&scenario, Box::new(HeadlessCanvas::new()))?;
        let mut view = FixedView;
        while !done(&system, max_frames, &intr) {
            run_script(&mut system, script.as_mut());
            system.frame(&mut view);
        }
        system
    } else {
        let gui = GuiState::new_shared("Orrery", &scenario.camera);
        let mut system = System::new(&scenario, Box::new(KissCanvas::new(gui.clone())))?;
        let mut view = GuiViewControl::new(gui.clone());
        while !done(&system, max_frames, &intr) {
            run_script(&mut system, script.as_mut());
            system.frame(&mut view);

            if !gui.borrow_mut().render(&system) {
                break;
            }

            let commands = gui.borrow_mut().take_commands();
            for cmd in commands.into_iter() {
                apply(&mut system, cmd);
            }
        }
        system
    };

    info!(
        frames = system.sim_info().frame,
        fps = system.sim_info().frame_rate(),
        time = %system.time_step(),
        focus = %system.focused_kind(),
        state = %system.state(),
        "Simulation stopped"
    );
    println!("Stopped at\n{:#?}", system.sim_info());
    for (_, body) in system.scene().bodies() {
        let p = body.position;
        println!("{:>8}: [{:.3}, {:.3}, {:.3}]", body.kind.name(), p.x, p.y, p.z);
    }

    Ok(())
}

fn done(system: &System, max_frames: Option<u64>, intr: &interruptor::Interruptor) -> bool {
    intr.is_set()
        || max_frames
            .map(|max| system.sim_info().frame >= max)
            .unwrap_or(false)
}

fn run_script(system: &mut System, script: Option<&mut ControlScript>) {
    if let Some(script) = script {
        for cmd in script.due(system.sim_info().frame) {
            apply(system, cmd);
        }
    }
}

fn apply(system: &mut System, cmd: ControlCommand) {
    if let Err(e) = system.apply(cmd) {
        warn!(command = cmd.name(), err = %e, "Command rejected");
    }
}

mod interruptor {
    use std::sync::atomic::{AtomicBool, Ordering::SeqCst};
    use std::sync::Arc;

    #[derive(Clone, Debug)]
    #[repr(transparent)]
    pub struct Interruptor(Arc<AtomicBool>);

    impl Interruptor {
        pub fn new() -> Self {
            Interruptor(Arc::new(AtomicBool::new(false)))
        }

        pub fn set(&self) {
            self.0.store(true, SeqCst);
        }

        pub fn is_set(&self) -> bool {
            self.0.load(SeqCst)
        }
    }

    impl Default for Interruptor {
        fn default() -> Self {
            Self::new()
        }
    }
}
