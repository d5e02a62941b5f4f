use nbody_sandbox::stats::pair_distances;
use nbody_sandbox::{EnergyStats, Experiment, Preset, PresetChoice, SandboxConfig};

use anyhow::{Context, Result};
use clap::Parser;

use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

/// Headless runner: builds a sandbox and drives it with synthetic frame timestamps.
#[derive(Parser, Debug)]
struct Args {
    /// JSON configuration file. Overrides `--experiment` and `--preset`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "gravity")]
    experiment: ExperimentArg,

    /// Preset to load; defaults to the experiment's own. `none` starts empty.
    #[arg(short, long, value_enum)]
    preset: Option<PresetArg>,

    /// Number of frames to run.
    #[arg(short, long, default_value_t = 600)]
    frames: usize,

    /// Simulated display refresh rate in Hz.
    #[arg(long, default_value_t = 60.0)]
    refresh: f64,

    /// Log energy every N frames (0 disables).
    #[arg(long, default_value_t = 60)]
    report_every: usize,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ExperimentArg {
    Gravity,
    Electrostatics,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PresetArg {
    None,
    SolarSystem,
    Dipole,
    RepulsionLattice,
    AttractionChain,
}

impl From<ExperimentArg> for Experiment {
    fn from(arg: ExperimentArg) -> Self {
        match arg {
            ExperimentArg::Gravity => Experiment::Gravity,
            ExperimentArg::Electrostatics => Experiment::Electrostatics,
        }
    }
}

impl From<PresetArg> for PresetChoice {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::None => PresetChoice::Empty,
            PresetArg::SolarSystem => Preset::SolarSystem.into(),
            PresetArg::Dipole => Preset::Dipole.into(),
            PresetArg::RepulsionLattice => Preset::RepulsionLattice.into(),
            PresetArg::AttractionChain => Preset::AttractionChain.into(),
        }
    }
}

fn load_config(args: &Args) -> Result<SandboxConfig> {
    if let Some(path) = &args.config {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        return SandboxConfig::from_json(&json)
            .with_context(|| format!("parsing config {}", path.display()));
    }

    Ok(SandboxConfig {
        experiment: args.experiment.into(),
        preset: args.preset.map_or(PresetChoice::Default, PresetChoice::from),
        ..SandboxConfig::default()
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    anyhow::ensure!(args.refresh > 0.0, "refresh rate must be positive");

    let config = load_config(&args)?;
    let mut engine = config.build_engine();
    let initial = engine.measure_energy();

    let report_every = args.report_every;
    let frames_seen = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&frames_seen);
    let laws = engine.force_laws().to_vec();
    let params = *engine.params();
    engine.set_on_update(move |bodies, dt| {
        let frame = counter.get() + 1;
        counter.set(frame);
        if report_every > 0 && frame % report_every == 0 {
            let energy = EnergyStats::measure(bodies, &laws, &params);
            log::info!(
                "frame {frame}: dt={dt:.4}s bodies={} KE={:.3} PE={:.3} E={:.3}",
                bodies.len(),
                energy.kinetic,
                energy.potential,
                energy.total
            );
        }
    });

    let frame_ms = 1000.0 / args.refresh;
    engine.start();
    for i in 0..args.frames {
        engine.tick(i as f64 * frame_ms);
    }
    engine.pause();

    let stats = engine.stats();
    println!("experiment   {:?}", config.experiment);
    println!("frames       {}", frames_seen.get());
    println!("bodies       {}", engine.bodies().len());
    println!("fps          {}", engine.fps());
    println!("KE           {:.4}", stats.kinetic);
    println!("PE           {:.4}", stats.potential);
    println!("E            {:.4}", stats.total);
    println!("E drift      {:.4}%", stats.relative_drift(&initial) * 100.0);
    let momentum = engine.momentum();
    println!("momentum     ({:.4}, {:.4})", momentum.x, momentum.y);
    for body in engine.bodies().iter().filter(|b| !b.fixed) {
        println!(
            "  {:>10} {:<8} pos=({:.1}, {:.1}) speed={:.3}",
            body.id().to_string(),
            body.label,
            body.pos.x,
            body.pos.y,
            body.vel.mag()
        );
    }
    for pair in pair_distances(engine.bodies(), 4) {
        println!("  {} <-> {}  {:.1}", pair.a, pair.b, pair.distance);
    }

    Ok(())
}
