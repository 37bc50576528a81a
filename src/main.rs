use std::path::PathBuf;

use mimalloc::MiMalloc;
use structopt::StructOpt;
use tracing::Level;

use logic_gates::config::{EngineConfig, NotInput};
use logic_gates::edit;
use logic_gates::engine::{Engine, TickReport};
use logic_gates::store::GateStore;
use logic_gates::world::GridWorld;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(StructOpt, Debug)]
#[structopt(name = "logic-gates", about = "Runs logic gates built in a block scene")]
struct Opt {
    /// Scene file: a JSON list of `{ "pos": [x, y, z], "block": {...} }`
    #[structopt(parse(from_os_str))]
    scene: PathBuf,

    /// Engine settings
    #[structopt(long, parse(from_os_str), default_value = "config.json")]
    config: PathBuf,

    /// Saved gates, read at startup and written back on exit
    #[structopt(long, parse(from_os_str), default_value = "gates.json")]
    gates: PathBuf,

    #[structopt(long, default_value = "world")]
    world: String,

    #[structopt(long, default_value = "20")]
    ticks: u64,

    /// Register every gate structure found in the scene
    #[structopt(long)]
    scan: bool,

    #[structopt(long)]
    fast: bool,

    /// Only accept wires, repeaters and comparators that point at the gate
    #[structopt(long)]
    redstone_compatibility: bool,

    /// Face NOT gates read from: default or opposite
    #[structopt(long)]
    not_input: Option<NotInput>,

    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> eyre::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = EngineConfig::load(&opt.config)?;
    if opt.fast {
        config.fast_mode = true;
    }
    if opt.redstone_compatibility {
        config.redstone_compatibility = true;
    }
    if let Some(not_input) = opt.not_input {
        config.not_gate_input = not_input;
    }
    config.verify()?;

    let redstone_compatibility = config.redstone_compatibility;
    let mut engine = Engine::new(config);
    let mut world = GridWorld::load(&opt.scene)?
        .with_notifier(engine.sender())
        .with_redstone_compatibility(redstone_compatibility);

    let store = GateStore::new(&opt.gates, &opt.world);
    engine.restore(store.load()?, &world);

    if opt.scan {
        if let Some(region) = world.bounds() {
            let stash = edit::stash(&engine, &region);
            let candidates = edit::scan_region(&region, &world);
            edit::apply_candidates(&mut engine, &candidates, &stash);
        }
    }

    let mut total = TickReport::default();
    for _ in 0..opt.ticks {
        let report = engine.tick(&mut world);
        tracing::debug!("{:?}", report);
        total.merge(&report);
    }

    tracing::info!(
        "ran {} ticks: {} evaluations, {} writes, {} deferred, {} faults",
        total.tick,
        total.evaluated,
        total.writes,
        total.deferred,
        total.faults
    );
    tracing::debug!("\n{:?}", world);

    store.save(&engine.view().snapshot())?;

    Ok(())
}
