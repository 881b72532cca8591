use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use terminal::{is_deploy_location, Config, Edge, GameState, Position, UnitType, Verbosity};
use terminal_bot_utils::Algo;
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
    /// How to treat rule violations: "suppress", "warning", "invariant" or "crash"
    #[arg(short, long, default_value = "warning")]
    verbosity: Verbosity,
    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);
    StarterBot::new(seed, args.verbosity).run()
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    // Stdout is reserved for the engine
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Destructors are rebuilt first, they matter most.
const DESTRUCTORS: [(i32, i32); 3] = [(11, 7), (13, 9), (15, 11)];

/// A "C" on the left and a "1" on the right.
const FILTERS: [(i32, i32); 15] = [
    (8, 11),
    (9, 11),
    (7, 10),
    (7, 9),
    (7, 8),
    (8, 7),
    (9, 7),
    (17, 11),
    (18, 11),
    (18, 10),
    (18, 9),
    (18, 8),
    (17, 7),
    (18, 7),
    (19, 7),
];

/// Filters with less than this fraction of their health left are replaced.
const DAMAGED_FRACTION: f64 = 0.25;

/// Above this many enemy structures, an EMP is sent instead of pings.
const EMP_THRESHOLD: usize = 10;

/// Free pings would otherwise be sent without limit.
const MAX_PINGS: u32 = 100;

struct StarterBot {
    rng: StdRng,
    verbosity: Verbosity,
}

impl StarterBot {
    fn new(seed: u64, verbosity: Verbosity) -> Self {
        StarterBot {
            rng: StdRng::seed_from_u64(seed),
            verbosity,
        }
    }
}

impl Algo for StarterBot {
    fn on_game_start(&mut self, config: &Config) {
        info!(
            "Configuring the starter strategy, {} unit types known",
            config.unit_information.len()
        );
    }

    fn on_turn(&mut self, state: &mut GameState) -> anyhow::Result<()> {
        info!("Performing turn {}", state.turn_number());
        build_defences(state)?;
        remove_damaged_filters(state)?;
        deploy_attackers(state, &mut self.rng)?;
        Ok(())
    }

    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

fn build_defences(state: &mut GameState) -> anyhow::Result<()> {
    for (unit_type, locations) in [
        (UnitType::Destructor, &DESTRUCTORS[..]),
        (UnitType::Filter, &FILTERS[..]),
    ] {
        // Checked one by one, the money may run out halfway
        let mut built = 0;
        for &location in locations {
            let position = Position::from(location);
            if state.can_spawn(unit_type, position, 1) {
                built += state.attempt_spawn(unit_type, &[position], 1)?;
            }
        }
        if built > 0 {
            debug!("Built {} units of type {}", built, unit_type);
        }
    }
    Ok(())
}

fn remove_damaged_filters(state: &mut GameState) -> anyhow::Result<()> {
    let damaged: Vec<Position> = state
        .map()
        .units()
        .filter(|unit| unit.owner == 0 && unit.unit_type == UnitType::Filter && !unit.pending_removal)
        .filter(|unit| unit.health < DAMAGED_FRACTION * unit.max_health)
        .map(|unit| unit.position)
        .collect();
    state.attempt_remove(&damaged)?;
    Ok(())
}

/// How many enemy structures could shoot at a unit walking the path from `start`.
fn threat(state: &GameState, start: Position) -> anyhow::Result<usize> {
    let mut threat = 0;
    for position in state.find_path_to_edge(start, None) {
        threat += state.attackers(position, 0)?.len();
    }
    Ok(threat)
}

/// The least threatened deploy location, or `None` if no ping can be deployed anywhere.
fn choose_deploy_location(state: &GameState, rng: &mut StdRng) -> anyhow::Result<Option<Position>> {
    let mut best = Vec::new();
    let mut best_threat = usize::MAX;
    for edge in [Edge::BottomLeft, Edge::BottomRight] {
        for position in edge.locations() {
            if !state.can_spawn(UnitType::Ping, position, 1) {
                continue;
            }
            let threat = threat(state, position)?;
            if threat < best_threat {
                best_threat = threat;
                best.clear();
            }
            if threat == best_threat {
                best.push(position);
            }
        }
    }
    Ok(best.choose(rng).copied())
}

fn deploy_attackers(state: &mut GameState, rng: &mut StdRng) -> anyhow::Result<()> {
    let Some(location) = choose_deploy_location(state, rng)? else {
        debug!("Nowhere to deploy");
        return Ok(());
    };
    debug_assert!(is_deploy_location(location));

    let enemy_structures = state
        .map()
        .units()
        .filter(|unit| unit.owner == 1 && unit.stationary)
        .count();
    if enemy_structures > EMP_THRESHOLD {
        if state.can_spawn(UnitType::Emp, location, 1) {
            state.attempt_spawn(UnitType::Emp, &[location], 1)?;
        }
        return Ok(());
    }
    let affordable = state.number_affordable(UnitType::Ping)?.min(MAX_PINGS);
    if affordable > 0 {
        let sent = state.attempt_spawn(UnitType::Ping, &[location], affordable)?;
        info!("Sending {} pings from {}", sent, location);
    }
    Ok(())
}
