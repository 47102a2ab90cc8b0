//! Headless Skirmish Runner
//!
//! Loads a campaign, walks the party to random cells with the autopilot and
//! fights every encounter on the way. Prints a summary as JSON or text.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use gridbound::autopilot::{AutoPilot, Tally};
use gridbound::battle::BattleOutcome;
use gridbound::core::config::EngineConfig;
use gridbound::core::error::Result;
use gridbound::grid::CellCoord;
use gridbound::world::{Interaction, LevelDef, PartyDef, World, WorldState};
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless Skirmish Runner - autopilot walks and battles
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Walk a party through a campaign and fight its random encounters")]
struct Args {
    /// Campaign file: a JSON array of level descriptors
    #[arg(long, default_value = "data/levels.json")]
    levels: PathBuf,

    /// Party descriptor (JSON)
    #[arg(long, default_value = "data/party.json")]
    party: PathBuf,

    /// Engine configuration (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overriding the configured one
    #[arg(long)]
    seed: Option<u64>,

    /// Number of walk orders to give
    #[arg(long, default_value_t = 40)]
    walks: u32,

    /// Pause after every party step, in milliseconds
    #[arg(long, default_value_t = 0)]
    step_ms: u64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Log every turn and step
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct HeroSummary {
    name: String,
    level: i32,
    health: i32,
    max_health: i32,
    exp: u32,
    next_level: u32,
}

/// JSON output structure
#[derive(Serialize)]
struct SkirmishSummary {
    seed: u64,
    walks: u32,
    encounters: u32,
    victories: u32,
    defeats: u32,
    travels: u32,
    final_state: WorldState,
    level: Option<usize>,
    heroes: Vec<HeroSummary>,
    tally: Tally,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "gridbound=debug" } else { "gridbound=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    let levels = LevelDef::list_from_file(&args.levels)?;
    let party = PartyDef::from_file(&args.party)?;
    tracing::info!("Starting skirmish with {} levels, seed {}", levels.len(), seed);

    let mut world = World::new(config, levels)?;
    world.load(0, party)?;

    let mut pilot = AutoPilot::new(seed.wrapping_add(1));
    if args.step_ms > 0 {
        pilot = pilot.with_step_delay(Duration::from_millis(args.step_ms));
    }
    let mut orders = ChaCha8Rng::seed_from_u64(seed.wrapping_add(2));

    let mut summary = SkirmishSummary {
        seed,
        walks: 0,
        encounters: 0,
        victories: 0,
        defeats: 0,
        travels: 0,
        final_state: world.state(),
        level: world.level_index(),
        heroes: Vec::new(),
        tally: Tally::default(),
    };

    for _ in 0..args.walks {
        if world.state() == WorldState::Defeated {
            break;
        }
        let Some(target) = random_target(&world, &mut orders) else {
            break;
        };
        summary.walks += 1;

        match world.interact(target, &mut pilot).await? {
            Interaction::Encounter { at } => {
                summary.encounters += 1;
                tracing::debug!("Encounter at {:?}", at);
                match world.run_battle(&mut pilot).await? {
                    Some(BattleOutcome::Victory) => summary.victories += 1,
                    Some(BattleOutcome::Defeat) => summary.defeats += 1,
                    None => {}
                }
            }
            Interaction::Travelled { level } => {
                summary.travels += 1;
                tracing::debug!("Party moved to level {}", level);
            }
            _ => {}
        }
        world.drain_events();
    }

    summary.final_state = world.state();
    summary.level = world.level_index();
    summary.tally = pilot.tally();
    summary.heroes = hero_summaries(&world);

    match args.format.as_str() {
        "text" => print_text(&summary),
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Any cell of the loaded level; walls simply ignore the click
fn random_target(world: &World, rng: &mut ChaCha8Rng) -> Option<CellCoord> {
    world.grid()?.cells().choose(rng)
}

fn hero_summaries(world: &World) -> Vec<HeroSummary> {
    let Some(party) = world.party() else {
        return Vec::new();
    };

    party
        .heroes()
        .iter()
        .filter_map(|&id| world.beings().get(id))
        .filter_map(|hero| {
            let stats = hero.stats()?;
            let levelling = &hero.hero_profile()?.levelling;
            Some(HeroSummary {
                name: hero.name().to_string(),
                level: stats.level,
                health: stats.health,
                max_health: stats.max_health,
                exp: levelling.exp,
                next_level: levelling.next_level,
            })
        })
        .collect()
}

fn print_text(summary: &SkirmishSummary) {
    println!("Skirmish Result");
    println!("===============");
    println!("Walks: {}", summary.walks);
    println!("Encounters: {}", summary.encounters);
    println!("Victories: {}  Defeats: {}", summary.victories, summary.defeats);
    println!("Level changes: {}", summary.travels);
    println!("Final state: {:?} on level {:?}", summary.final_state, summary.level);
    println!();
    for hero in &summary.heroes {
        println!(
            "{:<10} lvl {:>2}  hp {:>3}/{:<3}  exp {}/{}",
            hero.name, hero.level, hero.health, hero.max_health, hero.exp, hero.next_level
        );
    }
    println!();
    println!(
        "Steps: {}  Hits: {}  Misses: {}  Damage: {}  Healed: {}",
        summary.tally.steps,
        summary.tally.hits,
        summary.tally.misses,
        summary.tally.damage_dealt,
        summary.tally.health_restored
    );
    println!("Seed: {}", summary.seed);
}
