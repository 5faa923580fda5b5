//! Headless Skirmish Runner
//!
//! Builds the reference symmetric map, spawns two platoons, replays a
//! script of pointer events and prints the resulting state.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;
use war_roulette::board::Structure;
use war_roulette::core::types::CellCoord;
use war_roulette::core::{GameConfig, Result, WarError};
use war_roulette::game::{Game, GameEvent, SoundCue};
use war_roulette::geometry::Footprint;
use war_roulette::units::UnitStatus;

/// Headless Skirmish Runner - scripted pointer input, JSON state out
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Replay pointer events against a two-platoon skirmish and print the result")]
struct Args {
    /// TOML game configuration (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overrides the configured one
    #[arg(long)]
    seed: Option<u64>,

    /// Cell scale in world units per cell, overrides the configured one
    #[arg(long)]
    scale: Option<f32>,

    /// Script steps: click:X,Y  cell:X,Y  hover:X,Y  leave  activate  end-turn
    #[arg(long = "step")]
    steps: Vec<String>,

    /// Play this many turns automatically after the script
    #[arg(long, default_value_t = 0)]
    auto_turns: u32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Click(Vec2),
    ClickCell(CellCoord),
    Hover(Vec2),
    Leave,
    Activate,
    EndTurn,
}

fn parse_pair(text: &str) -> Option<(f32, f32)> {
    let (x, y) = text.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn parse_step(text: &str) -> Result<Step> {
    let bad = || WarError::Config(format!("unrecognised script step '{}'", text));
    let (verb, rest) = text.split_once(':').unwrap_or((text, ""));
    let step = match verb {
        "click" => {
            let (x, y) = parse_pair(rest).ok_or_else(bad)?;
            Step::Click(Vec2::new(x, y))
        }
        "cell" => {
            let (x, y) = parse_pair(rest).ok_or_else(bad)?;
            Step::ClickCell(CellCoord::new(x as i32, y as i32))
        }
        "hover" => {
            let (x, y) = parse_pair(rest).ok_or_else(bad)?;
            Step::Hover(Vec2::new(x, y))
        }
        "leave" => Step::Leave,
        "activate" => Step::Activate,
        "end-turn" => Step::EndTurn,
        _ => return Err(bad()),
    };
    Ok(step)
}

/// Two-story house and a small shed, each mirrored through the board center
fn reference_layout(width: u32, height: u32) -> Result<Vec<Structure>> {
    let house = Footprint::new(5, 15, 15, 10);
    let upper = Footprint::new(5, 15, 5, 5);
    let shed = Footprint::new(30, 7, 7, 12);

    let mut layout = Vec::new();
    let mirrored = (house.mirrored(width, height), upper.mirrored(width, height));
    for (footprint, floor) in [(house, upper), mirrored] {
        layout.push(
            Structure::with_altitude(footprint, 1)
                .with_substructure(Structure::with_altitude(floor, 2))?,
        );
    }
    layout.push(Structure::new(shed));
    layout.push(Structure::new(shed.mirrored(width, height)));
    Ok(layout)
}

fn apply(game: &mut Game, step: &Step) {
    let handled = match step {
        Step::Click(point) => game.hit_test_click(*point),
        Step::ClickCell(cell) => {
            let scale = game.board().cell_scale();
            game.hit_test_click(cell.center(scale))
        }
        Step::Hover(point) => game.hit_test_hover(*point),
        Step::Leave => {
            game.pointer_left();
            true
        }
        Step::Activate => match game.activate_unit() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Activate ignored: {}", e);
                false
            }
        },
        Step::EndTurn => {
            game.end_turn();
            true
        }
    };
    tracing::debug!("{:?} handled: {}", step, handled);
}

/// Activate the first ready unit of the active platoon and shoot until it
/// runs out of points or targets
fn auto_turn(game: &mut Game) {
    let ready = game.active_platoon().and_then(|p| {
        p.living_units()
            .find(|u| u.status() == UnitStatus::Unactivated)
            .map(|u| u.id)
    });
    if let Some(id) = ready {
        let activated = game.select_unit(id).and_then(|_| game.activate_unit());
        if let Err(e) = activated {
            tracing::warn!("Auto turn could not activate {:?}: {}", id, e);
        }
        while game.active_unit() == Some(id) {
            let Some(target) = game.unit(id).and_then(|u| u.valid_targets().first().copied()) else {
                break;
            };
            if let Err(e) = game.shoot(id, target) {
                tracing::warn!("Auto shot rejected: {}", e);
                break;
            }
        }
    }
    game.end_turn();
}

#[derive(Serialize)]
struct UnitSnapshot {
    position: CellCoord,
    altitude: u32,
    health: f32,
    status: UnitStatus,
    targets: usize,
}

#[derive(Serialize)]
struct PlatoonSnapshot {
    name: String,
    living: usize,
    units: Vec<UnitSnapshot>,
}

#[derive(Serialize)]
struct SkirmishSnapshot {
    seed: u64,
    turn: u64,
    round: u64,
    active_platoon: Option<String>,
    reachable_cells: usize,
    platoons: Vec<PlatoonSnapshot>,
    events: Vec<GameEvent>,
    sound_cues: Vec<&'static str>,
}

fn snapshot(game: &mut Game, seed: u64) -> SkirmishSnapshot {
    let platoons = game
        .platoons()
        .iter()
        .map(|p| PlatoonSnapshot {
            name: p.name.clone(),
            living: p.living_units().count(),
            units: p
                .units()
                .iter()
                .map(|u| UnitSnapshot {
                    position: u.position,
                    altitude: u.altitude,
                    health: u.health,
                    status: u.status(),
                    targets: u.valid_targets().len(),
                })
                .collect(),
        })
        .collect();

    let events = game.take_events();
    let mut cue_rng = ChaCha8Rng::seed_from_u64(seed);
    let sound_cues = events
        .iter()
        .filter_map(|e| SoundCue::for_event(&e.kind, &mut cue_rng))
        .map(|cue| cue.clip_name())
        .collect();

    SkirmishSnapshot {
        seed,
        turn: game.turn_number(),
        round: game.round(),
        active_platoon: game.active_platoon().map(|p| p.name.clone()),
        reachable_cells: game.board().reachable_cells().count(),
        platoons,
        events,
        sound_cues,
    }
}

fn run(args: &Args) -> Result<SkirmishSnapshot> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(scale) = args.scale {
        config.cell_scale = scale;
    }
    let seed = config.seed;
    let steps = args
        .steps
        .iter()
        .map(|s| parse_step(s))
        .collect::<Result<Vec<_>>>()?;

    let mut game = Game::new(config)?;
    let (width, height) = (game.board().width(), game.board().height());
    for structure in reference_layout(width, height)? {
        game.register_structure(structure)?;
    }
    game.spawn_platoon("green")?;
    game.spawn_platoon("red")?;
    tracing::info!("Skirmish ready on a {}x{} board, seed {}", width, height, seed);

    for step in &steps {
        apply(&mut game, step);
    }
    for _ in 0..args.auto_turns {
        if game.platoons().iter().any(|p| p.is_wiped_out()) {
            tracing::info!("A platoon has been wiped out; stopping");
            break;
        }
        auto_turn(&mut game);
    }

    Ok(snapshot(&mut game, seed))
}

/// Filter used when `RUST_LOG` is unset
fn default_directive() -> Directive {
    "war_roulette=info"
        .parse()
        .unwrap_or_else(|_| tracing::Level::INFO.into())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_directive())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let result = match run(&args) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match args.format.as_str() {
        "text" => {
            println!("Skirmish");
            println!("========");
            println!("Turn {} of round {}", result.turn, result.round);
            if let Some(name) = &result.active_platoon {
                println!("Platoon to act: {}", name);
            }
            for platoon in &result.platoons {
                println!("{}: {}/{} standing", platoon.name, platoon.living, platoon.units.len());
            }
            for event in &result.events {
                println!("  [{}] {}", event.turn, event.description);
            }
            println!("Seed: {}", result.seed);
        }
        other => {
            if other != "json" {
                eprintln!("Unknown format '{}', defaulting to json", other);
            }
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!(parse_step("click:110,310").unwrap(), Step::Click(Vec2::new(110.0, 310.0)));
        assert_eq!(parse_step("cell:4, 7").unwrap(), Step::ClickCell(CellCoord::new(4, 7)));
        assert_eq!(parse_step("end-turn").unwrap(), Step::EndTurn);
        assert!(parse_step("click:1").is_err());
        assert!(parse_step("dance").is_err());
    }

    #[test]
    fn test_default_log_filter_targets_the_crate() {
        assert_eq!(default_directive().to_string(), "war_roulette=info");
    }

    #[test]
    fn test_reference_layout_is_symmetric() {
        let layout = reference_layout(40, 60).unwrap();
        assert_eq!(layout.len(), 4);
        assert_eq!(layout[1].footprint, Footprint::new(20, 35, 15, 10));
        assert_eq!(layout[3].footprint, Footprint::new(3, 41, 7, 12));
        assert_eq!(layout[0].substructures().len(), 1);
        assert_eq!(layout[1].substructures()[0].footprint, Footprint::new(30, 40, 5, 5));
    }
}
