#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays scripted input against a Burrow level.

mod layout;
mod script;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use burrow_core::{Command, Event, MovementTuning};
use burrow_world::{self as world, query, World};
use clap::Parser;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use layout::{parse_layout, DEMO_LEVEL};
use script::{parse_script, DEMO_SCRIPT};

/// Headless Burrow simulation.
#[derive(Debug, Parser)]
#[command(name = "burrow", version, about)]
struct Args {
    /// Text level to load; the built-in demo level is used when omitted.
    #[arg(long, value_name = "FILE")]
    level: Option<PathBuf>,
    /// TOML file overriding movement tuning values.
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,
    /// Input script to replay; a short built-in run is used when omitted.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
    /// Fixed simulation rate in ticks per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,
    /// Edge length of a tile in world units.
    #[arg(long, default_value_t = 32.0)]
    tile_length: f32,
}

/// Entry point for the Burrow command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    run(&args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn read_or(path: Option<&PathBuf>, fallback: &str, what: &str) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {what} at {}", path.display())),
        None => Ok(fallback.to_owned()),
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Result<MovementTuning> {
    let Some(path) = path else {
        return Ok(MovementTuning::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    toml::from_str(&contents).context("failed to parse tuning toml contents")
}

fn run(args: &Args) -> Result<()> {
    let level_text = read_or(args.level.as_ref(), DEMO_LEVEL, "level")?;
    let layout = parse_layout(&level_text, args.tile_length).context("invalid level")?;
    let script_text = read_or(args.script.as_ref(), DEMO_SCRIPT, "script")?;
    let steps = parse_script(&script_text).context("invalid script")?;
    let tuning = load_tuning(args.tuning.as_ref())?;

    let mut world = World::new();
    info!("{}", query::welcome_banner(&world));

    let mut log = Vec::new();
    world::apply(&mut world, Command::ConfigureTuning { tuning }, &mut log);
    world::apply(&mut world, Command::LoadLevel { layout }, &mut log);
    if let Some(Event::LevelRejected { reason }) = log.last() {
        bail!("level rejected: {reason}");
    }

    let dt = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    for step in &steps {
        for _ in 0..step.ticks {
            let start = log.len();
            world::apply(
                &mut world,
                Command::Tick {
                    dt,
                    input: step.input,
                },
                &mut log,
            );
            for event in &log[start..] {
                report(event);
            }
        }
    }

    print_summary(&world, &log);
    Ok(())
}

fn report(event: &Event) {
    match event {
        Event::TimeAdvanced { .. } => {}
        Event::PlayerJumped { .. }
        | Event::PlayerLanded
        | Event::TileCleared { .. }
        | Event::MorphChanged { .. } => {
            debug!(?event, "event");
        }
        _ => info!(?event, "event"),
    }
}

fn digest(log: &[Event]) -> String {
    let mut hasher = Sha256::new();
    for event in log {
        hasher.update(format!("{event:?}\n").as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn print_summary(world: &World, log: &[Event]) {
    println!("ticks: {}", query::tick_index(world));
    if let Some(player) = query::player(world) {
        let position = player.bounds.min();
        let abilities: Vec<String> = player
            .abilities
            .iter()
            .map(|ability| format!("{ability:?}"))
            .collect();
        println!(
            "player: at ({:.2}, {:.2}) velocity ({:.2}, {:.2}) facing {:?}",
            position.x, position.y, player.velocity.x, player.velocity.y, player.facing
        );
        println!(
            "        grounded {} morphed {} dashing {} abilities [{}]",
            player.grounded,
            player.morphed,
            player.dashing,
            abilities.join(", ")
        );
        println!(
            "        checkpoint ({:.2}, {:.2})",
            player.checkpoint.x, player.checkpoint.y
        );
    }
    for walker in query::walker_view(world).iter() {
        let position = walker.bounds.min();
        println!(
            "walker {}: at ({:.2}, {:.2}) heading {:?}{}",
            walker.id.get(),
            position.x,
            position.y,
            walker.direction,
            if walker.alive { "" } else { " (defeated)" }
        );
    }
    println!("events: {}", log.len());
    println!("digest: {}", digest(log));
}
