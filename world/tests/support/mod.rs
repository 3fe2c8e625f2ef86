use std::time::Duration;

use burrow_core::{Ability, CellCoord, Command, ControlInput, Event, LevelLayout, TileKind};
use burrow_world::{self as world, World};

pub const TILE: f32 = 32.0;
pub const FRAME: Duration = Duration::from_micros(16_667);

/// Builds a layout from rows of symbols; `P` marks the player and `W` walkers.
pub fn layout(rows: &[&str]) -> LevelLayout {
    let mut player_spawn = CellCoord::new(0, 0);
    let mut walker_spawns = Vec::new();
    let rows = rows
        .iter()
        .enumerate()
        .map(|(row, symbols)| {
            symbols
                .chars()
                .enumerate()
                .map(|(column, symbol)| {
                    let cell = CellCoord::new(column as i32, row as i32);
                    match symbol {
                        '#' => TileKind::Solid,
                        '=' => TileKind::OneWay,
                        '^' => TileKind::Hazard,
                        'X' => TileKind::Breakable,
                        '~' => TileKind::Crawlway,
                        'C' => TileKind::Checkpoint,
                        'J' => TileKind::Pickup(Ability::DoubleJump),
                        'D' => TileKind::Pickup(Ability::Dash),
                        'M' => TileKind::Pickup(Ability::Morph),
                        'P' => {
                            player_spawn = cell;
                            TileKind::Empty
                        }
                        'W' => {
                            walker_spawns.push(cell);
                            TileKind::Empty
                        }
                        _ => TileKind::Empty,
                    }
                })
                .collect()
        })
        .collect();
    LevelLayout {
        rows,
        player_spawn,
        walker_spawns,
        tile_length: TILE,
    }
}

pub fn loaded(rows: &[&str]) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLevel {
            layout: layout(rows),
        },
        &mut events,
    );
    assert!(
        matches!(events.as_slice(), [Event::LevelLoaded { .. }]),
        "level failed to load: {events:?}"
    );
    world
}

pub fn tick(world: &mut World, input: ControlInput) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: FRAME, input }, &mut events);
    events
}

pub fn right() -> ControlInput {
    ControlInput {
        move_right: true,
        ..ControlInput::default()
    }
}
