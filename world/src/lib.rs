#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Burrow.
//!
//! The world owns the tile map, the player and the walkers. Adapters drive it
//! exclusively through [`apply`] and observe it through [`query`].

mod player;

use burrow_core::{
    CellCoord, Command, ControlInput, Event, LevelLayout, MovementTuning, WalkerId,
    WELCOME_BANNER,
};
use burrow_system_collision::TileMap;
use burrow_system_patrol::{PatrolStep, Walker};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use player::Player;

/// Represents the authoritative Burrow world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: MovementTuning,
    level: Option<Level>,
    tick_index: u64,
    cleared_last_tick: Vec<CellCoord>,
}

/// Everything that exists only while a level is loaded.
#[derive(Debug)]
struct Level {
    map: TileMap,
    player: Player,
    walkers: Vec<Walker>,
}

impl World {
    /// Creates an empty world with default tuning and no level loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            tuning: MovementTuning::default(),
            level: None,
            tick_index: 0,
            cleared_last_tick: Vec::new(),
        }
    }

    fn load_level(&mut self, layout: LevelLayout, out_events: &mut Vec<Event>) {
        let map = match TileMap::from_rows(&layout.rows, layout.tile_length) {
            Ok(map) => map,
            Err(error) => {
                warn!(%error, "level_rejected");
                out_events.push(Event::LevelRejected {
                    reason: error.to_string(),
                });
                return;
            }
        };

        if let Some(cell) = std::iter::once(layout.player_spawn)
            .chain(layout.walker_spawns.iter().copied())
            .find(|cell| !map.contains(*cell))
        {
            let reason = format!(
                "spawn cell ({}, {}) lies outside the {}x{} map",
                cell.column(),
                cell.row(),
                map.columns(),
                map.rows()
            );
            warn!(%reason, "level_rejected");
            out_events.push(Event::LevelRejected { reason });
            return;
        }

        let tile_length = map.tile_length();
        let player = Player::spawn(layout.player_spawn, tile_length, &self.tuning);
        let walkers: Vec<Walker> = (0..)
            .zip(layout.walker_spawns.iter())
            .map(|(index, cell)| Walker::spawn(WalkerId::new(index), *cell, tile_length, &self.tuning))
            .collect();

        info!(
            columns = map.columns(),
            rows = map.rows(),
            walkers = walkers.len(),
            "level_loaded"
        );
        out_events.push(Event::LevelLoaded {
            columns: map.columns(),
            rows: map.rows(),
            walkers: walkers.len(),
        });

        self.cleared_last_tick.clear();
        self.level = Some(Level {
            map,
            player,
            walkers,
        });
    }

    fn configure_tuning(&mut self, tuning: MovementTuning) {
        debug!(?tuning, "tuning_configured");
        if let Some(level) = self.level.as_mut() {
            level.player.retune(&self.tuning, &tuning);
            for walker in &mut level.walkers {
                walker.resize(&tuning);
            }
        }
        self.tuning = tuning;
    }

    fn tick(&mut self, dt: Duration, input: ControlInput, out_events: &mut Vec<Event>) {
        let Some(level) = self.level.as_mut() else {
            debug!("tick_ignored_without_level");
            return;
        };

        self.tick_index = self.tick_index.saturating_add(1);
        self.cleared_last_tick.clear();
        out_events.push(Event::TimeAdvanced { dt });

        let seconds = dt.as_secs_f32();
        for walker in &mut level.walkers {
            if walker.advance(&level.map, &self.tuning, seconds) == PatrolStep::Reversed {
                trace!(walker = walker.id().get(), direction = ?walker.direction(), "walker_reversed");
            }
        }

        let player = &mut level.player;
        let outcome = player
            .body
            .step(input, player.abilities, &self.tuning, seconds, &mut level.map);

        if let Some(morphed) = outcome.morph_changed {
            out_events.push(Event::MorphChanged { morphed });
        }
        if let Some(facing) = outcome.dash_started {
            out_events.push(Event::DashStarted { facing });
        }
        if outcome.landed {
            out_events.push(Event::PlayerLanded);
        }
        if let Some(kind) = outcome.jumped {
            out_events.push(Event::PlayerJumped { kind });
        }
        for tile in outcome.cleared {
            debug!(column = tile.cell.column(), row = tile.cell.row(), "barrier_broken");
            self.cleared_last_tick.push(tile.cell);
            out_events.push(Event::TileCleared {
                cell: tile.cell,
                previous: tile.previous,
            });
        }

        player.resolve_triggers(
            &mut level.map,
            &self.tuning,
            &mut self.cleared_last_tick,
            out_events,
        );
    }

    fn defeat_walker(&mut self, id: WalkerId, out_events: &mut Vec<Event>) {
        let Some(walker) = self
            .level
            .as_mut()
            .and_then(|level| level.walkers.iter_mut().find(|walker| walker.id() == id))
        else {
            debug!(walker = id.get(), "defeat_ignored_unknown_walker");
            return;
        };

        if walker.defeat() {
            info!(walker = id.get(), "walker_defeated");
            out_events.push(Event::WalkerDefeated { walker: id });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { layout } => world.load_level(layout, out_events),
        Command::ConfigureTuning { tuning } => world.configure_tuning(tuning),
        Command::Tick { dt, input } => world.tick(dt, input, out_events),
        Command::DefeatWalker { walker } => world.defeat_walker(walker, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use burrow_core::{Aabb, AbilitySet, CellCoord, Facing, MovementTuning, WalkerId};
    use burrow_system_collision::TileMap;
    use glam::Vec2;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Movement tuning currently in force.
    #[must_use]
    pub fn tuning(world: &World) -> &MovementTuning {
        &world.tuning
    }

    /// Provides read-only access to the loaded tile map.
    #[must_use]
    pub fn tile_map(world: &World) -> Option<&TileMap> {
        world.level.as_ref().map(|level| &level.map)
    }

    /// Captures the player's state, if a level is loaded.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        let player = &world.level.as_ref()?.player;
        let body = &player.body;
        Some(PlayerSnapshot {
            bounds: body.bounds(),
            velocity: body.velocity(),
            facing: body.facing(),
            grounded: body.grounded(),
            morphed: body.morphed(),
            dashing: body.is_dashing(),
            double_jump_used: body.double_jump_used(),
            abilities: player.abilities,
            checkpoint: player.checkpoint(),
        })
    }

    /// Captures a read-only view of every walker, defeated ones included.
    #[must_use]
    pub fn walker_view(world: &World) -> WalkerView {
        let snapshots = world
            .level
            .as_ref()
            .map(|level| {
                level
                    .walkers
                    .iter()
                    .map(|walker| WalkerSnapshot {
                        id: walker.id(),
                        bounds: walker.bounds(),
                        direction: walker.direction(),
                        alive: walker.alive(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        WalkerView { snapshots }
    }

    /// Cells turned into empty space during the most recent tick.
    #[must_use]
    pub fn cleared_last_tick(world: &World) -> &[CellCoord] {
        &world.cleared_last_tick
    }

    /// Reports whether `cell` was cleared during the most recent tick.
    #[must_use]
    pub fn was_tile_cleared(world: &World, cell: CellCoord) -> bool {
        world.cleared_last_tick.contains(&cell)
    }

    /// Number of ticks simulated since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Read-only copy of the player's observable state.
    #[derive(Clone, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Current box.
        pub bounds: Aabb,
        /// Current velocity.
        pub velocity: Vec2,
        /// Horizontal facing.
        pub facing: Facing,
        /// Whether the player rests on the ground.
        pub grounded: bool,
        /// Whether the player is morphed.
        pub morphed: bool,
        /// Whether a dash is in progress.
        pub dashing: bool,
        /// Whether the air jump was spent.
        pub double_jump_used: bool,
        /// Abilities unlocked so far.
        pub abilities: AbilitySet,
        /// Respawn position used after touching a hazard.
        pub checkpoint: Vec2,
    }

    /// Read-only copy of a walker's state.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct WalkerSnapshot {
        /// Identifier assigned at level load.
        pub id: WalkerId,
        /// Current box.
        pub bounds: Aabb,
        /// Direction of travel.
        pub direction: Facing,
        /// Whether the walker is still in play.
        pub alive: bool,
    }

    /// Read-only snapshot describing all walkers in spawn order.
    #[derive(Clone, Debug, Default)]
    pub struct WalkerView {
        snapshots: Vec<WalkerSnapshot>,
    }

    impl WalkerView {
        /// Iterator over the captured walker snapshots.
        pub fn iter(&self) -> impl Iterator<Item = &WalkerSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the owned snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<WalkerSnapshot> {
            self.snapshots
        }
    }
}
