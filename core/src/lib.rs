#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Burrow simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that presentation
//! layers consume as one-shot notifications.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod tuning;

pub use tuning::MovementTuning;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Burrow.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the active level with the provided layout.
    LoadLevel {
        /// Decoded tile rows together with spawn locations.
        layout: LevelLayout,
    },
    /// Replaces the movement constants used by the physics and patrol systems.
    ConfigureTuning {
        /// Tuning applied from the next tick onwards.
        tuning: MovementTuning,
    },
    /// Advances the simulation by one fixed step.
    Tick {
        /// Duration of simulated time covered by the step.
        dt: Duration,
        /// Player intents sampled for this step.
        input: ControlInput,
    },
    /// Marks a walker as defeated. Combat resolution lives outside the core.
    DefeatWalker {
        /// Identifier of the walker to remove from play.
        walker: WalkerId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a level was loaded and the player spawned.
    LevelLoaded {
        /// Number of tile columns in the loaded map.
        columns: u32,
        /// Number of tile rows in the loaded map.
        rows: u32,
        /// Number of walkers spawned alongside the player.
        walkers: usize,
    },
    /// Reports that a level layout could not be turned into a tile map.
    LevelRejected {
        /// Human readable reason supplied by the tile map builder.
        reason: String,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the player acquired a new movement ability.
    AbilityUnlocked {
        /// Ability that became available.
        ability: Ability,
    },
    /// Reports that the player touched a hazard tile.
    HazardHit {
        /// Hazard cell that triggered the respawn.
        cell: CellCoord,
    },
    /// Confirms that the player was returned to the last checkpoint.
    PlayerRespawned {
        /// Top-left corner of the player's box after respawning.
        position: Vec2,
    },
    /// Announces that a new respawn point was recorded.
    CheckpointSaved {
        /// Checkpoint tile that was touched.
        cell: CellCoord,
    },
    /// Reports that a tile was turned into empty space.
    TileCleared {
        /// Location of the cleared tile.
        cell: CellCoord,
        /// Kind of tile that occupied the cell before clearing.
        previous: TileKind,
    },
    /// Reports that the player touched down after being airborne.
    PlayerLanded,
    /// Reports that the player left the ground or performed an air jump.
    PlayerJumped {
        /// Variety of jump that fired.
        kind: JumpKind,
    },
    /// Reports that the player started a dash.
    DashStarted {
        /// Direction of the dash.
        facing: Facing,
    },
    /// Reports that the player's morph state changed.
    MorphChanged {
        /// Whether the player is now morphed.
        morphed: bool,
    },
    /// Confirms that a walker was removed from play.
    WalkerDefeated {
        /// Identifier of the defeated walker.
        walker: WalkerId,
    },
}

/// Movement abilities that pickups may unlock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    /// A second, weaker jump while airborne.
    DoubleJump,
    /// A short horizontal burst that breaks barriers.
    Dash,
    /// A crouched form that fits through crawlways.
    Morph,
}

impl Ability {
    /// Every ability in a stable order.
    pub const ALL: [Ability; 3] = [Ability::DoubleJump, Ability::Dash, Ability::Morph];
}

/// Fixed record of the abilities the player has unlocked.
///
/// Abilities are acquired monotonically; nothing in the simulation revokes them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilitySet {
    double_jump: bool,
    dash: bool,
    morph: bool,
}

impl AbilitySet {
    /// Creates a set with nothing unlocked.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            double_jump: false,
            dash: false,
            morph: false,
        }
    }

    /// Creates a set with every ability unlocked.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            double_jump: true,
            dash: true,
            morph: true,
        }
    }

    /// Reports whether the ability is unlocked.
    #[must_use]
    pub const fn contains(&self, ability: Ability) -> bool {
        match ability {
            Ability::DoubleJump => self.double_jump,
            Ability::Dash => self.dash,
            Ability::Morph => self.morph,
        }
    }

    /// Unlocks the ability, returning `true` when it was not held before.
    pub fn grant(&mut self, ability: Ability) -> bool {
        let slot = match ability {
            Ability::DoubleJump => &mut self.double_jump,
            Ability::Dash => &mut self.dash,
            Ability::Morph => &mut self.morph,
        };
        let newly_granted = !*slot;
        *slot = true;
        newly_granted
    }

    /// Iterator over the unlocked abilities in [`Ability::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = Ability> + '_ {
        Ability::ALL
            .into_iter()
            .filter(move |ability| self.contains(*ability))
    }
}

/// Closed set of tile kinds that make up a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open space.
    #[default]
    Empty,
    /// Terrain that always blocks movement.
    Solid,
    /// Platform that only blocks actors landing on it from above.
    OneWay,
    /// Tile that sends the player back to the last checkpoint.
    Hazard,
    /// Barrier that blocks movement until a dash destroys it.
    Breakable,
    /// Low passage that only a morphed actor fits through.
    Crawlway,
    /// Save tile that records a respawn point on contact.
    Checkpoint,
    /// Collectible that unlocks an ability.
    Pickup(Ability),
}

/// Signed tile coordinate so that probes outside the map remain representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Tile containing the provided world-space point.
    #[must_use]
    pub fn containing(point: Vec2, tile_length: f32) -> Self {
        Self {
            column: (point.x / tile_length).floor() as i32,
            row: (point.y / tile_length).floor() as i32,
        }
    }

    /// Top-left corner of the tile in world units.
    #[must_use]
    pub fn origin(&self, tile_length: f32) -> Vec2 {
        Vec2::new(
            self.column as f32 * tile_length,
            self.row as f32 * tile_length,
        )
    }

    /// Top-left position for a box of `size` standing on the floor of this tile,
    /// centered horizontally.
    #[must_use]
    pub fn standing_position(&self, tile_length: f32, size: Vec2) -> Vec2 {
        let origin = self.origin(tile_length);
        Vec2::new(
            origin.x + (tile_length - size.x) * 0.5,
            origin.y + tile_length - size.y,
        )
    }
}

/// Axis-aligned box in world units with y growing downward.
///
/// Edges are half-open: the right and bottom edges are not part of the box, so
/// a box resting exactly on a tile boundary does not touch the next tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    min: Vec2,
    size: Vec2,
}

impl Aabb {
    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Creates a box of `size` whose bottom edge is centered on `anchor`.
    #[must_use]
    pub fn from_bottom_center(anchor: Vec2, size: Vec2) -> Self {
        Self {
            min: Vec2::new(anchor.x - size.x * 0.5, anchor.y - size.y),
            size,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Midpoint of the bottom edge.
    #[must_use]
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.min.x + self.size.x * 0.5, self.bottom())
    }

    /// Returns the box shifted by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            size: self.size,
        }
    }
}

/// Horizontal facing of an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward decreasing x.
    Left,
    /// Facing toward increasing x.
    #[default]
    Right,
}

impl Facing {
    /// Unit sign of the facing along the x axis.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Opposite facing.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Per-tick intents sampled by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlInput {
    /// Left movement is held.
    pub move_left: bool,
    /// Right movement is held.
    pub move_right: bool,
    /// Jump is held.
    pub jump_held: bool,
    /// Morph toggle was pressed on this tick.
    pub morph_toggle: bool,
    /// Dash was pressed on this tick.
    pub dash_pressed: bool,
}

impl ControlInput {
    /// Direction currently held, if exactly one horizontal direction is held.
    #[must_use]
    pub const fn horizontal(&self) -> Option<Facing> {
        match (self.move_left, self.move_right) {
            (true, false) => Some(Facing::Left),
            (false, true) => Some(Facing::Right),
            _ => None,
        }
    }
}

/// Variety of jump performed by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpKind {
    /// Jump from the ground or within the coyote window.
    Ground,
    /// Reduced air jump granted by the double jump ability.
    Double,
}

/// Unique identifier assigned to a walker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WalkerId(u32);

impl WalkerId {
    /// Creates a new walker identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Level description decoded by an adapter before it reaches the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Tile rows from top to bottom. Every row must have the same length.
    pub rows: Vec<Vec<TileKind>>,
    /// Cell whose floor the player starts on.
    pub player_spawn: CellCoord,
    /// Cells whose floors walkers start on.
    pub walker_spawns: Vec<CellCoord>,
    /// Edge length of a square tile in world units.
    pub tile_length: f32,
}
