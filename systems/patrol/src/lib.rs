#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ground patrol for walker enemies.
//!
//! Walkers never leave the floor they spawn on: they turn around at walls and
//! at ledges, and gravity does not apply to them.

use burrow_core::{Aabb, CellCoord, Facing, MovementTuning, TileKind, WalkerId};
use burrow_system_collision::{CollisionContext, TileMap};
use glam::Vec2;

/// Vertical offset below a walker's feet at which the ledge probe samples.
const PROBE_DEPTH: f32 = 0.5;

/// Result of advancing a walker by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatrolStep {
    /// The walker is defeated and did not move.
    Dormant,
    /// The walker moved and kept its direction.
    Advanced,
    /// The walker turned around, either at a wall or at a ledge.
    Reversed,
}

/// Patrol enemy that paces back and forth along a floor.
#[derive(Clone, Debug, PartialEq)]
pub struct Walker {
    id: WalkerId,
    bounds: Aabb,
    direction: Facing,
    alive: bool,
}

impl Walker {
    /// Spawns a walker standing on the floor of `cell`, heading right.
    #[must_use]
    pub fn spawn(id: WalkerId, cell: CellCoord, tile_length: f32, tuning: &MovementTuning) -> Self {
        let position = cell.standing_position(tile_length, tuning.walker_size);
        Self {
            id,
            bounds: Aabb::new(position, tuning.walker_size),
            direction: Facing::Right,
            alive: true,
        }
    }

    /// Identifier assigned at spawn.
    #[must_use]
    pub const fn id(&self) -> WalkerId {
        self.id
    }

    /// Current box.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Facing {
        self.direction
    }

    /// Whether the walker is still in play.
    #[must_use]
    pub const fn alive(&self) -> bool {
        self.alive
    }

    /// Re-sizes the box to the configured walker size, keeping the feet planted.
    pub fn resize(&mut self, tuning: &MovementTuning) {
        self.bounds = Aabb::from_bottom_center(self.bounds.bottom_center(), tuning.walker_size);
    }

    /// Removes the walker from play. Returns `false` if it was already dead.
    pub fn defeat(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }

    /// Advances the walker by `dt` seconds.
    pub fn advance(&mut self, map: &TileMap, tuning: &MovementTuning, dt: f32) -> PatrolStep {
        if !self.alive {
            return PatrolStep::Dormant;
        }

        let context = CollisionContext::default();
        let moved = self
            .bounds
            .translated(Vec2::new(self.direction.sign() * tuning.walker_speed * dt, 0.0));
        if map.box_overlaps_solid(&moved, context) {
            self.direction = self.direction.reversed();
            return PatrolStep::Reversed;
        }
        self.bounds = moved;

        if map.tile(self.ledge_probe(map.tile_length())) == TileKind::Empty {
            self.direction = self.direction.reversed();
            return PatrolStep::Reversed;
        }
        PatrolStep::Advanced
    }

    /// Cell just below the walker's feet, one body width ahead of its center.
    fn ledge_probe(&self, tile_length: f32) -> CellCoord {
        let feet = self.bounds.bottom_center();
        let ahead = Vec2::new(
            feet.x + self.direction.sign() * self.bounds.size().x,
            feet.y + PROBE_DEPTH,
        );
        CellCoord::containing(ahead, tile_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;
    const T: f32 = 32.0;

    fn map(rows: &[&str]) -> TileMap {
        let decoded: Vec<Vec<TileKind>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|symbol| match symbol {
                        '#' => TileKind::Solid,
                        '=' => TileKind::OneWay,
                        '^' => TileKind::Hazard,
                        _ => TileKind::Empty,
                    })
                    .collect()
            })
            .collect();
        TileMap::from_rows(&decoded, T).expect("valid layout")
    }

    #[test]
    fn spawn_rests_on_cell_floor() {
        let tuning = MovementTuning::default();
        let walker = Walker::spawn(WalkerId::new(0), CellCoord::new(2, 1), T, &tuning);

        assert_eq!(walker.bounds().bottom(), 2.0 * T);
        assert_eq!(walker.bounds().bottom_center().x, 2.5 * T);
        assert_eq!(walker.direction(), Facing::Right);
    }

    #[test]
    fn walks_along_open_floor() {
        let tuning = MovementTuning::default();
        let map = map(&["........", "........", "########"]);
        let mut walker = Walker::spawn(WalkerId::new(0), CellCoord::new(2, 1), T, &tuning);
        let start = walker.bounds().left();

        let step = walker.advance(&map, &tuning, DT);

        assert_eq!(step, PatrolStep::Advanced);
        assert!(walker.bounds().left() > start);
        assert_eq!(walker.bounds().bottom(), 2.0 * T);
    }

    #[test]
    fn turns_around_at_wall_without_entering_it() {
        let tuning = MovementTuning::default();
        let map = map(&["....#...", "....#...", "########"]);
        let mut walker = Walker::spawn(WalkerId::new(0), CellCoord::new(2, 1), T, &tuning);

        let mut reversed = false;
        for _ in 0..120 {
            if walker.advance(&map, &tuning, DT) == PatrolStep::Reversed {
                reversed = true;
                break;
            }
        }

        assert!(reversed);
        assert_eq!(walker.direction(), Facing::Left);
        assert!(walker.bounds().right() <= 4.0 * T);
    }

    #[test]
    fn turns_around_at_ledge() {
        let tuning = MovementTuning::default();
        let map = map(&["........", "........", ".####..."]);
        let mut walker = Walker::spawn(WalkerId::new(0), CellCoord::new(2, 1), T, &tuning);

        let mut reversals = 0;
        for _ in 0..600 {
            if walker.advance(&map, &tuning, DT) == PatrolStep::Reversed {
                reversals += 1;
            }
            let feet = walker.bounds().bottom_center().x;
            assert!(feet > T && feet < 5.0 * T, "walked off the ledge at {feet}");
        }

        assert!(reversals >= 2);
    }

    #[test]
    fn hazard_floor_is_not_a_ledge() {
        let tuning = MovementTuning::default();
        let map = map(&["........", "........", "##^^####"]);
        let mut walker = Walker::spawn(WalkerId::new(0), CellCoord::new(1, 1), T, &tuning);

        for _ in 0..90 {
            assert_ne!(walker.advance(&map, &tuning, DT), PatrolStep::Reversed);
        }
    }

    #[test]
    fn walks_across_one_way_floor() {
        let tuning = MovementTuning::default();
        let map = map(&["........", "........", "========"]);
        let mut walker = Walker::spawn(WalkerId::new(0), CellCoord::new(1, 1), T, &tuning);

        for _ in 0..60 {
            assert_eq!(walker.advance(&map, &tuning, DT), PatrolStep::Advanced);
        }
        assert_eq!(walker.bounds().bottom(), 2.0 * T);
    }

    #[test]
    fn resize_keeps_feet_planted() {
        let mut tuning = MovementTuning::default();
        let mut walker = Walker::spawn(WalkerId::new(0), CellCoord::new(2, 1), T, &tuning);
        let feet = walker.bounds().bottom_center();

        tuning.walker_size = glam::Vec2::new(16.0, 28.0);
        walker.resize(&tuning);

        assert_eq!(walker.bounds().size(), tuning.walker_size);
        assert_eq!(walker.bounds().bottom_center(), feet);
    }

    #[test]
    fn defeated_walker_stays_put() {
        let tuning = MovementTuning::default();
        let map = map(&["........", "........", "########"]);
        let mut walker = Walker::spawn(WalkerId::new(3), CellCoord::new(2, 1), T, &tuning);

        assert!(walker.defeat());
        assert!(!walker.defeat());
        let before = walker.bounds();

        assert_eq!(walker.advance(&map, &tuning, DT), PatrolStep::Dormant);
        assert_eq!(walker.bounds(), before);
        assert!(!walker.alive());
    }
}
