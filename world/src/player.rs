//! Player state owned by the world and the trigger tiles it reacts to.

use burrow_core::{Aabb, AbilitySet, CellCoord, Event, MovementTuning, TileKind};
use burrow_system_collision::TileMap;
use burrow_system_physics::PlayerBody;
use glam::Vec2;
use tracing::{debug, info};

/// Player body together with the progress that survives respawns.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) body: PlayerBody,
    pub(crate) abilities: AbilitySet,
    checkpoint: Vec2,
}

impl Player {
    /// Spawns a standing player on the floor of `cell` and records that spot
    /// as the initial respawn point.
    pub(crate) fn spawn(cell: CellCoord, tile_length: f32, tuning: &MovementTuning) -> Self {
        let position = cell.standing_position(tile_length, tuning.standing_size);
        Self {
            body: PlayerBody::new(position, tuning),
            abilities: AbilitySet::empty(),
            checkpoint: position,
        }
    }

    /// Top-left corner the player returns to after touching a hazard.
    pub(crate) fn checkpoint(&self) -> Vec2 {
        self.checkpoint
    }

    /// Moves to a new tuning: the body takes the new box size and the respawn
    /// point keeps its floor anchor under the new standing size.
    pub(crate) fn retune(&mut self, previous: &MovementTuning, next: &MovementTuning) {
        self.body.resize(next);
        let anchor = Aabb::new(self.checkpoint, previous.standing_size).bottom_center();
        self.checkpoint = Aabb::from_bottom_center(anchor, next.standing_size).min();
    }

    /// Resolves hazard, pickup and checkpoint tiles under the player's box.
    ///
    /// A hazard respawns the player and ends resolution for the tick. Cells
    /// cleared by collected pickups are appended to `cleared`.
    pub(crate) fn resolve_triggers(
        &mut self,
        map: &mut TileMap,
        tuning: &MovementTuning,
        cleared: &mut Vec<CellCoord>,
        out_events: &mut Vec<Event>,
    ) {
        let touched: Vec<(CellCoord, TileKind)> = map
            .overlapping(&self.body.bounds())
            .filter(|(_, kind)| {
                matches!(
                    kind,
                    TileKind::Hazard | TileKind::Pickup(_) | TileKind::Checkpoint
                )
            })
            .collect();
        if touched.is_empty() {
            return;
        }

        if let Some(&(cell, _)) = touched.iter().find(|(_, kind)| *kind == TileKind::Hazard) {
            self.body.respawn(self.checkpoint, tuning);
            info!(
                column = cell.column(),
                row = cell.row(),
                x = self.checkpoint.x,
                y = self.checkpoint.y,
                "player_respawned"
            );
            out_events.push(Event::HazardHit { cell });
            out_events.push(Event::PlayerRespawned {
                position: self.checkpoint,
            });
            return;
        }

        for &(cell, kind) in &touched {
            let TileKind::Pickup(ability) = kind else {
                continue;
            };
            if self.abilities.grant(ability) {
                info!(?ability, "ability_unlocked");
                out_events.push(Event::AbilityUnlocked { ability });
            }
            if let Some(tile) = map.clear(cell) {
                cleared.push(tile.cell);
                out_events.push(Event::TileCleared {
                    cell: tile.cell,
                    previous: tile.previous,
                });
            }
        }

        for &(cell, kind) in &touched {
            if kind != TileKind::Checkpoint {
                continue;
            }
            let position = cell.standing_position(map.tile_length(), tuning.standing_size);
            if position != self.checkpoint {
                self.checkpoint = position;
                debug!(column = cell.column(), row = cell.row(), "checkpoint_saved");
                out_events.push(Event::CheckpointSaved { cell });
            }
        }
    }
}
