#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tile map storage and the collision queries that physics and patrol systems
//! run against it.
//!
//! The map is the only shared mutable state in the simulation. Collision
//! queries never mutate it; the two mutations it supports (clearing a
//! breakable barrier during a dash and clearing a collected pickup) go through
//! [`TileMap::clear`].

use burrow_core::{Aabb, CellCoord, TileKind};
use thiserror::Error;

/// Reasons a level layout cannot be turned into a tile map.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TileMapError {
    /// The layout contained no rows or no columns.
    #[error("level layout has no tiles")]
    Empty,
    /// A row differed in length from the first row.
    #[error("row {row} has {found} tiles but row 0 has {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The layout dimensions do not fit the signed cell coordinate space.
    #[error("level layout of {columns}x{rows} tiles is too large")]
    TooLarge {
        /// Number of columns in the layout.
        columns: usize,
        /// Number of rows in the layout.
        rows: usize,
    },
    /// The tile edge length was not a positive finite number.
    #[error("tile length {0} must be positive and finite")]
    InvalidTileLength(f32),
}

/// Movement state that decides which tiles block an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CollisionContext {
    /// Actor is morphed and fits through crawlways.
    pub morphed: bool,
    /// Actor is dashing and passes through breakable barriers.
    pub dashing: bool,
    /// Current vertical velocity; one-way platforms only block at `>= 0`.
    pub vertical_velocity: f32,
    /// How far the actor's bottom edge may sit below a one-way platform's top
    /// surface and still be caught by it. `None` passes through one-way
    /// platforms entirely, which is how horizontal movement treats them.
    pub one_way_band: Option<f32>,
}

/// Record of a tile that was turned into empty space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearedTile {
    /// Location of the cleared tile.
    pub cell: CellCoord,
    /// Kind of tile the cell held before clearing.
    pub previous: TileKind,
}

/// Inclusive rectangle of cells touched by a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    first: CellCoord,
    last: CellCoord,
}

impl CellRange {
    /// Computes the cells occupied by `bounds` on a grid of `tile_length` tiles.
    ///
    /// Right and bottom edges are exclusive, so a box flush against a tile
    /// boundary does not reach into the neighbouring tile.
    #[must_use]
    pub fn covering(bounds: &Aabb, tile_length: f32) -> Self {
        let first = CellCoord::new(
            (bounds.left() / tile_length).floor() as i32,
            (bounds.top() / tile_length).floor() as i32,
        );
        let last = CellCoord::new(
            (bounds.right() / tile_length).ceil() as i32 - 1,
            (bounds.bottom() / tile_length).ceil() as i32 - 1,
        );
        Self { first, last }
    }

    /// Row-major iterator over every cell in the range.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let first = self.first;
        let last = self.last;
        (first.row()..=last.row()).flat_map(move |row| {
            (first.column()..=last.column()).map(move |column| CellCoord::new(column, row))
        })
    }
}

/// Fixed-size grid of tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tile_length: f32,
    tiles: Vec<TileKind>,
}

impl TileMap {
    /// Builds a map from equal-length rows listed top to bottom.
    pub fn from_rows(rows: &[Vec<TileKind>], tile_length: f32) -> Result<Self, TileMapError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(TileMapError::InvalidTileLength(tile_length));
        }

        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(TileMapError::Empty);
        }

        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(TileMapError::Ragged {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
        }

        let too_large = || TileMapError::TooLarge {
            columns: expected,
            rows: rows.len(),
        };
        let columns = i32::try_from(expected).map_err(|_| too_large())?;
        let row_count = i32::try_from(rows.len()).map_err(|_| too_large())?;

        Ok(Self {
            columns: columns.unsigned_abs(),
            rows: row_count.unsigned_abs(),
            tile_length,
            tiles: rows.iter().flatten().copied().collect(),
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of a square tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Kind of tile at `cell`. Cells outside the map read as [`TileKind::Solid`].
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> TileKind {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(TileKind::Solid)
    }

    /// Reports whether `cell` lies inside the map.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Turns the tile at `cell` into empty space.
    ///
    /// Returns the previous kind, or `None` when the cell was already empty or
    /// lies outside the map.
    pub fn clear(&mut self, cell: CellCoord) -> Option<ClearedTile> {
        let index = self.index(cell)?;
        let slot = self.tiles.get_mut(index)?;
        if *slot == TileKind::Empty {
            return None;
        }
        let previous = std::mem::replace(slot, TileKind::Empty);
        Some(ClearedTile { cell, previous })
    }

    /// Row-major iterator over every tile in the map.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, TileKind)> + '_ {
        let columns = self.columns as usize;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let column = (index % columns) as i32;
            let row = (index / columns) as i32;
            (CellCoord::new(column, row), *tile)
        })
    }

    /// Tiles occupied by `bounds`, including out-of-map cells as solid.
    pub fn overlapping(&self, bounds: &Aabb) -> impl Iterator<Item = (CellCoord, TileKind)> + '_ {
        CellRange::covering(bounds, self.tile_length)
            .cells()
            .map(move |cell| (cell, self.tile(cell)))
    }

    /// Decides whether the tile at `cell` blocks an actor occupying `bounds`.
    #[must_use]
    pub fn solid_at(&self, cell: CellCoord, bounds: &Aabb, context: CollisionContext) -> bool {
        match self.tile(cell) {
            TileKind::Solid => true,
            TileKind::Breakable => !context.dashing,
            TileKind::Crawlway => !context.morphed,
            TileKind::OneWay => context.one_way_band.is_some_and(|band| {
                let surface = cell.row() as f32 * self.tile_length;
                context.vertical_velocity >= 0.0 && bounds.bottom() - surface <= band
            }),
            TileKind::Empty
            | TileKind::Hazard
            | TileKind::Checkpoint
            | TileKind::Pickup(_) => false,
        }
    }

    /// Reports whether any cell occupied by `bounds` blocks the actor.
    #[must_use]
    pub fn box_overlaps_solid(&self, bounds: &Aabb, context: CollisionContext) -> bool {
        CellRange::covering(bounds, self.tile_length)
            .cells()
            .any(|cell| self.solid_at(cell, bounds, context))
    }

    /// Clears every breakable barrier intersected by `bounds`.
    ///
    /// Barriers have no durability: one pass removes them permanently. Cleared
    /// tiles are appended to `out`.
    pub fn apply_dash_break(&mut self, bounds: &Aabb, out: &mut Vec<ClearedTile>) {
        for cell in CellRange::covering(bounds, self.tile_length).cells() {
            if self.tile(cell) == TileKind::Breakable {
                if let Some(cleared) = self.clear(cell) {
                    out.push(cleared);
                }
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}
