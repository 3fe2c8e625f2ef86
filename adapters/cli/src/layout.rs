//! Text level format.
//!
//! One character per tile, one line per row. Short rows are padded with empty
//! tiles so editors that strip trailing whitespace do not break a level.

use burrow_core::{Ability, CellCoord, LevelLayout, TileKind};
use thiserror::Error;

/// Level used when no `--level` file is given.
pub(crate) const DEMO_LEVEL: &str = include_str!("../levels/demo.txt");

/// Errors raised while decoding a text level.
#[derive(Clone, Debug, PartialEq, Error)]
pub(crate) enum LayoutError {
    /// The text contained no tile rows.
    #[error("level contains no rows")]
    Empty,
    /// A character outside the symbol table appeared in the level.
    #[error("unknown tile symbol {symbol:?} at column {column}, row {row}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Column of the character.
        column: usize,
        /// Row of the character.
        row: usize,
    },
    /// No `P` marker was present.
    #[error("level has no player spawn marker `P`")]
    MissingPlayer,
    /// More than one `P` marker was present.
    #[error("second player spawn marker at column {column}, row {row}")]
    DuplicatePlayer {
        /// Column of the second marker.
        column: usize,
        /// Row of the second marker.
        row: usize,
    },
    /// The level is too large for signed cell coordinates.
    #[error("level exceeds {max} tiles along an axis")]
    TooLarge {
        /// Largest supported extent.
        max: usize,
    },
}

/// What a single symbol stands for.
enum Symbol {
    Tile(TileKind),
    Player,
    Walker,
}

fn translate(symbol: char) -> Option<Symbol> {
    let tile = match symbol {
        '.' | ' ' => TileKind::Empty,
        '#' => TileKind::Solid,
        '=' => TileKind::OneWay,
        '^' => TileKind::Hazard,
        'X' => TileKind::Breakable,
        '~' => TileKind::Crawlway,
        'C' => TileKind::Checkpoint,
        'J' => TileKind::Pickup(Ability::DoubleJump),
        'D' => TileKind::Pickup(Ability::Dash),
        'M' => TileKind::Pickup(Ability::Morph),
        'P' => return Some(Symbol::Player),
        'W' => return Some(Symbol::Walker),
        _ => return None,
    };
    Some(Symbol::Tile(tile))
}

fn coord(column: usize, row: usize) -> Result<CellCoord, LayoutError> {
    let max = i32::MAX as usize;
    let column = i32::try_from(column).map_err(|_| LayoutError::TooLarge { max })?;
    let row = i32::try_from(row).map_err(|_| LayoutError::TooLarge { max })?;
    Ok(CellCoord::new(column, row))
}

/// Decodes a text level. Spawn markers become empty tiles.
pub(crate) fn parse_layout(text: &str, tile_length: f32) -> Result<LevelLayout, LayoutError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .collect();
    let height = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |last| last + 1);
    if height == 0 {
        return Err(LayoutError::Empty);
    }
    let width = lines[..height]
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let mut player_spawn = None;
    let mut walker_spawns = Vec::new();
    let mut rows = Vec::with_capacity(height);

    for (row, line) in lines[..height].iter().enumerate() {
        let mut tiles = Vec::with_capacity(width);
        for (column, symbol) in line.chars().enumerate() {
            let tile = match translate(symbol) {
                Some(Symbol::Tile(tile)) => tile,
                Some(Symbol::Player) => {
                    if player_spawn.is_some() {
                        return Err(LayoutError::DuplicatePlayer { column, row });
                    }
                    player_spawn = Some(coord(column, row)?);
                    TileKind::Empty
                }
                Some(Symbol::Walker) => {
                    walker_spawns.push(coord(column, row)?);
                    TileKind::Empty
                }
                None => return Err(LayoutError::UnknownSymbol { symbol, column, row }),
            };
            tiles.push(tile);
        }
        tiles.resize(width, TileKind::Empty);
        rows.push(tiles);
    }

    Ok(LevelLayout {
        rows,
        player_spawn: player_spawn.ok_or(LayoutError::MissingPlayer)?,
        walker_spawns,
        tile_length,
    })
}
