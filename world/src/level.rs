//! Level layouts and the glyph legend used to interpret them.

use maze_chase_core::{CellCoord, CollectibleKind, GridError, WalkabilityGrid, WALL_GLYPH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authored level: a name plus rows of glyphs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Human readable level name.
    pub name: String,
    /// Rows of glyphs, top row first.
    pub layout: Vec<String>,
}

impl LevelSpec {
    /// Creates a level specification from borrowed rows.
    #[must_use]
    pub fn new(name: impl Into<String>, layout: &[&str]) -> Self {
        Self {
            name: name.into(),
            layout: layout.iter().map(|row| (*row).to_owned()).collect(),
        }
    }
}

/// Meaning assigned to each glyph of a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable wall (`1`).
    Wall,
    /// Open floor (`0`).
    Floor,
    /// Avatar start (`S`).
    Start,
    /// Level exit (`E`).
    Exit,
    /// Required key (`K`).
    Key,
    /// Speed boost (`B`).
    Boost,
    /// Danger zone (`D`).
    Danger,
    /// Timed gate (`G`).
    Gate,
    /// Pursuer spawn point (`P`).
    PursuerSpawn,
}

impl Tile {
    /// Interprets a layout glyph.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            WALL_GLYPH => Some(Self::Wall),
            '0' => Some(Self::Floor),
            'S' => Some(Self::Start),
            'E' => Some(Self::Exit),
            'K' => Some(Self::Key),
            'B' => Some(Self::Boost),
            'D' => Some(Self::Danger),
            'G' => Some(Self::Gate),
            'P' => Some(Self::PursuerSpawn),
            _ => None,
        }
    }
}

/// Errors reported while interpreting a level layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The layout is not a rectangular, non-empty grid.
    #[error("malformed layout: {0}")]
    Grid(#[from] GridError),
    /// A glyph outside the legend was found.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending glyph.
        glyph: char,
        /// Column of the glyph.
        column: u32,
        /// Row of the glyph.
        row: u32,
    },
    /// The layout has no avatar start.
    #[error("layout has no start tile")]
    MissingStart,
    /// The layout has no exit.
    #[error("layout has no exit tile")]
    MissingExit,
    /// A tile that may appear once was repeated.
    #[error("duplicate {tile:?} tile at column {column}, row {row}")]
    Duplicate {
        /// Tile that was repeated.
        tile: Tile,
        /// Column of the repeated tile.
        column: u32,
        /// Row of the repeated tile.
        row: u32,
    },
}

/// Level layout interpreted into typed placements.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelPlan {
    name: String,
    grid: WalkabilityGrid,
    walls: Vec<CellCoord>,
    start: CellCoord,
    exit: CellCoord,
    collectibles: Vec<(CollectibleKind, CellCoord)>,
    danger: Vec<CellCoord>,
    gate: Option<CellCoord>,
    pursuers: Vec<CellCoord>,
}

impl LevelPlan {
    /// Interprets a level specification.
    pub fn parse(spec: &LevelSpec) -> Result<Self, LevelError> {
        let grid = WalkabilityGrid::from_layout(&spec.layout)?;

        let mut walls = Vec::new();
        let mut start = None;
        let mut exit = None;
        let mut collectibles = Vec::new();
        let mut danger = Vec::new();
        let mut gate = None;
        let mut pursuers = Vec::new();

        for (row, line) in (0u32..).zip(&spec.layout) {
            for (column, glyph) in (0u32..).zip(line.chars()) {
                let cell = CellCoord::new(column, row);
                let tile =
                    Tile::from_glyph(glyph).ok_or(LevelError::UnknownGlyph { glyph, column, row })?;
                match tile {
                    Tile::Wall => walls.push(cell),
                    Tile::Floor => {}
                    Tile::Start => place_once(&mut start, tile, cell)?,
                    Tile::Exit => place_once(&mut exit, tile, cell)?,
                    Tile::Gate => place_once(&mut gate, tile, cell)?,
                    Tile::Key => collectibles.push((CollectibleKind::RequiredKey, cell)),
                    Tile::Boost => collectibles.push((CollectibleKind::SpeedBoost, cell)),
                    Tile::Danger => danger.push(cell),
                    Tile::PursuerSpawn => pursuers.push(cell),
                }
            }
        }

        Ok(Self {
            name: spec.name.clone(),
            grid,
            walls,
            start: start.ok_or(LevelError::MissingStart)?,
            exit: exit.ok_or(LevelError::MissingExit)?,
            collectibles,
            danger,
            gate,
            pursuers,
        })
    }

    /// Name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Walkability grid derived from the layout.
    #[must_use]
    pub fn grid(&self) -> &WalkabilityGrid {
        &self.grid
    }

    /// Cells holding walls.
    #[must_use]
    pub fn walls(&self) -> &[CellCoord] {
        &self.walls
    }

    /// Cell where the avatar starts.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell holding the exit.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.exit
    }

    /// Collectibles in layout order.
    #[must_use]
    pub fn collectibles(&self) -> &[(CollectibleKind, CellCoord)] {
        &self.collectibles
    }

    /// Cells holding danger zones.
    #[must_use]
    pub fn danger(&self) -> &[CellCoord] {
        &self.danger
    }

    /// Cell holding the timed gate, if the level has one.
    #[must_use]
    pub const fn gate(&self) -> Option<CellCoord> {
        self.gate
    }

    /// Cells where pursuers spawn, in layout order.
    #[must_use]
    pub fn pursuers(&self) -> &[CellCoord] {
        &self.pursuers
    }
}

fn place_once(slot: &mut Option<CellCoord>, tile: Tile, cell: CellCoord) -> Result<(), LevelError> {
    if slot.is_some() {
        return Err(LevelError::Duplicate {
            tile,
            column: cell.column(),
            row: cell.row(),
        });
    }
    *slot = Some(cell);
    Ok(())
}

/// Built-in three level campaign.
///
/// The first level is a plain maze, the second adds danger zones and a key,
/// the third adds a speed boost, a timed gate in front of the exit and a
/// pursuer.
#[must_use]
pub fn default_levels() -> Vec<LevelSpec> {
    vec![
        LevelSpec::new(
            "Corridors",
            &[
                "1111111111",
                "1S00000001",
                "1011111101",
                "1010000001",
                "1010111101",
                "1010000001",
                "1011111101",
                "1000000001",
                "10000000E1",
                "1111111111",
            ],
        ),
        LevelSpec::new(
            "Key Vault",
            &[
                "1111111111",
                "1S00000001",
                "1011D11101",
                "1010K00001",
                "1010111101",
                "1010D00001",
                "1011111101",
                "1000000001",
                "10000000E1",
                "1111111111",
            ],
        ),
        LevelSpec::new(
            "The Chase",
            &[
                "111111111111",
                "1S0000000001",
                "101111111101",
                "1010K0000101",
                "101011110101",
                "1000D010B101",
                "101111110101",
                "100000000101",
                "101111111101",
                "1P000000GE01",
                "111111111111",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_levels_parse() {
        let plans: Vec<LevelPlan> = default_levels()
            .iter()
            .map(|spec| LevelPlan::parse(spec).expect("built-in level parses"))
            .collect();

        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].start(), CellCoord::new(1, 1));
        assert_eq!(plans[0].exit(), CellCoord::new(8, 8));
        assert!(plans[0].collectibles().is_empty());
        assert_eq!(
            plans[1].collectibles(),
            &[(CollectibleKind::RequiredKey, CellCoord::new(4, 3))]
        );
        assert_eq!(plans[1].danger().len(), 2);
        assert_eq!(plans[2].gate(), Some(CellCoord::new(8, 9)));
        assert_eq!(plans[2].pursuers(), &[CellCoord::new(1, 9)]);
    }

    #[test]
    fn special_tiles_are_walkable() {
        let plan = LevelPlan::parse(&default_levels()[2]).expect("valid level");

        for cell in [
            CellCoord::new(8, 9),
            CellCoord::new(4, 5),
            CellCoord::new(8, 5),
            CellCoord::new(1, 9),
        ] {
            assert!(plan.grid().is_walkable(cell), "{cell:?} should be walkable");
        }
        assert!(!plan.grid().is_walkable(CellCoord::new(0, 0)));
    }

    #[test]
    fn unknown_glyphs_are_rejected() {
        let spec = LevelSpec::new("broken", &["111", "1SX", "1E1"]);

        assert_eq!(
            LevelPlan::parse(&spec),
            Err(LevelError::UnknownGlyph {
                glyph: 'X',
                column: 2,
                row: 1,
            })
        );
    }

    #[test]
    fn start_and_exit_are_mandatory() {
        let no_start = LevelSpec::new("no start", &["111", "10E", "111"]);
        let no_exit = LevelSpec::new("no exit", &["111", "1S0", "111"]);

        assert_eq!(LevelPlan::parse(&no_start), Err(LevelError::MissingStart));
        assert_eq!(LevelPlan::parse(&no_exit), Err(LevelError::MissingExit));
    }

    #[test]
    fn repeated_unique_tiles_are_rejected() {
        let spec = LevelSpec::new("twins", &["1111", "1SS1", "1E01"]);

        assert_eq!(
            LevelPlan::parse(&spec),
            Err(LevelError::Duplicate {
                tile: Tile::Start,
                column: 2,
                row: 1,
            })
        );
    }

    #[test]
    fn ragged_layouts_surface_grid_errors() {
        let spec = LevelSpec::new("ragged", &["1111", "1S1", "1E11"]);

        assert!(matches!(
            LevelPlan::parse(&spec),
            Err(LevelError::Grid(GridError::RaggedRow { row: 1, .. }))
        ));
    }
}
