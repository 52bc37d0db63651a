#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic shortest-path search over walkability grids.
//!
//! The search is an A* over 4-directional moves with a Manhattan heuristic.
//! Open-set ties on `f = g + h` are broken by insertion order so identical
//! queries always yield identical paths. Nothing is cached between calls.

use std::{cmp::Reverse, collections::BinaryHeap};

use maze_chase_core::{CellCoord, Direction, WalkabilityGrid};

/// Neighbor expansion order used by the search.
const EXPANSION_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::West,
    Direction::South,
    Direction::North,
];

/// Result of a single path query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Cells from start (inclusive) to goal (inclusive); empty when no path exists.
    pub path: Vec<CellCoord>,
    /// Number of cells removed from the open set and expanded.
    pub expansions: usize,
}

impl SearchOutcome {
    /// Reports whether the query produced a path.
    #[must_use]
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Returns the shortest 4-directional path from `start` to `goal`.
///
/// An empty path means "no path": either endpoint lies outside the grid or on
/// an impassable cell, or the goal is unreachable.
#[must_use]
pub fn find_path(grid: &WalkabilityGrid, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
    search(grid, start, goal).path
}

/// Runs the search and reports the expansion count alongside the path.
///
/// Every cell is expanded at most once, so `expansions` never exceeds
/// [`WalkabilityGrid::cell_count`].
#[must_use]
pub fn search(grid: &WalkabilityGrid, start: CellCoord, goal: CellCoord) -> SearchOutcome {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        return SearchOutcome::default();
    }

    if start == goal {
        return SearchOutcome {
            path: vec![start],
            expansions: 0,
        };
    }

    let cell_count = grid.cell_count();
    let mut g_scores = vec![u32::MAX; cell_count];
    let mut came_from: Vec<Option<CellCoord>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open = BinaryHeap::new();
    let mut sequence: u64 = 0;
    let mut expansions = 0;

    let Some(start_index) = grid.index(start) else {
        return SearchOutcome::default();
    };
    g_scores[start_index] = 0;
    open.push(Reverse(OpenEntry {
        f_score: start.manhattan_distance(goal),
        sequence,
        cell: start,
    }));

    while let Some(Reverse(entry)) = open.pop() {
        let Some(current_index) = grid.index(entry.cell) else {
            continue;
        };
        if closed[current_index] {
            continue;
        }
        closed[current_index] = true;
        expansions += 1;

        if entry.cell == goal {
            return SearchOutcome {
                path: reconstruct(&came_from, grid, goal),
                expansions,
            };
        }

        let tentative = g_scores[current_index].saturating_add(1);
        for direction in EXPANSION_ORDER {
            let Some(neighbor) = entry.cell.step(direction) else {
                continue;
            };
            if !grid.is_walkable(neighbor) {
                continue;
            }
            let Some(neighbor_index) = grid.index(neighbor) else {
                continue;
            };
            if closed[neighbor_index] || tentative >= g_scores[neighbor_index] {
                continue;
            }

            g_scores[neighbor_index] = tentative;
            came_from[neighbor_index] = Some(entry.cell);
            sequence += 1;
            open.push(Reverse(OpenEntry {
                f_score: tentative.saturating_add(neighbor.manhattan_distance(goal)),
                sequence,
                cell: neighbor,
            }));
        }
    }

    SearchOutcome {
        path: Vec::new(),
        expansions,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    f_score: u32,
    sequence: u64,
    cell: CellCoord,
}

fn reconstruct(
    came_from: &[Option<CellCoord>],
    grid: &WalkabilityGrid,
    goal: CellCoord,
) -> Vec<CellCoord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(previous) = grid
        .index(current)
        .and_then(|index| came_from.get(index).copied().flatten())
    {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_entries_order_by_score_then_insertion() {
        let early = OpenEntry {
            f_score: 4,
            sequence: 1,
            cell: CellCoord::new(9, 9),
        };
        let late = OpenEntry {
            f_score: 4,
            sequence: 2,
            cell: CellCoord::new(0, 0),
        };
        let cheaper = OpenEntry {
            f_score: 3,
            sequence: 7,
            cell: CellCoord::new(5, 5),
        };

        let mut heap = BinaryHeap::new();
        heap.push(Reverse(late));
        heap.push(Reverse(early));
        heap.push(Reverse(cheaper));

        assert_eq!(heap.pop().map(|Reverse(entry)| entry), Some(cheaper));
        assert_eq!(heap.pop().map(|Reverse(entry)| entry), Some(early));
        assert_eq!(heap.pop().map(|Reverse(entry)| entry), Some(late));
    }

    #[test]
    fn start_equal_to_goal_yields_single_cell() {
        let grid = WalkabilityGrid::open(3, 3);
        let cell = CellCoord::new(1, 1);

        assert_eq!(find_path(&grid, cell, cell), vec![cell]);
    }

    #[test]
    fn adjacent_goal_yields_two_cells() {
        let grid = WalkabilityGrid::open(3, 3);

        assert_eq!(
            find_path(&grid, CellCoord::new(0, 0), CellCoord::new(1, 0)),
            vec![CellCoord::new(0, 0), CellCoord::new(1, 0)]
        );
    }

    #[test]
    fn out_of_bounds_endpoints_yield_no_path() {
        let grid = WalkabilityGrid::open(3, 3);

        assert!(find_path(&grid, CellCoord::new(3, 0), CellCoord::new(0, 0)).is_empty());
        assert!(find_path(&grid, CellCoord::new(0, 0), CellCoord::new(0, 7)).is_empty());
    }

    #[test]
    fn wall_endpoints_yield_no_path() {
        let grid = WalkabilityGrid::from_layout(&["010", "000"]).expect("valid layout");

        assert!(find_path(&grid, CellCoord::new(1, 0), CellCoord::new(0, 1)).is_empty());
        assert!(find_path(&grid, CellCoord::new(0, 1), CellCoord::new(1, 0)).is_empty());
    }

    #[test]
    fn path_detours_around_walls() {
        let grid =
            WalkabilityGrid::from_layout(&["00000", "01110", "00010"]).expect("valid layout");
        let outcome = search(&grid, CellCoord::new(0, 2), CellCoord::new(4, 2));

        assert_eq!(outcome.path.len(), 9);
        assert_eq!(outcome.path.first(), Some(&CellCoord::new(0, 2)));
        assert_eq!(outcome.path.last(), Some(&CellCoord::new(4, 2)));
        assert!(outcome.expansions <= grid.cell_count());
    }
}
