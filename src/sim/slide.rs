//! Slide and merge rules
//!
//! Every direction reduces to a left or right move over rows: Up and Down
//! transpose the grid first and transpose the result back.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Tile, can_merge};
use crate::error::EngineError;

/// Move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }

    /// Uniformly random direction (auto-play fallback)
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

/// How many merges a row may take part in during a single move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MergePolicy {
    /// A tile produced by a merge cannot absorb another tile in the same move.
    /// `2 2 2 2` moved left gives `4 4 0 0`.
    #[default]
    PerTile,
    /// After the first merge in a row, that row takes no further merges this
    /// move. Matches the original program exactly: `2 2 2 2` moved left gives
    /// `4 2 2 0` with a score of 4.
    PerRow,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::PerTile => "per-tile",
            MergePolicy::PerRow => "per-row",
        }
    }

}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per-tile" | "pertile" | "tile" => Ok(MergePolicy::PerTile),
            "per-row" | "perrow" | "row" => Ok(MergePolicy::PerRow),
            _ => Err(EngineError::InvalidMergePolicy(s.to_string())),
        }
    }
}

/// Outcome of sliding a grid in one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub grid: Grid,
    /// Sum of the doubled values produced by merges
    pub score_delta: u64,
    /// True iff any cell differs from the input grid
    pub changed: bool,
}

/// Slide `grid` in `direction` using the default merge policy
pub fn apply_move(grid: &Grid, direction: Direction) -> MoveResult {
    apply_move_with(grid, direction, MergePolicy::default())
}

/// Slide `grid` in `direction` under an explicit merge policy
pub fn apply_move_with(grid: &Grid, direction: Direction, policy: MergePolicy) -> MoveResult {
    let (next, score_delta) = match direction {
        Direction::Left => shift_rows(grid.clone(), false, policy),
        Direction::Right => shift_rows(grid.clone(), true, policy),
        Direction::Up => {
            let (moved, delta) = shift_rows(grid.transpose(), false, policy);
            (moved.transpose(), delta)
        }
        Direction::Down => {
            let (moved, delta) = shift_rows(grid.transpose(), true, policy);
            (moved.transpose(), delta)
        }
    };
    let changed = next != *grid;
    MoveResult {
        grid: next,
        score_delta,
        changed,
    }
}

fn shift_rows(mut grid: Grid, rightward: bool, policy: MergePolicy) -> (Grid, u64) {
    let mut delta: u64 = 0;
    for row in 0..grid.size() {
        let cells = grid.row_mut(row);
        if rightward {
            cells.reverse();
            delta = delta.saturating_add(slide_row_left(cells, policy));
            cells.reverse();
        } else {
            delta = delta.saturating_add(slide_row_left(cells, policy));
        }
    }
    (grid, delta)
}

/// Slide one row toward index 0, returning the score gained
pub fn slide_row_left(row: &mut [Tile], policy: MergePolicy) -> u64 {
    slide_row_left_with(row, policy, |_| {})
}

/// As [`slide_row_left`], calling `on_merge` with each doubled value
fn slide_row_left_with<F>(row: &mut [Tile], policy: MergePolicy, mut on_merge: F) -> u64
where
    F: FnMut(Tile),
{
    let mut merged = vec![false; row.len()];
    let mut row_merged = false;
    let mut delta: u64 = 0;

    for col in 1..row.len() {
        if row[col] == 0 {
            continue;
        }
        let mut i = col;
        while i > 0 {
            if row[i - 1] == 0 {
                row[i - 1] = row[i];
                row[i] = 0;
                i -= 1;
                continue;
            }
            let blocked = match policy {
                MergePolicy::PerTile => merged[i - 1],
                MergePolicy::PerRow => row_merged,
            };
            if can_merge(row[i - 1], row[i]) && !blocked {
                row[i - 1] *= 2;
                row[i] = 0;
                delta = delta.saturating_add(row[i - 1]);
                on_merge(row[i - 1]);
                merged[i - 1] = true;
                row_merged = true;
            }
            break;
        }
    }

    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(rows: &[[Tile; 4]]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    fn slide(row: [Tile; 4], policy: MergePolicy) -> ([Tile; 4], u64) {
        let mut row = row;
        let delta = slide_row_left(&mut row, policy);
        (row, delta)
    }

    #[test]
    fn test_pair_merges_left() {
        let start = grid(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let result = apply_move(&start, Direction::Left);
        assert_eq!(
            result.grid,
            grid(&[[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]])
        );
        assert_eq!(result.score_delta, 4);
        assert!(result.changed);
    }

    #[test]
    fn test_no_chained_merges() {
        assert_eq!(slide([2, 2, 2, 2], MergePolicy::PerTile), ([4, 4, 0, 0], 8));
        assert_eq!(slide([4, 4, 8, 0], MergePolicy::PerTile), ([8, 8, 0, 0], 8));
        assert_eq!(slide([2, 0, 2, 4], MergePolicy::PerTile), ([4, 4, 0, 0], 4));
        assert_eq!(slide([0, 4, 2, 2], MergePolicy::PerTile), ([4, 4, 0, 0], 4));
    }

    #[test]
    fn test_per_row_policy_stops_after_first_merge() {
        assert_eq!(slide([2, 2, 2, 2], MergePolicy::PerRow), ([4, 2, 2, 0], 4));
        assert_eq!(slide([2, 2, 4, 4], MergePolicy::PerRow), ([4, 4, 4, 0], 4));
        assert_eq!(slide([0, 8, 0, 8], MergePolicy::PerRow), ([16, 0, 0, 0], 16));
    }

    #[test]
    fn test_largest_tiles_do_not_merge() {
        use crate::consts::MAX_TILE;

        let half = MAX_TILE / 2;
        let start = Grid::from_rows(&[[half, half], [MAX_TILE, MAX_TILE]]).unwrap();
        let result = apply_move(&start, Direction::Left);
        assert_eq!(result.grid.rows(), vec![vec![MAX_TILE, 0], vec![MAX_TILE, MAX_TILE]]);
        assert_eq!(result.score_delta, MAX_TILE);

        let capped = Grid::from_rows(&[[MAX_TILE; 2]; 2]).unwrap();
        assert!(capped.is_terminal());
        for dir in Direction::ALL {
            let result = apply_move(&capped, dir);
            assert!(!result.changed);
            assert_eq!(result.score_delta, 0);
        }
    }

    #[test]
    fn test_unchanged_move() {
        let start = grid(&[[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let result = apply_move(&start, Direction::Left);
        assert!(!result.changed);
        assert_eq!(result.score_delta, 0);
        assert_eq!(result.grid, start);
    }

    #[test]
    fn test_each_direction() {
        let start = grid(&[[0, 0, 0, 0], [0, 2, 0, 0], [0, 2, 0, 4], [0, 0, 0, 0]]);

        let up = apply_move(&start, Direction::Up);
        assert_eq!(up.grid, grid(&[[0, 4, 0, 4], [0; 4], [0; 4], [0; 4]]));
        assert_eq!(up.score_delta, 4);

        let down = apply_move(&start, Direction::Down);
        assert_eq!(down.grid, grid(&[[0; 4], [0; 4], [0; 4], [0, 4, 0, 4]]));

        let right = apply_move(&start, Direction::Right);
        assert_eq!(right.grid, grid(&[[0; 4], [0, 0, 0, 2], [0, 0, 2, 4], [0; 4]]));
        assert_eq!(right.score_delta, 0);

        let left = apply_move(&start, Direction::Left);
        assert_eq!(left.grid, grid(&[[0; 4], [2, 0, 0, 0], [2, 4, 0, 0], [0; 4]]));
    }

    #[test]
    fn test_right_merges_from_the_right_edge() {
        let start = grid(&[[2, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let result = apply_move(&start, Direction::Right);
        assert_eq!(result.grid.row(0), &[0, 0, 2, 4]);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("Up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(" R ".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!(
            "Random".parse::<Direction>(),
            Err(EngineError::InvalidDirection("Random".to_string()))
        );
    }

    #[test]
    fn test_merge_policy_parsing() {
        assert_eq!("per-row".parse::<MergePolicy>(), Ok(MergePolicy::PerRow));
        assert_eq!("Per-Tile".parse::<MergePolicy>(), Ok(MergePolicy::PerTile));
        assert_eq!(
            MergePolicy::PerRow.to_string().parse::<MergePolicy>(),
            Ok(MergePolicy::PerRow)
        );
        assert_eq!(
            "per-column".parse::<MergePolicy>(),
            Err(EngineError::InvalidMergePolicy("per-column".to_string()))
        );
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (2usize..=6).prop_flat_map(|n| {
            prop::collection::vec(prop::sample::select(vec![0u64, 0, 2, 4, 8, 16, 32]), n * n)
                .prop_map(move |cells| {
                    let rows: Vec<Vec<Tile>> = cells.chunks(n).map(<[Tile]>::to_vec).collect();
                    Grid::from_rows(&rows).unwrap()
                })
        })
    }

    fn arb_row() -> impl Strategy<Value = Vec<Tile>> {
        prop::collection::vec(prop::sample::select(vec![0u64, 0, 2, 4, 8, 16, 32]), 2..=6)
    }

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    fn arb_policy() -> impl Strategy<Value = MergePolicy> {
        prop::sample::select(vec![MergePolicy::PerTile, MergePolicy::PerRow])
    }

    proptest! {
        #[test]
        fn prop_tiles_stay_powers_of_two(g in arb_grid(), dir in arb_direction(), policy in arb_policy()) {
            let result = apply_move_with(&g, dir, policy);
            prop_assert!(result.grid.tiles().iter().all(|v| *v == 0 || v.is_power_of_two()));
        }

        #[test]
        fn prop_moves_conserve_tile_sum(g in arb_grid(), dir in arb_direction(), policy in arb_policy()) {
            let result = apply_move_with(&g, dir, policy);
            prop_assert_eq!(result.grid.tile_sum(), g.tile_sum());
            // every merge removes one tile
            let merges = g.count_empty().abs_diff(result.grid.count_empty()) as u64;
            prop_assert_eq!(result.score_delta == 0, merges == 0);
        }

        #[test]
        fn prop_score_is_sum_of_merged_values(row in arb_row(), policy in arb_policy()) {
            let mut slid = row.clone();
            let mut merged = Vec::new();
            let delta = slide_row_left_with(&mut slid, policy, |value| merged.push(value));

            prop_assert_eq!(delta, merged.iter().sum::<u64>());
            prop_assert!(merged.iter().all(|v| v.is_power_of_two() && *v >= 4));
            // each merge empties exactly one cell
            let empties = |cells: &[Tile]| cells.iter().filter(|v| **v == 0).count();
            prop_assert_eq!(empties(&slid[..]), empties(&row[..]) + merged.len());
            prop_assert_eq!(slid.iter().sum::<u64>(), row.iter().sum::<u64>());
        }

        #[test]
        fn prop_right_mirrors_left(g in arb_grid(), policy in arb_policy()) {
            let right = apply_move_with(&g, Direction::Right, policy);
            let left = apply_move_with(&g.mirror(), Direction::Left, policy);
            prop_assert_eq!(right.grid.mirror(), left.grid);
            prop_assert_eq!(right.score_delta, left.score_delta);
        }

        #[test]
        fn prop_vertical_moves_transpose_horizontal(g in arb_grid(), policy in arb_policy()) {
            let up = apply_move_with(&g, Direction::Up, policy);
            let left = apply_move_with(&g.transpose(), Direction::Left, policy);
            prop_assert_eq!(up.grid, left.grid.transpose());

            let down = apply_move_with(&g, Direction::Down, policy);
            let right = apply_move_with(&g.transpose(), Direction::Right, policy);
            prop_assert_eq!(down.grid, right.grid.transpose());
        }

        #[test]
        fn prop_changed_matches_grid_diff(g in arb_grid(), dir in arb_direction()) {
            let result = apply_move(&g, dir);
            prop_assert_eq!(result.changed, result.grid != g);
        }
    }
}
