//! Hex-offset adjacency
//!
//! Odd rows sit half a cell to the right, so the column offsets of the
//! diagonal neighbors flip with row parity:
//!
//! ```text
//! even row r:  (r-1,c-1) (r-1,c)        odd row r:  (r-1,c) (r-1,c+1)
//!            (r,c-1) [r,c] (r,c+1)               (r,c-1) [r,c] (r,c+1)
//!              (r+1,c-1) (r+1,c)                    (r+1,c) (r+1,c+1)
//! ```

use super::geometry::{GridLayout, GridPos, is_odd_row};

/// Diagonal column offsets (left, right) for a row
#[inline]
fn diagonal_offsets(row: i32) -> (i32, i32) {
    if is_odd_row(row) { (0, 1) } else { (-1, 0) }
}

/// The six candidate neighbors of a cell, before range filtering
///
/// Order: left, right, upper-left, upper-right, lower-left, lower-right.
pub fn neighbor_candidates(pos: GridPos) -> [GridPos; 6] {
    let GridPos { row, col } = pos;
    let (dl, dr) = diagonal_offsets(row);
    [
        GridPos::new(row, col - 1),
        GridPos::new(row, col + 1),
        GridPos::new(row - 1, col + dl),
        GridPos::new(row - 1, col + dr),
        GridPos::new(row + 1, col + dl),
        GridPos::new(row + 1, col + dr),
    ]
}

/// Neighbors of a cell that lie on the grid
///
/// Drops candidates with a negative row or column, or a column past the end
/// of their own row. Rows are not capped from below; callers that need a
/// ceiling check it themselves.
pub fn neighbors(layout: &GridLayout, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
    neighbor_candidates(pos)
        .into_iter()
        .filter(move |n| n.row >= 0 && layout.col_in_row(n.row, n.col))
}

/// Whether two cells touch
pub fn are_adjacent(a: GridPos, b: GridPos) -> bool {
    neighbor_candidates(a).contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::Board;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn collect(layout: &GridLayout, row: i32, col: i32) -> Vec<(i32, i32)> {
        let mut out: Vec<_> = neighbors(layout, GridPos::new(row, col))
            .map(|p| (p.row, p.col))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_even_row_interior() {
        let layout = GridLayout::default();
        assert_eq!(
            collect(&layout, 2, 5),
            vec![(1, 4), (1, 5), (2, 4), (2, 6), (3, 4), (3, 5)]
        );
    }

    #[test]
    fn test_odd_row_interior() {
        let layout = GridLayout::default();
        assert_eq!(
            collect(&layout, 3, 5),
            vec![(2, 5), (2, 6), (3, 4), (3, 6), (4, 5), (4, 6)]
        );
    }

    #[test]
    fn test_top_left_corner() {
        let layout = GridLayout::default();
        // Row 0 has nothing above; column -1 is dropped
        assert_eq!(collect(&layout, 0, 0), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_odd_row_right_edge() {
        let layout = GridLayout::default();
        // Odd row 1 ends at column 18; (0,19) and (2,19) are valid even-row cells
        assert_eq!(
            collect(&layout, 1, 18),
            vec![(0, 18), (0, 19), (1, 17), (2, 18), (2, 19)]
        );
    }

    #[test]
    fn test_even_row_right_edge() {
        let layout = GridLayout::default();
        // Even row end: diagonal (r±1, 19) is past the odd row's last column
        assert_eq!(
            collect(&layout, 2, 19),
            vec![(1, 18), (2, 18), (3, 18)]
        );
    }

    #[test]
    fn test_adjacency_is_symmetric_example() {
        assert!(are_adjacent(GridPos::new(0, 0), GridPos::new(1, 0)));
        assert!(are_adjacent(GridPos::new(1, 0), GridPos::new(0, 0)));
        assert!(are_adjacent(GridPos::new(1, 0), GridPos::new(0, 1)));
        assert!(!are_adjacent(GridPos::new(0, 0), GridPos::new(1, 1)));
    }

    proptest! {
        #[test]
        fn prop_at_most_six_in_bounds_neighbors(
            rows in 1usize..8,
            seed in any::<u64>(),
            row_pick in 0usize..64,
            col_pick in 0u32..64,
        ) {
            let mut board = Board::from_tuning(&Tuning::default());
            board.regenerate(rows, 3, &mut Pcg32::seed_from_u64(seed));
            let layout = *board.layout();
            // Neighbors reach one row down, so stay a row under the ceiling
            let row = (row_pick % (board.search_ceiling() - 1)) as i32;
            let col = (col_pick % layout.cols_in_row(row)) as i32;

            let found: Vec<_> = neighbors(&layout, GridPos::new(row, col)).collect();
            prop_assert!(found.len() <= 6);
            for n in found {
                prop_assert!(board.is_in_bounds(n));
            }
        }

        #[test]
        fn prop_adjacency_is_symmetric(row in 0i32..40, col in 0i32..20) {
            let layout = GridLayout::default();
            prop_assume!(layout.col_in_row(row, col));
            let pos = GridPos::new(row, col);
            for n in neighbors(&layout, pos) {
                prop_assert!(neighbors(&layout, n).any(|back| back == pos));
            }
        }
    }
}
