//! Snap a projectile onto the grid
//!
//! Breadth-first search out from a seed cell for the free cell whose center
//! is closest to the impact point. Occupied and out-of-bounds cells are never
//! candidates, but the search still walks through them so it can route
//! around clumps of bubbles.

use std::collections::{HashSet, VecDeque};

use glam::Vec2;

use super::board::Board;
use super::geometry::GridPos;
use super::hex::neighbors;

/// Closest free, in-bounds cell to `impact` within `max_depth` steps of `seed`
///
/// Every cell discovered (seed included) is a candidate if free and in
/// bounds; only cells at depth below `max_depth - 1` are expanded. Returns
/// `None` when nothing was reachable.
pub fn find_nearest_free_cell(
    board: &Board,
    impact: Vec2,
    seed: GridPos,
    max_depth: u32,
) -> Option<GridPos> {
    let layout = board.layout();
    let is_candidate = |pos: GridPos| board.is_free(pos) && board.is_in_bounds(pos);

    let mut queue = VecDeque::from([(seed, 0u32)]);
    let mut visited = HashSet::from([seed]);
    let mut best: Option<(GridPos, f32)> = None;

    if is_candidate(seed) {
        let dist_sq = layout.distance_sq(seed, impact);
        log::debug!("Seed {:?} is free, dist² {:.2}", seed, dist_sq);
        best = Some((seed, dist_sq));
    }

    while let Some((pos, depth)) = queue.pop_front() {
        if depth >= max_depth && best.is_some() {
            break;
        }

        for next in neighbors(layout, pos) {
            if !visited.insert(next) {
                continue;
            }

            if is_candidate(next) {
                let dist_sq = layout.distance_sq(next, impact);
                if best.is_none_or(|(_, best_sq)| dist_sq < best_sq) {
                    log::debug!(
                        "Better free cell {:?}, dist² {:.2} at depth {}",
                        next,
                        dist_sq,
                        depth + 1
                    );
                    best = Some((next, dist_sq));
                }
            }

            if depth + 1 < max_depth {
                queue.push_back((next, depth + 1));
            }
        }
    }

    match best {
        Some((pos, dist_sq)) => {
            log::debug!("Placement search chose {:?} (dist² {:.2})", pos, dist_sq);
            Some(pos)
        }
        None => {
            log::debug!("No free cell within depth {} of {:?}", max_depth, seed);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hex::neighbor_candidates;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn board() -> Board {
        Board::from_tuning(&Tuning::default())
    }

    #[test]
    fn test_free_seed_near_impact_is_chosen() {
        let board = board();
        let seed = GridPos::new(0, 5);
        let impact = board.layout().cell_center(seed);
        assert_eq!(find_nearest_free_cell(&board, impact, seed, 6), Some(seed));
    }

    #[test]
    fn test_occupied_seed_snaps_to_nearest_neighbor() {
        let mut board = board();
        let hit = GridPos::new(0, 5);
        board.set(hit, 1).unwrap();

        // Impact just below and left of the hit bubble
        let center = board.layout().cell_center(hit);
        let impact = center + Vec2::new(-15.0, 30.0);
        assert_eq!(
            find_nearest_free_cell(&board, impact, hit, 6),
            Some(GridPos::new(1, 4))
        );
    }

    #[test]
    fn test_routes_around_occupied_cells() {
        let mut board = board();
        // Fill rows 0 and 1 completely
        for row in 0..2 {
            for col in 0..board.cols_in_row(row) as i32 {
                board.set(GridPos::new(row, col), 0).unwrap();
            }
        }
        let seed = GridPos::new(0, 10);
        let impact = board.layout().cell_center(seed);
        let found = find_nearest_free_cell(&board, impact, seed, 6).unwrap();
        assert_eq!(found.row, 2);
        assert!(board.is_free(found));
    }

    #[test]
    fn test_enclosed_seed_with_depth_one_finds_nothing() {
        let mut board = board();
        let seed = GridPos::new(2, 5);
        board.set(seed, 0).unwrap();
        for n in neighbor_candidates(seed) {
            board.set(n, 1).unwrap();
        }
        let impact = board.layout().cell_center(seed);
        assert_eq!(find_nearest_free_cell(&board, impact, seed, 1), None);
        // With more depth the ring is escaped
        assert!(find_nearest_free_cell(&board, impact, seed, 2).is_some());
    }

    #[test]
    fn test_invalid_seed_still_expands() {
        let board = board();
        // Column -1 is off the grid, but its neighbors are not
        let seed = GridPos::new(0, -1);
        let impact = Vec2::new(5.0, 50.0);
        assert_eq!(
            find_nearest_free_cell(&board, impact, seed, 6),
            Some(GridPos::new(0, 0))
        );
    }

    #[test]
    fn test_respects_search_ceiling() {
        let mut board = board();
        board.set(GridPos::new(0, 0), 0).unwrap();
        // Ceiling is 1 + 3 = 4, so row 4 and beyond are never offered
        let seed = GridPos::new(3, 5);
        let impact = board.layout().cell_center(GridPos::new(6, 5));
        let found = find_nearest_free_cell(&board, impact, seed, 6).unwrap();
        assert_eq!(found.row, 3);
    }

    #[test]
    fn test_seed_beyond_ceiling_with_no_budget() {
        let board = board();
        let seed = GridPos::new(40, 3);
        let impact = board.layout().cell_center(seed);
        assert_eq!(find_nearest_free_cell(&board, impact, seed, 2), None);
    }

    proptest! {
        #[test]
        fn prop_result_is_free_and_in_bounds(
            occupied in proptest::collection::vec((0i32..6, 0i32..20), 0..60),
            seed_row in -1i32..8,
            seed_col in -1i32..21,
            x in 0f32..800.0,
            y in 0f32..400.0,
            depth in 1u32..7,
        ) {
            let mut board = board();
            for (row, col) in occupied {
                let _ = board.set(GridPos::new(row, col), 0);
            }
            let seed = GridPos::new(seed_row, seed_col);
            if let Some(found) = find_nearest_free_cell(&board, Vec2::new(x, y), seed, depth) {
                prop_assert!(board.is_free(found));
                prop_assert!(board.is_in_bounds(found));
            }
        }
    }
}
