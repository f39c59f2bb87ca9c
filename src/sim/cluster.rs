//! Same-color cluster detection and removal
//!
//! Flood fill over active bubbles of one color. Unlike the placement
//! search, only matching neighbors are ever enqueued.
//!
//! Bubbles left hanging after a removal are not dropped; they stay active
//! wherever they are.

use std::collections::{BTreeSet, HashSet, VecDeque};

use super::board::Board;
use super::geometry::GridPos;
use super::hex::neighbors;
use crate::tuning::Tuning;

/// Connected active bubbles of `color` reachable from `start`
///
/// Empty if `start` itself is not an active bubble of that color.
pub fn find_cluster(board: &Board, start: GridPos, color: u8) -> BTreeSet<GridPos> {
    let matches = |pos: GridPos| board.active_color(pos) == Some(color);

    let mut cluster = BTreeSet::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(pos) = queue.pop_front() {
        if !matches(pos) {
            continue;
        }
        cluster.insert(pos);

        for next in neighbors(board.layout(), pos) {
            if visited.insert(next) && matches(next) {
                queue.push_back(next);
            }
        }
    }

    log::debug!(
        "Cluster from {:?} color {}: {} bubbles",
        start,
        color,
        cluster.len()
    );
    cluster
}

/// What the cluster check decided for a placed bubble
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Cluster was big enough and is now inactive
    Cleared { removed: Vec<GridPos>, bonus: u64 },
    /// Too small; nothing removed
    Unmatched { size: usize },
}

/// Run the cluster check for the bubble just placed at `pos`
pub fn resolve_placement(board: &mut Board, pos: GridPos, tuning: &Tuning) -> Resolution {
    let Some(color) = board.active_color(pos) else {
        return Resolution::Unmatched { size: 0 };
    };

    let cluster = find_cluster(board, pos, color);
    if cluster.len() < tuning.min_cluster {
        return Resolution::Unmatched {
            size: cluster.len(),
        };
    }

    let bonus = tuning.cluster_bonus(cluster.len());
    let removed: Vec<GridPos> = cluster.into_iter().collect();
    for &p in &removed {
        board.deactivate(p);
    }
    log::debug!("Cleared {} bubbles for {} points", removed.len(), bonus);
    Resolution::Cleared { removed, bonus }
}
