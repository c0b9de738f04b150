//! Redistribution (toppling) kernel.
//!
//! A cell redistributes toward the neighbor groups whose value is strictly
//! below its own, resolving them as tiers from the highest-valued group
//! down. Every division is integer division with the remainder retained at
//! the source, which is what makes mass conservation over the full lattice
//! exact for all inputs, negative values included.

use std::io;

use crate::coords::Position;
use crate::store::CellSink;

/// A neighbor group that qualifies for redistribution (value strictly below
/// the source cell's).
#[derive(Debug, Clone, Copy)]
pub struct RelevantNeighbor {
    pub coords: Position,
    pub value: i64,
    pub share_multiplier: i64,
    pub symmetry_count: i64,
}

/// Topple one cell into `sink`.
///
/// The cell's remaining value is always written, even when nothing moves:
/// the step driver rewrites every domain cell every step. Returns whether
/// any amount actually moved.
pub fn topple_position<S: CellSink>(
    sink: &mut S,
    position: Position,
    mut value: i64,
    neighbors: &mut [RelevantNeighbor],
) -> io::Result<bool> {
    // Single-group cells (domain corners) skip the sort.
    if let [neighbor] = neighbors {
        let share_count = neighbor.symmetry_count + 1;
        let to_share = value - neighbor.value;
        let share = to_share / share_count;
        let mut toppled = false;
        if share != 0 {
            toppled = true;
            value = value - to_share + to_share % share_count + share;
            sink.accumulate(neighbor.coords, share * neighbor.share_multiplier)?;
        }
        sink.accumulate(position, value)?;
        return Ok(toppled);
    }
    if neighbors.is_empty() {
        sink.accumulate(position, value)?;
        return Ok(false);
    }

    neighbors.sort_unstable_by(|a, b| b.value.cmp(&a.value));
    let neighbors = &*neighbors;

    // One more than the number of qualifying real neighbor slots; shrinks as
    // groups are satisfied so later tiers divide among fewer recipients.
    let mut share_count: i64 = neighbors.iter().map(|n| n.symmetry_count).sum::<i64>() + 1;
    let mut toppled = false;
    let mut previous_value = None;
    for (i, neighbor) in neighbors.iter().enumerate() {
        // Equal-valued groups share a tier.
        if previous_value != Some(neighbor.value) {
            let to_share = value - neighbor.value;
            let share = to_share / share_count;
            if share != 0 {
                toppled = true;
                value = value - to_share + to_share % share_count + share;
                for n in &neighbors[i..] {
                    sink.accumulate(n.coords, share * n.share_multiplier)?;
                }
            }
            previous_value = Some(neighbor.value);
        }
        share_count -= neighbor.symmetry_count;
    }
    sink.accumulate(position, value)?;
    Ok(toppled)
}
