//! Neighbor direction folding in the fundamental domain.
//!
//! At a boundary of the domain (coordinates equal to each other or to zero)
//! several of a cell's ten real neighbor directions collapse onto the same
//! stored representative. Each distinct representative becomes one group
//! carrying two integer weights:
//!
//! - `symmetry_count`: how many of the ten real neighbor slots fold onto the
//!   group; it shrinks the division count as groups are satisfied.
//! - `share_multiplier`: how many real neighbors of the group's own
//!   representative are equivalent to the source cell; it scales the flow
//!   written to the stored cell so that conservation holds over the full
//!   unreduced lattice.
//!
//! A generic interior cell (all coordinate comparisons strict, `z > 0`) has
//! ten groups with both weights equal to one.

use crate::coords::Position;

/// One distinct canonical neighbor direction of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborGroup {
    /// Canonical coordinates of the neighbor cell.
    pub coords: Position,
    /// Real neighbor slots of the source folding onto this direction.
    pub symmetry_count: i64,
    /// Inflow scaling at the stored representative.
    pub share_multiplier: i64,
}

/// Resolve the distinct neighbor directions of a canonical cell.
pub fn resolve(position: Position) -> Vec<NeighborGroup> {
    debug_assert!(position.is_canonical());
    let mut groups: Vec<NeighborGroup> = Vec::with_capacity(10);
    for real in position.neighbors() {
        let coords = real.canonical();
        match groups.iter_mut().find(|g| g.coords == coords) {
            Some(group) => group.symmetry_count += 1,
            None => groups.push(NeighborGroup {
                coords,
                symmetry_count: 1,
                share_multiplier: 0,
            }),
        }
    }
    for group in &mut groups {
        group.share_multiplier = group
            .coords
            .neighbors()
            .iter()
            .filter(|q| q.canonical() == position)
            .count() as i64;
    }
    groups
}
