//! Flat addressing of the fundamental domain.
//!
//! Canonical cells are packed into a one-dimensional record array ordered by
//! (v, w, x, y, z). The cell counts below are the triangular-number tower
//! that both sizes the backing file and resolves a cell's offset.

use crate::coords::Position;

/// Number of canonical cells of the given rank whose leading coordinate is
/// below `side`. Rank `r` counts tuples `c1 >= c2 >= ... >= cr >= 0` with
/// `c1 < side`, which is the binomial `C(side + r - 1, r)`.
pub fn cell_count(rank: u32, side: i32) -> u64 {
    debug_assert!((1..=5).contains(&rank));
    debug_assert!(side >= 0);
    let side = side as u128;
    let mut numerator: u128 = 1;
    for i in 0..rank as u128 {
        numerator *= side + i;
    }
    (numerator / FACTORIALS[rank as usize]) as u64
}

const FACTORIALS: [u128; 6] = [1, 1, 2, 6, 24, 120];

/// Flat record index of a canonical cell: all cells with a smaller leading
/// coordinate, plus those sharing `v` with a smaller `w`, and so on down to
/// the final `y >= z >= 0` pair.
pub fn offset_of(p: Position) -> u64 {
    debug_assert!(p.is_canonical());
    cell_count(5, p.v)
        + cell_count(4, p.w)
        + cell_count(3, p.x)
        + cell_count(2, p.y)
        + p.z as u64
}
