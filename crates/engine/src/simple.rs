//! Plain full-lattice implementation, for review and testing.
//!
//! No symmetry reduction and no file backing: a dense `side^5` array holding
//! every lattice cell around the origin, grown by one ring whenever activity
//! reaches the margin. The integration tests use it as the oracle the
//! reduced engine must agree with.

use crate::automaton::MIN_INITIAL_VALUE;
use crate::error::{Error, Result};

/// In-memory single-source Aether automaton on the full 5D lattice.
pub struct SimpleAether5D {
    grid: Vec<i64>,
    side: usize,
    /// Array index of the origin on each axis.
    origin: i32,
    initial_value: i64,
    step: u64,
    bounds_reached: bool,
}

impl SimpleAether5D {
    pub fn new(initial_value: i64) -> Result<Self> {
        if initial_value < MIN_INITIAL_VALUE {
            return Err(Error::InitialValueTooSmall {
                value: initial_value,
                minimum: MIN_INITIAL_VALUE,
            });
        }
        let side = 5usize;
        let mut automaton = Self {
            grid: vec![0; side.pow(5)],
            side,
            origin: (side as i32 - 1) / 2,
            initial_value,
            step: 0,
            bounds_reached: false,
        };
        let origin = automaton.origin;
        let idx = automaton.index(origin, origin, origin, origin, origin);
        automaton.grid[idx] = initial_value;
        Ok(automaton)
    }

    fn index(&self, v: i32, w: i32, x: i32, y: i32, z: i32) -> usize {
        debug_assert!([v, w, x, y, z]
            .iter()
            .all(|&c| c >= 0 && (c as usize) < self.side));
        let side = self.side;
        ((((v as usize * side) + w as usize) * side + x as usize) * side + y as usize) * side
            + z as usize
    }

    fn value_at(&self, v: i32, w: i32, x: i32, y: i32, z: i32) -> i64 {
        let side = self.side as i32;
        if [v, w, x, y, z].iter().any(|&c| c < 0 || c >= side) {
            0
        } else {
            self.grid[self.index(v, w, x, y, z)]
        }
    }

    /// Advance one step; returns whether anything moved.
    pub fn next_step(&mut self) -> bool {
        let index_offset: i32 = if self.bounds_reached { 1 } else { 0 };
        let new_side = self.side + 2 * index_offset as usize;
        self.bounds_reached = false;
        let mut next = SimpleAether5D {
            grid: vec![0; new_side.pow(5)],
            side: new_side,
            origin: self.origin + index_offset,
            initial_value: self.initial_value,
            step: self.step,
            bounds_reached: false,
        };
        let mut changed = false;
        let side = self.side as i32;
        let mut neighbors: Vec<(usize, i64)> = Vec::with_capacity(10);
        for v in 0..side {
            for w in 0..side {
                for x in 0..side {
                    for y in 0..side {
                        for z in 0..side {
                            let mut value = self.grid[self.index(v, w, x, y, z)];
                            neighbors.clear();
                            for (direction, (nv, nw, nx, ny, nz)) in
                                Self::neighbor_coords(v, w, x, y, z).into_iter().enumerate()
                            {
                                let neighbor_value = self.value_at(nv, nw, nx, ny, nz);
                                if neighbor_value < value {
                                    neighbors.push((direction, neighbor_value));
                                }
                            }
                            if !neighbors.is_empty() {
                                neighbors.sort_by(|a, b| b.1.cmp(&a.1));
                                let mut share_count = neighbors.len() as i64 + 1;
                                let mut previous = None;
                                for i in 0..neighbors.len() {
                                    let neighbor_value = neighbors[i].1;
                                    if previous != Some(neighbor_value) {
                                        let to_share = value - neighbor_value;
                                        let share = to_share / share_count;
                                        if share != 0 {
                                            changed = true;
                                            self.note_bounds(
                                                v + index_offset,
                                                w + index_offset,
                                                x + index_offset,
                                                y + index_offset,
                                                z + index_offset,
                                                new_side as i32,
                                            );
                                            value =
                                                value - to_share + to_share % share_count + share;
                                            for &(direction, _) in &neighbors[i..] {
                                                let (nv, nw, nx, ny, nz) =
                                                    Self::neighbor_coords(v, w, x, y, z)[direction];
                                                let idx = next.index(
                                                    nv + index_offset,
                                                    nw + index_offset,
                                                    nx + index_offset,
                                                    ny + index_offset,
                                                    nz + index_offset,
                                                );
                                                next.grid[idx] += share;
                                            }
                                        }
                                        previous = Some(neighbor_value);
                                    }
                                    share_count -= 1;
                                }
                            }
                            let idx = next.index(
                                v + index_offset,
                                w + index_offset,
                                x + index_offset,
                                y + index_offset,
                                z + index_offset,
                            );
                            next.grid[idx] += value;
                        }
                    }
                }
            }
        }
        self.grid = next.grid;
        self.side = next.side;
        self.origin = next.origin;
        self.step += 1;
        changed
    }

    fn note_bounds(&mut self, v: i32, w: i32, x: i32, y: i32, z: i32, side: i32) {
        let near = |c: i32| c == 1 || c == side - 2;
        if near(v) || near(w) || near(x) || near(y) || near(z) {
            self.bounds_reached = true;
        }
    }

    #[allow(clippy::type_complexity)]
    fn neighbor_coords(
        v: i32,
        w: i32,
        x: i32,
        y: i32,
        z: i32,
    ) -> [(i32, i32, i32, i32, i32); 10] {
        [
            (v + 1, w, x, y, z),
            (v - 1, w, x, y, z),
            (v, w + 1, x, y, z),
            (v, w - 1, x, y, z),
            (v, w, x + 1, y, z),
            (v, w, x - 1, y, z),
            (v, w, x, y + 1, z),
            (v, w, x, y - 1, z),
            (v, w, x, y, z + 1),
            (v, w, x, y, z - 1),
        ]
    }

    /// Value at a real lattice position; zero outside the tracked region.
    pub fn get(&self, v: i32, w: i32, x: i32, y: i32, z: i32) -> i64 {
        self.value_at(
            self.origin + v,
            self.origin + w,
            self.origin + x,
            self.origin + y,
            self.origin + z,
        )
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn initial_value(&self) -> i64 {
        self.initial_value
    }

    /// Sum over every tracked lattice cell.
    pub fn total(&self) -> i64 {
        self.grid.iter().sum()
    }
}
