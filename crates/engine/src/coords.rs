//! Lattice coordinates and hyper-octahedral canonicalization.
//!
//! The automaton's symmetry group is all coordinate permutations combined
//! with all sign flips. Exactly one cell per equivalence class is stored:
//! the one whose coordinates are sorted descending and non-negative.

/// Number of lattice dimensions.
pub const DIMENSION: u32 = 5;

/// Number of unit neighbors of a lattice cell (two per axis).
pub const NEIGHBOR_COUNT: u32 = 2 * DIMENSION;

/// A cell of the 5D integer lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub v: i32,
    pub w: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0, 0, 0, 0, 0);

    pub const fn new(v: i32, w: i32, x: i32, y: i32, z: i32) -> Self {
        Self { v, w, x, y, z }
    }

    /// The representative of this cell's symmetry class: absolute values
    /// sorted descending, so that `v >= w >= x >= y >= z >= 0`.
    pub fn canonical(self) -> Position {
        let mut c = [
            self.v.abs(),
            self.w.abs(),
            self.x.abs(),
            self.y.abs(),
            self.z.abs(),
        ];
        c.sort_unstable_by(|a, b| b.cmp(a));
        Position::new(c[0], c[1], c[2], c[3], c[4])
    }

    /// Whether this position lies in the fundamental domain.
    pub fn is_canonical(self) -> bool {
        self.v >= self.w && self.w >= self.x && self.x >= self.y && self.y >= self.z && self.z >= 0
    }

    /// The ten unit neighbors of this cell, in real (unreduced) coordinates.
    pub fn neighbors(self) -> [Position; NEIGHBOR_COUNT as usize] {
        let Position { v, w, x, y, z } = self;
        [
            Position::new(v + 1, w, x, y, z),
            Position::new(v - 1, w, x, y, z),
            Position::new(v, w + 1, x, y, z),
            Position::new(v, w - 1, x, y, z),
            Position::new(v, w, x + 1, y, z),
            Position::new(v, w, x - 1, y, z),
            Position::new(v, w, x, y + 1, z),
            Position::new(v, w, x, y - 1, z),
            Position::new(v, w, x, y, z + 1),
            Position::new(v, w, x, y, z - 1),
        ]
    }

    /// Number of real lattice cells equivalent to this canonical cell:
    /// distinct coordinate permutations times sign flips of the nonzero
    /// coordinates. Used by the conservation checks to expand the reduced
    /// grid back to the full lattice.
    pub fn multiplicity(self) -> i64 {
        debug_assert!(self.is_canonical());
        let coords = [self.v, self.w, self.x, self.y, self.z];
        let mut permutations: i64 = 120; // 5!
        let mut i = 0;
        while i < coords.len() {
            let mut run = 1;
            while i + run < coords.len() && coords[i + run] == coords[i] {
                run += 1;
            }
            permutations /= FACTORIALS[run];
            i += run;
        }
        let nonzero = coords.iter().filter(|&&c| c != 0).count() as u32;
        permutations * (1i64 << nonzero)
    }
}

const FACTORIALS: [i64; 6] = [1, 1, 2, 6, 24, 120];
