//! File-backed symmetric-section Aether automaton.
//!
//! Stores only the fundamental domain (`v >= w >= x >= y >= z >= 0`) of the
//! 5D lattice, one backing file per step. A step allocates the next file
//! (grown for at most one unit of outward expansion), topples every domain
//! cell from the current file into it, then rotates the files.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::coords::Position;
use crate::error::{Error, Result};
use crate::indexing::cell_count;
use crate::neighbors;
use crate::store::GridStore;
use crate::topple::{topple_position, RelevantNeighbor};

pub const MAX_INITIAL_VALUE: i64 = i64::MAX;

/// Smallest accepted seed. Below this, the inflow that zero-valued cells
/// pour into the negative source can overflow a signed 64-bit accumulator.
pub const MIN_INITIAL_VALUE: i64 = -2_049_638_230_412_172_401;

/// Starting occupied radius of a fresh run.
const INITIAL_MAX_V: i32 = 6;

const GRID_FOLDER_NAME: &str = "grid";
const PROPERTIES_FILE_NAME: &str = "properties.json";

fn step_file_name(step: u64) -> String {
    format!("step={step}.data")
}

/// Scalar state persisted next to the grid file in a backup.
#[derive(Debug, Serialize, Deserialize)]
struct Properties {
    initial_value: i64,
    step: u64,
    max_v: i32,
}

/// Single-source Aether automaton over a disk-backed fundamental domain.
pub struct Aether5D {
    grid: GridStore,
    grid_folder: PathBuf,
    current_file: PathBuf,
    initial_value: i64,
    step: u64,
    max_v: i32,
    changed: Option<bool>,
    reading_backup: bool,
}

impl Aether5D {
    /// Start a fresh run seeded with `initial_value` at the origin.
    ///
    /// The grid folder is created (and cleaned, if a previous run left one)
    /// under `<folder>/<subfolder_path>/grid`. Rejects seeds below
    /// [`MIN_INITIAL_VALUE`] before touching the filesystem.
    pub fn new(initial_value: i64, folder: &Path) -> Result<Self> {
        if initial_value < MIN_INITIAL_VALUE {
            return Err(Error::InitialValueTooSmall {
                value: initial_value,
                minimum: MIN_INITIAL_VALUE,
            });
        }
        let grid_folder = folder
            .join("Aether")
            .join("5D")
            .join(initial_value.to_string())
            .join(GRID_FOLDER_NAME);
        if grid_folder.exists() {
            fs::remove_dir_all(&grid_folder)?;
        }
        fs::create_dir_all(&grid_folder)?;
        let current_file = grid_folder.join(step_file_name(0));
        let mut grid = GridStore::create(&current_file, cell_count(5, INITIAL_MAX_V + 3))?;
        grid.write(Position::ORIGIN, initial_value)?;
        info!(initial_value, grid = %current_file.display(), "fresh run created");
        Ok(Self {
            grid,
            grid_folder,
            current_file,
            initial_value,
            step: 0,
            max_v: INITIAL_MAX_V,
            changed: None,
            reading_backup: false,
        })
    }

    /// Resume a run from a backup produced by [`Aether5D::backup`].
    ///
    /// The backup's data file stays in place and is read from there; the
    /// first `next_step` writes into a fresh grid folder under `folder` and
    /// leaves the backup file untouched.
    pub fn restore(backup_path: &Path, folder: &Path) -> Result<Self> {
        let backup_grid = backup_path.join(GRID_FOLDER_NAME);
        if !backup_grid.exists() {
            return Err(Error::MissingBackupGrid(backup_grid));
        }
        let properties: Properties =
            serde_json::from_reader(File::open(backup_path.join(PROPERTIES_FILE_NAME))?)?;
        let current_file = backup_grid.join(step_file_name(properties.step));
        if !current_file.exists() {
            return Err(Error::MissingBackupData(current_file));
        }
        let grid = GridStore::open_read_only(&current_file)?;
        let grid_folder = folder
            .join("Aether")
            .join("5D")
            .join(properties.initial_value.to_string())
            .join(GRID_FOLDER_NAME);
        fs::create_dir_all(&grid_folder)?;
        info!(
            step = properties.step,
            max_v = properties.max_v,
            backup = %current_file.display(),
            "run restored from backup"
        );
        Ok(Self {
            grid,
            grid_folder,
            current_file,
            initial_value: properties.initial_value,
            step: properties.step,
            max_v: properties.max_v,
            changed: None,
            reading_backup: true,
        })
    }

    /// Advance the simulation by one step; returns whether anything moved.
    ///
    /// Any I/O error is fatal: no partial-step state is adopted and the
    /// instance should be discarded (the in-progress file is removed
    /// best-effort).
    pub fn next_step(&mut self) -> Result<bool> {
        let new_file = self.grid_folder.join(step_file_name(self.step + 1));
        let mut new_grid = GridStore::create(&new_file, cell_count(5, self.max_v + 4))?;
        let changed = match self.run_step(&mut new_grid) {
            Ok(changed) => changed,
            Err(error) => {
                drop(new_grid);
                if let Err(cleanup) = fs::remove_file(&new_file) {
                    warn!(file = %new_file.display(), %cleanup, "could not remove partial step file");
                }
                return Err(error);
            }
        };
        // Rotate: the consumed file goes away, unless it is a restored
        // backup (kept alive once more for safety).
        if self.reading_backup {
            self.reading_backup = false;
        } else if let Err(error) = fs::remove_file(&self.current_file) {
            warn!(file = %self.current_file.display(), %error, "could not remove previous step file");
        }
        self.grid = new_grid;
        self.current_file = new_file;
        self.step += 1;
        self.changed = Some(changed);
        debug!(step = self.step, max_v = self.max_v, changed, "step complete");
        Ok(changed)
    }

    /// Full domain pass for one step. Mutates `max_v` on growth.
    fn run_step(&mut self, new_grid: &mut GridStore) -> Result<bool> {
        let mut changed = false;
        for v in 0..self.max_v {
            if self.topple_slice(v, new_grid)? {
                changed = true;
            }
        }
        // Growth shell: the two outermost slices. Movement there means the
        // occupied radius grew by one.
        let mut shell_changed = false;
        for v in self.max_v..self.max_v + 2 {
            if self.topple_slice(v, new_grid)? {
                shell_changed = true;
            }
        }
        if shell_changed {
            changed = true;
            self.max_v += 1;
        }
        Ok(changed)
    }

    /// Topple every domain cell with leading coordinate `v`.
    fn topple_slice(&mut self, v: i32, new_grid: &mut GridStore) -> Result<bool> {
        let mut changed = false;
        let mut relevant: Vec<RelevantNeighbor> = Vec::with_capacity(10);
        for w in 0..=v {
            for x in 0..=w {
                for y in 0..=x {
                    for z in 0..=y {
                        let position = Position::new(v, w, x, y, z);
                        let value = self.grid.read(position)?;
                        relevant.clear();
                        for group in neighbors::resolve(position) {
                            let neighbor_value = self.grid.read(group.coords)?;
                            if neighbor_value < value {
                                relevant.push(RelevantNeighbor {
                                    coords: group.coords,
                                    value: neighbor_value,
                                    share_multiplier: group.share_multiplier,
                                    symmetry_count: group.symmetry_count,
                                });
                            }
                        }
                        if topple_position(new_grid, position, value, &mut relevant)? {
                            changed = true;
                        }
                    }
                }
            }
        }
        Ok(changed)
    }

    /// Value at an arbitrary real lattice position: canonicalized first, so
    /// every symmetry-equivalent tuple reads the same stored cell.
    pub fn get_from_position(&mut self, position: Position) -> Result<i64> {
        self.get_from_asymmetric_position(position.canonical())
    }

    /// Value at a pre-canonicalized position. Cells beyond the backing
    /// file's extent are untouched background and read as zero.
    pub fn get_from_asymmetric_position(&mut self, position: Position) -> Result<i64> {
        debug_assert!(position.is_canonical());
        if !self.grid.contains(position) {
            return Ok(0);
        }
        Ok(self.grid.read(position)?)
    }

    /// Changed flag of the last completed step, if any step has run.
    pub fn is_changed(&self) -> Option<bool> {
        self.changed
    }

    /// Current known occupied radius (largest potentially nonzero leading
    /// coordinate). Grows by at most one per step.
    pub fn asymmetric_max_v(&self) -> i32 {
        self.max_v
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn initial_value(&self) -> i64 {
        self.initial_value
    }

    pub fn name(&self) -> &'static str {
        "Aether"
    }

    /// Per-run subfolder, derived from name, dimensionality and seed.
    pub fn subfolder_path(&self) -> String {
        format!("{}/5D/{}", self.name(), self.initial_value)
    }

    /// Write a restorable snapshot under `<backup_path>/<backup_name>`:
    /// a copy of the current step file plus the scalar state.
    pub fn backup(&self, backup_path: &Path, backup_name: &str) -> Result<()> {
        let folder = backup_path.join(backup_name);
        if folder.exists() {
            fs::remove_dir_all(&folder)?;
        }
        let grid_folder = folder.join(GRID_FOLDER_NAME);
        fs::create_dir_all(&grid_folder)?;
        fs::copy(
            &self.current_file,
            grid_folder.join(step_file_name(self.step)),
        )?;
        let properties = Properties {
            initial_value: self.initial_value,
            step: self.step,
            max_v: self.max_v,
        };
        serde_json::to_writer_pretty(
            File::create(folder.join(PROPERTIES_FILE_NAME))?,
            &properties,
        )
        .map_err(Error::from)?;
        info!(step = self.step, backup = %folder.display(), "backup written");
        Ok(())
    }

    /// Release the backing store and delete the run's grid folder. Skipped
    /// when the store still points at a restored backup.
    pub fn close(self) -> io::Result<()> {
        let reading_backup = self.reading_backup;
        let grid_folder = self.grid_folder.clone();
        drop(self);
        if !reading_backup {
            fs::remove_dir_all(grid_folder)?;
        }
        Ok(())
    }
}
