//! Disk-backed grid store.
//!
//! One file per step: fixed 8-byte big-endian signed records, one per
//! canonical cell, packed contiguously in offset order with no header.
//! Single-threaded, in-process use only; the step driver is the sole owner.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::coords::Position;
use crate::indexing::offset_of;

/// Bytes per cell record.
pub const RECORD_BYTES: u64 = 8;

/// Write seam for the redistribution kernel, so the same toppling code runs
/// against the file store and an in-memory map in tests.
pub trait CellSink {
    /// Read-modify-write add at a canonical cell.
    fn accumulate(&mut self, position: Position, delta: i64) -> io::Result<()>;
}

/// A random-access file of cell records for one step.
pub struct GridStore {
    file: File,
    path: PathBuf,
    cells: u64,
}

impl GridStore {
    /// Create (or truncate) a store sized to `cells` records. The length is
    /// set with `set_len`, whose extension is zero-filled, so every record
    /// starts at zero.
    pub fn create(path: &Path, cells: u64) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(cells * RECORD_BYTES)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            cells,
        })
    }

    /// Open an existing store read-only (restored backups).
    pub fn open_read_only(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let cells = file.metadata()?.len() / RECORD_BYTES;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            cells,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records the store holds.
    pub fn len_cells(&self) -> u64 {
        self.cells
    }

    /// Whether a canonical cell's record lies within the store.
    pub fn contains(&self, position: Position) -> bool {
        offset_of(position) < self.cells
    }

    /// Read the value at a canonical cell.
    pub fn read(&mut self, position: Position) -> io::Result<i64> {
        self.file
            .seek(SeekFrom::Start(offset_of(position) * RECORD_BYTES))?;
        let mut buf = [0u8; RECORD_BYTES as usize];
        self.file.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    /// Overwrite the value at a canonical cell.
    pub fn write(&mut self, position: Position, value: i64) -> io::Result<()> {
        self.file
            .seek(SeekFrom::Start(offset_of(position) * RECORD_BYTES))?;
        self.file.write_all(&value.to_be_bytes())
    }
}

impl CellSink for GridStore {
    fn accumulate(&mut self, position: Position, delta: i64) -> io::Result<()> {
        let previous = self.read(position)?;
        self.write(position, previous + delta)
    }
}
