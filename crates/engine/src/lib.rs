//! Aether Engine
//!
//! Symmetry-reduced, disk-backed implementation of the Aether cellular
//! automaton on the 5D square lattice.

pub mod automaton;
pub mod coords;
pub mod error;
pub mod indexing;
pub mod neighbors;
pub mod simple;
pub mod store;
pub mod topple;

pub use automaton::{Aether5D, MAX_INITIAL_VALUE, MIN_INITIAL_VALUE};
pub use coords::Position;
pub use error::{Error, Result};
pub use simple::SimpleAether5D;
