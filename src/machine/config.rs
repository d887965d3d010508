//! Configuration (instantaneous description) of a probabilistic machine
//!
//! Represents the complete state at a point in time:
//! - Tape contents (fixed length, packed one bit per cell)
//! - Head position
//! - Control state q
//!
//! Two configurations compare equal exactly when all three components are
//! equal. The tape is stored verbatim, never digested, so loop detection
//! cannot be fooled by a collision.

use super::{State, Symbol};
use crate::MachineError;
use bitvec::prelude::*;
use rand::Rng;
use std::fmt;

/// Fixed-length binary tape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tape {
    cells: BitVec<u64, Lsb0>,
}

impl Tape {
    /// Build a tape from explicit 0/1 symbols
    pub fn from_symbols(symbols: &[Symbol]) -> Result<Self, MachineError> {
        let mut cells = BitVec::with_capacity(symbols.len());
        for (position, &value) in symbols.iter().enumerate() {
            match value {
                0 => cells.push(false),
                1 => cells.push(true),
                _ => return Err(MachineError::InvalidSymbol { position, value }),
            }
        }
        Ok(Self { cells })
    }

    /// Uniformly random tape of `len` cells
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let cells = (0..len).map(|_| rng.random::<bool>()).collect();
        Self { cells }
    }

    /// Read symbol at position
    ///
    /// Callers keep `position` inside `0..len()`; the engine's head bound
    /// guarantees this.
    pub fn read(&self, position: usize) -> Symbol {
        Symbol::from(self.cells[position])
    }

    /// Write symbol at position (any non-zero symbol is stored as 1)
    pub fn write(&mut self, position: usize, symbol: Symbol) {
        self.cells.set(position, symbol != 0);
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a zero-length tape
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Unpack into one symbol per cell
    pub fn symbols(&self) -> Vec<Symbol> {
        self.cells.iter().map(|bit| Symbol::from(*bit)).collect()
    }

    pub(crate) fn bits(&self) -> &BitSlice<u64, Lsb0> {
        &self.cells
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.cells.iter() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Complete instantaneous description, used as the loop-detection key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Configuration {
    tape: BitVec<u64, Lsb0>,
    head: usize,
    state: State,
}

impl Configuration {
    /// Encode (tape, head, state) into a single comparable value
    pub fn capture(tape: &Tape, head: usize, state: State) -> Self {
        Self {
            tape: tape.bits().to_bitvec(),
            head,
            state,
        }
    }

    /// Head position at capture time
    pub fn head(&self) -> usize {
        self.head
    }

    /// Control state at capture time
    pub fn state(&self) -> State {
        self.state
    }

    /// Tape contents at capture time
    pub fn tape_symbols(&self) -> Vec<Symbol> {
        self.tape.iter().map(|bit| Symbol::from(*bit)).collect()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.tape.iter() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        write!(f, "@{}:q{}", self.head, self.state)
    }
}
