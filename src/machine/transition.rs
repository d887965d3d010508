//! Partial transition function δ: Q × {0,1} → Q × {0,1} × {L,R}
//!
//! Entries are drawn independently: each (state, symbol) pair receives a
//! transition with probability `p`, otherwise the pair halts the machine.

use super::{State, Symbol, SYMBOLS};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single transition rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// Next state
    pub next_state: State,

    /// Symbol written under the head
    pub write: Symbol,

    /// Head movement after the write
    pub direction: Move,
}

/// Head movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Move left (decrement position)
    Left,

    /// Move right (increment position)
    Right,
}

impl Move {
    /// Apply move to position, clamped to `0..=limit`
    pub fn apply(&self, position: usize, limit: usize) -> usize {
        match self {
            Move::Left => position.saturating_sub(1),
            Move::Right if position < limit => position + 1,
            Move::Right => position,
        }
    }

    fn as_char(&self) -> char {
        match self {
            Move::Left => 'L',
            Move::Right => 'R',
        }
    }
}

/// Transition table over `2^state_bits` states and the binary alphabet
///
/// Stored densely, one slot per (state, symbol) pair; an empty slot is an
/// implicit halt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    num_states: usize,
    slots: Vec<Option<Transition>>,
}

impl TransitionTable {
    /// Table with no transitions: every lookup halts
    pub fn empty(num_states: usize) -> Self {
        Self {
            num_states,
            slots: vec![None; num_states * SYMBOLS],
        }
    }

    /// Draw a table where each (state, symbol) pair has a transition with
    /// probability `probability`
    ///
    /// Pairs are visited in state order, symbol 0 before symbol 1, so a seeded
    /// generator always produces the same table. `probability` must already be
    /// validated to lie in `[0, 1]`.
    pub fn random<R: Rng + ?Sized>(num_states: usize, probability: f64, rng: &mut R) -> Self {
        let mut table = Self::empty(num_states);
        for slot in table.slots.iter_mut() {
            if !rng.random_bool(probability) {
                continue;
            }
            let next_state = rng.random_range(0..num_states) as State;
            let write = rng.random_range(0..=1u8);
            let direction = if rng.random::<bool>() {
                Move::Right
            } else {
                Move::Left
            };
            *slot = Some(Transition {
                next_state,
                write,
                direction,
            });
        }
        table
    }

    /// Set or clear the transition for (state, symbol)
    ///
    /// Panics if the pair lies outside the table's domain.
    pub fn set(&mut self, state: State, symbol: Symbol, transition: Option<Transition>) {
        let index = self.index(state, symbol);
        self.slots[index] = transition;
    }

    /// Look up transition for (state, symbol); `None` means halt
    pub fn get(&self, state: State, symbol: Symbol) -> Option<&Transition> {
        if state as usize >= self.num_states || symbol as usize >= SYMBOLS {
            return None;
        }
        self.slots[self.index(state, symbol)].as_ref()
    }

    /// Defined entries as ((state, symbol), transition)
    pub fn entries(&self) -> impl Iterator<Item = ((State, Symbol), &Transition)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref().map(|transition| {
                let state = (index / SYMBOLS) as State;
                let symbol = (index % SYMBOLS) as Symbol;
                ((state, symbol), transition)
            })
        })
    }

    /// Number of states in the domain
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Number of (state, symbol) pairs in the domain
    pub fn domain_size(&self) -> usize {
        self.slots.len()
    }

    /// Number of defined transitions
    pub fn defined(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True when every pair has a transition (the machine can never halt)
    pub fn is_total(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// True when no pair has a transition (the machine halts on its first step)
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// blake3 digest of the canonical slot encoding
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.num_states as u64).to_le_bytes());
        for slot in &self.slots {
            match slot {
                None => {
                    hasher.update(&[0]);
                }
                Some(transition) => {
                    hasher.update(&[1, transition.write, transition.direction.as_char() as u8]);
                    hasher.update(&transition.next_state.to_le_bytes());
                }
            }
        }
        hasher.finalize()
    }

    fn index(&self, state: State, symbol: Symbol) -> usize {
        state as usize * SYMBOLS + symbol as usize
    }
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            if index > 0 {
                f.write_str(if index % SYMBOLS == 0 { "_" } else { " " })?;
            }
            match slot {
                None => f.write_str("---")?,
                Some(t) => write!(f, "{}{}{}", t.write, t.direction.as_char(), t.next_state)?,
            }
        }
        Ok(())
    }
}
