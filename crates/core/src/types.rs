//! Core types for the entry store
//!
//! - `Entry`: the stored value type
//! - `RemovalPolicy`: which of the three removal strategies a removal uses
//! - `Mutation`: a state change as it is validated, logged and replayed

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A single stored value.
///
/// Values are opaque fixed-width unsigned integers. Zero doubles as the
/// "cleared" marker written by gap-leaving removal.
pub type Entry = u64;

/// Removal strategy
///
/// | Policy | Length | Order | Cost |
/// |--------|--------|-------|------|
/// | `LeaveGap` | unchanged | stable positions | O(1) |
/// | `ShiftCompact` | -1 | preserved | O(len - index) |
/// | `SwapCompact` | -1 | last entry moves into the hole | O(1) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum RemovalPolicy {
    /// Zero the slot, keep the length
    LeaveGap = 0x01,
    /// Remove the slot and shift the tail one position toward the front
    ShiftCompact = 0x02,
    /// Move the last entry into the slot and drop the last position
    SwapCompact = 0x03,
}

impl RemovalPolicy {
    /// All policies, in tag order
    pub const ALL: [RemovalPolicy; 3] = [
        RemovalPolicy::LeaveGap,
        RemovalPolicy::ShiftCompact,
        RemovalPolicy::SwapCompact,
    ];

    /// Convert to byte representation
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Try to create from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(RemovalPolicy::LeaveGap),
            0x02 => Some(RemovalPolicy::ShiftCompact),
            0x03 => Some(RemovalPolicy::SwapCompact),
            _ => None,
        }
    }

    /// Stable kebab-case name
    pub fn name(&self) -> &'static str {
        match self {
            RemovalPolicy::LeaveGap => "leave-gap",
            RemovalPolicy::ShiftCompact => "shift-compact",
            RemovalPolicy::SwapCompact => "swap-compact",
        }
    }

    /// Whether the removal shrinks the store
    pub fn compacts(&self) -> bool {
        !matches!(self, RemovalPolicy::LeaveGap)
    }
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RemovalPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leave-gap" | "gap" => Ok(RemovalPolicy::LeaveGap),
            "shift-compact" | "shift" => Ok(RemovalPolicy::ShiftCompact),
            "swap-compact" | "swap" => Ok(RemovalPolicy::SwapCompact),
            other => Err(Error::invalid_input(format!(
                "unknown removal policy '{}', expected leave-gap, shift-compact or swap-compact",
                other
            ))),
        }
    }
}

/// A state change to the store.
///
/// Mutations are what gets validated against the current state, written to
/// the log, and replayed on recovery. Reads are never mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Push a value onto the end
    Append(Entry),
    /// Remove the entry at `index` under `policy`
    Remove {
        /// Removal strategy
        policy: RemovalPolicy,
        /// Target position
        index: u64,
    },
}

impl Mutation {
    /// Shorthand for a removal mutation
    pub fn remove(policy: RemovalPolicy, index: u64) -> Self {
        Mutation::Remove { policy, index }
    }

    /// Change in store length if this mutation is applied
    pub fn len_delta(&self) -> i8 {
        match self {
            Mutation::Append(_) => 1,
            Mutation::Remove { policy, .. } if policy.compacts() => -1,
            Mutation::Remove { .. } => 0,
        }
    }
}
