//! Command handlers organized by category.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `entries` | Append, ReadAll, ReadAt, Len, RemoveLeavingGaps, RemoveShiftCompact, RemoveSwapCompact |
//! | `database` | Ping, Info, Checkpoint, Flush |

pub mod database;
pub mod entries;
