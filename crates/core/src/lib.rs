//! Core types for EntryStore
//!
//! This crate defines the foundational types used throughout the system:
//! - Entry: the stored unsigned integer
//! - RemovalPolicy: leave-gap, shift-compact, swap-compact
//! - Mutation: a loggable state change
//! - Limits: store size caps
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod types;

pub use error::{Error, Result};
pub use limits::Limits;
pub use types::{Entry, Mutation, RemovalPolicy};
