//! Core types and error definitions for Parley.
//!
//! This crate provides the foundational types shared across all Parley crates.
//!
//! # Main types
//!
//! - [`ParleyError`]: Unified error enum for all Parley subsystems.
//! - [`ParleyResult`]: Convenience alias for `Result<T, ParleyError>`.
//! - [`Role`]: Who produced a piece of conversation text (user, model, system).
//! - [`Message`]: A single turn exchanged with the remote model.

/// Error types.
pub mod error;
/// Conversation message types.
pub mod message;

pub use error::{ParleyError, ParleyResult};
pub use message::{Message, Role};
