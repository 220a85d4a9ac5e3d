//! UCT Core - Game abstraction and common types
//!
//! This crate provides the [`Game`] trait that defines the capability any
//! domain must offer to be searched, and the [`MctsError`] type every search
//! operation reports failures through.
//!
//! # Types
//!
//! - [`Game`] - Trait for game implementations
//! - [`MctsError`] - Search failure, generic over the game's own error type

mod error;
mod game;

pub use error::{MctsError, Result};
pub use game::Game;
