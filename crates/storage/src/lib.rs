//! Storage layer for Wayfinder
//!
//! This crate provides the sled-backed key-value store and the persisted
//! favorites (saved, home, company and history addresses) built on top of it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod favorites;
pub mod kv;

pub use favorites::PersistedFavorites;
pub use kv::{KvConfig, KvError, KvStore};
