//! Recipe Finder Core - Shared types library.
//!
//! This crate provides the types and pure functions shared by the Recipe
//! Finder components:
//! - `web` - Server-rendered site, Google sign-in and recipe pages
//! - `cli` - Command-line tools for migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! database access, no HTTP clients. Everything here is deterministic given
//! its inputs, which keeps the list-synchronization rules easy to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, recipes, pagination queries, image URLs, dates
//! - [`recipes`] - Viewer-relative shaping and list reconciliation
//! - [`landing`] - Landing page navigation state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod landing;
pub mod recipes;
pub mod types;

pub use types::*;
