//! A minimal content-addressed version control system
//!
//! Repositories keep their metadata in a `.kit` directory whose layout and
//! object formats follow git's: zlib-compressed loose objects, a binary
//! `DIRC` index and plain-text refs.
//!
//! - `areas`: the stateful parts of a repository on disk
//! - `artifacts`: object, index and status types with their codecs
//! - `commands`: plumbing and porcelain operations on a `Repository`
//! - `errors`: the crate-wide error type

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
