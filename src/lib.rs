//! `toksync` is a library for configuration-driven token substitution across
//! a directory tree.
//!
//! It provides the core logic for the `toksync` command-line tool but can also
//! be used as a standalone library. The main components are:
//!
//! - `config`: A parser for the line-oriented sync configuration format,
//!   producing both key/value sections and list sections, with optional
//!   inversion for unsync runs.
//! - `selector`: File selection by recursive traversal with glob, extension,
//!   hidden-file, and ignore-list filtering, or verbatim from an explicit
//!   include list.
//! - `Substituter`: Boundary-aware token replacement applied sequentially in
//!   sorted token order.
//! - `syncer`: The apply-and-write stage, which reads and substitutes files
//!   on the main path and dispatches changed files' write-backs onto a Rayon
//!   pool, joining them all before the run finishes.

pub mod cli;
pub mod config;
pub mod errors;
pub mod selector;
pub mod substituter;
pub mod syncer;

// Re-export main types for easier access by library users.
pub use config::{ConfigParser, SyncConfig};
pub use errors::{Error, Result};
pub use substituter::Substituter;
pub use syncer::{SyncOptions, SyncStats};
