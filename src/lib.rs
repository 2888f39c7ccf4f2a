//! # dlckit Core Library
//!
//! This crate contains the core logic of the `dlckit` tool – a manager for
//! per-game DLC unlocker installs across storefront launchers.
//!
//! `dlckit` keeps a registry of installed programs, tracks which DLC the user
//! selected for each, validates that installations still exist on disk, and
//! probes whether any unlocker files are currently held by a running process
//! before a patch operation is allowed to touch them. The actual patching,
//! store lookups and downloads live in external tools that consume this
//! library.
//!
//! The `dlckit` CLI is the primary consumer, but the library stands on its
//! own as a backend for patcher frontends.
//!
//! ## Modules Overview
//! - [`platform`] – Platform, DLC and binary-type enums
//! - [`components`] – Per-variant unlocker file path catalogs
//! - [`locks`] – Probing files for locks held by other processes
//! - [`program`] – Program model, DLC catalog and selection
//! - [`registry`] – The live program collection and its validation
//! - [`blocklist`] – Installations that must never be patched
//! - [`scanner`] – Discovering installed programs per launcher
//! - [`binary`] – 32-/64-bit classification of executables
//! - [`choices`] – Persisting DLC selections between runs


pub mod platform;
pub mod components;
pub mod locks;
pub mod program;
pub mod registry;
pub mod blocklist;
pub mod scanner;
pub mod binary;
pub mod choices;

pub use platform::*;
pub use components::*;
pub use locks::*;
pub use program::*;
pub use registry::*;
pub use blocklist::*;
pub use scanner::*;
pub use binary::*;
pub use choices::*;
