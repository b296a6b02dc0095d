//! Project Carousel Library
//!
//! Kiosk launcher that shows one project folder at a time and launches its
//! executable, locking navigation until the launched process exits.
//!
//! Architecture:
//! - `registry` scans the projects directory once at startup
//! - `carousel` holds the current index and the navigation lock
//! - `presenter` resolves display text and icon for the current project
//! - `supervisor` launches and watches the external process
//! - `launcher` ties them together; `gui` drives it from the iced event loop

pub mod carousel;
pub mod config;
pub mod error;
pub mod gui;
pub mod input;
pub mod launcher;
pub mod presenter;
pub mod registry;
pub mod supervisor;

pub use error::LauncherError;
pub use launcher::{ActionOutcome, Launcher, LauncherAction};
