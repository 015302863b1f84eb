//! Binding interpretation for the aerokeys cheat-sheet.
//!
//! Raw AeroSpace bindings (`alt-h = "focus left"`) come in through a
//! [`source::ModeSource`], are turned into [`model::KeyBinding`]s by
//! [`parse`], folded into summary rows by [`collapse`], and assembled into
//! sorted [`model::Mode`]s by [`loader::load_modes`].

pub mod classify;
pub mod collapse;
pub mod config;
pub mod ipc;
pub mod keys;
pub mod loader;
pub mod model;
pub mod parse;
pub mod paths;
pub mod protocol;
pub mod source;
