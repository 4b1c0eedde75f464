//! Config persistence and the toggle surface used by the UI shell.

pub mod config;
pub mod controller;
