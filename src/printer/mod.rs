// src/printer/mod.rs

//! The `printer` module is for rendering a [`Series`] in the output modes
//! (metrics list, table, CSV, JSON, gnuplot, diagram) and for
//! printing user-facing messages with text effects (color).
//!
//! [`Series`]: crate::data::series::Series

pub mod diagram;
pub mod printers;
pub mod renderers;
