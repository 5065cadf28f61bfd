// src/tests/mod.rs

//! Tests for _aplotlib_.
//!
//! Tests are placed at `src/tests/`, inside the `aplotlib`. This is a
//! reasonable trade-off of separation and access.
//!
//! Tests placed at top-level path `tests/` do not have crate-internal
//! visibility.

pub mod common;
pub mod diagram_tests;
pub mod renderers_tests;
pub mod sample_tests;
pub mod series_tests;
