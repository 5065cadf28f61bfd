// src/data/mod.rs

//! The `data` module is specialized data containers for atop [`Sample`]s and
//! the [`Series`] of samples.
//!
//! ## Definitions of data
//!
//! ### Sample
//!
//! A "sample" is one timestamped snapshot of all metric categories printed by
//! `atop`. It begins at a header line like
//!
//! ```text
//! ATOP - myhost   2023/01/01  00:05:00   -----------   10m0s elapsed
//! ```
//!
//! and includes every following metric line up to the next header line.
//! A "sample" is represented by a [`Sample`] and found by an [`AtopParser`].
//!
//! ### Metric
//!
//! A "metric" is one typed [`Scalar`] within a `Sample`, addressed by a
//! dotted [`MetricPath`] like `CPL.avg5` or `NET.eth0.pcki`.
//! The type of a scalar is decided by the [`CoercionKind`] of its
//! (category, field) pair.
//!
//! ### Series
//!
//! A "series" is every `Sample` found within a datetime window, keyed by
//! the `Sample` datetime. It is represented by a [`Series`].
//!
//! [`Sample`]: crate::data::sample::Sample
//! [`Scalar`]: crate::data::sample::Scalar
//! [`MetricPath`]: crate::data::sample::MetricPath
//! [`CoercionKind`]: crate::data::field::CoercionKind
//! [`Series`]: crate::data::series::Series
//! [`AtopParser`]: crate::readers::atopparser::AtopParser

pub mod datetime;
pub mod field;
pub mod sample;
pub mod series;
