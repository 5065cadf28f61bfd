// src/readers/mod.rs

//! "Readers" for _aplotlib_.
//!
//! ## Overview of readers
//!
//! * An [`AtopProcessor`] drives a [`SourceSelector`], an [`AtopCommand`],
//!   and an [`AtopParser`] to derive a [`Series`].
//! * A `SourceSelector` finds the atop raw log files needed for a datetime
//!   window.
//! * An `AtopCommand` runs the `atop` program for one raw log file and
//!   streams the printed lines.
//! * An `AtopParser` derives [`Sample`s] from those lines.
//!
//! <br/>
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`Series`]: crate::data::series::Series
//! [`Sample`s]: crate::data::sample::Sample
//! [`AtopCommand`]: crate::readers::atopcommand::AtopCommand
//! [`AtopParser`]: crate::readers::atopparser::AtopParser
//! [`AtopProcessor`]: crate::readers::atopprocessor::AtopProcessor
//! [`SourceSelector`]: crate::readers::sourceselector::SourceSelector

pub mod atopcommand;
pub mod atopparser;
pub mod atopprocessor;
pub mod helpers;
pub mod sourceselector;
