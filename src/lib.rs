// src/lib.rs

//! _aplotlib_ derives time series of resource metrics from the text output
//! of the `atop` system monitor, and renders them.
//!
//! ## Overview
//!
//! * The [`SourceSelector`] finds the atop raw log files covering a
//!   datetime window.
//! * The [`AtopCommand`] prints each raw log file as text.
//! * The [`AtopParser`] derives one [`Sample`] per atop header line.
//! * The [`Series`] holds the `Sample`s in order.
//! * The [`renderers`] and [`diagram`] print the `Series`.
//!
//! The [`AtopProcessor`] drives the first four.
//!
//! [`SourceSelector`]: crate::readers::sourceselector::SourceSelector
//! [`AtopCommand`]: crate::readers::atopcommand::AtopCommand
//! [`AtopParser`]: crate::readers::atopparser::AtopParser
//! [`AtopProcessor`]: crate::readers::atopprocessor::AtopProcessor
//! [`Sample`]: crate::data::sample::Sample
//! [`Series`]: crate::data::series::Series
//! [`renderers`]: crate::printer::renderers
//! [`diagram`]: crate::printer::diagram

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
