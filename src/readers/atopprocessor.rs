// src/readers/atopprocessor.rs

//! Implements an [`AtopProcessor`], the driver of deriving a [`Series`]
//! for a datetime window from atop raw log files.
//!
//! 1. the [`SourceSelector`] finds the raw log files needed for the window
//! 2. the [`AtopCommand`] runs for each file, in datetime order
//! 3. each printed line is passed to one [`AtopParser`]
//! 4. the `AtopParser` is finalized and its `Series` returned
//!
//! [`Series`]: crate::data::series::Series

use crate::common::{Count, FPath, FPaths};
use crate::data::datetime::{DateTimeL, DateTimeLOpt, FixedOffset};
use crate::data::series::Series;
use crate::readers::atopcommand::AtopCommand;
use crate::readers::atopparser::{AtopParser, SummaryAtopParser};
use crate::readers::sourceselector::SourceSelector;

use std::fmt;
use std::io::{BufRead, ErrorKind};
use std::process::ExitStatus;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Failures of processing that leave no result to print.
#[derive(Debug)]
pub enum ProcessError {
    /// no raw log file is needed for the window
    NoSources { path_template: FPath },
    /// no sample was derived within the window
    EmptyResult,
    Io(std::io::Error),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::NoSources { path_template } => {
                write!(f, "no raw log files found for {:?}", path_template)
            }
            ProcessError::EmptyResult => write!(f, "empty result"),
            ProcessError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProcessError {
    fn from(err: std::io::Error) -> Self {
        ProcessError::Io(err)
    }
}

/// Accumulated statistics of an [`AtopProcessor`], printed with `--summary`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SummaryAtopProcessor {
    /// raw log files processed, in order
    pub sources: FPaths,
    /// commands that exited with failure
    pub sources_failed: Count,
    pub parser: SummaryAtopParser,
}

impl fmt::Display for SummaryAtopProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sources {}, failed {}", self.sources.len(), self.sources_failed)?;
        for fpath in self.sources.iter() {
            writeln!(f, "  {}", fpath)?;
        }
        write!(f, "{}", self.parser)
    }
}

/// Derives a [`Series`] of the window `dt_begin` to `dt_end`, inclusive.
#[derive(Debug)]
pub struct AtopProcessor {
    selector: SourceSelector,
    command: AtopCommand,
    parser: AtopParser,
    dt_begin: DateTimeL,
    dt_end: DateTimeL,
    summary: SummaryAtopProcessor,
}

impl AtopProcessor {
    pub fn new(
        selector: SourceSelector,
        command: AtopCommand,
        tz_offset: FixedOffset,
        dt_begin: DateTimeL,
        dt_end: DateTimeL,
    ) -> AtopProcessor {
        defñ!("({:?}, {:?}, {:?}, {:?})", selector, command, dt_begin, dt_end);
        AtopProcessor {
            selector,
            command,
            parser: AtopParser::new(tz_offset, Some(dt_begin), Some(dt_end)),
            dt_begin,
            dt_end,
            summary: SummaryAtopProcessor::default(),
        }
    }

    /// Run the command for one raw log file, passing each printed line to
    /// the `AtopParser`.
    pub fn process_source(
        &mut self,
        fpath: &FPath,
    ) -> std::io::Result<ExitStatus> {
        defn!("({:?})", fpath);
        let parser: &mut AtopParser = &mut self.parser;
        let exit_status = self.command.run(fpath, |line| {
            parser.add_line(line);
        })?;
        self.summary.sources.push(fpath.clone());
        if !exit_status.success() {
            self.summary.sources_failed += 1;
        }
        defx!("return {:?}", exit_status);

        Ok(exit_status)
    }

    /// Select the raw log files, process each, and return the `Series`.
    ///
    /// Returns `Err` if no file is needed for the window, or if no sample
    /// was derived.
    pub fn process(mut self) -> Result<(Series, SummaryAtopProcessor), ProcessError> {
        defn!();
        let fpaths: FPaths = match self
            .selector
            .required_file_paths(&self.dt_begin, &self.dt_end)
        {
            Ok(val) => val,
            Err(err) if err.kind() == ErrorKind::NotFound => FPaths::new(),
            Err(err) => {
                defx!("return Err {}", err);
                return Err(ProcessError::Io(err));
            }
        };
        if fpaths.is_empty() {
            defx!("no sources; return Err");
            return Err(ProcessError::NoSources {
                path_template: FPath::from(self.selector.path_template()),
            });
        }
        for fpath in fpaths.iter() {
            self.process_source(fpath)?;
        }
        self.parser.finalize();
        self.summary.parser = self.parser.summary();
        let series: Series = self.parser.into_series();
        if series.is_empty() {
            defx!("empty series; return Err");
            return Err(ProcessError::EmptyResult);
        }
        defx!("return series of {}", series.len());

        Ok((series, self.summary))
    }
}

/// Parse atop text output from `reader` into a `Series`.
///
/// Sample datetimes outside `dt_filter_after` to `dt_filter_before`,
/// inclusive, are ignored.
pub fn parse_reader<R: BufRead>(
    mut reader: R,
    tz_offset: FixedOffset,
    dt_filter_after: DateTimeLOpt,
    dt_filter_before: DateTimeLOpt,
) -> std::io::Result<(Series, SummaryAtopParser)> {
    defn!();
    let mut parser = AtopParser::new(tz_offset, dt_filter_after, dt_filter_before);
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => {
                parser.add_line(&String::from_utf8_lossy(&buffer));
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    parser.finalize();
    let summary = parser.summary();
    defx!("{}", summary);

    Ok((parser.into_series(), summary))
}
