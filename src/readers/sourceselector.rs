// src/readers/sourceselector.rs

//! Implements a [`SourceSelector`], which finds the atop raw log files
//! needed to cover a datetime window.
//!
//! atop writes one raw log file per period (typically per day). Each file
//! path embeds the datetime the file begins, e.g.
//! `/var/log/atop/atop_20230102`. The path template, e.g.
//! `/var/log/atop/atop_%Y%m%d`, is used both to find candidate files and to
//! parse each file's begin datetime.

use crate::common::{FPath, FPaths};
use crate::data::datetime::{
    fpath_to_datetime,
    template_to_glob_pattern,
    DateTimeL,
    DateTimePattern_str,
    FixedOffset,
};
use crate::debug::printers::de_wrn;
use crate::readers::helpers::path_to_fpath;

use std::io::{Error, ErrorKind, Result};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// A raw log file and the datetime it begins.
pub type DatedSource = (DateTimeL, FPath);
pub type DatedSources = Vec<DatedSource>;

/// Pure selection of the sources needed for the window `begin` to `end`.
///
/// `available` must be sorted by datetime. A source beginning at `T` is
/// selected when `T < end` and either it is the last source or the next
/// source begins after `begin`. A source that begins at or after `end` has
/// no data for the window. A source followed by a source that begins at or
/// before `begin` has no data for the window either, because atop files do
/// not overlap.
pub fn select_sources(
    available: &[DatedSource],
    begin: &DateTimeL,
    end: &DateTimeL,
) -> FPaths {
    defn!("({} available, {:?}, {:?})", available.len(), begin, end);
    let mut selected: FPaths = FPaths::with_capacity(available.len());
    for (at, (dt, fpath)) in available.iter().enumerate() {
        if dt >= end {
            defo!("skip {:?}; begins at or after end", fpath);
            continue;
        }
        match available.get(at + 1) {
            Some((dt_next, _)) if dt_next <= begin => {
                defo!("skip {:?}; next source begins at or before begin", fpath);
            }
            _ => {
                defo!("select {:?}", fpath);
                selected.push(fpath.clone());
            }
        }
    }
    defx!("return {:?}", selected);

    selected
}

/// Finds atop raw log files by a path template containing strftime
/// specifiers, e.g. `/var/log/atop/atop_%Y%m%d`.
#[derive(Clone, Debug)]
pub struct SourceSelector {
    path_template: FPath,
    tz_offset: FixedOffset,
}

impl SourceSelector {
    pub fn new(
        path_template: FPath,
        tz_offset: FixedOffset,
    ) -> SourceSelector {
        defñ!("({:?}, {:?})", path_template, tz_offset);
        SourceSelector {
            path_template,
            tz_offset,
        }
    }

    pub fn path_template(&self) -> &DateTimePattern_str {
        self.path_template.as_str()
    }

    /// All files matching the path template, paired with the datetime each
    /// begins, sorted by datetime.
    ///
    /// Matching files whose path does not parse per the template are
    /// ignored, as are directories.
    pub fn available_sources(&self) -> Result<DatedSources> {
        let pattern: String = template_to_glob_pattern(self.path_template());
        defn!("glob {:?}", pattern);
        let paths = match glob::glob(pattern.as_str()) {
            Ok(val) => val,
            Err(err) => {
                defx!("bad glob pattern {:?}; {}", pattern, err);
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("bad path template {:?}; {}", self.path_template, err),
                ));
            }
        };
        let mut available: DatedSources = DatedSources::new();
        for entry in paths {
            let path = match entry {
                Ok(val) => val,
                Err(err) => {
                    de_wrn!("glob entry error {}", err);
                    continue;
                }
            };
            if path.is_dir() {
                defo!("skip directory {:?}", path);
                continue;
            }
            let fpath: FPath = path_to_fpath(path.as_path());
            match fpath_to_datetime(fpath.as_str(), self.path_template(), &self.tz_offset) {
                Some(dt) => available.push((dt, fpath)),
                None => {
                    defo!("skip {:?}; does not follow template", fpath);
                }
            }
        }
        available.sort();
        defx!("return {} sources", available.len());

        Ok(available)
    }

    /// The files needed to cover the window `begin` to `end`, ordered by
    /// datetime.
    pub fn required_file_paths(
        &self,
        begin: &DateTimeL,
        end: &DateTimeL,
    ) -> Result<FPaths> {
        let available = self.available_sources()?;

        Ok(select_sources(&available, begin, end))
    }
}
