// src/readers/atopparser.rs

//! Implements an [`AtopParser`], the driver of deriving [`Sample`s] from
//! lines of atop text output.
//!
//! [`Sample`s]: crate::data::sample::Sample

use crate::common::{AtopLine, Count};
use crate::data::datetime::{header_str_to_datetime, DateTimeL, DateTimeLOpt, FixedOffset};
use crate::data::field::coerce_field;
use crate::data::sample::{MetricCategory, Sample};
use crate::data::series::Series;
use crate::debug::printers::de_wrn;
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::str_to_String_noraw;

use std::fmt;
use std::str::FromStr;

use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

lazy_static! {
    /// A header line begins a new sample, e.g.
    /// `ATOP - myhost   2023/01/01  00:05:00   -----------   10m0s elapsed`
    static ref REGEX_HEADER: Regex = {
        defñ!("lazy_static! REGEX_HEADER");
        match Regex::new(r"^ATOP - (?P<HOST>\S+)\s*(?P<TIME>\d+/\d+/\d+\s+\d+:\d+:\d+)(?:\s|$)") {
            Ok(val) => val,
            Err(err) => panic!("Regex::new failed {}", err),
        }
    };
    /// A metric line, e.g.
    /// `CPL | avg1    0.12 | avg5    0.10 | avg15   0.09 |`
    static ref REGEX_METRIC: Regex = {
        defñ!("lazy_static! REGEX_METRIC");
        match Regex::new(r"^(?P<metric>PRC|CPU|CPL|MEM|SWP|PAG|DSK|NET)\s(?P<details>.+)$") {
            Ok(val) => val,
            Err(err) => panic!("Regex::new failed {}", err),
        }
    };
    /// One `| key   value ` field within the details of a metric line.
    /// The key may be empty, e.g. `|          sda `.
    static ref REGEX_FIELD: Regex = {
        defñ!("lazy_static! REGEX_FIELD");
        match Regex::new(r"\|\s+([^|\s]*)\s+([^|]+)\s+") {
            Ok(val) => val,
            Err(err) => panic!("Regex::new failed {}", err),
        }
    };
}

/// Marker atop prints before some field keys, e.g. `#proc`.
const FIELD_KEY_MARKER: char = '#';

/// One `(key, value)` pair of a metric line. Empty text is `None`.
pub type FieldPair<'a> = (Option<String>, Option<&'a str>);

/// Split the details of a metric line into `(key, value)` pairs.
/// Pairs with neither a key nor a value are skipped.
pub fn details_to_field_pairs(details: &str) -> Vec<FieldPair<'_>> {
    let mut pairs: Vec<FieldPair> = Vec::with_capacity(6);
    for captures in REGEX_FIELD.captures_iter(details) {
        let key: Option<String> = captures
            .get(1)
            .map(|m| m.as_str().trim().replace(FIELD_KEY_MARKER, ""))
            .filter(|s| !s.is_empty());
        let value: Option<&str> = captures
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty());
        if key.is_none() && value.is_none() {
            continue;
        }
        pairs.push((key, value));
    }

    pairs
}

/// Processing state of an [`AtopParser`].
#[derive(Debug, Default)]
enum ParserState {
    /// no sample is open; metric lines are ignored
    #[default]
    Idle,
    /// a sample is open; metric lines are added to it
    Accumulating(Sample),
}

/// Accumulated statistics of an [`AtopParser`], printed with `--summary`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SummaryAtopParser {
    /// all lines passed to `add_line`
    pub lines: Count,
    /// header lines that opened a sample
    pub headers: Count,
    /// header lines outside the datetime filters
    pub headers_filtered: Count,
    /// header lines with an unparseable datetime
    pub headers_bad_dt: Count,
    /// metric lines added to a sample
    pub metric_lines: Count,
    /// lines neither a header nor a metric line of an open sample
    pub lines_unrecognized: Count,
    /// samples that replaced a prior sample of the same datetime
    pub samples_replaced: Count,
}

impl fmt::Display for SummaryAtopParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lines {}, headers {}, headers filtered {}, headers bad datetime {}, metric lines {}, unrecognized lines {}, samples replaced {}",
            self.lines,
            self.headers,
            self.headers_filtered,
            self.headers_bad_dt,
            self.metric_lines,
            self.lines_unrecognized,
            self.samples_replaced,
        )
    }
}

/// An `AtopParser` consumes atop text output one line at a time and
/// accumulates [`Sample`]s into a [`Series`].
///
/// A header line opens a new `Sample`. Following metric lines are added to
/// that `Sample`. The `Sample` is sealed into the `Series` when the next
/// header line is found, or when [`finalize`] is called. The caller must call
/// `finalize` after the last line of the last source.
///
/// Header lines with a datetime before `dt_filter_after` or after
/// `dt_filter_before` open no `Sample`; the metric lines following are
/// ignored.
///
/// Lines must be passed in the order they were printed.
///
/// [`finalize`]: AtopParser::finalize
pub struct AtopParser {
    /// timezone offset of the datetimes in header lines
    tz_offset: FixedOffset,
    /// lower inclusive bound of sample datetimes
    dt_filter_after: DateTimeLOpt,
    /// upper inclusive bound of sample datetimes
    dt_filter_before: DateTimeLOpt,
    state: ParserState,
    series: Series,
    summary: SummaryAtopParser,
}

impl fmt::Debug for AtopParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AtopParser")
            .field("tz_offset", &self.tz_offset)
            .field("dt_filter_after", &self.dt_filter_after)
            .field("dt_filter_before", &self.dt_filter_before)
            .field("accumulating", &self.is_accumulating())
            .field("series.len()", &self.series.len())
            .field("summary", &self.summary)
            .finish()
    }
}

impl AtopParser {
    pub fn new(
        tz_offset: FixedOffset,
        dt_filter_after: DateTimeLOpt,
        dt_filter_before: DateTimeLOpt,
    ) -> AtopParser {
        defñ!("({:?}, {:?}, {:?})", tz_offset, dt_filter_after, dt_filter_before);
        AtopParser {
            tz_offset,
            dt_filter_after,
            dt_filter_before,
            state: ParserState::Idle,
            series: Series::new(),
            summary: SummaryAtopParser::default(),
        }
    }

    /// Is a `Sample` open?
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, ParserState::Accumulating(_))
    }

    /// The `Sample` currently open, if any.
    pub fn sample_open(&self) -> Option<&Sample> {
        match &self.state {
            ParserState::Accumulating(sample) => Some(sample),
            ParserState::Idle => None,
        }
    }

    /// The sealed `Sample`s.
    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn summary(&self) -> SummaryAtopParser {
        self.summary
    }

    /// Is `dt` within the datetime filters?
    pub fn dt_pass_filters(
        &self,
        dt: &DateTimeL,
    ) -> bool {
        if let Some(dt_after) = &self.dt_filter_after {
            if dt < dt_after {
                return false;
            }
        }
        if let Some(dt_before) = &self.dt_filter_before {
            if dt > dt_before {
                return false;
            }
        }

        true
    }

    /// Seal the open `Sample`, if any, into the `Series`.
    fn seal(&mut self) {
        if let ParserState::Accumulating(sample) = std::mem::take(&mut self.state) {
            defo!("seal sample {:?}", sample.dt());
            if self.series.insert(sample).is_some() {
                self.summary.samples_replaced += 1;
            }
        }
    }

    /// Seal the last open `Sample` into the `Series`.
    ///
    /// Must be called after the last line of the last source. Calling it
    /// again is harmless.
    pub fn finalize(&mut self) {
        defñ!();
        self.seal();
    }

    /// Finalize and return the `Series`.
    pub fn into_series(mut self) -> Series {
        self.finalize();

        self.series
    }

    /// Add one line of atop text output. A trailing newline is ignored.
    ///
    /// Returns `true` if the line was a header line that opened a `Sample`,
    /// or a metric line added to the open `Sample`. Returns `false` for any
    /// other line.
    pub fn add_line(
        &mut self,
        line: &AtopLine,
    ) -> bool {
        defn!("({:?})", str_to_String_noraw(line));
        self.summary.lines += 1;
        let line: &str = line.trim_end_matches(&['\n', '\r'][..]);

        if let Some(captures) = REGEX_HEADER.captures(line) {
            // a header line always ends the open sample
            self.seal();
            let (host, time) = match (captures.name("HOST"), captures.name("TIME")) {
                (Some(host), Some(time)) => (host.as_str(), time.as_str()),
                _ => {
                    self.summary.lines_unrecognized += 1;
                    defx!("missing capture group; return false");
                    return false;
                }
            };
            let dt: DateTimeL = match header_str_to_datetime(time, &self.tz_offset) {
                Some(dt) => dt,
                None => {
                    de_wrn!("unparseable header datetime {:?}", time);
                    self.summary.headers_bad_dt += 1;
                    defx!("bad datetime; return false");
                    return false;
                }
            };
            if !self.dt_pass_filters(&dt) {
                self.summary.headers_filtered += 1;
                defx!("filtered {:?}; return false", dt);
                return false;
            }
            self.state = ParserState::Accumulating(Sample::new(dt, String::from(host)));
            self.summary.headers += 1;
            defx!("opened sample {:?}; return true", dt);

            return true;
        }

        let sample: &mut Sample = match &mut self.state {
            ParserState::Accumulating(sample) => sample,
            ParserState::Idle => {
                self.summary.lines_unrecognized += 1;
                defx!("no open sample; return false");
                return false;
            }
        };

        let captures = match REGEX_METRIC.captures(line) {
            Some(captures) => captures,
            None => {
                self.summary.lines_unrecognized += 1;
                defx!("not a metric line; return false");
                return false;
            }
        };
        let category: MetricCategory = match captures
            .name("metric")
            .map(|m| MetricCategory::from_str(m.as_str()))
        {
            Some(Ok(category)) => category,
            _ => {
                self.summary.lines_unrecognized += 1;
                defx!("unknown category; return false");
                return false;
            }
        };
        let details: &str = captures
            .name("details")
            .map_or("", |m| m.as_str());

        let pairs = details_to_field_pairs(details);
        if category.is_multi_instance() {
            sample_add_instance_pairs(sample, category, &pairs);
        } else {
            sample_add_pairs(sample, category, &pairs);
        }
        self.summary.metric_lines += 1;
        defx!("added {} {} pairs; return true", pairs.len(), category);

        true
    }
}

/// Add the pairs of a single-instance `category` metric line to `sample`.
fn sample_add_pairs(
    sample: &mut Sample,
    category: MetricCategory,
    pairs: &[FieldPair],
) {
    if pairs.is_empty() {
        return;
    }
    sample.add_category(category);
    for (key, value) in pairs.iter() {
        if let (Some(key), Some(value)) = (key, value) {
            if let Some(scalar) = coerce_field(category, key, value) {
                sample.insert_field(category, key, scalar);
            }
        }
    }
}

/// Add the pairs of a multi-instance `category` metric line to `sample`.
///
/// The first pair names the instance: for `NET` the key of the first pair,
/// for `DSK` the value of the first pair when it has no key. Every
/// following pair is a field of that instance.
fn sample_add_instance_pairs(
    sample: &mut Sample,
    category: MetricCategory,
    pairs: &[FieldPair],
) {
    let ((key0, value0), rest) = match pairs.split_first() {
        Some(split) => split,
        None => return,
    };
    sample.add_category(category);
    let instance: &str = match (category, key0, value0) {
        (MetricCategory::NET, Some(key), _) => key.as_str(),
        (MetricCategory::DSK, None, Some(value)) => *value,
        _ => {
            de_wrn!("no instance name for {} line, first pair ({:?}, {:?})", category, key0, value0);
            return;
        }
    };
    sample.insert_instance(category, instance);
    for (key, value) in rest.iter() {
        if let (Some(key), Some(value)) = (key, value) {
            if let Some(scalar) = coerce_field(category, key, value) {
                sample.insert_instance_field(category, instance, key, scalar);
            }
        }
    }
}
