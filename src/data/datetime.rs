// src/data/datetime.rs

//! Functions to transform datetime strings found in atop header lines,
//! atop raw log file names, and user input into chrono [`DateTime`]
//! instances.
//!
//! The most relevant documents to understand this file are:
//! - `chrono` crate [`strftime`] format.
//! - `glob` crate [pattern syntax].
//!
//! [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
//! [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
//! [pattern syntax]: https://docs.rs/glob/0.3/glob/struct.Pattern.html

#![allow(non_camel_case_types)]

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    Duration,
    FixedOffset,
    Local,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    Offset,
    TimeZone,
    Timelike,
    Utc,
};
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use crate::debug::printers::de_wrn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime types and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Crate `chrono` [`strftime`] formatting pattern.
///
/// [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
pub type DateTimePattern_str = str;

/// A chrono [`DateTime`] type used in _aplotlib_.
///
/// atop prints datetimes in the local time of the monitored host without any
/// timezone. The timezone offset is supplied by the user (or defaults to the
/// local system timezone offset).
///
/// [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// The datetime notation within an atop header line, e.g.
/// `"2023/01/01  00:05:00"`.
pub const HEADER_DT_PATTERN: &DateTimePattern_str = "%Y/%m/%d %H:%M:%S";

/// ISO8601-like notation used when printing a [`DateTimeL`] in CSV, JSON,
/// and gnuplot output.
pub const ISO8601_DT_PATTERN: &DateTimePattern_str = "%Y-%m-%dT%H:%M:%S";

/// Notation used when printing a [`DateTimeL`] in a plain table.
pub const TABLE_DT_PATTERN: &DateTimePattern_str = "%Y-%m-%d %H:%M:%S";

/// Patterns without a timezone tried in order by
/// [`datetime_parse_from_str_user`].
const USER_DT_PATTERNS_NAIVE: [&DateTimePattern_str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

/// Patterns with a timezone tried in order by
/// [`datetime_parse_from_str_user`].
const USER_DT_PATTERNS_TZ: [&DateTimePattern_str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y%m%dT%H%M%S%z",
];

/// Patterns of a date alone tried by [`datetime_parse_from_str_user`].
const USER_DATE_PATTERNS: [&DateTimePattern_str; 2] = [
    "%Y-%m-%d",
    "%Y%m%d",
];

lazy_static! {
    /// strftime specifiers that may appear in a raw log path template.
    /// Each is replaced by a glob `*`.
    static ref REGEX_STRFTIME_SPECIFIER: Regex = {
        defñ!("lazy_static! REGEX_STRFTIME_SPECIFIER");
        match Regex::new(r"%[aAwdbBmyYHIpMSfzZjUWcxX]") {
            Ok(val) => val,
            Err(err) => panic!("Regex::new failed {}", err),
        }
    };
    static ref REGEX_GLOB_STARS: Regex = {
        defñ!("lazy_static! REGEX_GLOB_STARS");
        match Regex::new(r"\*+") {
            Ok(val) => val,
            Err(err) => panic!("Regex::new failed {}", err),
        }
    };
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Create a [`DateTimeL`] from the passed parts.
///
/// Returns `None` for an invalid date or time.
pub fn ymdhms(
    tz_offset: &FixedOffset,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeLOpt {
    tz_offset
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .single()
}

/// Convert a `NaiveDateTime` to a [`DateTimeL`] in the passed timezone
/// offset.
pub fn naive_to_datetimel(
    dt_naive: &NaiveDateTime,
    tz_offset: &FixedOffset,
) -> DateTimeLOpt {
    tz_offset
        .from_local_datetime(dt_naive)
        .single()
}

/// The local system timezone offset, now.
pub fn local_now_offset() -> FixedOffset {
    Local::now()
        .offset()
        .fix()
}

/// "now" in the passed timezone offset, truncated to the minute.
pub fn datetime_now_minute(tz_offset: &FixedOffset) -> DateTimeL {
    let now: DateTimeL = Utc::now().with_timezone(tz_offset);
    let now_min = now
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0));

    now_min.unwrap_or(now)
}

/// Parse the datetime captured from an atop header line, e.g.
/// `"2023/01/01  00:05:00"`.
///
/// Returns `None` if `data` does not follow [`HEADER_DT_PATTERN`].
pub fn header_str_to_datetime(
    data: &str,
    tz_offset: &FixedOffset,
) -> DateTimeLOpt {
    defn!("({:?}, {:?})", data, tz_offset);
    let dt_naive = match NaiveDateTime::parse_from_str(data, HEADER_DT_PATTERN) {
        Ok(val) => val,
        Err(_err) => {
            de_wrn!("NaiveDateTime::parse_from_str({:?}, {:?}) failed {}", data, HEADER_DT_PATTERN, _err);
            defx!("return None");
            return None;
        }
    };
    let dt = naive_to_datetimel(&dt_naive, tz_offset);
    defx!("return {:?}", dt);

    dt
}

/// Transform a raw log path template, e.g. `/var/log/atop/atop_%Y%m%d`,
/// into a glob pattern, e.g. `/var/log/atop/atop_*`.
///
/// Each strftime specifier becomes a `*`. Adjacent `*` are collapsed so the
/// `glob` crate does not interpret them as a recursive wildcard.
pub fn template_to_glob_pattern(template: &DateTimePattern_str) -> String {
    let stars = REGEX_STRFTIME_SPECIFIER.replace_all(template, "*");
    let pattern = REGEX_GLOB_STARS
        .replace_all(&stars, "*")
        .into_owned();
    defñ!("({:?}) return {:?}", template, pattern);

    pattern
}

/// Suffixes of (data, pattern) appended to a file path and its template
/// for a template without a minute, or without any time of day.
const FPATH_TIME_DEFAULTS: [(&str, &DateTimePattern_str); 3] = [
    ("", ""),
    ("|0", "|%M"),
    ("|0|0", "|%H|%M"),
];

/// Parse a file path matched by [`template_to_glob_pattern`] back into the
/// datetime it represents, i.e. the datetime the file begins.
///
/// Parts of the time of day absent from `template` are zero, e.g. a
/// `template` of `atop_%Y%m%d` yields midnight.
/// Returns `None` if `fpath` does not follow `template`.
pub fn fpath_to_datetime(
    fpath: &str,
    template: &DateTimePattern_str,
    tz_offset: &FixedOffset,
) -> DateTimeLOpt {
    defn!("({:?}, {:?})", fpath, template);
    for (data_suffix, pattern_suffix) in FPATH_TIME_DEFAULTS.iter() {
        let data: String = format!("{}{}", fpath, data_suffix);
        let pattern: String = format!("{}{}", template, pattern_suffix);
        match NaiveDateTime::parse_from_str(data.as_str(), pattern.as_str()) {
            Ok(dt_naive) => {
                let dt = naive_to_datetimel(&dt_naive, tz_offset);
                defx!("pattern {:?} return {:?}", pattern, dt);
                return dt;
            }
            Err(_err) => {
                defo!("pattern {:?} failed {}", pattern, _err);
            }
        }
    }
    defx!("return None");

    None
}

/// Transform a user-passed datetime string into a [`DateTimeL`].
///
/// Accepts RFC 3339 and several ISO8601-like notations, with or without
/// a timezone offset, with or without seconds, or a date alone (midnight).
/// A datetime without a timezone offset uses `tz_offset`. A datetime with a
/// timezone offset is converted to `tz_offset`.
pub fn datetime_parse_from_str_user(
    data: &str,
    tz_offset: &FixedOffset,
) -> DateTimeLOpt {
    defn!("({:?}, {:?})", data, tz_offset);
    let data = data.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(data) {
        defx!("parse_from_rfc3339 return {:?}", dt);
        return Some(dt.with_timezone(tz_offset));
    }
    for pattern in USER_DT_PATTERNS_TZ.iter() {
        if let Ok(dt) = DateTime::parse_from_str(data, pattern) {
            defx!("pattern {:?} return {:?}", pattern, dt);
            return Some(dt.with_timezone(tz_offset));
        }
    }
    for pattern in USER_DT_PATTERNS_NAIVE.iter() {
        if let Ok(dt_naive) = NaiveDateTime::parse_from_str(data, pattern) {
            let dt = naive_to_datetimel(&dt_naive, tz_offset);
            defx!("pattern {:?} return {:?}", pattern, dt);
            return dt;
        }
    }
    for pattern in USER_DATE_PATTERNS.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(data, pattern) {
            let dt = naive_to_datetimel(&date.and_time(NaiveTime::MIN), tz_offset);
            defx!("pattern {:?} return {:?}", pattern, dt);
            return dt;
        }
    }
    defx!("return None");

    None
}

/// Parse a user-passed timezone offset like `"+02:00"`, `"-0800"`, `"+05"`,
/// `"Z"`, or `"UTC"`.
pub fn tz_offset_parse_from_str(data: &str) -> Option<FixedOffset> {
    defn!("({:?})", data);
    let data = data.trim();
    match data.to_ascii_uppercase().as_str() {
        "Z" | "UTC" | "GMT" => {
            defx!("return UTC");
            return FixedOffset::east_opt(0);
        }
        _ => {}
    }
    let mut chars = data.chars();
    let sign: i32 = match chars.next() {
        Some('+') => 1,
        Some('-') => -1,
        _ => {
            defx!("no sign; return None");
            return None;
        }
    };
    let digits: String = chars
        .filter(|c| *c != ':')
        .collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        defx!("not digits; return None");
        return None;
    }
    let (hours, minutes): (i32, i32) = match digits.len() {
        2 => (digits.parse().ok()?, 0),
        4 => (digits[..2].parse().ok()?, digits[2..].parse().ok()?),
        _ => {
            defx!("bad length; return None");
            return None;
        }
    };
    if minutes >= 60 {
        defx!("bad minutes; return None");
        return None;
    }
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60));
    defx!("return {:?}", offset);

    offset
}
