// src/data/field.rs

//! The field coercion table and the coercion functions.
//!
//! atop prints every metric field as text, e.g. `tot 15.5G`, `avio 2.83 ms`,
//! or `idle 395%`. The text alone does not tell the kind of value; the kind
//! is decided by the (category, field) pair, e.g. `(MEM, "tot")` is a
//! byte size. Pairs absent from the table have no [`CoercionKind`] and are
//! dropped.
//!
//! Coercion never fails loudly. An unparseable value becomes `None` and the
//! field is dropped.

use crate::data::sample::{MetricCategory, Scalar};
use crate::debug::printers::de_wrn;

use std::collections::HashMap;

use ::byte_unit::Byte;
use ::lazy_static::lazy_static;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// coercion table
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The normalization rule applied to the raw text of a field.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CoercionKind {
    /// human-readable size, e.g. `"1.2G"`, becomes [`Scalar::Bytes`]
    ByteSize,
    /// one or more duration fragments, e.g. `"1h30m"`, becomes
    /// [`Scalar::Seconds`]
    Duration,
    /// e.g. `" 37% "`, becomes [`Scalar::Percent`]
    Percentage,
    /// becomes [`Scalar::Float`]
    Float,
    /// becomes [`Scalar::Integer`]
    Integer,
}

impl CoercionKind {
    /// Coerce the raw text `value` to a [`Scalar`] of this kind.
    pub fn coerce(
        &self,
        value: &str,
    ) -> Option<Scalar> {
        match self {
            CoercionKind::ByteSize => parse_byte_size(value).map(Scalar::Bytes),
            CoercionKind::Duration => parse_duration_seconds(value).map(Scalar::Seconds),
            CoercionKind::Percentage => parse_percentage(value).map(Scalar::Percent),
            CoercionKind::Float => parse_float(value).map(Scalar::Float),
            CoercionKind::Integer => parse_integer(value).map(Scalar::Integer),
        }
    }
}

type CoercionPairs = [(MetricCategory, &'static str)];

const BYTESIZE_FIELDS: &CoercionPairs = &[
    (MetricCategory::MEM, "buff"),
    (MetricCategory::MEM, "cache"),
    (MetricCategory::MEM, "free"),
    (MetricCategory::MEM, "slab"),
    (MetricCategory::MEM, "tot"),
    (MetricCategory::SWP, "free"),
    (MetricCategory::SWP, "tot"),
    (MetricCategory::SWP, "vmcom"),
    (MetricCategory::SWP, "vmlim"),
    (MetricCategory::NET, "si"),
    (MetricCategory::NET, "so"),
];

const DURATION_FIELDS: &CoercionPairs = &[
    (MetricCategory::DSK, "avio"),
    (MetricCategory::PRC, "sys"),
    (MetricCategory::PRC, "user"),
];

const PERCENTAGE_FIELDS: &CoercionPairs = &[
    (MetricCategory::CPU, "idle"),
    (MetricCategory::CPU, "irq"),
    (MetricCategory::CPU, "sys"),
    (MetricCategory::CPU, "user"),
    (MetricCategory::CPU, "wait"),
    (MetricCategory::DSK, "busy"),
];

const FLOAT_FIELDS: &CoercionPairs = &[
    (MetricCategory::CPL, "avg1"),
    (MetricCategory::CPL, "avg5"),
    (MetricCategory::CPL, "avg15"),
];

// `NET si`, `NET so`, `PRC sys`, `PRC user` are also listed above;
// the earlier list wins
const INTEGER_FIELDS: &CoercionPairs = &[
    (MetricCategory::CPL, "csw"),
    (MetricCategory::CPL, "intr"),
    (MetricCategory::DSK, "read"),
    (MetricCategory::DSK, "write"),
    (MetricCategory::NET, "pcki"),
    (MetricCategory::NET, "pcko"),
    (MetricCategory::NET, "si"),
    (MetricCategory::NET, "so"),
    (MetricCategory::NET, "deliv"),
    (MetricCategory::NET, "ipfrw"),
    (MetricCategory::NET, "ipi"),
    (MetricCategory::NET, "ipo"),
    (MetricCategory::NET, "tcpi"),
    (MetricCategory::NET, "tcpo"),
    (MetricCategory::NET, "udpi"),
    (MetricCategory::NET, "udpo"),
    (MetricCategory::PAG, "scan"),
    (MetricCategory::PAG, "stall"),
    (MetricCategory::PAG, "swin"),
    (MetricCategory::PAG, "swout"),
    (MetricCategory::PRC, "exit"),
    (MetricCategory::PRC, "proc"),
    (MetricCategory::PRC, "sys"),
    (MetricCategory::PRC, "user"),
    (MetricCategory::PRC, "zombie"),
];

pub type CoercionTable = HashMap<(MetricCategory, &'static str), CoercionKind>;

lazy_static! {
    /// (category, field) → [`CoercionKind`], built once.
    pub static ref COERCION_TABLE: CoercionTable = {
        defñ!("lazy_static! COERCION_TABLE");
        let mut table = CoercionTable::with_capacity(64);
        for (pairs, kind) in [
            (BYTESIZE_FIELDS, CoercionKind::ByteSize),
            (DURATION_FIELDS, CoercionKind::Duration),
            (PERCENTAGE_FIELDS, CoercionKind::Percentage),
            (FLOAT_FIELDS, CoercionKind::Float),
            (INTEGER_FIELDS, CoercionKind::Integer),
        ] {
            for pair in pairs.iter() {
                table.entry(*pair).or_insert(kind);
            }
        }

        table
    };

    /// one `<number><unit>` fragment within a duration, e.g. `"2.83 ms"`
    static ref REGEX_DURATION_FRAGMENT: Regex = {
        defñ!("lazy_static! REGEX_DURATION_FRAGMENT");
        match Regex::new(r"([\d,.]+)\s*(\D+)") {
            Ok(val) => val,
            Err(err) => panic!("Regex::new failed {}", err),
        }
    };

}

/// Return the [`CoercionKind`] of the `(category, field)` pair.
/// `None` if the pair is not in the table.
pub fn coercion_kind(
    category: MetricCategory,
    field: &str,
) -> Option<CoercionKind> {
    COERCION_TABLE
        .get(&(category, field))
        .copied()
}

/// Coerce the raw text `value` of `category` `field` to a [`Scalar`].
///
/// Returns `None` if the pair has no [`CoercionKind`] or `value` cannot be
/// coerced.
pub fn coerce_field(
    category: MetricCategory,
    field: &str,
    value: &str,
) -> Option<Scalar> {
    let kind = match coercion_kind(category, field) {
        Some(kind) => kind,
        None => {
            defñ!("({:?}, {:?}) no CoercionKind", category, field);
            return None;
        }
    };
    let scalar = kind.coerce(value);
    if scalar.is_none() {
        de_wrn!("failed to coerce {} {:?} value {:?} as {:?}", category, field, value, kind);
    }
    defñ!("({:?}, {:?}, {:?}) return {:?}", category, field, value, scalar);

    scalar
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// exact decimal numbers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Most significant digits accepted by [`DecimalNumber::parse`].
const DECIMAL_DIGITS_MAX: usize = 36;

/// Greatest power of ten held by an `i128`.
const POW10_MAX: u32 = 38;

/// A decimal number `mantissa × 10^exponent` parsed without binary
/// floating-point rounding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecimalNumber {
    pub mantissa: i128,
    pub exponent: i32,
}

impl DecimalNumber {
    /// Parse text like `"12"`, `"-1.50"`, `"+3."`, `".5"`, or `"1e3"`.
    pub fn parse(data: &str) -> Option<DecimalNumber> {
        let data = data.trim();
        let (negative, rest) = match data.as_bytes().first()? {
            b'-' => (true, &data[1..]),
            b'+' => (false, &data[1..]),
            _ => (false, data),
        };
        let (number, exp_str) = match rest.find(&['e', 'E'][..]) {
            Some(at) => (&rest[..at], Some(&rest[at + 1..])),
            None => (rest, None),
        };
        let (integral, fraction) = match number.find('.') {
            Some(at) => (&number[..at], &number[at + 1..]),
            None => (number, ""),
        };
        if integral.is_empty() && fraction.is_empty() {
            return None;
        }
        if !integral.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits: String = format!("{}{}", integral, fraction);
        let digits = digits.trim_start_matches('0');
        if digits.len() > DECIMAL_DIGITS_MAX {
            return None;
        }
        let mut mantissa: i128 = if digits.is_empty() { 0 } else { digits.parse().ok()? };
        if negative {
            mantissa = -mantissa;
        }
        let mut exponent: i32 = -i32::try_from(fraction.len()).ok()?;
        if let Some(exp_str) = exp_str {
            let exp: i32 = exp_str.parse().ok()?;
            exponent = exponent.checked_add(exp)?;
        }

        Some(DecimalNumber { mantissa, exponent })
    }

    /// The same value without trailing zeros in the fraction, e.g.
    /// `1.500` becomes `1.5`.
    pub fn normalized(&self) -> DecimalNumber {
        let mut number = *self;
        while number.exponent < 0 && number.mantissa != 0 && number.mantissa % 10 == 0 {
            number.mantissa /= 10;
            number.exponent += 1;
        }

        number
    }

    /// `self × multiplier`, truncated toward zero.
    ///
    /// Returns `None` on overflow.
    pub fn mul_trunc(
        &self,
        multiplier: i128,
    ) -> Option<i128> {
        let number = self.normalized();
        let product: i128 = number.mantissa.checked_mul(multiplier)?;
        if product == 0 {
            return Some(0);
        }
        if number.exponent >= 0 {
            let exp = u32::try_from(number.exponent).ok()?;
            if exp > POW10_MAX {
                return None;
            }
            product.checked_mul(10_i128.pow(exp))
        } else {
            let exp = number.exponent.unsigned_abs();
            if exp > POW10_MAX {
                return Some(0);
            }
            // integer division truncates toward zero
            Some(product / 10_i128.pow(exp))
        }
    }

    /// The value truncated toward zero.
    pub fn trunc(&self) -> Option<i128> {
        self.mul_trunc(1)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// coercion functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse an integer, e.g. `"12345"`. A fraction or exponent is accepted and
/// the value is truncated toward zero, e.g. `"1.9"` is `1`.
pub fn parse_integer(value: &str) -> Option<i64> {
    let number = DecimalNumber::parse(value)?;

    i64::try_from(number.trunc()?).ok()
}

/// Parse a floating-point number, e.g. `"1.23"`.
pub fn parse_float(value: &str) -> Option<f64> {
    // validate the notation first; `f64::from_str` is correctly rounded
    DecimalNumber::parse(value)?;

    value.trim().parse::<f64>().ok()
}

/// Parse a percentage, e.g. `" 37% "` is `37`.
///
/// Values outside 0 to 100 are not rejected.
pub fn parse_percentage(value: &str) -> Option<i64> {
    value
        .replace('%', "")
        .trim()
        .parse::<i64>()
        .ok()
}

/// Spelled-out size prefixes and their unit symbols, e.g. `kibibyte` is
/// `KiB`.
const SIZE_PREFIX_NAMES: [(&str, &str); 16] = [
    ("kibi", "ki"),
    ("kilo", "k"),
    ("mebi", "mi"),
    ("mega", "m"),
    ("gibi", "gi"),
    ("giga", "g"),
    ("tebi", "ti"),
    ("tera", "t"),
    ("pebi", "pi"),
    ("peta", "p"),
    ("exbi", "ei"),
    ("exa", "e"),
    ("zebi", "zi"),
    ("zetta", "z"),
    ("yobi", "yi"),
    ("yotta", "y"),
];

/// Rewrite the size `unit` text into a unit symbol [`Byte::parse_str`]
/// accepts, e.g. `"Kbps"` is `"kb"`, `"bytes"` is `"b"`, `"terabyte"` is
/// `"tb"`.
fn size_unit_symbol(unit: &str) -> Option<String> {
    let unit: String = unit.trim().to_lowercase();
    // atop prints network throughput as `Kbps`, `Mbps`
    if let Some(prefix) = unit.strip_suffix("bps") {
        return Some(format!("{}b", prefix));
    }
    let prefix: String = match unit
        .strip_suffix("bytes")
        .or_else(|| unit.strip_suffix("byte"))
    {
        Some(prefix) => prefix.to_string(),
        None => return Some(unit),
    };
    if prefix.is_empty() {
        return Some(String::from("b"));
    }
    SIZE_PREFIX_NAMES
        .iter()
        .find(|(name, _)| *name == prefix)
        .map(|(_, symbol)| format!("{}b", symbol))
}

/// Bytes per one size `unit`, e.g. `"g"` is `1000³`, `"gib"` is `1024³`.
///
/// Prefix letters are decimal, `*iB` units are binary.
fn size_unit_multiplier(unit: &str) -> Option<i128> {
    let symbol = size_unit_symbol(unit)?;
    let byte: Byte = match Byte::parse_str(format!("1{}", symbol), true) {
        Ok(byte) => byte,
        Err(_err) => {
            defñ!("Byte::parse_str({:?}) failed {}", symbol, _err);
            return None;
        }
    };

    i128::try_from(byte.as_u128()).ok()
}

/// Parse a human-readable size into a count of bytes, e.g. `"10K"` is
/// `10000`, `"1.5KiB"` is `1536`, `"300"` is `300`, `"12 Kbps"` is
/// `12000`.
///
/// A fractional count of bytes is truncated.
pub fn parse_byte_size(value: &str) -> Option<u64> {
    let value = value.trim();
    let unit_at: usize = value
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(value.len());
    let number = DecimalNumber::parse(&value[..unit_at])?;
    let multiplier = size_unit_multiplier(&value[unit_at..])?;

    u64::try_from(number.mul_trunc(multiplier)?).ok()
}

/// Seconds per lowercase duration `unit`.
fn duration_unit_seconds(unit: &str) -> Option<f64> {
    let seconds = match unit {
        "ns" | "nanosecond" | "nanoseconds" => 1e-9,
        "us" | "μs" | "microsecond" | "microseconds" => 1e-6,
        "ms" | "millisecond" | "milliseconds" => 1e-3,
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
        "h" | "hour" | "hours" => 3600.0,
        "d" | "day" | "days" => 86400.0,
        "w" | "week" | "weeks" => 604800.0,
        "y" | "year" | "years" => 31449600.0,
        _ => return None,
    };

    Some(seconds)
}

/// Parse a duration made of one or more `<number><unit>` fragments into
/// seconds, e.g. `"1h30m"` is `5400`, `"2.83 ms"` is `0.00283`.
///
/// Text without any fragment is `0`. A fragment with an unknown unit
/// makes the entire value unparseable.
pub fn parse_duration_seconds(value: &str) -> Option<f64> {
    let mut sum: f64 = 0.0;
    for captures in REGEX_DURATION_FRAGMENT.captures_iter(value) {
        let number: f64 = captures
            .get(1)?
            .as_str()
            .replace(',', "")
            .parse()
            .ok()?;
        let unit: String = captures
            .get(2)?
            .as_str()
            .trim()
            .to_lowercase();
        sum += number * duration_unit_seconds(unit.as_str())?;
    }

    Some(sum)
}
