// src/printer/renderers.rs

//! Renderers of a [`Series`] for each output mode.
//!
//! Each renderer reads the `Series` only through [`Series::iter`],
//! [`Series::metric_paths`], and [`Sample::get`].
//!
//! [`Sample::get`]: crate::data::sample::Sample::get

use crate::data::datetime::{DateTimeL, ISO8601_DT_PATTERN, TABLE_DT_PATTERN};
use crate::data::sample::{MetricPath, Scalar};
use crate::data::series::Series;
use crate::debug::printers::de_wrn;

use std::io::{Error, ErrorKind, Result, Write};
use std::process::{Child, Command, ExitStatus, Stdio};

use ::itertools::Itertools; // for `join`
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::unicode_width::UnicodeWidthStr;

/// Header of the datetime column of the table and CSV modes.
pub const TIME_COLUMN: &str = "time";

/// Separator of table columns.
const TABLE_COLUMN_SEP: &str = "  ";

/// gnuplot program for the gnuplot mode.
pub const GNUPLOT_PROGRAM: &str = "gnuplot";

/// Written for an absent value in the gnuplot data rows. gnuplot skips the
/// row.
const GNUPLOT_ABSENT: &str = "None";

/// Datetime as printed in the CSV, JSON, and gnuplot modes.
pub fn datetime_iso(dt: &DateTimeL) -> String {
    dt.format(ISO8601_DT_PATTERN).to_string()
}

/// Each of `metrics` as a `MetricPath`.
pub fn metric_paths_from_strs<S: AsRef<str>>(metrics: &[S]) -> Vec<MetricPath> {
    metrics
        .iter()
        .map(|metric| MetricPath::from(metric.as_ref()))
        .collect()
}

/// Print every metric path of `series`, one per line, sorted.
pub fn render_metrics<W: Write>(
    series: &Series,
    out: &mut W,
) -> Result<()> {
    for path in series.metric_paths().iter() {
        writeln!(out, "{}", path)?;
    }

    Ok(())
}

/// Alignment of a table column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Align {
    Left,
    Right,
}

/// Print `metrics` of `series` as plain aligned columns, headed by
/// `time` and the metric names. Absent values are empty.
pub fn render_table<W: Write>(
    series: &Series,
    metrics: &[String],
    out: &mut W,
) -> Result<()> {
    defn!("({:?})", metrics);
    let paths = metric_paths_from_strs(metrics);
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(series.len() + 1);
    rows.push(
        std::iter::once(String::from(TIME_COLUMN))
            .chain(metrics.iter().cloned())
            .collect(),
    );
    for (dt, sample) in series.iter() {
        let mut row: Vec<String> = Vec::with_capacity(paths.len() + 1);
        row.push(dt.format(TABLE_DT_PATTERN).to_string());
        for path in paths.iter() {
            row.push(
                sample
                    .get(path)
                    .map_or_else(String::new, Scalar::to_string),
            );
        }
        rows.push(row);
    }

    let columns: usize = paths.len() + 1;
    let mut widths: Vec<usize> = vec![0; columns];
    for row in rows.iter() {
        for (column, cell) in row.iter().enumerate() {
            widths[column] = widths[column].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }
    let aligns: Vec<Align> = (0..columns)
        .map(|column| if column == 0 { Align::Left } else { Align::Right })
        .collect();

    for row in rows.iter() {
        let line: String = row
            .iter()
            .zip(widths.iter().zip(aligns.iter()))
            .map(|(cell, (width, align))| {
                let pad: usize = width - UnicodeWidthStr::width(cell.as_str());
                match align {
                    Align::Left => format!("{}{}", cell, " ".repeat(pad)),
                    Align::Right => format!("{}{}", " ".repeat(pad), cell),
                }
            })
            .join(TABLE_COLUMN_SEP);
        writeln!(out, "{}", line.trim_end())?;
    }
    defx!("{} rows", rows.len());

    Ok(())
}

/// Quote a CSV field if it contains a separator, quote, or newline.
pub fn csv_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        String::from(field)
    }
}

/// Print `metrics` of `series` as CSV with a header row.
pub fn render_csv<W: Write>(
    series: &Series,
    metrics: &[String],
    out: &mut W,
) -> Result<()> {
    let paths = metric_paths_from_strs(metrics);
    let header: String = std::iter::once(TIME_COLUMN)
        .chain(metrics.iter().map(String::as_str))
        .map(csv_field)
        .join(",");
    write!(out, "{}\r\n", header)?;
    for (dt, sample) in series.iter() {
        let row: String = std::iter::once(datetime_iso(dt))
            .chain(
                paths
                    .iter()
                    .map(|path| sample.get(path).map_or_else(String::new, Scalar::to_string)),
            )
            .map(|field| csv_field(field.as_str()))
            .join(",");
        write!(out, "{}\r\n", row)?;
    }

    Ok(())
}

/// `metrics` of `series` as one JSON object keyed by ISO datetime, in
/// `series` order. Absent values are `null`.
pub fn series_to_json(
    series: &Series,
    metrics: &[String],
) -> serde_json::Value {
    let paths = metric_paths_from_strs(metrics);
    let mut root = serde_json::Map::with_capacity(series.len());
    for (dt, sample) in series.iter() {
        let mut values = serde_json::Map::with_capacity(paths.len());
        for (metric, path) in metrics.iter().zip(paths.iter()) {
            let value: serde_json::Value = match sample.get(path) {
                Some(scalar) => match serde_json::to_value(scalar) {
                    Ok(val) => val,
                    Err(err) => {
                        de_wrn!("serde_json::to_value({:?}) failed {}", scalar, err);
                        serde_json::Value::Null
                    }
                },
                None => serde_json::Value::Null,
            };
            values.insert(metric.clone(), value);
        }
        root.insert(datetime_iso(dt), serde_json::Value::Object(values));
    }

    serde_json::Value::Object(root)
}

/// Print `metrics` of `series` as one JSON object on one line.
pub fn render_json<W: Write>(
    series: &Series,
    metrics: &[String],
    out: &mut W,
) -> Result<()> {
    let json = series_to_json(series, metrics);
    serde_json::to_writer(&mut *out, &json)?;
    writeln!(out)?;

    Ok(())
}

/// The gnuplot script plotting `metric` of `series` on a dumb terminal of
/// `width` × `height` characters.
pub fn gnuplot_script(
    series: &Series,
    metric: &str,
    width: usize,
    height: usize,
) -> String {
    let path = MetricPath::from(metric);
    let mut script = String::with_capacity(512 + series.len() * 32);
    script.push_str(&format!("set term dumb {} {} \n", width, height));
    script.push_str("unset border \n");
    script.push_str("unset ytics \n");
    script.push_str("unset xtics \n");
    script.push_str("set xtics nomirror \n");
    script.push_str("unset key \n");
    script.push_str("set xdata time \n");
    script.push_str("set format x '%H' \n");
    script.push_str("set timefmt '%Y-%m-%dT%H:%M:%S' \n");
    script.push_str("set datafile sep '\t' \n");
    script.push_str("plot '-' using 1:2 notitle with linespoints \n");
    for (dt, sample) in series.iter() {
        let value: String = sample
            .get(&path)
            .map_or_else(|| String::from(GNUPLOT_ABSENT), Scalar::to_string);
        script.push_str(&format!("{}\t{}\n", datetime_iso(dt), value));
    }
    script.push_str("e\n");

    script
}

/// For each of `metrics` run `program`, writing the [`gnuplot_script`] to
/// its stdin. The plots are printed by `program` directly.
pub fn render_gnuplot(
    series: &Series,
    metrics: &[String],
    width: usize,
    height: usize,
    program: &str,
) -> Result<()> {
    for metric in metrics.iter() {
        defo!("Command::new({:?}).spawn() for {:?}", program, metric);
        let mut child: Child = match Command::new(program)
            .stdin(Stdio::piped())
            .spawn()
        {
            Ok(val) => val,
            Err(err) => {
                return Err(Error::new(err.kind(), format!("failed to start {:?}; {}", program, err)));
            }
        };
        let script = gnuplot_script(series, metric, width, height);
        let written: Result<()> = match child.stdin.as_mut() {
            Some(stdin) => stdin
                .write_all(script.as_bytes())
                .and_then(|_| stdin.flush()),
            None => Err(Error::new(ErrorKind::BrokenPipe, format!("no stdin for {:?}", program))),
        };
        if let Err(err) = written {
            defo!("write to {:?} failed {}", program, err);
            let _ = child.kill();
            let _ = child.wait();
            return Err(err);
        }
        // close stdin so `program` exits
        drop(child.stdin.take());
        let exit_status: ExitStatus = child.wait()?;
        if !exit_status.success() {
            de_wrn!("{:?} exited {}", program, exit_status);
        }
    }

    Ok(())
}
