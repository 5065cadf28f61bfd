// src/printer/diagram.rs

//! Implements a [`Diagram`], a line diagram drawn with braille characters
//! (block U+2800) for terminals.
//!
//! Each character cell holds 2 × 4 dots, so a diagram of `width` × `height`
//! cells has `2 * width` × `4 * height` dots.

use crate::data::sample::MetricPath;
use crate::data::series::Series;

use std::io::{Result, Write};

#[allow(unused_imports)]
use ::more_asserts::{debug_assert_ge, debug_assert_lt};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};
use ::unicode_width::UnicodeWidthStr;

/// The empty braille pattern.
pub const BRAILLE_BLANK: char = '\u{2800}';

const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;

/// Bit of the dot at `[row][column]` within a braille cell.
const DOT_BITS: [[u32; DOTS_X]; DOTS_Y] = [
    [0x01, 0x08],
    [0x02, 0x10],
    [0x04, 0x20],
    [0x40, 0x80],
];

/// y-axis for a row with a label
const AXIS_TICK: char = '┤';
/// y-axis for a row without a label
const AXIS_LINE: char = '│';

/// A grid of braille cells addressed by dot.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl Canvas {
    /// A blank canvas of `width` × `height` cells. Each is at least 1.
    pub fn new(
        width: usize,
        height: usize,
    ) -> Canvas {
        let width = width.max(1);
        let height = height.max(1);

        Canvas {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn dots_x(&self) -> usize {
        self.width * DOTS_X
    }

    pub fn dots_y(&self) -> usize {
        self.height * DOTS_Y
    }

    /// Set the dot at `x` from the left and `y` from the top. Dots outside
    /// the canvas are ignored.
    pub fn set(
        &mut self,
        x: usize,
        y: usize,
    ) {
        if x >= self.dots_x() || y >= self.dots_y() {
            return;
        }
        let at = (y / DOTS_Y) * self.width + x / DOTS_X;
        self.cells[at] |= DOT_BITS[y % DOTS_Y][x % DOTS_X];
    }

    /// Set the dots of a straight line from `(x0, y0)` to `(x1, y1)`.
    pub fn line(
        &mut self,
        (x0, y0): (usize, usize),
        (x1, y1): (usize, usize),
    ) {
        // Bresenham
        let (mut x, mut y) = (x0 as i64, y0 as i64);
        let (x1, y1) = (x1 as i64, y1 as i64);
        let dx: i64 = (x1 - x).abs();
        let dy: i64 = -(y1 - y).abs();
        let sx: i64 = if x < x1 { 1 } else { -1 };
        let sy: i64 = if y < y1 { 1 } else { -1 };
        let mut err: i64 = dx + dy;
        loop {
            self.set(x as usize, y as usize);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// The canvas as one `String` of braille characters per row of cells.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|bits| char::from_u32(BRAILLE_BLANK as u32 + bits).unwrap_or(BRAILLE_BLANK))
                    .collect()
            })
            .collect()
    }
}

/// A line diagram of a sequence of values, drawn left to right across
/// `width` × `height` cells, with a y-axis labeled by the maximum and
/// minimum values.
///
/// Consecutive present values are connected. An absent value leaves a gap.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Diagram {
    width: usize,
    height: usize,
}

impl Diagram {
    pub fn new(
        width: usize,
        height: usize,
    ) -> Diagram {
        Diagram {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Render `values` as lines of text.
    pub fn render(
        &self,
        values: &[Option<f64>],
    ) -> Vec<String> {
        defn!("({} values)", values.len());
        let mut canvas = Canvas::new(self.width, self.height);
        let present = values
            .iter()
            .flatten()
            .copied()
            .filter(|value| value.is_finite());
        let (min, max): (f64, f64) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(value), max.max(value))
        });
        let labels: Option<(String, String)> = if min <= max {
            Some((max.to_string(), min.to_string()))
        } else {
            None
        };

        if labels.is_some() {
            let dots_x = canvas.dots_x();
            let dots_y = canvas.dots_y();
            let to_dot = |at: usize, value: f64| -> (usize, usize) {
                let x: usize = match values.len() {
                    0 | 1 => 0,
                    len => ((at * (dots_x - 1)) as f64 / (len - 1) as f64).round() as usize,
                };
                let y_up: usize = if max > min {
                    ((value - min) / (max - min) * (dots_y - 1) as f64).round() as usize
                } else {
                    (dots_y - 1) / 2
                };
                debug_assert_lt!(y_up, dots_y);

                (x, dots_y - 1 - y_up)
            };
            let mut prior: Option<(usize, usize)> = None;
            for (at, value) in values.iter().enumerate() {
                match value {
                    Some(value) if value.is_finite() => {
                        let dot = to_dot(at, *value);
                        match prior {
                            Some(prior_dot) => canvas.line(prior_dot, dot),
                            None => canvas.set(dot.0, dot.1),
                        }
                        prior = Some(dot);
                    }
                    _ => prior = None,
                }
            }
        }

        let (label_max, label_min) = labels.unwrap_or_default();
        let label_width: usize = UnicodeWidthStr::width(label_max.as_str())
            .max(UnicodeWidthStr::width(label_min.as_str()));
        let rows = canvas.rows();
        let last: usize = rows.len() - 1;
        let lines: Vec<String> = rows
            .into_iter()
            .enumerate()
            .map(|(at, row)| {
                let (label, axis): (&str, char) = match at {
                    0 if !label_max.is_empty() => (label_max.as_str(), AXIS_TICK),
                    at if at == last && !label_min.is_empty() => (label_min.as_str(), AXIS_TICK),
                    _ => ("", AXIS_LINE),
                };
                let pad: usize = label_width - UnicodeWidthStr::width(label);
                format!("{}{} {}{}", " ".repeat(pad), label, axis, row)
            })
            .collect();
        defx!("{} lines", lines.len());

        lines
    }
}

/// Print a [`Diagram`] of each of `metrics` of `series`, each headed by the
/// metric name.
pub fn render_diagram<W: Write>(
    series: &Series,
    metrics: &[String],
    width: usize,
    height: usize,
    out: &mut W,
) -> Result<()> {
    let diagram = Diagram::new(width, height);
    for metric in metrics.iter() {
        let path = MetricPath::from(metric.as_str());
        let values: Vec<Option<f64>> = series
            .values(&path)
            .into_iter()
            .map(|value| value.map(|scalar| scalar.as_f64()))
            .collect();
        writeln!(out, "{}", metric)?;
        for line in diagram.render(&values) {
            writeln!(out, "{}", line)?;
        }
    }

    Ok(())
}
