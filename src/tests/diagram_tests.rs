// src/tests/diagram_tests.rs

//! tests for `diagram.rs`

use crate::data::sample::{MetricCategory, Sample, Scalar};
use crate::data::series::Series;
use crate::printer::diagram::{render_diagram, Canvas, Diagram, BRAILLE_BLANK};
use crate::tests::common::dt0;

use ::test_case::test_case;

#[test]
fn test_Canvas_blank() {
    let canvas = Canvas::new(3, 2);
    assert_eq!(canvas.dots_x(), 6);
    assert_eq!(canvas.dots_y(), 8);
    let blank: String = std::iter::repeat(BRAILLE_BLANK).take(3).collect();
    assert_eq!(canvas.rows(), vec![blank.clone(), blank]);
}

#[test]
fn test_Canvas_zero_size() {
    let canvas = Canvas::new(0, 0);
    assert_eq!(canvas.rows(), vec![String::from(BRAILLE_BLANK)]);
}

#[test_case(0, 0, '\u{2801}')]
#[test_case(1, 0, '\u{2808}')]
#[test_case(0, 2, '\u{2804}')]
#[test_case(0, 3, '\u{2840}')]
#[test_case(1, 3, '\u{2880}')]
fn test_Canvas_set(
    x: usize,
    y: usize,
    expect: char,
) {
    let mut canvas = Canvas::new(1, 1);
    canvas.set(x, y);
    assert_eq!(canvas.rows(), vec![String::from(expect)]);
}

#[test]
fn test_Canvas_set_outside() {
    let mut canvas = Canvas::new(1, 1);
    canvas.set(2, 0);
    canvas.set(0, 4);
    assert_eq!(canvas.rows(), vec![String::from(BRAILLE_BLANK)]);
}

#[test]
fn test_Canvas_line() {
    let mut canvas = Canvas::new(2, 1);
    canvas.line((0, 0), (3, 0));
    assert_eq!(canvas.rows(), vec![String::from("\u{2809}\u{2809}")]);
    let mut canvas = Canvas::new(1, 1);
    canvas.line((0, 3), (0, 0));
    assert_eq!(canvas.rows(), vec![String::from("\u{2847}")]);
}

#[test]
fn test_Diagram_render_empty() {
    let lines = Diagram::new(2, 2).render(&[]);
    let expect = format!(" │{}{}", BRAILLE_BLANK, BRAILLE_BLANK);
    assert_eq!(lines, vec![expect.clone(), expect]);
}

#[test]
fn test_Diagram_render_labels() {
    let lines = Diagram::new(2, 3).render(&[Some(1.0), Some(3.0)]);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("3 ┤"), "{:?}", lines[0]);
    assert!(lines[1].starts_with("  │"), "{:?}", lines[1]);
    assert!(lines[2].starts_with("1 ┤"), "{:?}", lines[2]);
    for line in lines.iter() {
        assert_eq!(line.chars().count(), 3 + 2, "{:?}", line);
    }
}

#[test]
fn test_Diagram_render_label_pad() {
    let lines = Diagram::new(1, 2).render(&[Some(0.5), Some(100.0)]);
    assert!(lines[0].starts_with("100 ┤"), "{:?}", lines[0]);
    assert!(lines[1].starts_with("0.5 ┤"), "{:?}", lines[1]);
}

#[test]
fn test_Diagram_render_single() {
    let lines = Diagram::new(2, 1).render(&[Some(5.0)]);
    assert_eq!(lines, vec![String::from("5 ┤\u{2804}\u{2800}")]);
}

#[test]
fn test_Diagram_render_equal_values() {
    let lines = Diagram::new(2, 2).render(&[Some(2.0), Some(2.0)]);
    let blank = format!("2 ┤{}{}", BRAILLE_BLANK, BRAILLE_BLANK);
    assert_eq!(lines[0], blank);
    assert_ne!(lines[1], blank);
}

#[test]
fn test_Diagram_render_gap() {
    let lines = Diagram::new(3, 1).render(&[Some(0.0), None, Some(4.0)]);
    assert_eq!(lines, vec![String::from("4 ┤\u{2840}\u{2800}\u{2808}")]);
    let lines = Diagram::new(3, 1).render(&[Some(0.0), Some(2.0), Some(4.0)]);
    assert_ne!(lines, vec![String::from("4 ┤\u{2840}\u{2800}\u{2808}")]);
}

#[test]
fn test_Diagram_render_not_finite() {
    let lines = Diagram::new(1, 1).render(&[Some(f64::NAN), None]);
    assert_eq!(lines, vec![format!(" │{}", BRAILLE_BLANK)]);
}

#[test]
fn test_render_diagram() {
    let mut series = Series::new();
    for (minute, avg5) in [(0, 1.0), (10, 2.0), (20, 1.5)] {
        let mut sample = Sample::new(dt0(2023, 1, 2, 10, minute, 0), String::from("myhost"));
        sample.insert_field(MetricCategory::CPL, "avg5", Scalar::Float(avg5));
        series.insert(sample);
    }
    let mut buffer: Vec<u8> = Vec::new();
    render_diagram(&series, &[String::from("CPL.avg5"), String::from("CPL.avg1")], 10, 3, &mut buffer).unwrap();
    let output = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2 * (1 + 3));
    assert_eq!(lines[0], "CPL.avg5");
    assert!(lines[1].starts_with("2 ┤"), "{:?}", lines[1]);
    assert!(lines[3].starts_with("1 ┤"), "{:?}", lines[3]);
    assert_eq!(lines[4], "CPL.avg1");
}
