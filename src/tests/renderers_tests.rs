// src/tests/renderers_tests.rs

//! tests for `renderers.rs`

use crate::data::sample::{MetricCategory, Sample, Scalar};
use crate::data::series::Series;
use crate::printer::renderers::{
    csv_field,
    datetime_iso,
    gnuplot_script,
    render_csv,
    render_gnuplot,
    render_json,
    render_metrics,
    render_table,
    series_to_json,
};
use crate::tests::common::{dt0, FO_P1};
use crate::data::datetime::ymdhms;

use ::test_case::test_case;

/// `CPL.avg5` in both samples, `MEM.tot` only in the first.
fn new_series() -> Series {
    let mut series = Series::new();
    let mut sample = Sample::new(dt0(2023, 1, 2, 10, 0, 0), String::from("myhost"));
    sample.insert_field(MetricCategory::CPL, "avg5", Scalar::Float(1.23));
    sample.insert_field(MetricCategory::MEM, "tot", Scalar::Bytes(15_500_000_000));
    series.insert(sample);
    let mut sample = Sample::new(dt0(2023, 1, 2, 10, 10, 0), String::from("myhost"));
    sample.insert_field(MetricCategory::CPL, "avg5", Scalar::Float(1.5));
    series.insert(sample);

    series
}

fn metrics() -> Vec<String> {
    vec![String::from("CPL.avg5"), String::from("MEM.tot")]
}

fn render_to_string<F>(render_fn: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
{
    let mut buffer: Vec<u8> = Vec::new();
    render_fn(&mut buffer).unwrap();

    String::from_utf8(buffer).unwrap()
}

#[test]
fn test_datetime_iso() {
    assert_eq!(datetime_iso(&dt0(2023, 1, 2, 10, 0, 5)), "2023-01-02T10:00:05");
    // printed in its own offset
    let dt = ymdhms(&FO_P1, 2023, 1, 2, 10, 0, 5).unwrap();
    assert_eq!(datetime_iso(&dt), "2023-01-02T10:00:05");
}

#[test]
fn test_render_metrics() {
    let series = new_series();
    let output = render_to_string(|out| render_metrics(&series, out));
    assert_eq!(output, "CPL.avg5\nMEM.tot\n");
}

#[test]
fn test_render_metrics_empty() {
    let output = render_to_string(|out| render_metrics(&Series::new(), out));
    assert_eq!(output, "");
}

#[test]
fn test_render_table() {
    let series = new_series();
    let output = render_to_string(|out| render_table(&series, &metrics(), out));
    let expect = format!(
        "time{}CPL.avg5{}MEM.tot\n2023-01-02 10:00:00{}1.23  15500000000\n2023-01-02 10:10:00{}1.5\n",
        " ".repeat(17),
        " ".repeat(6),
        " ".repeat(6),
        " ".repeat(7),
    );
    assert_eq!(output, expect);
}

#[test]
fn test_render_table_unknown_metric() {
    let series = new_series();
    let output = render_to_string(|out| render_table(&series, &[String::from("NOPE.x")], out));
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines, vec!["time                 NOPE.x", "2023-01-02 10:00:00", "2023-01-02 10:10:00"]);
}

#[test_case("plain", "plain")]
#[test_case("a,b", "\"a,b\"")]
#[test_case("say \"hi\"", "\"say \"\"hi\"\"\"")]
#[test_case("two\nlines", "\"two\nlines\"")]
#[test_case("", "")]
fn test_csv_field(
    field: &str,
    expect: &str,
) {
    assert_eq!(csv_field(field), expect);
}

#[test]
fn test_render_csv() {
    let series = new_series();
    let output = render_to_string(|out| render_csv(&series, &metrics(), out));
    assert_eq!(
        output,
        "time,CPL.avg5,MEM.tot\r\n2023-01-02T10:00:00,1.23,15500000000\r\n2023-01-02T10:10:00,1.5,\r\n"
    );
}

#[test]
fn test_render_csv_quoted_header() {
    let output = render_to_string(|out| render_csv(&Series::new(), &[String::from("a,b")], out));
    assert_eq!(output, "time,\"a,b\"\r\n");
}

#[test]
fn test_render_json() {
    let series = new_series();
    let output = render_to_string(|out| render_json(&series, &metrics(), out));
    assert_eq!(
        output,
        "{\"2023-01-02T10:00:00\":{\"CPL.avg5\":1.23,\"MEM.tot\":15500000000},\"2023-01-02T10:10:00\":{\"CPL.avg5\":1.5,\"MEM.tot\":null}}\n"
    );
}

#[test]
fn test_series_to_json_order() {
    // keys keep the order of the metrics passed
    let series = new_series();
    let metrics = vec![String::from("MEM.tot"), String::from("CPL.avg5")];
    let json = series_to_json(&series, &metrics);
    let sample = json
        .get("2023-01-02T10:00:00")
        .and_then(|value| value.as_object())
        .unwrap();
    let keys: Vec<&String> = sample.keys().collect();
    assert_eq!(keys, vec!["MEM.tot", "CPL.avg5"]);
    assert_eq!(json.as_object().unwrap().len(), 2);
}

#[test]
fn test_series_to_json_empty() {
    let json = series_to_json(&Series::new(), &metrics());
    assert_eq!(json.to_string(), "{}");
}

#[test]
fn test_gnuplot_script() {
    let series = new_series();
    let script = gnuplot_script(&series, "CPL.avg5", 59, 9);
    assert!(script.starts_with("set term dumb 59 9 \n"), "{:?}", script);
    assert!(script.contains("set xdata time \n"));
    assert!(script.contains("set timefmt '%Y-%m-%dT%H:%M:%S' \n"));
    assert!(script.contains("set datafile sep '\t' \n"));
    assert!(script.ends_with(
        "plot '-' using 1:2 notitle with linespoints \n2023-01-02T10:00:00\t1.23\n2023-01-02T10:10:00\t1.5\ne\n"
    ));
}

#[test]
fn test_gnuplot_script_absent() {
    let series = new_series();
    let script = gnuplot_script(&series, "MEM.tot", 80, 20);
    assert!(script.starts_with("set term dumb 80 20 \n"));
    assert!(script.ends_with("2023-01-02T10:00:00\t15500000000\n2023-01-02T10:10:00\tNone\ne\n"));
}

#[test]
fn test_render_gnuplot_missing_program() {
    let series = new_series();
    let result = render_gnuplot(&series, &metrics(), 59, 9, "/nonexistent/gnuplot");
    assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_render_gnuplot_program_exits_early() {
    // the script outgrows the pipe buffer of a program that reads nothing
    let mut series = Series::new();
    for at in 0..6000_u32 {
        let mut sample = Sample::new(
            dt0(2023, 1, 2 + at / 1440, (at / 60) % 24, at % 60, 0),
            String::from("myhost"),
        );
        sample.insert_field(MetricCategory::CPL, "avg5", Scalar::Float(1.23));
        series.insert(sample);
    }
    let result = render_gnuplot(&series, &[String::from("CPL.avg5")], 80, 20, "true");
    assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::BrokenPipe);
}
