// src/tests/series_tests.rs

//! tests for `series.rs`

use crate::data::datetime::DateTimeL;
use crate::data::sample::{MetricCategory, MetricPath, Sample, Scalar};
use crate::data::series::Series;
use crate::tests::common::dt0;

fn sample_avg5(
    dt: DateTimeL,
    avg5: f64,
) -> Sample {
    let mut sample = Sample::new(dt, String::from("myhost"));
    sample.insert_field(MetricCategory::CPL, "avg5", Scalar::Float(avg5));

    sample
}

#[test]
fn test_Series_new() {
    let series = Series::new();
    assert!(series.is_empty());
    assert_eq!(series.len(), 0);
    assert!(series.first().is_none());
    assert!(series.metric_paths().is_empty());
}

#[test]
fn test_Series_insert_order() {
    let dt1 = dt0(2023, 1, 2, 10, 0, 0);
    let dt2 = dt0(2023, 1, 2, 10, 10, 0);
    let dt3 = dt0(2023, 1, 2, 10, 20, 0);
    let mut series = Series::new();
    assert!(series.insert(sample_avg5(dt1, 1.0)).is_none());
    assert!(series.insert(sample_avg5(dt2, 2.0)).is_none());
    assert!(series.insert(sample_avg5(dt3, 3.0)).is_none());
    assert_eq!(series.len(), 3);
    let dts: Vec<DateTimeL> = series.iter().map(|(dt, _)| *dt).collect();
    assert_eq!(dts, vec![dt1, dt2, dt3]);
    assert_eq!(series.first().map(Sample::dt), Some(&dt1));
    assert_eq!(series.last().map(Sample::dt), Some(&dt3));
}

#[test]
fn test_Series_insert_not_sorted() {
    // insertion order is kept even when not chronological
    let dt1 = dt0(2023, 1, 2, 10, 10, 0);
    let dt2 = dt0(2023, 1, 2, 10, 0, 0);
    let mut series = Series::new();
    series.insert(sample_avg5(dt1, 1.0));
    series.insert(sample_avg5(dt2, 2.0));
    let dts: Vec<DateTimeL> = series.iter().map(|(dt, _)| *dt).collect();
    assert_eq!(dts, vec![dt1, dt2]);
}

#[test]
fn test_Series_insert_replace() {
    let dt1 = dt0(2023, 1, 2, 10, 0, 0);
    let dt2 = dt0(2023, 1, 2, 10, 10, 0);
    let mut series = Series::new();
    series.insert(sample_avg5(dt1, 1.0));
    series.insert(sample_avg5(dt2, 2.0));
    let prior = series.insert(sample_avg5(dt1, 9.0));
    assert_eq!(prior, Some(sample_avg5(dt1, 1.0)));
    assert_eq!(series.len(), 2);
    // replaced in its original position
    assert_eq!(series.samples()[0], sample_avg5(dt1, 9.0));
    let path = MetricPath::from("CPL.avg5");
    assert_eq!(series.lookup(&dt1, &path), Some(&Scalar::Float(9.0)));
}

#[test]
fn test_Series_get_lookup() {
    let dt1 = dt0(2023, 1, 2, 10, 0, 0);
    let mut series = Series::new();
    series.insert(sample_avg5(dt1, 1.5));
    assert!(series.get(&dt1).is_some());
    assert!(series.get(&dt0(2023, 1, 2, 10, 0, 1)).is_none());
    assert_eq!(series.lookup(&dt1, &MetricPath::from("CPL.avg5")), Some(&Scalar::Float(1.5)));
    assert_eq!(series.lookup(&dt1, &MetricPath::from("CPL.avg1")), None);
}

#[test]
fn test_Series_metric_paths_values() {
    let dt1 = dt0(2023, 1, 2, 10, 0, 0);
    let dt2 = dt0(2023, 1, 2, 10, 10, 0);
    let mut series = Series::new();
    series.insert(sample_avg5(dt1, 1.0));
    let mut sample = sample_avg5(dt2, 2.0);
    sample.insert_field(MetricCategory::CPL, "avg1", Scalar::Float(0.5));
    series.insert(sample);

    let paths: Vec<String> = series
        .metric_paths()
        .iter()
        .map(MetricPath::to_string)
        .collect();
    assert_eq!(paths, vec!["CPL.avg1", "CPL.avg5"]);

    assert_eq!(
        series.values(&MetricPath::from("CPL.avg1")),
        vec![None, Some(Scalar::Float(0.5))]
    );
    assert_eq!(
        series.values(&MetricPath::from("CPL.avg5")),
        vec![Some(Scalar::Float(1.0)), Some(Scalar::Float(2.0))]
    );
}
