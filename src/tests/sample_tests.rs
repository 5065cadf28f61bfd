// src/tests/sample_tests.rs

//! tests for `sample.rs`

use crate::data::sample::{MetricCategory, MetricNode, MetricPath, Sample, Scalar};
use crate::tests::common::dt0;

use std::str::FromStr;

use ::test_case::test_case;

fn new_sample() -> Sample {
    let mut sample = Sample::new(dt0(2023, 1, 2, 10, 0, 0), String::from("myhost"));
    sample.insert_field(MetricCategory::CPL, "avg5", Scalar::Float(1.23));
    sample.insert_field(MetricCategory::MEM, "tot", Scalar::Bytes(15_500_000_000));
    sample.insert_instance(MetricCategory::NET, "eth0");
    sample.insert_instance_field(MetricCategory::NET, "eth0", "pcki", Scalar::Integer(500));
    sample.insert_instance(MetricCategory::DSK, "sda");
    sample.insert_instance_field(MetricCategory::DSK, "sda", "busy", Scalar::Percent(3));

    sample
}

#[test_case("PRC", Some(MetricCategory::PRC))]
#[test_case("NET", Some(MetricCategory::NET))]
#[test_case("net", None)]
#[test_case("LVM", None)]
fn test_MetricCategory_from_str(
    data: &str,
    expect: Option<MetricCategory>,
) {
    assert_eq!(MetricCategory::from_str(data).ok(), expect);
}

#[test]
fn test_MetricCategory_is_multi_instance() {
    for category in MetricCategory::ALL.iter() {
        let expect = matches!(category, MetricCategory::DSK | MetricCategory::NET);
        assert_eq!(category.is_multi_instance(), expect, "{}", category);
    }
}

#[test_case("CPL.avg5", 2)]
#[test_case("NET.eth0.pcki", 3)]
#[test_case("MEM", 1)]
fn test_MetricPath_from_display(
    data: &str,
    len: usize,
) {
    let path = MetricPath::from(data);
    assert_eq!(path.len(), len);
    assert_eq!(path.to_string(), data);
}

#[test]
fn test_MetricPath_ord() {
    let mut paths: Vec<MetricPath> = ["DSK.sdb.busy", "DSK.sda.read", "CPL.avg5", "DSK.sda.busy"]
        .iter()
        .map(|s| MetricPath::from(*s))
        .collect();
    paths.sort();
    let paths: Vec<String> = paths.iter().map(MetricPath::to_string).collect();
    assert_eq!(paths, vec!["CPL.avg5", "DSK.sda.busy", "DSK.sda.read", "DSK.sdb.busy"]);
}

#[test_case("CPL.avg5", Some(Scalar::Float(1.23)))]
#[test_case("MEM.tot", Some(Scalar::Bytes(15_500_000_000)))]
#[test_case("NET.eth0.pcki", Some(Scalar::Integer(500)))]
#[test_case("DSK.sda.busy", Some(Scalar::Percent(3)))]
#[test_case("NET.eth0", None; "branch")]
#[test_case("NET", None; "category")]
#[test_case("CPL.avg5.more", None; "below a leaf")]
#[test_case("CPL.avg1", None; "absent field")]
#[test_case("SWP.tot", None; "absent category")]
fn test_Sample_get(
    path: &str,
    expect: Option<Scalar>,
) {
    let sample = new_sample();
    assert_eq!(sample.get(&MetricPath::from(path)).copied(), expect);
}

#[test]
fn test_Sample_accessors() {
    let sample = new_sample();
    assert_eq!(sample.dt(), &dt0(2023, 1, 2, 10, 0, 0));
    assert_eq!(sample.host(), "myhost");
    assert_eq!(sample.metrics().len(), 4);
}

#[test]
fn test_Sample_metric_paths() {
    let sample = new_sample();
    let paths: Vec<String> = sample
        .metric_paths()
        .iter()
        .map(MetricPath::to_string)
        .collect();
    assert_eq!(paths, vec!["CPL.avg5", "DSK.sda.busy", "MEM.tot", "NET.eth0.pcki"]);
    assert_eq!(sample.count_scalars(), 4);
}

#[test]
fn test_Sample_add_category_empty() {
    let mut sample = Sample::new(dt0(2023, 1, 2, 10, 0, 0), String::from("myhost"));
    sample.add_category(MetricCategory::PAG);
    assert_eq!(sample.metrics().get("PAG"), Some(&MetricNode::Branch(Default::default())));
    assert_eq!(sample.count_scalars(), 0);
}

#[test]
fn test_Sample_insert_instance_replaces() {
    let mut sample = new_sample();
    sample.insert_instance(MetricCategory::NET, "eth0");
    assert_eq!(sample.get(&MetricPath::from("NET.eth0.pcki")), None);
    sample.insert_instance_field(MetricCategory::NET, "eth0", "pcko", Scalar::Integer(600));
    assert_eq!(sample.get(&MetricPath::from("NET.eth0.pcko")), Some(&Scalar::Integer(600)));
}

#[test]
fn test_Sample_insert_field_replaces() {
    let mut sample = new_sample();
    sample.insert_field(MetricCategory::CPL, "avg5", Scalar::Float(2.0));
    assert_eq!(sample.get(&MetricPath::from("CPL.avg5")), Some(&Scalar::Float(2.0)));
}

#[test_case(Scalar::Integer(-3), "-3", -3.0)]
#[test_case(Scalar::Float(1.23), "1.23", 1.23)]
#[test_case(Scalar::Bytes(12000), "12000", 12000.0)]
#[test_case(Scalar::Seconds(0.5), "0.5", 0.5)]
#[test_case(Scalar::Percent(37), "37", 37.0)]
fn test_Scalar_display_as_f64(
    scalar: Scalar,
    display: &str,
    value: f64,
) {
    assert_eq!(scalar.to_string(), display);
    assert_eq!(scalar.as_f64(), value);
}

#[test]
fn test_Scalar_serialize() {
    let value = serde_json::to_string(&[Scalar::Integer(1), Scalar::Float(0.5), Scalar::Bytes(2)]).unwrap();
    assert_eq!(value, "[1,0.5,2]");
}
