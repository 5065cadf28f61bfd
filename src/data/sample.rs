// src/data/sample.rs

//! Implements a [`Sample`] struct, the typed [`Scalar`] values within it,
//! and the dotted [`MetricPath`] addressing one of those values.
//!
//! [`Sample`]: crate::data::sample::Sample
//! [`Scalar`]: crate::data::sample::Scalar
//! [`MetricPath`]: crate::data::sample::MetricPath

use crate::data::datetime::DateTimeL;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use ::serde::Serialize;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MetricCategory
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The fixed top-level metric groups printed by atop, named by the code
/// atop prints at the beginning of each metric line.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum MetricCategory {
    /// process counts and process CPU time
    PRC,
    /// CPU utilization
    CPU,
    /// CPU load
    CPL,
    /// memory
    MEM,
    /// swap space
    SWP,
    /// paging
    PAG,
    /// disk, one line per device
    DSK,
    /// network, one line per layer or interface
    NET,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 8] = [
        MetricCategory::PRC,
        MetricCategory::CPU,
        MetricCategory::CPL,
        MetricCategory::MEM,
        MetricCategory::SWP,
        MetricCategory::PAG,
        MetricCategory::DSK,
        MetricCategory::NET,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::PRC => "PRC",
            MetricCategory::CPU => "CPU",
            MetricCategory::CPL => "CPL",
            MetricCategory::MEM => "MEM",
            MetricCategory::SWP => "SWP",
            MetricCategory::PAG => "PAG",
            MetricCategory::DSK => "DSK",
            MetricCategory::NET => "NET",
        }
    }

    /// Categories printed as one line per instance (device or interface).
    /// The first field of such a line names the instance.
    pub const fn is_multi_instance(&self) -> bool {
        matches!(self, MetricCategory::DSK | MetricCategory::NET)
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetricCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for category in MetricCategory::ALL.iter() {
            if category.as_str() == s {
                return Ok(*category);
            }
        }

        Err(format!("unknown metric category {:?}", s))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scalar
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A typed metric value, the result of coercing the raw text of a field.
///
/// Serialized as a plain JSON number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    /// a size in bytes
    Bytes(u64),
    /// a duration in seconds
    Seconds(f64),
    /// a percentage, usually within 0 to 100
    Percent(i64),
}

impl Scalar {
    /// The value as a `f64`, for plotting.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Scalar::Integer(val) => val as f64,
            Scalar::Float(val) => val,
            Scalar::Bytes(val) => val as f64,
            Scalar::Seconds(val) => val,
            Scalar::Percent(val) => val as f64,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(val) => write!(f, "{}", val),
            Scalar::Float(val) => write!(f, "{}", val),
            Scalar::Bytes(val) => write!(f, "{}", val),
            Scalar::Seconds(val) => write!(f, "{}", val),
            Scalar::Percent(val) => write!(f, "{}", val),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MetricPath
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Separator of the parts of a [`MetricPath`].
pub const METRIC_PATH_SEP: char = '.';

/// A dotted address of one [`Scalar`] within a [`Sample`], e.g. `CPL.avg5`
/// or `NET.eth0.pcki`.
///
/// Ordered part-by-part, i.e. `DSK.sda.busy` < `DSK.sda.read` < `DSK.sdb.busy`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MetricPath {
    parts: Vec<String>,
}

impl MetricPath {
    pub fn from_parts(parts: Vec<String>) -> MetricPath {
        MetricPath { parts }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl From<&str> for MetricPath {
    fn from(s: &str) -> Self {
        MetricPath {
            parts: s
                .split(METRIC_PATH_SEP)
                .map(String::from)
                .collect(),
        }
    }
}

impl fmt::Display for MetricPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in self.parts.iter() {
            if !first {
                write!(f, "{}", METRIC_PATH_SEP)?;
            }
            write!(f, "{}", part)?;
            first = false;
        }

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MetricNode
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Mapping of name to nested [`MetricNode`].
pub type MetricMap = BTreeMap<String, MetricNode>;

/// One node within the nested metrics of a [`Sample`].
///
/// For most categories the tree is `category → field → Leaf`.
/// For multi-instance categories it is `category → instance → field → Leaf`.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricNode {
    Leaf(Scalar),
    Branch(MetricMap),
}

/// Collect the path of every `Leaf` below `map` into `paths`.
/// `prefix` is the path of `map` itself.
fn metric_map_leaf_paths(
    map: &MetricMap,
    prefix: &mut Vec<String>,
    paths: &mut BTreeSet<MetricPath>,
) {
    for (name, node) in map.iter() {
        prefix.push(name.clone());
        match node {
            MetricNode::Leaf(_) => {
                paths.insert(MetricPath::from_parts(prefix.clone()));
            }
            MetricNode::Branch(map_) => {
                metric_map_leaf_paths(map_, prefix, paths);
            }
        }
        prefix.pop();
    }
}

/// Get the `MetricMap` of branch `name` within `map`, creating it if needed.
/// A `Leaf` at `name` is replaced.
fn metric_map_branch<'a>(
    map: &'a mut MetricMap,
    name: &str,
) -> &'a mut MetricMap {
    let node = map
        .entry(String::from(name))
        .or_insert_with(|| MetricNode::Branch(MetricMap::new()));
    if let MetricNode::Leaf(_) = node {
        *node = MetricNode::Branch(MetricMap::new());
    }
    match node {
        MetricNode::Branch(map_) => map_,
        MetricNode::Leaf(_) => unreachable!("Leaf was replaced by a Branch"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sample
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A `Sample` is one timestamped snapshot of metric categories printed
/// by atop, i.e. one header line and the metric lines that follow it.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// datetime of the header line
    dt: DateTimeL,
    /// host name of the header line
    host: String,
    /// category → nested metrics
    metrics: MetricMap,
}

impl Sample {
    pub fn new(
        dt: DateTimeL,
        host: String,
    ) -> Sample {
        Sample {
            dt,
            host,
            metrics: MetricMap::new(),
        }
    }

    pub const fn dt(&self) -> &DateTimeL {
        &self.dt
    }

    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    pub const fn metrics(&self) -> &MetricMap {
        &self.metrics
    }

    /// Ensure `category` is present, even with no fields.
    pub fn add_category(
        &mut self,
        category: MetricCategory,
    ) {
        metric_map_branch(&mut self.metrics, category.as_str());
    }

    /// Store `scalar` at `category.field`.
    pub fn insert_field(
        &mut self,
        category: MetricCategory,
        field: &str,
        scalar: Scalar,
    ) {
        metric_map_branch(&mut self.metrics, category.as_str())
            .insert(String::from(field), MetricNode::Leaf(scalar));
    }

    /// Begin a new, empty `category.instance`, replacing any prior
    /// fields of that instance.
    pub fn insert_instance(
        &mut self,
        category: MetricCategory,
        instance: &str,
    ) {
        metric_map_branch(&mut self.metrics, category.as_str())
            .insert(String::from(instance), MetricNode::Branch(MetricMap::new()));
    }

    /// Store `scalar` at `category.instance.field`.
    pub fn insert_instance_field(
        &mut self,
        category: MetricCategory,
        instance: &str,
        field: &str,
        scalar: Scalar,
    ) {
        let map_category = metric_map_branch(&mut self.metrics, category.as_str());
        metric_map_branch(map_category, instance)
            .insert(String::from(field), MetricNode::Leaf(scalar));
    }

    /// Get the [`Scalar`] at `path`.
    ///
    /// Returns `None` if `path` is absent or does not end at a `Scalar`.
    pub fn get(
        &self,
        path: &MetricPath,
    ) -> Option<&Scalar> {
        let (last, parents) = path.parts().split_last()?;
        let mut map: &MetricMap = &self.metrics;
        for part in parents.iter() {
            match map.get(part)? {
                MetricNode::Branch(map_) => map = map_,
                MetricNode::Leaf(_) => return None,
            }
        }
        match map.get(last)? {
            MetricNode::Leaf(scalar) => Some(scalar),
            MetricNode::Branch(_) => None,
        }
    }

    /// Collect the [`MetricPath`] of every `Scalar` in this `Sample` into
    /// `paths`.
    pub fn metric_paths_into(
        &self,
        paths: &mut BTreeSet<MetricPath>,
    ) {
        let mut prefix: Vec<String> = Vec::with_capacity(3);
        metric_map_leaf_paths(&self.metrics, &mut prefix, paths);
    }

    /// The sorted [`MetricPath`] of every `Scalar` in this `Sample`.
    pub fn metric_paths(&self) -> Vec<MetricPath> {
        let mut paths: BTreeSet<MetricPath> = BTreeSet::new();
        self.metric_paths_into(&mut paths);

        paths.into_iter().collect()
    }

    /// Count of `Scalar`s in this `Sample`.
    pub fn count_scalars(&self) -> usize {
        self.metric_paths().len()
    }
}
