// src/data/series.rs

//! Implements the [`Series`] store of [`Sample`]s.
//!
//! [`Series`]: crate::data::series::Series
//! [`Sample`]: crate::data::sample::Sample

use crate::data::datetime::DateTimeL;
use crate::data::sample::{MetricPath, Sample, Scalar};

use std::collections::{BTreeSet, HashMap};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// An ordered mapping of datetime to [`Sample`].
///
/// Iteration order is the order each datetime was first inserted. For a
/// single atop log stream that is chronological order.
/// Inserting a `Sample` with a datetime already present replaces the
/// prior `Sample` in its original position (last write wins).
#[derive(Debug, Default, PartialEq)]
pub struct Series {
    samples: Vec<Sample>,
    /// datetime → index into `samples`
    index: HashMap<DateTimeL, usize>,
}

impl Series {
    pub fn new() -> Series {
        Series::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Insert `sample` keyed by its datetime.
    ///
    /// Returns the replaced `Sample` if one with the same datetime was
    /// already present.
    pub fn insert(
        &mut self,
        sample: Sample,
    ) -> Option<Sample> {
        let dt: DateTimeL = *sample.dt();
        match self.index.get(&dt) {
            Some(at) => {
                defñ!("replace sample at {} for {:?}", at, dt);
                let prior = std::mem::replace(&mut self.samples[*at], sample);

                Some(prior)
            }
            None => {
                defñ!("insert sample at {} for {:?}", self.samples.len(), dt);
                self.index.insert(dt, self.samples.len());
                self.samples.push(sample);

                None
            }
        }
    }

    /// Get the `Sample` at exactly `dt`.
    pub fn get(
        &self,
        dt: &DateTimeL,
    ) -> Option<&Sample> {
        self.index
            .get(dt)
            .map(|at| &self.samples[*at])
    }

    /// Get the [`Scalar`] at `path` within the `Sample` at exactly `dt`.
    pub fn lookup(
        &self,
        dt: &DateTimeL,
        path: &MetricPath,
    ) -> Option<&Scalar> {
        self.get(dt)?.get(path)
    }

    /// Iterate `(datetime, Sample)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&DateTimeL, &Sample)> {
        self.samples
            .iter()
            .map(|sample| (sample.dt(), sample))
    }

    pub fn samples(&self) -> &[Sample] {
        self.samples.as_slice()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Every distinct [`MetricPath`] of a `Scalar` in any `Sample`,
    /// sorted.
    pub fn metric_paths(&self) -> Vec<MetricPath> {
        defn!("{} samples", self.samples.len());
        let mut paths: BTreeSet<MetricPath> = BTreeSet::new();
        for sample in self.samples.iter() {
            sample.metric_paths_into(&mut paths);
        }
        defx!("{} paths", paths.len());

        paths.into_iter().collect()
    }

    /// The `Scalar` at `path` for each `Sample`, in insertion order.
    pub fn values(
        &self,
        path: &MetricPath,
    ) -> Vec<Option<Scalar>> {
        self.samples
            .iter()
            .map(|sample| sample.get(path).copied())
            .collect()
    }
}
