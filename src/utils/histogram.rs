// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fixed-width binned histograms.
//!
//! Bin numbering follows the usual convention: bin `0` is underflow, bins
//! `1..=bins` are in range and bin `bins + 1` is overflow. Every histogram
//! keeps the sum of squared weights per bin so bin errors survive rebinning
//! and round trips through output files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::HistogramError;

/// A uniformly binned axis over `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub bins: usize,
    pub min: f64,
    pub max: f64,
}

impl Axis {
    pub fn new(bins: usize, min: f64, max: f64) -> Result<Self, HistogramError> {
        if bins == 0 || !min.is_finite() || !max.is_finite() || max <= min {
            return Err(HistogramError::InvalidAxis { bins, min, max });
        }
        Ok(Self { bins, min, max })
    }

    /// Re-run the construction checks, for axes read back from a file.
    pub fn validate(&self) -> Result<(), HistogramError> {
        Axis::new(self.bins, self.min, self.max).map(|_| ())
    }

    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    /// Bin index for `x`, including the underflow (0) and overflow (`bins + 1`) bins.
    /// NaN lands in underflow.
    pub fn find_bin(&self, x: f64) -> usize {
        if x.is_nan() || x < self.min {
            return 0;
        }
        if x >= self.max {
            return self.bins + 1;
        }
        let bin = ((x - self.min) / self.width()).floor() as usize + 1;
        bin.min(self.bins)
    }

    pub fn low_edge(&self, bin: usize) -> f64 {
        self.min + (bin as f64 - 1.0) * self.width()
    }

    pub fn center(&self, bin: usize) -> f64 {
        self.low_edge(bin) + 0.5 * self.width()
    }

    fn rebinned(&self, factor: usize) -> Result<Axis, HistogramError> {
        if factor == 0 || self.bins % factor != 0 {
            return Err(HistogramError::Rebin {
                bins: self.bins,
                factor,
            });
        }
        Axis::new(self.bins / factor, self.min, self.max)
    }
}

fn check_len(name: &str, what: &'static str, values: &[f64], expected: usize) -> Result<(), HistogramError> {
    if values.len() != expected {
        return Err(HistogramError::BinCount {
            name: name.to_string(),
            what,
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

/// One-dimensional histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    pub name: String,
    pub title: String,
    pub axis: Axis,
    pub entries: u64,
    pub contents: Vec<f64>,
    pub sumw2: Vec<f64>,
}

impl Histogram1D {
    pub fn new(name: impl Into<String>, title: impl Into<String>, axis: Axis) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            axis,
            entries: 0,
            contents: vec![0.0; axis.bins + 2],
            sumw2: vec![0.0; axis.bins + 2],
        }
    }

    /// Check that the axes are valid and the bin storage matches them.
    pub fn validate(&self) -> Result<(), HistogramError> {
        self.axis.validate()?;
        let cells = self.axis.bins + 2;
        check_len(&self.name, "contents", &self.contents, cells)?;
        check_len(&self.name, "sumw2", &self.sumw2, cells)
    }

    pub fn fill(&mut self, x: f64) {
        self.fill_weighted(x, 1.0);
    }

    pub fn fill_weighted(&mut self, x: f64, weight: f64) {
        let bin = self.axis.find_bin(x);
        self.contents[bin] += weight;
        self.sumw2[bin] += weight * weight;
        self.entries += 1;
    }

    pub fn bin_content(&self, bin: usize) -> f64 {
        self.contents.get(bin).copied().unwrap_or(0.0)
    }

    pub fn bin_error(&self, bin: usize) -> f64 {
        self.sumw2.get(bin).copied().unwrap_or(0.0).sqrt()
    }

    /// Overwrite a bin's content and error.
    pub fn set_bin(&mut self, bin: usize, content: f64, error: f64) -> Result<(), HistogramError> {
        if bin >= self.contents.len() {
            return Err(HistogramError::BinOutOfRange {
                bin,
                bins: self.axis.bins,
            });
        }
        self.contents[bin] = content;
        self.sumw2[bin] = error * error;
        Ok(())
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.contents[1..=self.axis.bins].iter().sum()
    }

    /// Contents weighted mean of the in-range bin centers, or `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        let total = self.integral();
        if total <= 0.0 {
            return None;
        }
        let weighted: f64 = (1..=self.axis.bins)
            .map(|bin| self.contents[bin] * self.axis.center(bin))
            .sum();
        Some(weighted / total)
    }
}

/// Two-dimensional histogram, stored with `x` as the outer index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram2D {
    pub name: String,
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub entries: u64,
    pub contents: Vec<f64>,
    pub sumw2: Vec<f64>,
}

impl Histogram2D {
    pub fn new(name: impl Into<String>, title: impl Into<String>, x_axis: Axis, y_axis: Axis) -> Self {
        let cells = (x_axis.bins + 2) * (y_axis.bins + 2);
        Self {
            name: name.into(),
            title: title.into(),
            x_axis,
            y_axis,
            entries: 0,
            contents: vec![0.0; cells],
            sumw2: vec![0.0; cells],
        }
    }

    pub fn validate(&self) -> Result<(), HistogramError> {
        self.x_axis.validate()?;
        self.y_axis.validate()?;
        let cells = (self.x_axis.bins + 2) * (self.y_axis.bins + 2);
        check_len(&self.name, "contents", &self.contents, cells)?;
        check_len(&self.name, "sumw2", &self.sumw2, cells)
    }

    fn index(&self, x_bin: usize, y_bin: usize) -> usize {
        x_bin * (self.y_axis.bins + 2) + y_bin
    }

    pub fn fill(&mut self, x: f64, y: f64) {
        self.fill_weighted(x, y, 1.0);
    }

    pub fn fill_weighted(&mut self, x: f64, y: f64, weight: f64) {
        let idx = self.index(self.x_axis.find_bin(x), self.y_axis.find_bin(y));
        self.contents[idx] += weight;
        self.sumw2[idx] += weight * weight;
        self.entries += 1;
    }

    pub fn bin_content(&self, x_bin: usize, y_bin: usize) -> f64 {
        if x_bin > self.x_axis.bins + 1 || y_bin > self.y_axis.bins + 1 {
            return 0.0;
        }
        self.contents[self.index(x_bin, y_bin)]
    }

    /// Add another histogram with identical axes bin by bin.
    pub fn add(&mut self, other: &Histogram2D) -> Result<(), HistogramError> {
        if self.x_axis != other.x_axis || self.y_axis != other.y_axis {
            return Err(HistogramError::IncompatibleAxes {
                name: other.name.clone(),
            });
        }
        for (sum, value) in self.contents.iter_mut().zip(&other.contents) {
            *sum += value;
        }
        for (sum, value) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *sum += value;
        }
        self.entries += other.entries;
        Ok(())
    }

    /// Merge every `factor` adjacent x bins into one. Under- and overflow are kept as is.
    pub fn rebin_x(&self, factor: usize) -> Result<Histogram2D, HistogramError> {
        let x_axis = self.x_axis.rebinned(factor)?;
        let mut rebinned = Histogram2D::new(self.name.clone(), self.title.clone(), x_axis, self.y_axis);
        rebinned.entries = self.entries;

        for x_bin in 0..=self.x_axis.bins + 1 {
            let target = match x_bin {
                0 => 0,
                b if b > self.x_axis.bins => x_axis.bins + 1,
                b => (b - 1) / factor + 1,
            };
            for y_bin in 0..=self.y_axis.bins + 1 {
                let from = self.index(x_bin, y_bin);
                let to = rebinned.index(target, y_bin);
                rebinned.contents[to] += self.contents[from];
                rebinned.sumw2[to] += self.sumw2[from];
            }
        }

        Ok(rebinned)
    }

    /// The y distribution of a single x bin, including y under- and overflow.
    pub fn projection_y(&self, x_bin: usize, name: impl Into<String>) -> Histogram1D {
        let mut slice = Histogram1D::new(name, self.title.clone(), self.y_axis);
        if x_bin > self.x_axis.bins + 1 {
            return slice;
        }
        for y_bin in 0..=self.y_axis.bins + 1 {
            let idx = self.index(x_bin, y_bin);
            slice.contents[y_bin] = self.contents[idx];
            slice.sumw2[y_bin] = self.sumw2[idx];
        }
        slice.entries = slice.integral().round().max(0.0) as u64;
        slice
    }
}

/// Named histograms attached to an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramSet {
    one_d: BTreeMap<String, Histogram1D>,
    two_d: BTreeMap<String, Histogram2D>,
}

impl HistogramSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_1d(&mut self, histogram: Histogram1D) {
        self.one_d.insert(histogram.name.clone(), histogram);
    }

    pub fn insert_2d(&mut self, histogram: Histogram2D) {
        self.two_d.insert(histogram.name.clone(), histogram);
    }

    pub fn get_1d(&self, name: &str) -> Option<&Histogram1D> {
        self.one_d.get(name)
    }

    pub fn get_2d(&self, name: &str) -> Option<&Histogram2D> {
        self.two_d.get(name)
    }

    pub fn names_1d(&self) -> impl Iterator<Item = &str> {
        self.one_d.keys().map(String::as_str)
    }

    pub fn names_2d(&self) -> impl Iterator<Item = &str> {
        self.two_d.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.one_d.len() + self.two_d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.one_d.is_empty() && self.two_d.is_empty()
    }
}
