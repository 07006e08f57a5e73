//! Lens usage aggregation
//!
//! Turns a [`ScanIndex`] into per-directory and overall summaries:
//! - Total image count per lens
//! - Most frequent apertures and focal lengths (top-N, ties at the
//!   boundary included)
//! - Lenses ordered by image count, descending

use std::collections::HashMap;

use serde::Serialize;

use crate::constants::summary::DEFAULT_TOP_N;
use crate::scanner::{LensSample, ScanIndex};

/// A distinct value and how many times it was seen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: f64,
    pub count: usize,
}

/// Occurrence counts of numeric values, kept in first-encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    entries: Vec<ValueCount>,
    /// Bit pattern of each value → position in `entries`
    positions: HashMap<u64, usize>,
}

/// Hash key of a value; both zeros share one
fn value_key(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `value`
    pub fn add(&mut self, value: f64) {
        let key = value_key(value);
        match self.positions.get(&key) {
            Some(&idx) => self.entries[idx].count += 1,
            None => {
                self.positions.insert(key, self.entries.len());
                self.entries.push(ValueCount { value, count: 1 });
            }
        }
    }

    /// Occurrences of `value`, zero if never seen
    pub fn count(&self, value: f64) -> usize {
        self.positions
            .get(&value_key(value))
            .map_or(0, |&idx| self.entries[idx].count)
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-encounter order
    pub fn entries(&self) -> &[ValueCount] {
        &self.entries
    }

    /// All entries by count descending; equal counts keep encounter order
    pub fn most_common(&self) -> Vec<ValueCount> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// The `n` most frequent entries, extended by every entry tied with the n-th
    pub fn top_n(&self, n: usize) -> Vec<ValueCount> {
        if n == 0 {
            return Vec::new();
        }

        let ranked = self.most_common();
        if ranked.len() <= n {
            return ranked;
        }

        let cutoff = ranked[n - 1].count;
        ranked.into_iter().take_while(|e| e.count >= cutoff).collect()
    }
}

impl FromIterator<f64> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut table = Self::new();
        for value in iter {
            table.add(value);
        }
        table
    }
}

/// Usage statistics of one lens
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LensSummary {
    pub lens: String,
    pub total_images: usize,
    pub top_apertures: Vec<ValueCount>,
    pub top_focal_lengths: Vec<ValueCount>,
}

/// Lens statistics of one directory, lenses by image count descending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorySummary {
    pub directory: String,
    pub lenses: Vec<LensSummary>,
}

/// Lens statistics across every scanned directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Sum of `total_images` over all lenses
    pub total_images: usize,
    pub lenses: Vec<LensSummary>,
}

/// Builds lens summaries from a scan index
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    top_n: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl Aggregator {
    /// Create an aggregator listing the `top_n` most frequent values per lens
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Summarize the samples of a single lens
    pub fn summarize_lens(&self, lens: &str, samples: &[LensSample]) -> LensSummary {
        let apertures: FrequencyTable = samples.iter().map(|s| s.aperture).collect();
        let focal_lengths: FrequencyTable = samples.iter().map(|s| s.focal_length_mm).collect();

        LensSummary {
            lens: lens.to_string(),
            total_images: samples.len(),
            top_apertures: apertures.top_n(self.top_n),
            top_focal_lengths: focal_lengths.top_n(self.top_n),
        }
    }

    /// One summary per directory, in scan order
    pub fn directory_summaries(&self, index: &ScanIndex) -> Vec<DirectorySummary> {
        index
            .directories()
            .iter()
            .map(|dir| {
                let lenses = dir
                    .lenses
                    .iter()
                    .map(|bucket| self.summarize_lens(&bucket.lens, &bucket.samples))
                    .collect();
                DirectorySummary {
                    directory: dir.label.clone(),
                    lenses: sort_by_total(lenses),
                }
            })
            .collect()
    }

    /// Summary with every directory's samples merged per lens
    pub fn overall_overview(&self, index: &ScanIndex) -> Overview {
        let lenses: Vec<LensSummary> = index
            .samples_by_lens()
            .iter()
            .map(|(lens, samples)| self.summarize_lens(lens, samples))
            .collect();
        let total_images = lenses.iter().map(|l| l.total_images).sum();

        Overview {
            total_images,
            lenses: sort_by_total(lenses),
        }
    }
}

/// Stable sort by image count, descending
fn sort_by_total(mut lenses: Vec<LensSummary>) -> Vec<LensSummary> {
    lenses.sort_by(|a, b| b.total_images.cmp(&a.total_images));
    lenses
}
