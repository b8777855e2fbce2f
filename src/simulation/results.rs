// src/simulation/results.rs
use crate::core::formula::pattern_bit;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Outcome counts of one search run, restricted to the variable register.
///
/// Keys are variable-register bit patterns: variable `v` is bit `v - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    num_vars: usize,
    counts: BTreeMap<u64, usize>,
    iterations: usize,
    seed: u64,
}

impl SearchResult {
    pub(crate) fn new(num_vars: usize, iterations: usize, seed: u64) -> Self {
        Self { num_vars, counts: BTreeMap::new(), iterations, seed }
    }

    pub(crate) fn record(&mut self, pattern: u64) {
        *self.counts.entry(pattern).or_insert(0) += 1;
    }

    /// Builds a result from externally obtained counts (e.g. another backend).
    pub fn from_counts(num_vars: usize, counts: BTreeMap<u64, usize>) -> Self {
        Self { num_vars, counts, iterations: 0, seed: 0 }
    }

    pub fn counts(&self) -> &BTreeMap<u64, usize> {
        &self.counts
    }

    /// Times `pattern` was observed.
    pub fn count(&self, pattern: u64) -> usize {
        self.counts.get(&pattern).copied().unwrap_or(0)
    }

    pub fn total_shots(&self) -> usize {
        self.counts.values().sum()
    }

    /// Observed frequency of `pattern`; 0 when nothing was sampled.
    pub fn probability(&self, pattern: u64) -> f64 {
        match self.total_shots() {
            0 => 0.0,
            total => self.count(pattern) as f64 / total as f64,
        }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Amplification rounds applied before sampling.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Seed the sampler was started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The most observed pattern; ties go to the lowest pattern.
    pub fn most_frequent(&self) -> Option<(u64, usize)> {
        // ascending key order; only a strictly higher count replaces the current best
        self.counts.iter().fold(None, |best, (&pattern, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((pattern, count)),
        })
    }

    /// Renders `pattern` with variable 1 as the rightmost character.
    pub fn bitstring(&self, pattern: u64) -> String {
        (0..self.num_vars).rev().map(|i| if pattern_bit(pattern, i) { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Results ({} iteration(s), {} shots):", self.iterations, self.total_shots())?;
        if self.counts.is_empty() {
            return writeln!(f, "  No samples recorded.");
        }
        let mut sorted: Vec<_> = self.counts.iter().collect();
        sorted.sort_by(|(pa, ca), (pb, cb)| cb.cmp(ca).then(pa.cmp(pb)));
        for (pattern, count) in sorted {
            writeln!(f, "    {}: {}", self.bitstring(*pattern), count)?;
        }
        Ok(())
    }
}
