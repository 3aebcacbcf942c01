//! Which symbols get a report

use crate::model::SymbolStat;
use clap::ValueEnum;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Picks the symbols to report on from a run's statistics
pub trait SelectionPolicy: Send + Sync {
    /// Symbols in reporting order, without duplicates
    fn select(&self, stats: &[SymbolStat]) -> Vec<String>;

    fn name(&self) -> &'static str;
}

/// `k` symbols drawn uniformly without replacement
#[derive(Debug, Clone, Copy)]
pub struct RandomSample {
    k: usize,
    seed: Option<u64>,
}

impl RandomSample {
    pub fn new(k: usize) -> Self {
        Self { k, seed: None }
    }

    /// Reproducible draw
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl SelectionPolicy for RandomSample {
    fn select(&self, stats: &[SymbolStat]) -> Vec<String> {
        let picked: Vec<&SymbolStat> = match self.seed {
            Some(seed) => stats
                .choose_multiple(&mut StdRng::seed_from_u64(seed), self.k)
                .collect(),
            None => stats.choose_multiple(&mut rand::rng(), self.k).collect(),
        };
        picked.into_iter().map(|s| s.symbol.clone()).collect()
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// The `k` best and `k` worst symbols by latest return
#[derive(Debug, Clone, Copy)]
pub struct Extremal {
    k: usize,
}

impl Extremal {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl SelectionPolicy for Extremal {
    fn select(&self, stats: &[SymbolStat]) -> Vec<String> {
        let mut ranked: Vec<&SymbolStat> = stats.iter().collect();
        ranked.sort_by(|a, b| b.latest_return.total_cmp(&a.latest_return));

        let top = ranked.iter().take(self.k);
        let bottom = ranked.iter().rev().take(self.k);

        let mut seen = HashSet::new();
        top.chain(bottom)
            .filter(|s| seen.insert(s.symbol.as_str()))
            .map(|s| s.symbol.clone())
            .collect()
    }

    fn name(&self) -> &'static str {
        "extremal"
    }
}

/// Selection policy named on the command line or in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// Uniform random sample
    #[default]
    Random,
    /// Top and bottom movers of the last day
    Extremal,
}

impl SelectionStrategy {
    pub fn policy(self, k: usize, seed: Option<u64>) -> Box<dyn SelectionPolicy> {
        match self {
            Self::Random => {
                let sample = RandomSample::new(k);
                Box::new(match seed {
                    Some(seed) => sample.with_seed(seed),
                    None => sample,
                })
            }
            Self::Extremal => Box::new(Extremal::new(k)),
        }
    }
}
