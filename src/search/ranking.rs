//! Prior-weighted operator ranking
//!
//! A prior maps component names (`MAP`, `SORT`, `isPOS`, ...) to
//! probabilities. An operation scores the minimum prior over its components;
//! the registry is then stably sorted by descending score and optionally cut
//! to the top entries.

use crate::error::{Result, SynthError};
use crate::ir::operations::Operation;
use crate::parser::parse_prior_string;
use crate::search::candidate::OperatorRegistry;
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Component name -> probability
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Priors {
    probabilities: HashMap<String, f64>,
}

impl Priors {
    pub fn new(probabilities: HashMap<String, f64>) -> Self {
        Priors { probabilities }
    }

    /// Read and parse a prior file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SynthError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let probabilities = parse_prior_string(&content)
            .map_err(|e| e.with_source(path.display().to_string()))?;
        debug!(
            "loaded {} prior entries from {}",
            probabilities.len(),
            path.display()
        );
        Ok(Priors { probabilities })
    }

    /// Probability of a component; absent components count as 0
    pub fn get(&self, component: &str) -> f64 {
        self.probabilities.get(component).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Score of an operation: the smallest prior among its components
    pub fn score(&self, op: &Operation) -> f64 {
        op.components()
            .into_iter()
            .map(|c| self.get(c))
            .fold(1.0, f64::min)
    }
}

impl FromStr for Priors {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Priors {
            probabilities: parse_prior_string(s)?,
        })
    }
}

impl OperatorRegistry {
    /// Reorder by descending prior score and keep the top `cutoff` entries.
    ///
    /// Ties keep their registry order. `None` keeps every operator.
    pub fn rank_by_prior(self, priors: &Priors, cutoff: Option<usize>) -> Self {
        let mut scored: Vec<(f64, Operation)> = self
            .operations()
            .iter()
            .map(|op| (priors.score(op), *op))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        if log::log_enabled!(log::Level::Debug) {
            for (rank, (score, op)) in scored.iter().enumerate().take(10) {
                debug!("rank {:>2}: {:<20} {:.4}", rank, op.name(), score);
            }
        }

        OperatorRegistry::new(scored.into_iter().map(|(_, op)| op).collect()).truncated(cutoff)
    }

    /// Registry operations paired with their prior scores, in rank order
    pub fn scored<'a>(&'a self, priors: &'a Priors) -> impl Iterator<Item = (Operation, f64)> + 'a {
        self.operations().iter().map(move |op| (*op, priors.score(op)))
    }
}

/// Interpret the command-line cutoff: `-1` keeps everything, any other
/// negative value keeps nothing
pub fn cutoff_from_arg(cutoff: i64) -> Option<usize> {
    if cutoff == -1 {
        return None;
    }
    Some(usize::try_from(cutoff).unwrap_or(0))
}
