//! Configuration types for the search driver

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the operator ranking comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingSource {
    /// Plain registry order
    None,
    /// `<data>/prior.txt`
    #[default]
    Prior,
    /// `<data>/predictions/<problem>.txt`, one prior per problem
    Predictions,
    /// `<data>/random_ordering_<n>.txt`
    Random(u32),
    /// Seeded shuffle of the registry, no file
    Shuffle(u64),
}

impl OrderingSource {
    /// Prior file to read for the given data directory and problem, if any
    pub fn prior_path(&self, data_dir: &Path, problem_idx: usize) -> Option<PathBuf> {
        match self {
            OrderingSource::None | OrderingSource::Shuffle(_) => None,
            OrderingSource::Prior => Some(data_dir.join("prior.txt")),
            OrderingSource::Predictions => Some(
                data_dir
                    .join("predictions")
                    .join(format!("{}.txt", problem_idx)),
            ),
            OrderingSource::Random(n) => Some(data_dir.join(format!("random_ordering_{}.txt", n))),
        }
    }
}

impl std::fmt::Display for OrderingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderingSource::None => write!(f, "none"),
            OrderingSource::Prior => write!(f, "prior"),
            OrderingSource::Predictions => write!(f, "predictions"),
            OrderingSource::Random(n) => write!(f, "random:{}", n),
            OrderingSource::Shuffle(seed) => write!(f, "shuffle:{}", seed),
        }
    }
}

impl std::str::FromStr for OrderingSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let (kind, arg) = match lower.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (lower.as_str(), None),
        };

        match (kind, arg) {
            ("none" | "registry", None) => Ok(OrderingSource::None),
            ("prior", None) => Ok(OrderingSource::Prior),
            ("predictions" | "nn", None) => Ok(OrderingSource::Predictions),
            ("random", Some(n)) => n
                .parse()
                .map(OrderingSource::Random)
                .map_err(|_| format!("Invalid random ordering index: '{}'", n)),
            ("shuffle", Some(seed)) => seed
                .parse()
                .map(OrderingSource::Shuffle)
                .map_err(|_| format!("Invalid shuffle seed: '{}'", seed)),
            _ => Err(format!(
                "Unknown ordering: '{}'. Valid options: none, prior, predictions, random:<n>, shuffle:<seed>",
                s
            )),
        }
    }
}

/// Main search configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Longest program considered
    pub max_program_length: usize,
    /// Stop after this many explored nodes
    pub node_limit: Option<u64>,
    /// Overall timeout for the search
    pub timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_program_length: 5,
            node_limit: None,
            timeout: None,
        }
    }
}

impl SearchConfig {
    pub fn with_max_program_length(mut self, length: usize) -> Self {
        self.max_program_length = length;
        self
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_node_limit_option(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    pub fn with_timeout_option(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether either budget is set
    pub fn is_bounded(&self) -> bool {
        self.node_limit.is_some() || self.timeout.is_some()
    }
}
