//! Search result types and statistics

use crate::search::candidate::{Candidate, Program};
use std::fmt;
use std::time::Duration;

/// How a search run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A program reproducing every target was found
    Solved,
    /// No program up to the length bound solves every example
    Exhausted,
    /// The node limit or timeout stopped the search first
    BudgetExceeded,
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Solved => write!(f, "solved"),
            SearchOutcome::Exhausted => write!(f, "exhausted"),
            SearchOutcome::BudgetExceeded => write!(f, "budget exceeded"),
        }
    }
}

/// Counters collected during one search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Candidates applied, including those undone at the length bound
    pub nodes_explored: u64,
    /// Times an exhausted depth was left for its parent
    pub backtracks: u64,
    /// Times a depth's enumerator was re-initialized
    pub enumerator_inits: u64,
    /// Largest number of operations on the path at once
    pub max_depth_reached: usize,
    /// Total time spent searching
    pub elapsed_time: Duration,
}

impl SearchStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get nodes explored per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.nodes_explored as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Nodes explored: {}\n", self.nodes_explored));
        s.push_str(&format!("Throughput: {:.0} nodes/sec\n", self.throughput()));
        s.push_str(&format!("Backtracks: {}\n", self.backtracks));
        s.push_str(&format!("Enumerator inits: {}\n", self.enumerator_inits));
        s.push_str(&format!("Deepest path: {}\n", self.max_depth_reached));
        s
    }
}

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    /// The applied path, present only when solved
    pub program: Option<Program>,
    pub statistics: SearchStatistics,
}

impl SearchResult {
    pub fn solved(program: Program, statistics: SearchStatistics) -> Self {
        Self {
            outcome: SearchOutcome::Solved,
            program: Some(program),
            statistics,
        }
    }

    pub fn unsolved(outcome: SearchOutcome, statistics: SearchStatistics) -> Self {
        Self {
            outcome,
            program: None,
            statistics,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.outcome == SearchOutcome::Solved
    }

    pub fn nodes_explored(&self) -> u64 {
        self.statistics.nodes_explored
    }

    /// Candidates applied from depth 0 to the solving depth; empty if unsolved
    pub fn path(&self) -> &[Candidate] {
        self.program.as_ref().map_or(&[], |p| p.steps.as_slice())
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_solved() {
            writeln!(f, "Solved!")?;
        } else {
            writeln!(f, "Failed!")?;
        }
        writeln!(f, "Nodes explored: {}", self.statistics.nodes_explored)?;
        writeln!(f, "{}", self.statistics.elapsed_time.as_secs_f64())?;
        if let Some(ref program) = self.program {
            writeln!(f, "Solution:")?;
            write!(f, "{}", program)?;
        } else if self.outcome == SearchOutcome::BudgetExceeded {
            writeln!(f, "Search stopped: budget exceeded")?;
        }
        Ok(())
    }
}
