//! Iterative-deepening enumerative search
//!
//! One [`CandidateEnumerator`] per depth slot. At each step the current
//! depth's enumerator yields the next candidate, which is applied to every
//! example. A solving candidate ends the search; otherwise the traversal
//! descends, or at the length bound undoes the candidate right away. An
//! exhausted depth undoes the candidate that led into it and backtracks.

use crate::error::{Result, SynthError};
use crate::search::candidate::{Candidate, OperatorRegistry, Program};
use crate::search::config::SearchConfig;
use crate::search::enumerator::CandidateEnumerator;
use crate::search::ranking::Priors;
use crate::search::result::{SearchOutcome, SearchResult, SearchStatistics};
use crate::search::SearchAlgorithm;
use crate::validation::io_set::IoSet;
use log::{debug, info, trace};
use std::time::{Duration, Instant};

/// Driver state after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// A candidate was applied; the next step continues at the new depth
    Descending,
    /// The current depth ran out of candidates and was left
    Backtracking,
    /// The path solves every example
    Solved,
    /// The root ran out of candidates
    Exhausted,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchState::Solved | SearchState::Exhausted)
    }
}

/// An in-progress traversal over one example set.
///
/// Every candidate on `path` is applied to the example set; the depth slot
/// being enumerated is always `path.len()`.
pub struct Traversal<'a> {
    io: &'a mut IoSet,
    enumerators: Vec<CandidateEnumerator<'a>>,
    path: Vec<Candidate>,
    state: SearchState,
    statistics: SearchStatistics,
}

impl<'a> Traversal<'a> {
    /// Start a traversal; the example set must hold only its inputs
    pub fn new(io: &'a mut IoSet, registry: &'a OperatorRegistry, max_len: usize) -> Result<Self> {
        if io.depth() != 0 {
            return Err(SynthError::invariant(format!(
                "search started on an example set with {} applied operation(s)",
                io.depth()
            )));
        }

        let mut enumerators: Vec<CandidateEnumerator<'a>> = (0..max_len)
            .map(|_| CandidateEnumerator::new(registry))
            .collect();
        let mut statistics = SearchStatistics::new();

        let state = match enumerators.first_mut() {
            Some(root) => {
                root.init(io);
                statistics.enumerator_inits += 1;
                SearchState::Descending
            }
            None => SearchState::Exhausted,
        };

        Ok(Traversal {
            io,
            enumerators,
            path: Vec::with_capacity(max_len),
            state,
            statistics,
        })
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn max_len(&self) -> usize {
        self.enumerators.len()
    }

    pub fn path(&self) -> &[Candidate] {
        &self.path
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn io(&self) -> &IoSet {
        &*self.io
    }

    /// The applied path as a program
    pub fn program(&self) -> Program {
        Program::new(self.io.num_inputs(), self.path.clone())
    }

    /// Perform one driver iteration
    pub fn step(&mut self) -> Result<SearchState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        let depth = self.path.len();
        let next = self.enumerators[depth].next();

        self.state = match next {
            Some(candidate) => {
                self.io.apply(&candidate)?;
                self.statistics.nodes_explored += 1;
                self.statistics.max_depth_reached = self.statistics.max_depth_reached.max(depth + 1);
                trace!("depth {}: {}", depth, candidate);

                if self.io.is_solved() {
                    self.path.push(candidate);
                    info!(
                        "solved at depth {} after {} nodes",
                        depth + 1,
                        self.statistics.nodes_explored
                    );
                    SearchState::Solved
                } else if depth + 1 < self.enumerators.len() {
                    self.path.push(candidate);
                    let io = &*self.io;
                    self.enumerators[depth + 1].init(io);
                    self.statistics.enumerator_inits += 1;
                    SearchState::Descending
                } else {
                    self.io.undo()?;
                    SearchState::Descending
                }
            }
            None if depth == 0 => {
                info!(
                    "exhausted after {} nodes",
                    self.statistics.nodes_explored
                );
                SearchState::Exhausted
            }
            None => {
                self.io.undo()?;
                let left = self.path.pop();
                self.statistics.backtracks += 1;
                if let Some(c) = left {
                    debug!("backtrack from depth {} past {}", depth, c);
                }
                SearchState::Backtracking
            }
        };
        Ok(self.state)
    }

    /// Undo every applied candidate, leaving the example set at its inputs
    pub fn rewind(&mut self) -> Result<()> {
        while self.path.pop().is_some() {
            self.io.undo()?;
        }
        Ok(())
    }

    /// Step until a terminal state or until a budget runs out.
    ///
    /// On budget exhaustion or an error the example set is rewound to its
    /// inputs.
    pub fn run(&mut self, node_limit: Option<u64>, timeout: Option<Duration>) -> Result<SearchOutcome> {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            let state = match self.step() {
                Ok(state) => state,
                Err(e) => {
                    debug!("search aborted at depth {}: {}", self.path.len(), e);
                    self.rewind()?;
                    return Err(e);
                }
            };
            match state {
                SearchState::Solved => return Ok(SearchOutcome::Solved),
                SearchState::Exhausted => return Ok(SearchOutcome::Exhausted),
                SearchState::Descending | SearchState::Backtracking => {}
            }

            let over_nodes = node_limit.is_some_and(|n| self.statistics.nodes_explored >= n);
            let over_time = deadline.is_some_and(|d| Instant::now() >= d);
            if over_nodes || over_time {
                debug!(
                    "budget exceeded after {} nodes at depth {}",
                    self.statistics.nodes_explored,
                    self.path.len()
                );
                self.rewind()?;
                return Ok(SearchOutcome::BudgetExceeded);
            }
        }
    }

    pub fn into_statistics(self) -> SearchStatistics {
        self.statistics
    }
}

/// Exhaustive iterative-deepening search over a ranked registry
pub struct EnumerativeSearch {
    statistics: SearchStatistics,
}

impl EnumerativeSearch {
    pub fn new() -> Self {
        Self {
            statistics: SearchStatistics::new(),
        }
    }
}

impl Default for EnumerativeSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchAlgorithm for EnumerativeSearch {
    fn search(
        &mut self,
        io: &mut IoSet,
        registry: &OperatorRegistry,
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        self.reset();
        let start_time = Instant::now();
        debug!(
            "searching {} example(s), {} operator(s), max length {}",
            io.len(),
            registry.len(),
            config.max_program_length
        );

        let mut traversal = Traversal::new(io, registry, config.max_program_length)?;
        let outcome = traversal.run(config.node_limit, config.timeout)?;
        let program = traversal.program();

        self.statistics = traversal.into_statistics();
        self.statistics.elapsed_time = start_time.elapsed();

        Ok(match outcome {
            SearchOutcome::Solved => SearchResult::solved(program, self.statistics.clone()),
            other => SearchResult::unsolved(other, self.statistics.clone()),
        })
    }

    fn statistics(&self) -> SearchStatistics {
        self.statistics.clone()
    }

    fn reset(&mut self) {
        self.statistics = SearchStatistics::new();
    }
}

/// Rank the registry by an optional prior, cut it, and search.
///
/// Without a prior the registry order is kept and only the cutoff applies.
pub fn search(
    io: &mut IoSet,
    max_program_length: usize,
    registry: &OperatorRegistry,
    priors: Option<&Priors>,
    cutoff: Option<usize>,
) -> Result<SearchResult> {
    let ranked = match priors {
        Some(p) => registry.clone().rank_by_prior(p, cutoff),
        None => registry.clone().truncated(cutoff),
    };
    let config = SearchConfig::default().with_max_program_length(max_program_length);
    EnumerativeSearch::new().search(io, &ranked, &config)
}
