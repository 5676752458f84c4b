use enumsynth::ir::{BoundsPolicy, Value};
use enumsynth::search::{
    Arguments, Candidate, CandidateEnumerator, EnumerativeSearch, OperatorRegistry, Priors,
    SearchAlgorithm, SearchConfig, SearchOutcome, search,
};
use enumsynth::semantics::ProgramState;
use enumsynth::validation::IoSet;
use enumsynth::SynthError;
use proptest::prelude::*;

use crate::common::write_data_dir;

fn replay(inputs: Vec<Value>, steps: &[Candidate]) -> Value {
    let mut state = ProgramState::new(inputs);
    for step in steps {
        match step.args {
            Arguments::Unary(a) => state.apply_unary(&step.op, a).unwrap(),
            Arguments::Binary(a, b) => state.apply_binary(&step.op, a, b).unwrap(),
        }
    }
    state.last().unwrap().clone()
}

#[test]
fn test_loaded_problem_solved_with_prior() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());

    let mut io = IoSet::load(dir.path(), 0, 2).unwrap();
    let priors = Priors::load(&dir.path().join("prior.txt")).unwrap();
    let result = search(&mut io, 3, &OperatorRegistry::standard(), Some(&priors), None).unwrap();

    assert!(result.is_solved());
    assert_eq!(result.nodes_explored(), 1);
    assert_eq!(result.program.unwrap().to_string(), "  %1 <- sort %0\n");
    assert!(io.is_solved());
}

#[test]
fn test_take_then_reverse_with_sentinel_access() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());

    let mut io = IoSet::load(dir.path(), 2, 2).unwrap();
    let priors = Priors::load(&dir.path().join("prior.txt")).unwrap();
    let registry = OperatorRegistry::standard()
        .with_bounds_policy(BoundsPolicy::Sentinel)
        .rank_by_prior(&priors, None);
    let config = SearchConfig::default().with_max_program_length(2);

    let result = EnumerativeSearch::new().search(&mut io, &registry, &config).unwrap();
    assert!(result.is_solved());
    for (i, inputs) in [
        vec![Value::int(2), Value::array(vec![7, 8, 9])],
        vec![Value::int(2), Value::array(vec![1, 2])],
    ]
    .into_iter()
    .enumerate()
    {
        assert_eq!(&replay(inputs, result.path()), io.target(i).unwrap());
    }
}

#[test]
fn test_strict_access_aborts_search() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());

    let mut io = IoSet::load(dir.path(), 2, 2).unwrap();
    let priors = Priors::load(&dir.path().join("prior.txt")).unwrap();
    let err = search(&mut io, 2, &OperatorRegistry::standard(), Some(&priors), None).unwrap_err();
    assert!(matches!(err, SynthError::IndexOutOfRange { .. }));
    assert!(err.is_internal());
    assert_eq!(io.depth(), 0);

    // The same example set can be searched again once access is tolerant
    let registry = OperatorRegistry::standard()
        .with_bounds_policy(BoundsPolicy::Sentinel)
        .rank_by_prior(&priors, None);
    let config = SearchConfig::default().with_max_program_length(2);
    let result = EnumerativeSearch::new().search(&mut io, &registry, &config).unwrap();
    assert!(result.is_solved());
}

#[test]
fn test_scalar_ops_extend_reach() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());

    let mut io = IoSet::load(dir.path(), 1, 2).unwrap();
    let registry = OperatorRegistry::full().with_bounds_policy(BoundsPolicy::Sentinel);
    let result = search(&mut io, 2, &registry, None, None).unwrap();
    assert!(result.is_solved());
    assert_eq!(
        replay(vec![Value::array(vec![1, 9, 4])], result.path()),
        Value::int(10)
    );
}

#[test]
fn test_timeout_budget() {
    let mut io = IoSet::from_pairs(vec![(
        vec![Value::array(vec![1, 2, 3]), Value::array(vec![4, 5])],
        Value::array(vec![1000, -1000, 7, 7, 7]),
    )])
    .unwrap();
    let config = SearchConfig::default()
        .with_max_program_length(6)
        .with_timeout(std::time::Duration::from_millis(20));
    let registry = OperatorRegistry::standard().with_bounds_policy(BoundsPolicy::Sentinel);
    let result = EnumerativeSearch::new().search(&mut io, &registry, &config).unwrap();
    assert_eq!(result.outcome, SearchOutcome::BudgetExceeded);
    assert_eq!(io.depth(), 0);
}

/// Pick a random two-step program over the standard registry
fn random_program(
    registry: &OperatorRegistry,
    inputs: &[Value],
    first: usize,
    second: usize,
) -> Vec<Candidate> {
    let mut state = ProgramState::new(inputs.to_vec());
    let mut steps = Vec::new();
    for pick in [first, second] {
        let types: Vec<_> = state.types().collect();
        let mut enumerator = CandidateEnumerator::new(registry);
        enumerator.reset(&types);
        let candidates: Vec<Candidate> = enumerator.collect();
        let step = candidates[pick % candidates.len()];
        match step.args {
            Arguments::Unary(a) => state.apply_unary(&step.op, a).unwrap(),
            Arguments::Binary(a, b) => state.apply_binary(&step.op, a, b).unwrap(),
        }
        steps.push(step);
    }
    steps
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Any target produced by a two-step program is found, and the found
    /// program reproduces every example
    #[test]
    fn prop_generated_targets_are_solved(
        a in prop::collection::vec(-8i32..8, 1..5),
        b in prop::collection::vec(-8i32..8, 1..5),
        n in 0i32..4,
        first in 0usize..1000,
        second in 0usize..1000,
    ) {
        let registry = OperatorRegistry::standard().with_bounds_policy(BoundsPolicy::Sentinel);
        let inputs = vec![
            vec![Value::int(n), Value::array(a)],
            vec![Value::int(n + 1), Value::array(b)],
        ];
        let program = random_program(&registry, &inputs[0], first, second);

        let pairs: Vec<(Vec<Value>, Value)> = inputs
            .iter()
            .map(|i| (i.clone(), replay(i.clone(), &program)))
            .collect();
        let mut io = IoSet::from_pairs(pairs.clone()).unwrap();
        let result = search(&mut io, 2, &registry, None, None).unwrap();

        prop_assert!(result.is_solved());
        prop_assert!(result.path().len() <= 2);
        for (inputs, target) in pairs {
            prop_assert_eq!(replay(inputs, result.path()), target);
        }
    }
}
